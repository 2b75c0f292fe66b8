// SPDX-License-Identifier: GPL-3.0-or-later
pub mod sources;
pub mod views;

pub use sources::Sources;
pub use views::{RefreshSummary, ViewCountProvider, ViewRefreshError, ViewRefreshService};
