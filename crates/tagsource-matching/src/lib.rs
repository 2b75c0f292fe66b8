// SPDX-License-Identifier: GPL-3.0-or-later

//! Search-query normalization and candidate scoring shared by the metadata sources.

pub mod query;
pub mod scoring;

pub use query::{album_query, normalize_query, track_query};
pub use scoring::{clean_for_match, match_score};
