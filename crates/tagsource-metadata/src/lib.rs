// SPDX-License-Identifier: GPL-3.0-or-later

//! JioSaavn and YouTube Music metadata sources for the autotagger.

pub mod cover_art;
pub mod jiosaavn;
pub mod source;
pub mod youtube;

mod util;

pub use cover_art::{CoverArtError, CoverArtValidator, HttpCoverArtValidator};
pub use jiosaavn::{JioSaavnClient, JioSaavnError, JioSaavnSettings, JioSaavnSource, SaavnApi};
pub use source::{source_distance, MetadataSource, COVER_ART_FIELD, SOURCE_DISTANCE_KEY};
pub use youtube::{
    PlaylistEntry, SearchImport, YouTubeError, YouTubeSettings, YouTubeSource, YtMusicApi,
    YtMusicClient, YtMusicClientBuilder,
};
