// SPDX-License-Identifier: GPL-3.0-or-later

//! YouTube Music payload shapes (as produced by ytmusicapi-compatible services).

use serde::Deserialize;

use crate::util::{lenient_string, lenient_u64};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Album search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumSearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "browseId", default)]
    pub browse_id: Option<String>,
    #[serde(rename = "type", default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Album reference on a track: album tracks carry a plain title, search and
/// playlist tracks carry `{name, id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TrackAlbum {
    Title(String),
    Ref {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        id: Option<String>,
    },
}

impl TrackAlbum {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Title(title) => Some(title.as_str()),
            Self::Ref { name, .. } => name.as_deref(),
        }
    }
}

/// Track as it appears in song searches, album listings and playlists.
#[derive(Debug, Clone, Deserialize)]
pub struct YtTrack {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<TrackAlbum>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub album_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub tracks: Vec<YtTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtPlaylist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tracks: Vec<YtTrack>,
}

/// Song detail; only `videoDetails` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct SongDetails {
    #[serde(rename = "videoDetails")]
    pub video_details: VideoDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoDetails {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
    #[serde(rename = "lengthSeconds", default, deserialize_with = "lenient_u64")]
    pub length_seconds: Option<u64>,
    #[serde(rename = "viewCount", default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
}
