// SPDX-License-Identifier: GPL-3.0-or-later

//! Payload shapes returned by the JioSaavn web API.
//!
//! JioSaavn mixes strings and numbers for the same field across endpoints, so
//! scalar fields go through the lenient helpers.

use serde::Deserialize;

use crate::util::lenient_string;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One album or song hit from a search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub perma_url: Option<String>,
    #[serde(rename = "type", default)]
    pub hit_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaavnAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub albumid: Option<String>,
    #[serde(default)]
    pub perma_url: Option<String>,
    #[serde(default)]
    pub primary_artists: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub primary_artists_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub songs: Vec<SaavnSong>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongDetailsResponse {
    #[serde(default)]
    pub songs: Vec<SaavnSong>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaavnSong {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub music_id: Option<String>,
    #[serde(default)]
    pub singers: Option<String>,
    #[serde(default)]
    pub starring: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default)]
    pub more_info: Option<SongMoreInfo>,
    #[serde(default)]
    pub perma_url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SongMoreInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
}
