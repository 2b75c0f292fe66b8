// SPDX-License-Identifier: GPL-3.0-or-later

//! JioSaavn metadata source.

pub mod client;
pub mod mapping;
pub mod models;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tagsource_domain::{AlbumInfo, DataSource, TrackInfo};
use tagsource_matching::normalize_query;
use tracing::{debug, warn};

pub use client::{detail_token, JioSaavnClient, JioSaavnError, SaavnApi};

use crate::cover_art::{CoverArtValidator, HttpCoverArtValidator};
use crate::source::{is_excluded, strip_excluded_album, strip_excluded_track, MetadataSource, COVER_ART_FIELD};
use models::SearchHit;

const ALBUM_URL_MARKER: &str = "jiosaavn.com/album/";
const SONG_URL_MARKER: &str = "jiosaavn.com/song/";

/// Settings for [`JioSaavnSource`].
#[derive(Debug, Clone)]
pub struct JioSaavnSettings {
    pub source_weight: f64,
    pub search_limit: usize,
    pub exclude_fields: Vec<String>,
}

impl Default for JioSaavnSettings {
    fn default() -> Self {
        Self {
            source_weight: 0.5,
            search_limit: 5,
            exclude_fields: Vec::new(),
        }
    }
}

/// Adapts the JioSaavn catalog to album and track candidates.
pub struct JioSaavnSource {
    api: Arc<dyn SaavnApi>,
    cover_art: Arc<dyn CoverArtValidator>,
    settings: JioSaavnSettings,
}

impl JioSaavnSource {
    pub fn new(
        api: Arc<dyn SaavnApi>,
        cover_art: Arc<dyn CoverArtValidator>,
        settings: JioSaavnSettings,
    ) -> Self {
        Self {
            api,
            cover_art,
            settings,
        }
    }

    /// Source backed by the public JioSaavn API.
    pub fn with_http(base_url: Option<String>, timeout: Duration, settings: JioSaavnSettings) -> Self {
        Self::new(
            Arc::new(JioSaavnClient::new(base_url, timeout)),
            Arc::new(HttpCoverArtValidator::new(timeout)),
            settings,
        )
    }

    async fn fetch_album(&self, perma_url: &str, album_type: Option<&str>) -> Result<AlbumInfo, JioSaavnError> {
        let token = detail_token(perma_url)
            .ok_or_else(|| JioSaavnError::InvalidReference(perma_url.to_string()))?;
        let details = self.api.album_details(token).await?;
        let mut album = mapping::album_to_info(&details, album_type, Utc::now());

        if !is_excluded(&self.settings.exclude_fields, COVER_ART_FIELD) {
            if let Some(url) = mapping::cover_art_candidate(&details) {
                if self.cover_art.is_valid_image(&url).await {
                    album.cover_art_url = Some(url);
                }
            }
        }

        strip_excluded_album(&mut album, &self.settings.exclude_fields);
        Ok(album)
    }

    async fn fetch_track(&self, perma_url: &str) -> Result<TrackInfo, JioSaavnError> {
        let token = detail_token(perma_url)
            .ok_or_else(|| JioSaavnError::InvalidReference(perma_url.to_string()))?;
        let song = self.api.song_details(token).await?;
        let mut track = mapping::song_to_track(&song, Utc::now());
        strip_excluded_track(&mut track, &self.settings.exclude_fields);
        Ok(track)
    }

    async fn try_search_albums(&self, query: &str) -> Result<Vec<AlbumInfo>, JioSaavnError> {
        let hits = self.api.search_albums(query, self.settings.search_limit).await?;
        let mut albums = Vec::with_capacity(hits.len());
        for hit in hits.iter().take(self.settings.search_limit) {
            let Some(perma_url) = hit.perma_url.as_deref() else {
                debug!(target: "jiosaavn", title = ?hit.title, "search hit without perma_url");
                continue;
            };
            match self.fetch_album(perma_url, hit.hit_type.as_deref()).await {
                Ok(album) => {
                    debug!(target: "jiosaavn", album = %album.album, id = %album.album_id, "found album");
                    albums.push(album);
                }
                Err(error) => warn!(target: "jiosaavn", perma_url, %error, "album lookup failed"),
            }
        }
        Ok(albums)
    }

    async fn try_search_tracks(&self, query: &str) -> Result<Vec<TrackInfo>, JioSaavnError> {
        let hits: Vec<SearchHit> = self.api.search_songs(query, self.settings.search_limit).await?;
        let mut tracks = Vec::with_capacity(hits.len());
        for hit in hits.iter().take(self.settings.search_limit) {
            let Some(perma_url) = hit.perma_url.as_deref() else {
                debug!(target: "jiosaavn", title = ?hit.title, "song hit without perma_url");
                continue;
            };
            match self.fetch_track(perma_url).await {
                Ok(track) => tracks.push(track),
                Err(error) => warn!(target: "jiosaavn", perma_url, %error, "song lookup failed"),
            }
        }
        Ok(tracks)
    }
}

#[async_trait]
impl MetadataSource for JioSaavnSource {
    fn data_source(&self) -> DataSource {
        DataSource::JioSaavn
    }

    fn source_weight(&self) -> f64 {
        self.settings.source_weight
    }

    async fn search_albums(&self, query: &str) -> Vec<AlbumInfo> {
        let query = normalize_query(query);
        debug!(target: "jiosaavn", %query, "Searching JioSaavn albums");
        match self.try_search_albums(&query).await {
            Ok(albums) => albums,
            Err(error) => {
                warn!(target: "jiosaavn", %query, %error, "album search failed");
                Vec::new()
            }
        }
    }

    async fn search_tracks(&self, query: &str) -> Vec<TrackInfo> {
        let query = normalize_query(query);
        debug!(target: "jiosaavn", %query, "Searching JioSaavn songs");
        match self.try_search_tracks(&query).await {
            Ok(tracks) => tracks,
            Err(error) => {
                warn!(target: "jiosaavn", %query, %error, "song search failed");
                Vec::new()
            }
        }
    }

    async fn album_by_id(&self, reference: &str) -> Option<AlbumInfo> {
        if !reference.contains(ALBUM_URL_MARKER) {
            return None;
        }
        debug!(target: "jiosaavn", reference, "Fetching album by reference");
        self.fetch_album(reference, Some("album"))
            .await
            .map_err(|error| warn!(target: "jiosaavn", reference, %error, "album lookup failed"))
            .ok()
    }

    async fn track_by_id(&self, reference: &str) -> Option<TrackInfo> {
        if !reference.contains(SONG_URL_MARKER) {
            return None;
        }
        debug!(target: "jiosaavn", reference, "Fetching track by reference");
        self.fetch_track(reference)
            .await
            .map_err(|error| warn!(target: "jiosaavn", reference, %error, "song lookup failed"))
            .ok()
    }
}
