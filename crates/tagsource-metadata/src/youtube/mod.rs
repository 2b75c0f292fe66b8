// SPDX-License-Identifier: GPL-3.0-or-later

//! YouTube Music metadata source.

pub mod client;
pub mod import;
pub mod mapping;
pub mod models;
pub mod refs;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tagsource_domain::{AlbumInfo, DataSource, TrackInfo};
use tagsource_matching::normalize_query;
use tracing::{debug, warn};

pub use client::{YouTubeError, YtMusicApi, YtMusicClient, YtMusicClientBuilder};
pub use import::{PlaylistEntry, SearchImport};

use crate::cover_art::{CoverArtValidator, HttpCoverArtValidator};
use crate::source::{is_excluded, strip_excluded_album, strip_excluded_track, MetadataSource, COVER_ART_FIELD};

/// Settings for [`YouTubeSource`].
#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub source_weight: f64,
    pub search_limit: usize,
    pub exclude_fields: Vec<String>,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            source_weight: 0.5,
            search_limit: 5,
            exclude_fields: Vec::new(),
        }
    }
}

/// Adapts YouTube Music to album and track candidates, plus playlist and
/// search import helpers.
pub struct YouTubeSource {
    api: Arc<dyn YtMusicApi>,
    cover_art: Arc<dyn CoverArtValidator>,
    settings: YouTubeSettings,
}

impl YouTubeSource {
    pub fn new(
        api: Arc<dyn YtMusicApi>,
        cover_art: Arc<dyn CoverArtValidator>,
        settings: YouTubeSettings,
    ) -> Self {
        Self {
            api,
            cover_art,
            settings,
        }
    }

    /// Source backed by an HTTP gateway client.
    pub fn with_http(client: YtMusicClient, timeout: Duration, settings: YouTubeSettings) -> Self {
        Self::new(
            Arc::new(client),
            Arc::new(HttpCoverArtValidator::new(timeout)),
            settings,
        )
    }

    /// Current view count of a video. Failures are logged and yield `None`.
    pub async fn view_count(&self, video_id: &str) -> Option<u64> {
        if video_id.is_empty() {
            return None;
        }
        match self.api.song(video_id).await {
            Ok(song) => song.video_details.view_count,
            Err(error) => {
                debug!(target: "youtube", video_id, %error, "view count unavailable");
                None
            }
        }
    }

    fn wants_views(&self) -> bool {
        !is_excluded(&self.settings.exclude_fields, mapping::VIEWS_FIELD)
    }

    async fn enrich_views(&self, track: &mut TrackInfo) {
        if self.wants_views() {
            let views = self.view_count(&track.track_id).await;
            mapping::set_views(track, views);
        }
    }

    async fn fetch_album(&self, browse_id: &str) -> Result<AlbumInfo, YouTubeError> {
        let details = self.api.album(browse_id).await?;
        let mut album = mapping::album_to_info(&details, browse_id, Utc::now());

        for track in &mut album.tracks {
            self.enrich_views(track).await;
        }

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

    async fn try_search_albums(&self, query: &str) -> Result<Vec<AlbumInfo>, YouTubeError> {
        let hits = self.api.search_albums(query, self.settings.search_limit).await?;
        let mut albums = Vec::with_capacity(hits.len());
        for hit in hits.iter().take(self.settings.search_limit) {
            let Some(browse_id) = hit.browse_id.as_deref() else {
                debug!(target: "youtube", title = ?hit.title, "album hit without browseId");
                continue;
            };
            debug!(target: "youtube", title = ?hit.title, browse_id, "found album");
            match self.fetch_album(browse_id).await {
                Ok(album) => albums.push(album),
                Err(error) => warn!(target: "youtube", browse_id, %error, "album lookup failed"),
            }
        }
        Ok(albums)
    }

    async fn try_search_tracks(&self, query: &str) -> Result<Vec<TrackInfo>, YouTubeError> {
        let hits = self.api.search_songs(query, self.settings.search_limit).await?;
        let now = Utc::now();
        let mut tracks = Vec::with_capacity(hits.len());
        for hit in hits.iter().take(self.settings.search_limit) {
            if hit.video_id.as_deref().map_or(true, str::is_empty) {
                debug!(target: "youtube", title = ?hit.title, "song hit without videoId");
                continue;
            }
            let mut track = mapping::track_to_info(hit, None, now);
            self.enrich_views(&mut track).await;
            strip_excluded_track(&mut track, &self.settings.exclude_fields);
            tracks.push(track);
        }
        Ok(tracks)
    }
}

#[async_trait]
impl MetadataSource for YouTubeSource {
    fn data_source(&self) -> DataSource {
        DataSource::YouTube
    }

    fn source_weight(&self) -> f64 {
        self.settings.source_weight
    }

    async fn search_albums(&self, query: &str) -> Vec<AlbumInfo> {
        let query = normalize_query(query);
        debug!(target: "youtube", %query, "Searching YouTube albums");
        match self.try_search_albums(&query).await {
            Ok(albums) => albums,
            Err(error) => {
                warn!(target: "youtube", %query, %error, "album search failed");
                Vec::new()
            }
        }
    }

    async fn search_tracks(&self, query: &str) -> Vec<TrackInfo> {
        let query = normalize_query(query);
        debug!(target: "youtube", %query, "Searching YouTube songs");
        match self.try_search_tracks(&query).await {
            Ok(tracks) => tracks,
            Err(error) => {
                warn!(target: "youtube", %query, %error, "song search failed");
                Vec::new()
            }
        }
    }

    async fn album_by_id(&self, reference: &str) -> Option<AlbumInfo> {
        let browse_id = refs::album_browse_id(reference)?;
        debug!(target: "youtube", %browse_id, "Fetching album by reference");
        self.fetch_album(&browse_id)
            .await
            .map_err(|error| warn!(target: "youtube", %browse_id, %error, "album lookup failed"))
            .ok()
    }

    async fn track_by_id(&self, reference: &str) -> Option<TrackInfo> {
        let video_id = refs::video_id(reference)?;
        debug!(target: "youtube", %video_id, "Fetching track by reference");
        match self.api.song(&video_id).await {
            Ok(song) => {
                let mut track = mapping::song_to_info(&song, Utc::now());
                strip_excluded_track(&mut track, &self.settings.exclude_fields);
                Some(track)
            }
            Err(error) => {
                warn!(target: "youtube", %video_id, %error, "song lookup failed");
                None
            }
        }
    }
}
