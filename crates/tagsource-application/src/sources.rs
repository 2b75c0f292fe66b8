// SPDX-License-Identifier: GPL-3.0-or-later

//! Construction of the metadata sources from configuration.

use std::sync::Arc;
use std::time::Duration;
use tagsource_config::{AppConfig, JioSaavnConfig, YouTubeConfig};
use tagsource_domain::{AlbumInfo, DataSource, TrackInfo};
use tagsource_metadata::{
    JioSaavnSettings, JioSaavnSource, MetadataSource, YouTubeError, YouTubeSettings,
    YouTubeSource, YtMusicClient,
};
use tracing::{debug, info};

/// Both configured sources, ready for lookups.
#[derive(Clone)]
pub struct Sources {
    pub jiosaavn: Arc<JioSaavnSource>,
    pub youtube: Arc<YouTubeSource>,
}

impl Sources {
    /// Fails only when the YouTube client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, YouTubeError> {
        let sources = Self {
            jiosaavn: Arc::new(jiosaavn_source(&config.jiosaavn)),
            youtube: Arc::new(youtube_source(&config.youtube)?),
        };
        info!(target: "application", "metadata sources initialized");
        Ok(sources)
    }

    /// The selected source, or both in `[JioSaavn, YouTube]` order.
    pub fn select(&self, source: Option<DataSource>) -> Vec<Arc<dyn MetadataSource>> {
        let jiosaavn: Arc<dyn MetadataSource> = self.jiosaavn.clone();
        let youtube: Arc<dyn MetadataSource> = self.youtube.clone();
        match source {
            Some(DataSource::JioSaavn) => vec![jiosaavn],
            Some(DataSource::YouTube) => vec![youtube],
            None => vec![jiosaavn, youtube],
        }
    }

    /// Resolves an album reference against whichever source recognizes it.
    pub async fn album_by_reference(&self, reference: &str) -> Option<AlbumInfo> {
        for source in self.select(None) {
            if let Some(album) = source.album_by_id(reference).await {
                return Some(album);
            }
            debug!(target: "application", source = %source.data_source(), reference, "album reference not resolved");
        }
        None
    }

    /// Resolves a track reference against whichever source recognizes it.
    pub async fn track_by_reference(&self, reference: &str) -> Option<TrackInfo> {
        for source in self.select(None) {
            if let Some(track) = source.track_by_id(reference).await {
                return Some(track);
            }
            debug!(target: "application", source = %source.data_source(), reference, "track reference not resolved");
        }
        None
    }
}

fn jiosaavn_source(config: &JioSaavnConfig) -> JioSaavnSource {
    JioSaavnSource::with_http(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
        JioSaavnSettings {
            source_weight: config.source_weight,
            search_limit: config.search_limit,
            exclude_fields: config.exclude_fields.clone(),
        },
    )
}

fn youtube_source(config: &YouTubeConfig) -> Result<YouTubeSource, YouTubeError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut builder = YtMusicClient::builder()
        .timeout(timeout)
        .client_id(config.client_id.clone())
        .client_secret(config.client_secret.clone());
    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(base_url.clone());
    }

    Ok(YouTubeSource::with_http(
        builder.build()?,
        timeout,
        YouTubeSettings {
            source_weight: config.source_weight,
            search_limit: config.search_limit,
            exclude_fields: config.exclude_fields.clone(),
        },
    ))
}
