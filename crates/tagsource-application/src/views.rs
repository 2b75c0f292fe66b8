// SPDX-License-Identifier: GPL-3.0-or-later

//! Refresh of YouTube view counts stored on library items.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tagsource_domain::{FieldValue, ItemQuery, LibraryItem};
use tagsource_infrastructure::{LibraryRepository, TagWriter};
use tagsource_metadata::youtube::mapping::{TRACK_ID_FIELD, UPDATED_FIELD, VIEWS_FIELD};
use tagsource_metadata::YouTubeSource;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Anything that can report the current view count of a YouTube video.
#[async_trait]
pub trait ViewCountProvider: Send + Sync {
    async fn view_count(&self, video_id: &str) -> Option<u64>;
}

#[async_trait]
impl ViewCountProvider for YouTubeSource {
    async fn view_count(&self, video_id: &str) -> Option<u64> {
        YouTubeSource::view_count(self, video_id).await
    }
}

#[derive(Debug, Error)]
pub enum ViewRefreshError {
    #[error("failed to load library items: {0}")]
    Query(#[source] anyhow::Error),

    #[error("failed to store item {item_id}: {source}")]
    Store {
        item_id: i64,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write tags to {path}: {source}")]
    WriteTags {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Outcome counts of one refresh run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    /// Items whose view count could not be fetched.
    pub skipped: usize,
    /// Items without a `yt_track_id`.
    pub missing_id: usize,
}

pub struct ViewRefreshService {
    views: Arc<dyn ViewCountProvider>,
    library: Arc<dyn LibraryRepository>,
    tags: Arc<dyn TagWriter>,
}

impl ViewRefreshService {
    pub fn new(
        views: Arc<dyn ViewCountProvider>,
        library: Arc<dyn LibraryRepository>,
        tags: Arc<dyn TagWriter>,
    ) -> Self {
        Self {
            views,
            library,
            tags,
        }
    }

    /// Updates `yt_views` and `yt_updated` on every matching item that has a
    /// YouTube track id, writing file tags as well when `write` is set.
    ///
    /// Items are handled one at a time; a store or tag-write failure stops
    /// the run, leaving already processed items updated.
    pub async fn refresh(&self, query: &ItemQuery, write: bool) -> Result<RefreshSummary, ViewRefreshError> {
        let items = self.library.find(query).await.map_err(ViewRefreshError::Query)?;
        info!(target: "views", items = items.len(), write, "refreshing view counts");

        let mut summary = RefreshSummary::default();
        for mut item in items {
            let Some(video_id) = track_id(&item) else {
                debug!(target: "views", item_id = item.id, "no yt_track_id, skipping");
                summary.missing_id += 1;
                continue;
            };

            let Some(views) = self.views.view_count(&video_id).await else {
                warn!(target: "views", item_id = item.id, %video_id, "view count unavailable");
                summary.skipped += 1;
                continue;
            };

            item.set(VIEWS_FIELD, i64::try_from(views).unwrap_or(i64::MAX));
            item.set(UPDATED_FIELD, Utc::now());
            self.library
                .store(&item)
                .await
                .map_err(|source| ViewRefreshError::Store {
                    item_id: item.id,
                    source,
                })?;

            if write {
                self.tags
                    .write_tags(&item)
                    .map_err(|source| ViewRefreshError::WriteTags {
                        path: item.path.clone(),
                        source,
                    })?;
            }

            debug!(target: "views", item_id = item.id, %video_id, views, "updated view count");
            summary.updated += 1;
        }

        info!(
            target: "views",
            updated = summary.updated,
            skipped = summary.skipped,
            missing_id = summary.missing_id,
            "view count refresh finished"
        );
        Ok(summary)
    }
}

fn track_id(item: &LibraryItem) -> Option<String> {
    item.get(TRACK_ID_FIELD)
        .and_then(FieldValue::as_text)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
