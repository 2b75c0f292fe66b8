// SPDX-License-Identifier: GPL-3.0-or-later

//! The interface every metadata source exposes to the autotagger.

use async_trait::async_trait;
use tagsource_domain::{AlbumInfo, DataSource, Distance, LibraryItem, TrackInfo};
use tagsource_matching::{album_query, track_query};
use tracing::debug;

/// Key under which a source adds its weight to a candidate's [`Distance`].
pub const SOURCE_DISTANCE_KEY: &str = "source";

/// Shared cover-art field name; also honoured in `exclude_fields`.
pub const COVER_ART_FIELD: &str = "cover_art_url";

/// A remote catalog adapted to the normalized album and track records.
///
/// Search and lookup methods never fail: remote errors are logged by the
/// implementation and surface as empty results, so callers must tolerate zero
/// candidates.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn data_source(&self) -> DataSource;

    fn source_weight(&self) -> f64;

    /// Searches albums for a free-text query.
    async fn search_albums(&self, query: &str) -> Vec<AlbumInfo>;

    /// Searches tracks for a free-text query.
    async fn search_tracks(&self, query: &str) -> Vec<TrackInfo>;

    /// Fetches one album by a URL or id belonging to this source.
    ///
    /// References that do not belong to the source yield `None`.
    async fn album_by_id(&self, reference: &str) -> Option<AlbumInfo>;

    /// Fetches one track by a URL or id belonging to this source.
    async fn track_by_id(&self, reference: &str) -> Option<TrackInfo>;

    /// Album candidates for a release, searching by release title alone when
    /// the release is likely a various-artists compilation.
    async fn candidates(
        &self,
        _items: &[LibraryItem],
        artist: &str,
        release: &str,
        va_likely: bool,
    ) -> Vec<AlbumInfo> {
        let query = album_query(artist, release, va_likely);
        debug!(
            target: "metadata",
            source = %self.data_source(),
            %query,
            va_likely,
            "looking up album candidates"
        );
        self.search_albums(&query).await
    }

    /// Track candidates for a single library item.
    async fn item_candidates(
        &self,
        _item: &LibraryItem,
        artist: &str,
        title: &str,
    ) -> Vec<TrackInfo> {
        let query = track_query(artist, title);
        debug!(
            target: "metadata",
            source = %self.data_source(),
            %query,
            "looking up track candidates"
        );
        self.search_tracks(&query).await
    }

    fn album_distance(&self, album: &AlbumInfo) -> Distance {
        source_distance(self.data_source(), album.data_source, self.source_weight())
    }

    fn track_distance(&self, track: &TrackInfo) -> Distance {
        source_distance(self.data_source(), track.data_source, self.source_weight())
    }
}

/// The source weight when the record came from `own`, otherwise no contribution.
pub fn source_distance(own: DataSource, record: DataSource, weight: f64) -> Distance {
    let mut distance = Distance::new();
    if own == record {
        distance.add(SOURCE_DISTANCE_KEY, weight);
    }
    distance
}

pub(crate) fn strip_excluded_track(track: &mut TrackInfo, excluded: &[String]) {
    track.fields.retain(|name, _| !excluded.contains(name));
}

pub(crate) fn strip_excluded_album(album: &mut AlbumInfo, excluded: &[String]) {
    album.fields.retain(|name, _| !excluded.contains(name));
    if excluded.iter().any(|name| name == COVER_ART_FIELD) {
        album.cover_art_url = None;
    }
    for track in &mut album.tracks {
        strip_excluded_track(track, excluded);
    }
}

pub(crate) fn is_excluded(excluded: &[String], field: &str) -> bool {
    excluded.iter().any(|name| name == field)
}
