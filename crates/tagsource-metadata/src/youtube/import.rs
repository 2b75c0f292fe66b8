// SPDX-License-Identifier: GPL-3.0-or-later

//! Playlist and search import helpers built on the YouTube source.

use serde::Serialize;
use std::cmp::Ordering;
use tagsource_matching::match_score;
use tracing::{debug, error, info, warn};

use super::models::YtTrack;
use super::{refs, YouTubeSource};
use crate::util::unescape_html;

/// One playlist track, reduced to what is needed to match it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
}

/// A ranked song search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchImport {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub views: Option<u64>,
    pub match_score: f64,
}

impl YouTubeSource {
    /// Lists the tracks of a playlist URL. Invalid URLs and fetch failures are
    /// logged and give an empty list.
    pub async fn import_playlist(&self, url: &str) -> Vec<PlaylistEntry> {
        let Some(playlist_id) = refs::playlist_id(url) else {
            error!(target: "youtube", url, "not a YouTube playlist URL");
            return Vec::new();
        };

        let playlist = match self.api.playlist(&playlist_id).await {
            Ok(playlist) => playlist,
            Err(error) => {
                error!(target: "youtube", %playlist_id, %error, "playlist fetch failed");
                return Vec::new();
            }
        };

        if playlist.tracks.is_empty() {
            warn!(target: "youtube", %playlist_id, "playlist has no tracks");
            return Vec::new();
        }

        let entries: Vec<PlaylistEntry> = playlist.tracks.iter().map(playlist_entry).collect();
        info!(
            target: "youtube",
            %playlist_id,
            title = ?playlist.title,
            tracks = entries.len(),
            "imported playlist"
        );
        entries
    }

    /// Searches songs and ranks them by how well they match `query`, best
    /// first; equal scores prefer more views. At most `limit` results.
    pub async fn import_search(&self, query: &str, limit: usize) -> Vec<SearchImport> {
        let hits = match self.api.search_songs(query, limit).await {
            Ok(hits) => hits,
            Err(error) => {
                warn!(target: "youtube", query, %error, "song search failed");
                return Vec::new();
            }
        };

        let mut results = Vec::with_capacity(hits.len());
        for hit in &hits {
            let entry = playlist_entry(hit);
            let views = match hit.video_id.as_deref() {
                Some(video_id) => self.view_count(video_id).await,
                None => None,
            };
            let score = match_score(&entry.title, &entry.artist, query);
            debug!(target: "youtube", title = %entry.title, score, ?views, "scored search hit");
            results.push(SearchImport {
                title: entry.title,
                artist: entry.artist,
                album: entry.album,
                views,
                match_score: score,
            });
        }

        rank(&mut results);
        results.truncate(limit);
        results
    }
}

fn playlist_entry(track: &YtTrack) -> PlaylistEntry {
    PlaylistEntry {
        title: unescape_html(track.title.as_deref().unwrap_or_default()),
        artist: track
            .artists
            .first()
            .and_then(|artist| artist.name.clone())
            .unwrap_or_default(),
        album: track
            .album
            .as_ref()
            .and_then(|album| album.name())
            .map(unescape_html),
    }
}

/// Score descending, then views descending with unknown views last.
fn rank(results: &mut [SearchImport]) {
    results.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (a.views, b.views) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}
