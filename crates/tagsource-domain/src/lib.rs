// SPDX-License-Identifier: GPL-3.0-or-later
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

// ============================================================================
// Enums & Value Objects
// ============================================================================

/// Remote catalog a record was mapped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    JioSaavn,
    YouTube,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JioSaavn => write!(f, "JioSaavn"),
            Self::YouTube => write!(f, "YouTube"),
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jiosaavn" | "saavn" => Ok(Self::JioSaavn),
            "youtube" | "yt" | "ytmusic" => Ok(Self::YouTube),
            other => Err(format!("unknown data source: {other}")),
        }
    }
}

/// Value of a flexible (non-core) attribute on a record or library item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

// ============================================================================
// Candidate records
// ============================================================================

/// A track candidate produced by a metadata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub title: String,
    pub track_id: String,
    pub artist: String,
    pub artist_id: Option<String>,
    pub album: Option<String>,
    /// Duration in seconds.
    pub length: Option<u32>,
    /// 1-based position within the album ordering.
    pub index: Option<u32>,
    /// Disc number; sources without disc data report everything on disc 1.
    pub medium: u32,
    pub medium_total: Option<u32>,
    pub data_source: DataSource,
    pub data_url: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

impl TrackInfo {
    pub fn new(
        title: impl Into<String>,
        track_id: impl Into<String>,
        artist: impl Into<String>,
        data_source: DataSource,
    ) -> Self {
        Self {
            title: title.into(),
            track_id: track_id.into(),
            artist: artist.into(),
            artist_id: None,
            album: None,
            length: None,
            index: None,
            medium: 1,
            medium_total: None,
            data_source,
            data_url: None,
            fields: Fields::new(),
        }
    }
}

/// An album candidate produced by a metadata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub album: String,
    pub album_id: String,
    pub artist: String,
    pub artist_id: Option<String>,
    pub tracks: Vec<TrackInfo>,
    pub album_type: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub label: Option<String>,
    pub cover_art_url: Option<String>,
    pub data_source: DataSource,
    pub data_url: Option<String>,
    /// Highest disc number among the tracks.
    pub mediums: Option<u32>,
    #[serde(default)]
    pub fields: Fields,
}

impl AlbumInfo {
    /// Builds an album from already-mapped tracks, numbering them in order.
    pub fn new(
        album: impl Into<String>,
        album_id: impl Into<String>,
        artist: impl Into<String>,
        mut tracks: Vec<TrackInfo>,
        data_source: DataSource,
    ) -> Self {
        let mediums = number_tracks(&mut tracks);
        Self {
            album: album.into(),
            album_id: album_id.into(),
            artist: artist.into(),
            artist_id: None,
            tracks,
            album_type: None,
            year: None,
            month: None,
            day: None,
            label: None,
            cover_art_url: None,
            data_source,
            data_url: None,
            mediums,
            fields: Fields::new(),
        }
    }
}

/// Assigns 1-based indexes and per-disc totals to a fully mapped track list.
///
/// Totals are counted over the whole list before any track is updated, so the
/// result never depends on the order discs appear in. Returns the highest disc
/// number, or `None` for an empty list.
pub fn number_tracks(tracks: &mut [TrackInfo]) -> Option<u32> {
    let mut medium_totals: HashMap<u32, u32> = HashMap::new();
    for (position, track) in tracks.iter_mut().enumerate() {
        track.index = Some(position as u32 + 1);
        *medium_totals.entry(track.medium).or_default() += 1;
    }

    for track in tracks.iter_mut() {
        track.medium_total = medium_totals.get(&track.medium).copied();
    }

    medium_totals.keys().max().copied()
}

// ============================================================================
// Distance
// ============================================================================

/// Weighted penalties contributed to the candidate ranking; lower is better.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    penalties: BTreeMap<String, f64>,
}

impl Distance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, weight: f64) {
        *self.penalties.entry(key.into()).or_default() += weight;
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.penalties.get(key).copied()
    }

    pub fn total(&self) -> f64 {
        self.penalties.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }
}

// ============================================================================
// Library items
// ============================================================================

/// A file registered in the local library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: i64,
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub fields: Fields,
}

impl LibraryItem {
    pub fn new(
        path: impl AsRef<Path>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            path: path.as_ref().to_path_buf(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            fields: Fields::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Text view of a core or flexible field, used by [`ItemQuery`].
    fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "artist" => Some(self.artist.clone()),
            "album" => Some(self.album.clone()),
            "path" => Some(self.path.display().to_string()),
            other => self.fields.get(other).map(ToString::to_string),
        }
    }
}

/// Item selection in the `term field:value` style.
///
/// Bare terms match title, artist or album; `field:value` terms match the named
/// core or flexible field. Matching is a case-insensitive substring test and
/// every term must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    terms: Vec<QueryTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryTerm {
    Any(String),
    Field { name: String, value: String },
}

impl ItemQuery {
    pub fn parse<S: AsRef<str>>(parts: &[S]) -> Self {
        let terms = parts
            .iter()
            .flat_map(|part| part.as_ref().split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .map(|term| match term.split_once(':') {
                Some((name, value)) if !name.is_empty() => QueryTerm::Field {
                    name: name.to_lowercase(),
                    value: value.to_lowercase(),
                },
                _ => QueryTerm::Any(term.to_lowercase()),
            })
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, item: &LibraryItem) -> bool {
        self.terms.iter().all(|term| match term {
            QueryTerm::Any(value) => [&item.title, &item.artist, &item.album]
                .iter()
                .any(|field| field.to_lowercase().contains(value.as_str())),
            QueryTerm::Field { name, value } => item
                .field_text(name)
                .map(|text| text.to_lowercase().contains(value.as_str()))
                .unwrap_or(false),
        })
    }
}
