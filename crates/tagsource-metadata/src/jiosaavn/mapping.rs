// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversion of JioSaavn payloads into album and track records.

use chrono::{DateTime, Utc};
use tagsource_domain::{AlbumInfo, DataSource, FieldValue, TrackInfo};

use super::models::{SaavnAlbum, SaavnSong};
use crate::util::{non_empty, unescape_html};

pub const TRACK_ID_FIELD: &str = "jiosaavn_track_id";
pub const ALBUM_ID_FIELD: &str = "jiosaavn_album_id";
pub const ARTIST_ID_FIELD: &str = "jiosaavn_artist_id";
pub const STARRING_FIELD: &str = "jiosaavn_starring";
pub const PERMA_URL_FIELD: &str = "jiosaavn_perma_url";
pub const UPDATED_FIELD: &str = "jiosaavn_updated";

/// Maps a JioSaavn song. Singers are preferred over the composer credit.
pub fn song_to_track(song: &SaavnSong, fetched_at: DateTime<Utc>) -> TrackInfo {
    let id = song.id.clone().unwrap_or_default();
    let artist = non_empty(song.singers.as_deref())
        .or_else(|| non_empty(song.music.as_deref()))
        .unwrap_or_default();

    let mut track = TrackInfo::new(
        unescape_html(song.song.as_deref().unwrap_or_default()),
        id.clone(),
        artist,
        DataSource::JioSaavn,
    );
    track.album = song.album.as_deref().map(unescape_html);
    track.artist_id = non_empty(song.music_id.as_deref());
    track.length = parse_duration(song.duration.as_deref()).or_else(|| {
        song.more_info
            .as_ref()
            .and_then(|info| parse_duration(info.duration.as_deref()))
    });
    track.data_url = non_empty(song.perma_url.as_deref());

    track.fields.insert(TRACK_ID_FIELD.into(), FieldValue::from(id));
    if let Some(artist_id) = &track.artist_id {
        track
            .fields
            .insert(ARTIST_ID_FIELD.into(), FieldValue::from(artist_id.as_str()));
    }
    if let Some(perma_url) = &track.data_url {
        track
            .fields
            .insert(PERMA_URL_FIELD.into(), FieldValue::from(perma_url.as_str()));
    }
    if let Some(starring) = non_empty(song.starring.as_deref()) {
        track.fields.insert(STARRING_FIELD.into(), FieldValue::from(starring));
    }
    track
        .fields
        .insert(UPDATED_FIELD.into(), FieldValue::Timestamp(fetched_at));
    track
}

/// Maps a JioSaavn album; `album_type` comes from the search hit when known.
///
/// The cover art is left unset, see [`cover_art_candidate`].
pub fn album_to_info(album: &SaavnAlbum, album_type: Option<&str>, fetched_at: DateTime<Utc>) -> AlbumInfo {
    let tracks = album
        .songs
        .iter()
        .map(|song| song_to_track(song, fetched_at))
        .collect();
    let album_id = album.albumid.clone().unwrap_or_default();

    let mut info = AlbumInfo::new(
        unescape_html(album.title.as_deref().unwrap_or_default()),
        album_id.clone(),
        unescape_html(album.primary_artists.as_deref().unwrap_or_default()),
        tracks,
        DataSource::JioSaavn,
    );
    info.artist_id = non_empty(album.primary_artists_id.as_deref());
    info.album_type = non_empty(album_type);
    info.year = album.year.as_deref().and_then(|year| year.trim().parse().ok());
    if let Some((year, month, day)) = album.release_date.as_deref().and_then(parse_release_date) {
        info.year = Some(year);
        info.month = Some(month);
        info.day = Some(day);
    }
    info.label = album
        .songs
        .first()
        .and_then(|song| non_empty(song.label.as_deref()));
    info.data_url = non_empty(album.perma_url.as_deref());

    info.fields.insert(ALBUM_ID_FIELD.into(), FieldValue::from(album_id));
    if let Some(artist_id) = &info.artist_id {
        info.fields
            .insert(ARTIST_ID_FIELD.into(), FieldValue::from(artist_id.as_str()));
    }
    if let Some(perma_url) = &info.data_url {
        info.fields
            .insert(PERMA_URL_FIELD.into(), FieldValue::from(perma_url.as_str()));
    }
    info.fields
        .insert(UPDATED_FIELD.into(), FieldValue::Timestamp(fetched_at));
    info
}

/// Full-size cover URL derived from the album thumbnail.
pub fn cover_art_candidate(album: &SaavnAlbum) -> Option<String> {
    non_empty(album.image.as_deref()).map(|url| url.replace("150x150", "500x500"))
}

fn parse_duration(value: Option<&str>) -> Option<u32> {
    value.and_then(|duration| duration.trim().parse().ok())
}

fn parse_release_date(value: &str) -> Option<(i32, u32, u32)> {
    let mut parts = value.trim().splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some((year, month, day))
}
