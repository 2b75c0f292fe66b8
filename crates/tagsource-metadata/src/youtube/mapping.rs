// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversion of YouTube Music payloads into album and track records.

use chrono::{DateTime, Utc};
use tagsource_domain::{AlbumInfo, DataSource, FieldValue, TrackInfo};

use super::models::{SongDetails, YtAlbum, YtTrack};
use crate::util::{non_empty, unescape_html};

pub const TRACK_ID_FIELD: &str = "yt_track_id";
pub const ALBUM_ID_FIELD: &str = "yt_album_id";
pub const ARTIST_ID_FIELD: &str = "yt_artist_id";
pub const VIEWS_FIELD: &str = "yt_views";
pub const UPDATED_FIELD: &str = "yt_updated";

/// Maps a listed track; `album_title` fills in when the track carries no album.
pub fn track_to_info(track: &YtTrack, album_title: Option<&str>, fetched_at: DateTime<Utc>) -> TrackInfo {
    let video_id = track.video_id.clone().unwrap_or_default();
    let first_artist = track.artists.first();

    let mut info = TrackInfo::new(
        unescape_html(track.title.as_deref().unwrap_or_default()),
        video_id.clone(),
        first_artist
            .and_then(|artist| artist.name.clone())
            .unwrap_or_default(),
        DataSource::YouTube,
    );
    info.artist_id = first_artist.and_then(|artist| non_empty(artist.id.as_deref()));
    info.album = track
        .album
        .as_ref()
        .and_then(|album| album.name())
        .or(album_title)
        .map(unescape_html);
    info.length = track.duration_seconds;
    info.data_url = (!video_id.is_empty()).then(|| watch_url(&video_id));
    stamp_track(&mut info, video_id, fetched_at);
    info
}

/// Maps a song detail lookup; the view count is part of the payload here.
pub fn song_to_info(song: &SongDetails, fetched_at: DateTime<Utc>) -> TrackInfo {
    let details = &song.video_details;
    let video_id = details.video_id.clone().unwrap_or_default();

    let mut info = TrackInfo::new(
        unescape_html(details.title.as_deref().unwrap_or_default()),
        video_id.clone(),
        details.author.clone().unwrap_or_default(),
        DataSource::YouTube,
    );
    info.artist_id = non_empty(details.channel_id.as_deref());
    info.length = details.length_seconds.and_then(|seconds| u32::try_from(seconds).ok());
    info.data_url = (!video_id.is_empty()).then(|| watch_url(&video_id));
    stamp_track(&mut info, video_id, fetched_at);
    set_views(&mut info, details.view_count);
    info
}

/// Maps an album detail lookup. The cover art is left unset, see [`cover_art_candidate`].
pub fn album_to_info(album: &YtAlbum, browse_id: &str, fetched_at: DateTime<Utc>) -> AlbumInfo {
    let title = unescape_html(album.title.as_deref().unwrap_or_default());
    let tracks = album
        .tracks
        .iter()
        .map(|track| track_to_info(track, Some(title.as_str()), fetched_at))
        .collect();
    let first_artist = album.artists.first();

    let mut info = AlbumInfo::new(
        title.clone(),
        browse_id,
        first_artist
            .and_then(|artist| artist.name.clone())
            .unwrap_or_default(),
        tracks,
        DataSource::YouTube,
    );
    info.artist_id = first_artist.and_then(|artist| non_empty(artist.id.as_deref()));
    info.album_type = non_empty(album.album_type.as_deref());
    info.year = album.year.as_deref().and_then(|year| year.trim().parse().ok());
    info.data_url = Some(format!("https://music.youtube.com/browse/{browse_id}"));

    info.fields
        .insert(ALBUM_ID_FIELD.into(), FieldValue::from(browse_id));
    if let Some(artist_id) = &info.artist_id {
        info.fields
            .insert(ARTIST_ID_FIELD.into(), FieldValue::from(artist_id.as_str()));
    }
    info.fields
        .insert(UPDATED_FIELD.into(), FieldValue::Timestamp(fetched_at));
    info
}

/// Largest thumbnail, which ytmusicapi lists last.
pub fn cover_art_candidate(album: &YtAlbum) -> Option<String> {
    album
        .thumbnails
        .last()
        .and_then(|thumbnail| non_empty(Some(thumbnail.url.as_str())))
}

/// Records a view count on a track; `None` leaves the track untouched.
pub fn set_views(track: &mut TrackInfo, views: Option<u64>) {
    if let Some(views) = views.and_then(|views| i64::try_from(views).ok()) {
        track.fields.insert(VIEWS_FIELD.into(), FieldValue::Integer(views));
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://music.youtube.com/watch?v={video_id}")
}

fn stamp_track(info: &mut TrackInfo, video_id: String, fetched_at: DateTime<Utc>) {
    info.fields.insert(TRACK_ID_FIELD.into(), FieldValue::from(video_id));
    if let Some(artist_id) = &info.artist_id {
        info.fields
            .insert(ARTIST_ID_FIELD.into(), FieldValue::from(artist_id.as_str()));
    }
    info.fields
        .insert(UPDATED_FIELD.into(), FieldValue::Timestamp(fetched_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::models::{ArtistRef, Thumbnail, TrackAlbum, VideoDetails};

    fn artist(name: &str, id: &str) -> ArtistRef {
        ArtistRef {
            name: Some(name.to_string()),
            id: Some(id.to_string()),
        }
    }

    fn yt_track(video_id: &str, title: &str, album: Option<TrackAlbum>) -> YtTrack {
        YtTrack {
            video_id: Some(video_id.to_string()),
            title: Some(title.to_string()),
            artists: vec![artist("Arijit Singh", "UC0RhatS1pyxInC00YKjjBqQ")],
            album,
            duration_seconds: Some(262),
        }
    }

    #[test]
    fn track_uses_first_artist_and_album_reference() {
        let track = yt_track(
            "Umqb9KENgmk",
            "Tum Hi Ho",
            Some(TrackAlbum::Ref {
                name: Some("Aashiqui 2".to_string()),
                id: Some("MPREb_x".to_string()),
            }),
        );
        let info = track_to_info(&track, None, Utc::now());
        assert_eq!(info.title, "Tum Hi Ho");
        assert_eq!(info.track_id, "Umqb9KENgmk");
        assert_eq!(info.artist, "Arijit Singh");
        assert_eq!(info.artist_id.as_deref(), Some("UC0RhatS1pyxInC00YKjjBqQ"));
        assert_eq!(info.album.as_deref(), Some("Aashiqui 2"));
        assert_eq!(info.length, Some(262));
        assert_eq!(
            info.fields.get(TRACK_ID_FIELD).and_then(FieldValue::as_text),
            Some("Umqb9KENgmk")
        );
        assert!(!info.fields.contains_key(VIEWS_FIELD));
    }

    #[test]
    fn track_without_album_falls_back_to_listing_title() {
        let track = yt_track("Umqb9KENgmk", "Tum Hi Ho", None);
        let info = track_to_info(&track, Some("Aashiqui 2"), Utc::now());
        assert_eq!(info.album.as_deref(), Some("Aashiqui 2"));
    }

    #[test]
    fn album_maps_tracks_and_thumbnail() {
        let album = YtAlbum {
            title: Some("Aashiqui 2 &quot;OST&quot;".to_string()),
            album_type: Some("Album".to_string()),
            year: Some("2013".to_string()),
            artists: vec![artist("Mithoon", "UCmithoon")],
            thumbnails: vec![
                Thumbnail { url: "https://lh3.example/small".to_string() },
                Thumbnail { url: "https://lh3.example/large".to_string() },
            ],
            tracks: vec![
                yt_track("Umqb9KENgmk", "Tum Hi Ho", Some(TrackAlbum::Title("Aashiqui 2".to_string()))),
                yt_track("AbCdEfGhIjK", "Sunn Raha Hai", None),
            ],
        };

        let info = album_to_info(&album, "MPREb_abc", Utc::now());
        assert_eq!(info.album, "Aashiqui 2 \"OST\"");
        assert_eq!(info.album_id, "MPREb_abc");
        assert_eq!(info.artist, "Mithoon");
        assert_eq!(info.year, Some(2013));
        assert_eq!(info.mediums, Some(1));
        assert_eq!(info.tracks.len(), 2);
        assert_eq!(info.tracks[1].album.as_deref(), Some("Aashiqui 2 \"OST\""));
        assert_eq!(info.tracks[1].index, Some(2));
        assert_eq!(
            cover_art_candidate(&album).as_deref(),
            Some("https://lh3.example/large")
        );
    }

    #[test]
    fn song_details_carry_views() {
        let song = SongDetails {
            video_details: VideoDetails {
                video_id: Some("Umqb9KENgmk".to_string()),
                title: Some("Tum Hi Ho".to_string()),
                author: Some("Arijit Singh".to_string()),
                channel_id: Some("UC0RhatS1pyxInC00YKjjBqQ".to_string()),
                length_seconds: Some(262),
                view_count: Some(1_234_567),
            },
        };
        let info = song_to_info(&song, Utc::now());
        assert_eq!(info.artist, "Arijit Singh");
        assert_eq!(info.length, Some(262));
        assert_eq!(
            info.fields.get(VIEWS_FIELD).and_then(FieldValue::as_integer),
            Some(1_234_567)
        );
        assert_eq!(info.data_url.as_deref(), Some("https://music.youtube.com/watch?v=Umqb9KENgmk"));
    }
}
