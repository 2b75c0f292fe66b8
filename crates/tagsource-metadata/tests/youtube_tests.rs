use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tagsource_domain::{DataSource, FieldValue, LibraryItem};
use tagsource_metadata::youtube::mapping::{ALBUM_ID_FIELD, ARTIST_ID_FIELD, TRACK_ID_FIELD, VIEWS_FIELD};
use tagsource_metadata::{
    CoverArtValidator, MetadataSource, YouTubeError, YouTubeSettings, YouTubeSource, YtMusicApi,
    YtMusicClient,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct RejectAll;

#[async_trait]
impl CoverArtValidator for RejectAll {
    async fn is_valid_image(&self, _url: &str) -> bool {
        false
    }
}

struct AcceptAll;

#[async_trait]
impl CoverArtValidator for AcceptAll {
    async fn is_valid_image(&self, _url: &str) -> bool {
        true
    }
}

fn client(server: &MockServer) -> YtMusicClient {
    YtMusicClient::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client")
}

fn source(server: &MockServer, cover_art: Arc<dyn CoverArtValidator>, settings: YouTubeSettings) -> YouTubeSource {
    YouTubeSource::new(Arc::new(client(server)), cover_art, settings)
}

fn song_body(video_id: &str, views: &str) -> serde_json::Value {
    json!({
        "videoDetails": {
            "videoId": video_id,
            "title": "Tum Hi Ho",
            "author": "Arijit Singh",
            "channelId": "UC0RhatS1pyxInC00YKjjBqQ",
            "lengthSeconds": "262",
            "viewCount": views
        }
    })
}

async fn mount_album(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/album/MPREb_4pL8gzRtw1p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Aashiqui 2",
            "type": "Album",
            "year": "2013",
            "artists": [{ "name": "Mithoon", "id": "UCmithoon" }],
            "thumbnails": [
                { "url": "https://lh3.googleusercontent.com/small" },
                { "url": "https://lh3.googleusercontent.com/large" }
            ],
            "tracks": [
                {
                    "videoId": "Umqb9KENgmk",
                    "title": "Tum Hi Ho",
                    "artists": [{ "name": "Arijit Singh", "id": "UC0RhatS1pyxInC00YKjjBqQ" }],
                    "album": "Aashiqui 2",
                    "duration_seconds": 262
                },
                {
                    "videoId": "AbCdEfGhIjK",
                    "title": "Sunn Raha Hai",
                    "artists": [{ "name": "Ankit Tiwari", "id": null }],
                    "album": "Aashiqui 2",
                    "duration_seconds": 390
                }
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_albums_enriches_views_and_cover() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("filter", "albums"))
        .and(query_param("query", "Aashiqui 2 Mithoon"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Aashiqui 2", "browseId": "MPREb_4pL8gzRtw1p", "type": "Album" },
            { "title": "Playlist without id", "browseId": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_album(&server).await;
    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "1,204,331")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song/AbCdEfGhIjK"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = source(&server, Arc::new(AcceptAll), YouTubeSettings::default());
    let albums = source.search_albums("Aashiqui 2 - Mithoon").await;

    assert_eq!(albums.len(), 1);
    let album = &albums[0];
    assert_eq!(album.album_id, "MPREb_4pL8gzRtw1p");
    assert_eq!(album.artist, "Mithoon");
    assert_eq!(album.data_source, DataSource::YouTube);
    assert_eq!(album.year, Some(2013));
    assert_eq!(
        album.cover_art_url.as_deref(),
        Some("https://lh3.googleusercontent.com/large")
    );
    assert_eq!(
        album.fields.get(ALBUM_ID_FIELD).and_then(FieldValue::as_text),
        Some("MPREb_4pL8gzRtw1p")
    );

    assert_eq!(
        album.tracks[0].fields.get(VIEWS_FIELD).and_then(FieldValue::as_integer),
        Some(1_204_331)
    );
    // View lookup failed: the track is kept without a view count.
    assert!(!album.tracks[1].fields.contains_key(VIEWS_FIELD));
    assert_eq!(album.tracks[1].index, Some(2));
}

#[tokio::test]
async fn test_invalid_cover_is_not_set() {
    let server = MockServer::start().await;
    mount_album(&server).await;

    let settings = YouTubeSettings {
        exclude_fields: vec![VIEWS_FIELD.to_string()],
        ..YouTubeSettings::default()
    };
    let source = source(&server, Arc::new(RejectAll), settings);
    let album = source
        .album_by_id("https://music.youtube.com/browse/MPREb_4pL8gzRtw1p")
        .await
        .expect("album");

    assert!(album.cover_art_url.is_none());
    assert!(album.tracks.iter().all(|track| !track.fields.contains_key(VIEWS_FIELD)));
}

#[tokio::test]
async fn test_search_tracks_soft_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let source = source(&server, Arc::new(RejectAll), YouTubeSettings::default());
    assert!(source.search_tracks("Tum Hi Ho Arijit Singh").await.is_empty());
    assert!(source
        .candidates(&[], "Arijit Singh", "Aashiqui 2", true)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_track_by_id_reads_song_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "42")))
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, Arc::new(RejectAll), YouTubeSettings::default());

    assert!(source
        .track_by_id("https://www.jiosaavn.com/song/tum-hi-ho/EToxUyFpcwQ")
        .await
        .is_none());

    let track = source
        .track_by_id("https://youtu.be/Umqb9KENgmk")
        .await
        .expect("track");
    assert_eq!(track.title, "Tum Hi Ho");
    assert_eq!(track.artist, "Arijit Singh");
    assert_eq!(track.length, Some(262));
    assert_eq!(
        track.fields.get(TRACK_ID_FIELD).and_then(FieldValue::as_text),
        Some("Umqb9KENgmk")
    );
    assert_eq!(
        track.fields.get(VIEWS_FIELD).and_then(FieldValue::as_integer),
        Some(42)
    );
}

#[tokio::test]
async fn test_view_count_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "987654")))
        .mount(&server)
        .await;

    let source = source(&server, Arc::new(RejectAll), YouTubeSettings::default());
    assert_eq!(source.view_count("Umqb9KENgmk").await, Some(987_654));
    assert_eq!(source.view_count("zzzzzzzzzzz").await, None);
    assert_eq!(source.view_count("").await, None);
}

#[tokio::test]
async fn test_client_sends_basic_auth_when_configured() {
    let server = MockServer::start().await;

    // base64("id:secret")
    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .and(header("authorization", "Basic aWQ6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = YtMusicClient::builder()
        .base_url(server.uri())
        .client_id(Some("id".to_string()))
        .client_secret(Some("secret".to_string()))
        .build()
        .expect("client");

    let song = client.song("Umqb9KENgmk").await.expect("song");
    assert_eq!(song.video_details.view_count, Some(1));
}

#[tokio::test]
async fn test_client_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/album/MPREb_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let result = client(&server).album("MPREb_missing").await;
    assert!(matches!(
        result,
        Err(YouTubeError::HttpStatus { status, .. }) if status.as_u16() == 404
    ));
}

#[tokio::test]
async fn test_item_candidates_enrich_search_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("filter", "songs"))
        .and(query_param("query", "Tum Hi Ho Arijit Singh"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "videoId": "Umqb9KENgmk",
                "title": "Tum Hi Ho",
                "artists": [{ "name": "Arijit Singh", "id": "UC0RhatS1pyxInC00YKjjBqQ" }],
                "album": { "name": "Aashiqui 2", "id": "MPREb_4pL8gzRtw1p" },
                "duration_seconds": 262
            },
            {
                "videoId": null,
                "title": "Tum Hi Ho (Episode)",
                "artists": [{ "name": "Podcast", "id": null }]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "1,204,331")))
        .expect(1)
        .mount(&server)
        .await;

    let settings = YouTubeSettings {
        exclude_fields: vec![ARTIST_ID_FIELD.to_string()],
        ..YouTubeSettings::default()
    };
    let source = source(&server, Arc::new(RejectAll), settings);
    let item = LibraryItem::new("/music/a.mp3", "Tum Hi Ho", "Arijit Singh", "Aashiqui 2");

    let tracks = source.item_candidates(&item, "Arijit Singh", "Tum Hi Ho (CD1)").await;

    assert_eq!(tracks.len(), 1);
    let track = &tracks[0];
    assert_eq!(track.track_id, "Umqb9KENgmk");
    assert_eq!(track.title, "Tum Hi Ho");
    assert_eq!(track.artist, "Arijit Singh");
    assert_eq!(track.album.as_deref(), Some("Aashiqui 2"));
    assert_eq!(track.length, Some(262));
    assert_eq!(
        track.data_url.as_deref(),
        Some("https://music.youtube.com/watch?v=Umqb9KENgmk")
    );
    assert_eq!(
        track.fields.get(VIEWS_FIELD).and_then(FieldValue::as_integer),
        Some(1_204_331)
    );
    assert!(!track.fields.contains_key(ARTIST_ID_FIELD));
}

#[tokio::test]
async fn test_search_tracks_skips_view_lookup_when_excluded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("filter", "songs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "videoId": "Umqb9KENgmk", "title": "Tum Hi Ho", "artists": [{ "name": "Arijit Singh" }] }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song/Umqb9KENgmk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(song_body("Umqb9KENgmk", "5")))
        .expect(0)
        .mount(&server)
        .await;

    let settings = YouTubeSettings {
        exclude_fields: vec![VIEWS_FIELD.to_string()],
        ..YouTubeSettings::default()
    };
    let tracks = source(&server, Arc::new(RejectAll), settings)
        .search_tracks("Tum Hi Ho Arijit Singh")
        .await;

    assert_eq!(tracks.len(), 1);
    assert!(!tracks[0].fields.contains_key(VIEWS_FIELD));
    assert_eq!(
        tracks[0].fields.get(TRACK_ID_FIELD).and_then(FieldValue::as_text),
        Some("Umqb9KENgmk")
    );
}
