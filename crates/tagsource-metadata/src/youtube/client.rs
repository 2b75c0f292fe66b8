// SPDX-License-Identifier: GPL-3.0-or-later

//! Client for a ytmusicapi-compatible YouTube Music JSON gateway.
//!
//! The gateway exposes `search`, `album`, `song` and `playlist` resources
//! returning the same shapes ytmusicapi produces. Requests are authenticated
//! with HTTP basic auth when OAuth client credentials are configured.

use async_trait::async_trait;
use moka::sync::Cache;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use super::models::{AlbumSearchHit, SongDetails, YtAlbum, YtPlaylist, YtTrack};

const YTMUSIC_GATEWAY_BASE: &str = "http://127.0.0.1:9863";
const USER_AGENT: &str = concat!("tagsource/", env!("CARGO_PKG_VERSION"));

/// Operations the YouTube source needs from the remote catalog.
#[async_trait]
pub trait YtMusicApi: Send + Sync {
    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumSearchHit>, YouTubeError>;

    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<YtTrack>, YouTubeError>;

    async fn album(&self, browse_id: &str) -> Result<YtAlbum, YouTubeError>;

    async fn song(&self, video_id: &str) -> Result<SongDetails, YouTubeError>;

    async fn playlist(&self, playlist_id: &str) -> Result<YtPlaylist, YouTubeError>;
}

/// Error type returned by the YouTube Music client.
#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("YouTube Music API error: {message}")]
    Api { message: String },
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("Missing expected field: {0}")]
    MissingField(&'static str),
    #[error("Invalid YouTube reference: {0}")]
    InvalidReference(String),
    /// Only one of the OAuth client id and secret was configured.
    #[error("OAuth client id and client secret must be configured together")]
    IncompleteCredentials,
}

#[derive(Debug, Clone)]
struct OAuthCredentials {
    client_id: String,
    client_secret: String,
}

/// HTTP client for the YouTube Music gateway.
pub struct YtMusicClient {
    client: Client,
    credentials: Option<OAuthCredentials>,
    cache_album: Cache<String, YtAlbum>,
    /// Base URL stored without a trailing slash.
    base_url: String,
}

impl std::fmt::Debug for YtMusicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YtMusicClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl YtMusicClient {
    /// Create a client builder for custom configuration.
    pub fn builder() -> YtMusicClientBuilder {
        YtMusicClientBuilder::default()
    }

    fn request(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            }
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, YouTubeError> {
        let url = format!("{}/{}", self.base_url, path);
        trace!(target: "youtube", %url, ?params, "GET");

        let response = self
            .request(self.client.get(&url))
            .query(params)
            .send()
            .await?;
        let status = response.status();
        debug!(target: "youtube", %status, "response status");
        let body = response.text().await?;
        let value = parse_gateway_body(status, &body)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl YtMusicApi for YtMusicClient {
    #[instrument(skip(self))]
    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumSearchHit>, YouTubeError> {
        let limit = limit.to_string();
        self.get(
            "search",
            &[("query", query), ("filter", "albums"), ("limit", limit.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<YtTrack>, YouTubeError> {
        let limit = limit.to_string();
        self.get(
            "search",
            &[("query", query), ("filter", "songs"), ("limit", limit.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn album(&self, browse_id: &str) -> Result<YtAlbum, YouTubeError> {
        require_id(browse_id)?;
        if let Some(cached) = self.cache_album.get(browse_id) {
            return Ok(cached);
        }
        let album: YtAlbum = self.get(&format!("album/{browse_id}"), &[]).await?;
        self.cache_album.insert(browse_id.to_string(), album.clone());
        Ok(album)
    }

    #[instrument(skip(self))]
    async fn song(&self, video_id: &str) -> Result<SongDetails, YouTubeError> {
        require_id(video_id)?;
        let song: SongDetails = self.get(&format!("song/{video_id}"), &[]).await?;
        if song.video_details.video_id.is_none() {
            return Err(YouTubeError::MissingField("videoDetails.videoId"));
        }
        Ok(song)
    }

    #[instrument(skip(self))]
    async fn playlist(&self, playlist_id: &str) -> Result<YtPlaylist, YouTubeError> {
        require_id(playlist_id)?;
        self.get(&format!("playlist/{playlist_id}"), &[]).await
    }
}

/// Builder for configuring a [`YtMusicClient`].
#[derive(Debug)]
pub struct YtMusicClientBuilder {
    base_url: String,
    timeout: Duration,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Default for YtMusicClientBuilder {
    fn default() -> Self {
        Self {
            base_url: YTMUSIC_GATEWAY_BASE.to_string(),
            timeout: Duration::from_secs(30),
            client_id: None,
            client_secret: None,
        }
    }
}

impl YtMusicClientBuilder {
    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn client_secret(mut self, client_secret: Option<String>) -> Self {
        self.client_secret = client_secret;
        self
    }

    /// Build the client; fails when credentials are half-configured.
    pub fn build(self) -> Result<YtMusicClient, YouTubeError> {
        let credentials = match (non_blank(self.client_id), non_blank(self.client_secret)) {
            (Some(client_id), Some(client_secret)) => Some(OAuthCredentials {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            _ => return Err(YouTubeError::IncompleteCredentials),
        };

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let client = YtMusicClient {
            client,
            credentials,
            cache_album: Cache::new(1_000),
            base_url: self.base_url.trim_end_matches('/').to_string(),
        };
        debug!(target: "youtube", ?client, "Initialized YouTube Music client");
        Ok(client)
    }
}

fn require_id(id: &str) -> Result<(), YouTubeError> {
    if id.trim().is_empty() || id.contains('/') {
        return Err(YouTubeError::InvalidReference(id.to_string()));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_gateway_body(status: StatusCode, response_body: &str) -> Result<Value, YouTubeError> {
    if !status.is_success() {
        return Err(YouTubeError::HttpStatus {
            status,
            body: response_body.to_string(),
        });
    }

    let value: Value = serde_json::from_str(response_body)?;
    if let Some(message) = value
        .get("error")
        .and_then(|error| error.as_str().or_else(|| error.get("message").and_then(Value::as_str)))
    {
        return Err(YouTubeError::Api {
            message: message.to_string(),
        });
    }

    Ok(value)
}
