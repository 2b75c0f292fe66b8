// SPDX-License-Identifier: GPL-3.0-or-later

//! JioSaavn web API client.

use async_trait::async_trait;
use moka::sync::Cache;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use super::models::{SaavnAlbum, SaavnSong, SearchHit, SearchResponse, SongDetailsResponse};

const JIOSAAVN_API_BASE: &str = "https://www.jiosaavn.com";
const USER_AGENT: &str = concat!("tagsource/", env!("CARGO_PKG_VERSION"));

/// Kind of entity a JioSaavn detail token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaavnEntity {
    Album,
    Song,
}

impl SaavnEntity {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Song => "song",
        }
    }
}

/// Operations the JioSaavn source needs from the remote catalog.
#[async_trait]
pub trait SaavnApi: Send + Sync {
    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, JioSaavnError>;

    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, JioSaavnError>;

    /// Full album detail for a token taken from a `perma_url`.
    async fn album_details(&self, token: &str) -> Result<SaavnAlbum, JioSaavnError>;

    /// Full song detail for a token taken from a `perma_url`.
    async fn song_details(&self, token: &str) -> Result<SaavnSong, JioSaavnError>;
}

/// Error type returned by the JioSaavn client.
#[derive(Debug, Error)]
pub enum JioSaavnError {
    /// Network or protocol failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// JioSaavn responded with a non-success status code.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    /// JioSaavn returned an `error` object in an otherwise successful response.
    #[error("JioSaavn API error: {message}")]
    Api { message: String },
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
    /// A required field was absent; the string names it.
    #[error("Missing expected field: {0}")]
    MissingField(&'static str),
    /// The `perma_url` did not contain a usable token.
    #[error("Invalid JioSaavn reference: {0}")]
    InvalidReference(String),
}

/// HTTP client for the JioSaavn `api.php` endpoints.
pub struct JioSaavnClient {
    client: Client,
    cache_album: Cache<String, SaavnAlbum>,
    /// Base URL stored without a trailing slash.
    base_url: String,
}

impl JioSaavnClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|error| {
                debug!(
                    target: "jiosaavn",
                    ?error,
                    "Failed to build JioSaavn HTTP client with custom user agent, falling back to default client"
                );
                Client::new()
            });

        let client = Self {
            client,
            cache_album: Cache::new(1_000),
            base_url: base_url
                .unwrap_or_else(|| JIOSAAVN_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        };
        debug!(target: "jiosaavn", base_url = %client.base_url, "Initialized JioSaavn client");
        client
    }

    async fn search(&self, call: &str, query: &str, limit: usize) -> Result<Vec<SearchHit>, JioSaavnError> {
        let limit = limit.to_string();
        let value = self
            .call(&[
                ("__call", call),
                ("q", query),
                ("n", limit.as_str()),
                ("p", "1"),
            ])
            .await?;
        let response: SearchResponse = serde_json::from_value(value)?;
        Ok(response.results)
    }

    async fn details(&self, token: &str, entity: SaavnEntity) -> Result<Value, JioSaavnError> {
        if token.trim().is_empty() {
            return Err(JioSaavnError::InvalidReference(token.to_string()));
        }
        self.call(&[
            ("__call", "webapi.get"),
            ("token", token),
            ("type", entity.as_str()),
            ("includeMetaTags", "0"),
        ])
        .await
    }

    async fn call(&self, params: &[(&str, &str)]) -> Result<Value, JioSaavnError> {
        let url = format!("{}/api.php", self.base_url);
        trace!(target: "jiosaavn", %url, ?params, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("_format", "json"), ("_marker", "0"), ("ctx", "web6dot0")])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_saavn_body(status, &body)
    }
}

#[async_trait]
impl SaavnApi for JioSaavnClient {
    #[instrument(skip(self))]
    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, JioSaavnError> {
        self.search("search.getAlbumResults", query, limit).await
    }

    #[instrument(skip(self))]
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, JioSaavnError> {
        self.search("search.getResults", query, limit).await
    }

    #[instrument(skip(self))]
    async fn album_details(&self, token: &str) -> Result<SaavnAlbum, JioSaavnError> {
        if let Some(cached) = self.cache_album.get(token) {
            return Ok(cached);
        }

        let value = self.details(token, SaavnEntity::Album).await?;
        let album: SaavnAlbum = serde_json::from_value(value)?;
        self.cache_album.insert(token.to_string(), album.clone());
        Ok(album)
    }

    #[instrument(skip(self))]
    async fn song_details(&self, token: &str) -> Result<SaavnSong, JioSaavnError> {
        let value = self.details(token, SaavnEntity::Song).await?;
        let details: SongDetailsResponse = serde_json::from_value(value)?;
        details
            .songs
            .into_iter()
            .next()
            .ok_or(JioSaavnError::MissingField("songs[0]"))
    }
}

/// Extracts the detail token (last path segment) from a `perma_url`.
pub fn detail_token(perma_url: &str) -> Option<&str> {
    perma_url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
        .filter(|token| !token.is_empty() && !token.contains(':'))
}

fn parse_saavn_body(status: StatusCode, response_body: &str) -> Result<Value, JioSaavnError> {
    if !status.is_success() {
        return Err(JioSaavnError::HttpStatus {
            status,
            body: response_body.to_string(),
        });
    }

    let value: Value = serde_json::from_str(response_body)?;
    if let Some(error) = value.get("error") {
        let message = error
            .get("msg")
            .and_then(|msg| msg.as_str())
            .or_else(|| error.as_str())
            .unwrap_or("unknown error");
        return Err(JioSaavnError::Api {
            message: message.to_string(),
        });
    }

    Ok(value)
}
