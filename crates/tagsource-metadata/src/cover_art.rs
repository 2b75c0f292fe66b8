// SPDX-License-Identifier: GPL-3.0-or-later

//! Cover-art URL validation used as an optional enrichment step.

use async_trait::async_trait;
use moka::sync::Cache;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Decides whether a cover-art URL points at a usable image.
#[async_trait]
pub trait CoverArtValidator: Send + Sync {
    /// Any failure counts as "no valid cover"; this never errors.
    async fn is_valid_image(&self, url: &str) -> bool;
}

#[derive(Debug, Error)]
pub enum CoverArtError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status}")]
    HttpStatus { status: StatusCode },
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl CoverArtError {
    /// Whether retrying the same URL later could change the outcome.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::HttpStatus { status } => !status.is_client_error(),
            Self::Decode(_) => false,
        }
    }
}

/// Downloads the image and accepts it only if the bytes decode.
pub struct HttpCoverArtValidator {
    client: Client,
    verdicts: Cache<String, bool>,
}

impl HttpCoverArtValidator {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|error| {
                debug!(
                    target: "cover-art",
                    ?error,
                    "Failed to build cover-art HTTP client with timeout, falling back to default client"
                );
                Client::new()
            });

        Self {
            client,
            verdicts: Cache::new(1_000),
        }
    }

    async fn fetch_and_decode(&self, url: &str) -> Result<(), CoverArtError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoverArtError::HttpStatus { status });
        }
        let bytes = response.bytes().await?;
        image::load_from_memory(&bytes)?;
        Ok(())
    }
}

impl Default for HttpCoverArtValidator {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl CoverArtValidator for HttpCoverArtValidator {
    #[instrument(skip(self))]
    async fn is_valid_image(&self, url: &str) -> bool {
        if let Some(verdict) = self.verdicts.get(url) {
            return verdict;
        }

        match self.fetch_and_decode(url).await {
            Ok(()) => {
                self.verdicts.insert(url.to_string(), true);
                true
            }
            Err(error) if error.is_transient() => {
                debug!(target: "cover-art", url, %error, "cover art unavailable, not caching");
                false
            }
            Err(error) => {
                debug!(target: "cover-art", url, %error, "cover art rejected");
                self.verdicts.insert(url.to_string(), false);
                false
            }
        }
    }
}
