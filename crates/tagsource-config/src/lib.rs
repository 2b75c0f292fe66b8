// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tagsource.db".to_string(),
            pool_max_size: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Rewrite file tags after a library item changes.
    pub write: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self { write: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JioSaavnConfig {
    /// Distance contribution added to candidates that came from JioSaavn.
    pub source_weight: f64,
    pub base_url: Option<String>,
    pub search_limit: usize,
    pub timeout_secs: u64,
    /// Auxiliary fields dropped from mapped albums and tracks.
    pub exclude_fields: Vec<String>,
}

impl Default for JioSaavnConfig {
    fn default() -> Self {
        Self {
            source_weight: 0.5,
            base_url: None,
            search_limit: 5,
            timeout_secs: 30,
            exclude_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Distance contribution added to candidates that came from YouTube.
    pub source_weight: f64,
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub search_limit: usize,
    pub timeout_secs: u64,
    /// Auxiliary fields dropped from mapped albums and tracks.
    pub exclude_fields: Vec<String>,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            source_weight: 0.5,
            base_url: None,
            client_id: None,
            client_secret: None,
            search_limit: 5,
            timeout_secs: 30,
            exclude_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub library: LibraryConfig,
    pub jiosaavn: JioSaavnConfig,
    pub youtube: YouTubeConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: TAGSOURCE_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("TAGSOURCE_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}
