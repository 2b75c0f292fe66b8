// SPDX-License-Identifier: GPL-3.0-or-later
mod cli;

use anyhow::Result;
use clap::Parser;
use tagsource_config::load as load_config;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.telemetry.log_level);
    debug!(target: "cli", command = ?cli.command, "starting");

    cli::run(cli, config).await
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
        .init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configured_level_falls_back() {
        // Only meaningful when RUST_LOG is unset; either way a filter is built.
        let filter = env_filter("not a [valid filter");
        assert!(!filter.to_string().is_empty());
    }
}
