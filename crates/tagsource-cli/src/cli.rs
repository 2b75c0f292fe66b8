// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tagsource_application::{Sources, ViewRefreshService};
use tagsource_config::AppConfig;
use tagsource_domain::{AlbumInfo, DataSource, ItemQuery, LibraryItem, TrackInfo};
use tagsource_infrastructure::{init_database, LibraryRepository, LoftyTagWriter, SqliteLibraryRepository};
use tagsource_metadata::youtube::mapping::TRACK_ID_FIELD;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "tagsource")]
#[command(version)]
#[command(about = "JioSaavn and YouTube Music metadata for your music library")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search albums
    AlbumSearch {
        #[arg(required = true)]
        query: Vec<String>,
        /// Only ask one source (`jiosaavn` or `youtube`)
        #[arg(short, long)]
        source: Option<DataSource>,
    },
    /// Search tracks
    TrackSearch {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short, long)]
        source: Option<DataSource>,
    },
    /// Look up an album by URL or id
    Album { reference: String },
    /// Look up a track by URL or id
    Track { reference: String },
    /// List the tracks of a YouTube Music playlist
    ImportPlaylist { url: String },
    /// Rank YouTube Music songs against a "title - artist" query
    ImportSearch {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Refresh YouTube view counts of library items
    #[command(name = "ytupdate")]
    YtUpdate {
        /// Item query, e.g. `artist:arijit`
        query: Vec<String>,
        /// Do not write tags to the files
        #[arg(long)]
        no_write: bool,
    },
    /// Register a file in the library
    Add {
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: String,
        #[arg(long)]
        yt_track_id: Option<String>,
    },
}

/// Entrypoint for CLI commands
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let out = Output { json: cli.json };

    match cli.command {
        Commands::AlbumSearch { query, source } => {
            let query = query.join(" ");
            let sources = Sources::from_config(&config)?;
            let mut albums = Vec::new();
            for source in sources.select(source) {
                albums.extend(source.search_albums(&query).await);
            }
            out.albums(&albums)
        }

        Commands::TrackSearch { query, source } => {
            let query = query.join(" ");
            let sources = Sources::from_config(&config)?;
            let mut tracks = Vec::new();
            for source in sources.select(source) {
                tracks.extend(source.search_tracks(&query).await);
            }
            out.tracks(&tracks)
        }

        Commands::Album { reference } => {
            let sources = Sources::from_config(&config)?;
            match sources.album_by_reference(&reference).await {
                Some(album) => out.albums(&[album]),
                None => bail!("no album found for {reference}"),
            }
        }

        Commands::Track { reference } => {
            let sources = Sources::from_config(&config)?;
            match sources.track_by_reference(&reference).await {
                Some(track) => out.tracks(&[track]),
                None => bail!("no track found for {reference}"),
            }
        }

        Commands::ImportPlaylist { url } => {
            let sources = Sources::from_config(&config)?;
            let entries = sources.youtube.import_playlist(&url).await;
            if out.json {
                return out.print_json(&entries);
            }
            println!("{} tracks", entries.len());
            for entry in &entries {
                println!(
                    "  {} - {}{}",
                    entry.artist,
                    entry.title,
                    entry.album.as_deref().map(|a| format!(" [{a}]")).unwrap_or_default()
                );
            }
            Ok(())
        }

        Commands::ImportSearch { query, limit } => {
            let query = query.join(" ");
            let sources = Sources::from_config(&config)?;
            let results = sources.youtube.import_search(&query, limit).await;
            if out.json {
                return out.print_json(&results);
            }
            for result in &results {
                println!(
                    "  {:.3}  {} - {}  ({} views)",
                    result.match_score,
                    result.artist,
                    result.title,
                    result.views.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
                );
            }
            Ok(())
        }

        Commands::YtUpdate { query, no_write } => {
            let write = config.library.write && !no_write;
            let sources = Sources::from_config(&config)?;
            let pool = init_database(&config).await?;
            let service = ViewRefreshService::new(
                sources.youtube.clone(),
                Arc::new(SqliteLibraryRepository::new(pool)),
                Arc::new(LoftyTagWriter::new()),
            );

            let summary = service.refresh(&ItemQuery::parse(&query), write).await?;
            println!(
                "updated {}, skipped {}, without yt_track_id {}",
                summary.updated, summary.skipped, summary.missing_id
            );
            Ok(())
        }

        Commands::Add {
            path,
            title,
            artist,
            album,
            yt_track_id,
        } => {
            let pool = init_database(&config).await?;
            let repo = SqliteLibraryRepository::new(pool);

            let mut item = LibraryItem::new(&path, title, artist, album);
            if let Some(id) = yt_track_id {
                item.set(TRACK_ID_FIELD, id);
            }
            let item = repo.add(item).await?;
            info!(target: "cli", item_id = item.id, path = %item.path.display(), "added library item");
            println!("added item {} ({})", item.id, item.path.display());
            Ok(())
        }
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn albums(&self, albums: &[AlbumInfo]) -> Result<()> {
        if self.json {
            return self.print_json(albums);
        }
        if albums.is_empty() {
            println!("no albums found");
        }
        for album in albums {
            println!(
                "[{}] {} - {} ({}) {}",
                album.data_source,
                album.artist,
                album.album,
                album.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
                album.data_url.as_deref().unwrap_or_default()
            );
            for track in &album.tracks {
                println!(
                    "    {:>2}. {} - {}",
                    track.index.unwrap_or_default(),
                    track.artist,
                    track.title
                );
            }
        }
        Ok(())
    }

    fn tracks(&self, tracks: &[TrackInfo]) -> Result<()> {
        if self.json {
            return self.print_json(tracks);
        }
        if tracks.is_empty() {
            println!("no tracks found");
        }
        for track in tracks {
            println!(
                "[{}] {} - {} {}",
                track.data_source,
                track.artist,
                track.title,
                track.data_url.as_deref().unwrap_or_default()
            );
        }
        Ok(())
    }
}
