//! Command-line front end for the show directory.
//!
//! Each read command corresponds to one page of the directory and prints
//! the page's view model as pretty JSON. Write commands take entities as JSON
//! objects.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use show_directory_lib::clock::parse_instant;
use show_directory_lib::config::ConfigStore;
use show_directory_lib::models::{Artist, Venue};
use show_directory_lib::{Clock, DirectoryService, FixedClock, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "show-directory")]
#[command(about = "Browse venues, artists and shows")]
#[command(version)]
struct Args {
    /// SQLite database to read from (defaults to the configured path)
    #[arg(short, long, env = "SHOW_DIRECTORY_DATABASE")]
    database: Option<PathBuf>,

    /// Classify shows against this instant instead of now ("YYYY-MM-DD HH:MM:SS")
    #[arg(long)]
    at: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Venues grouped by city and state
    Areas,
    /// One venue with its past and upcoming shows
    Venue { id: i64 },
    /// One artist with its past and upcoming shows
    Artist { id: i64 },
    /// All artists
    Artists,
    /// All shows
    Shows,
    /// Venues whose name contains the term
    SearchVenues {
        #[arg(default_value = "")]
        term: String,
    },
    /// Artists whose name contains the term
    SearchArtists {
        #[arg(default_value = "")]
        term: String,
    },
    /// Insert sample venues, artists and shows into an empty database
    Seed,
    /// List a new venue from a JSON object
    AddVenue { json: String },
    /// Replace a venue's fields with a JSON object
    EditVenue { id: i64, json: String },
    /// Remove a venue together with all of its shows
    DeleteVenue { id: i64 },
    /// List a new artist from a JSON object
    AddArtist { json: String },
    /// Replace an artist's fields with a JSON object
    EditArtist { id: i64, json: String },
    /// Remove an artist together with all of its shows
    DeleteArtist { id: i64 },
    /// Book an artist at a venue
    AddShow {
        #[arg(long)]
        artist: i64,
        #[arg(long)]
        venue: i64,
        /// Start time ("YYYY-MM-DD HH:MM:SS")
        #[arg(long)]
        start: String,
    },
    /// Remember a database path in the config file
    SetDatabase { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_store = ConfigStore::load().context("failed to load configuration")?;
    let config = config_store.read();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Command::SetDatabase { path } = &args.command {
        let updated = config_store.update(|config| config.database_path = Some(path.clone()))?;
        info!("database path set to {}", updated.database_path().display());
        return Ok(());
    }

    let database = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path());
    debug!("using database {}", database.display());

    match args.at.as_deref() {
        Some(text) => {
            let instant =
                parse_instant(text).ok_or_else(|| anyhow!("unrecognised instant: {text}"))?;
            run(DirectoryService::with_clock(database, FixedClock(instant)), args.command).await
        }
        None => run(DirectoryService::with_clock(database, SystemClock), args.command).await,
    }
}

async fn run<C: Clock>(service: DirectoryService<C>, command: Command) -> Result<()> {
    match command {
        Command::Areas => print_json(&service.areas().await?),
        Command::Venue { id } => print_json(&service.venue(id).await?),
        Command::Artist { id } => print_json(&service.artist(id).await?),
        Command::Artists => print_json(&service.artists().await?),
        Command::Shows => print_json(&service.shows().await?),
        Command::SearchVenues { term } => print_json(&service.search_venues(&term).await?),
        Command::SearchArtists { term } => print_json(&service.search_artists(&term).await?),
        Command::Seed => {
            if service.seed().await? {
                info!("sample directory listed");
            } else {
                info!("database already has venues; nothing seeded");
            }
            Ok(())
        }
        Command::AddVenue { json } => {
            let venue: Venue = parse_json(&json)?;
            let id = service.create_venue(venue).await?;
            info!("venue {id} was successfully listed");
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::EditVenue { id, json } => {
            let mut venue: Venue = parse_json(&json)?;
            venue.id = id;
            service.update_venue(venue).await?;
            info!("venue {id} was successfully updated");
            print_json(&service.venue(id).await?)
        }
        Command::DeleteVenue { id } => {
            if service.delete_venue(id).await? {
                info!("venue {id} has been removed together with all of its shows");
                Ok(())
            } else {
                Err(anyhow!("venue {id} not found"))
            }
        }
        Command::AddArtist { json } => {
            let artist: Artist = parse_json(&json)?;
            let id = service.create_artist(artist).await?;
            info!("artist {id} was successfully listed");
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::EditArtist { id, json } => {
            let mut artist: Artist = parse_json(&json)?;
            artist.id = id;
            service.update_artist(artist).await?;
            info!("artist {id} was successfully updated");
            print_json(&service.artist(id).await?)
        }
        Command::DeleteArtist { id } => {
            if service.delete_artist(id).await? {
                info!("artist {id} has been removed together with all of its shows");
                Ok(())
            } else {
                Err(anyhow!("artist {id} not found"))
            }
        }
        Command::AddShow {
            artist,
            venue,
            start,
        } => {
            let start_time =
                parse_instant(&start).ok_or_else(|| anyhow!("unrecognised start time: {start}"))?;
            let id = service.create_show(artist, venue, start_time).await?;
            info!("show {id} was successfully listed");
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::SetDatabase { .. } => Ok(()),
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).context("invalid JSON input")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
