//! tunesync - copy albums from a local music library onto a removable drive
//!
//! Usage:
//!   tunesync scan [--sort <key>] [--json]     List albums in the library
//!   tunesync volumes [--json]                 List mounted removable volumes
//!   tunesync set-library <path>               Configure the library root
//!   tunesync transfer [ALBUM ...] [options]   Copy albums to a drive

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tunesync", version, about = "Transfer albums from your music library to a removable drive")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the configured library and list albums
    Scan {
        /// Sort order: modified, artist, or album
        #[arg(long, default_value = "modified")]
        sort: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List mounted removable volumes
    Volumes {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Set the music library root folder
    SetLibrary {
        /// Library root containing Artist/Album/*.mp3
        path: PathBuf,
    },
    /// Copy albums to a removable drive
    Transfer {
        /// Albums to transfer, as "Album" or "Artist/Album"; all albums when omitted
        albums: Vec<String>,
        /// Destination drive mount path (defaults to the only mounted volume)
        #[arg(long)]
        drive: Option<PathBuf>,
        /// Erase the drive before copying
        #[arg(long)]
        erase: bool,
        /// Relabel the drive after erasing
        #[arg(long, requires = "erase")]
        label: Option<String>,
        /// Skip the erase confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan { sort, json } => commands::scan(&sort, json),
        Command::Volumes { json } => commands::volumes(json),
        Command::SetLibrary { path } => commands::set_library(path),
        Command::Transfer {
            albums,
            drive,
            erase,
            label,
            yes,
        } => commands::transfer(&albums, drive, erase, label, yes),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
