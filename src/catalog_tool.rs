//! `burnfolder add-track`: append a track to the catalog JSON that the pages
//! embed or fetch.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::models::{Catalog, Track};
use crate::error::CatalogError;

#[derive(Parser, Debug)]
#[command(name = "burnfolder", version, about)]
pub struct Cli {
    /// Diagnostics level (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Append a track to a page's group, creating the group when the page is new
    AddTrack {
        /// Catalog file; created when missing
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Page key, e.g. 11.28.25
        #[arg(long)]
        page: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        playback_id: String,
    },
}

/// Updated catalog text for `existing` (absent or blank means empty).
pub fn add_track(existing: Option<&str>, page: &str, track: Track) -> Result<String, CatalogError> {
    let mut catalog = match existing {
        Some(raw) if !raw.trim().is_empty() => Catalog::from_json(raw)?,
        _ => Catalog::default(),
    };
    catalog.push_track(page, track);
    let mut json = catalog.to_json()?;
    json.push('\n');
    Ok(json)
}

pub fn run(cli: Cli) -> Result<(), CatalogError> {
    match cli.command {
        Command::AddTrack {
            catalog,
            page,
            title,
            playback_id,
        } => {
            let existing = match std::fs::read_to_string(&catalog) {
                Ok(raw) => Some(raw),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => return Err(err.into()),
            };
            let json = add_track(existing.as_deref(), &page, Track::new(title, playback_id))?;
            std::fs::write(&catalog, json)?;
            tracing::info!(path = %catalog.display(), page = %page, "track added to catalog");
            Ok(())
        }
    }
}
