// ABOUTME: Ingredient catalog loader binary
// ABOUTME: Ingests a name,measurement_unit CSV file with get-or-create semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Catalog Loader
//!
//! Seeds the ingredient catalog from a two-column CSV file
//! (`name,measurement_unit`, no header). Existing (name, unit) pairs are
//! skipped, so the loader is safe to re-run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use foodgram_server::{
    config::ServerConfig, database::ingredients::IngredientsManager, database::Database, logging,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "load-ingredients")]
#[command(about = "Load ingredients from a CSV file into the catalog")]
struct Args {
    /// Path to the CSV file
    #[arg(long, default_value = "data/ingredients.csv")]
    path: PathBuf,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);

    let database = Database::new(&database_url).await?;
    let manager = IngredientsManager::new(database.pool().clone());

    let contents = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    info!("Loading ingredients from {}", args.path.display());
    let mut added = 0u32;
    let mut skipped = 0u32;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Two columns; the unit never contains a comma, names may
        let Some((name, unit)) = line.rsplit_once(',') else {
            warn!("Skipping invalid row: {line}");
            skipped += 1;
            continue;
        };
        let (name, unit) = (name.trim(), unit.trim());
        if name.is_empty() || unit.is_empty() {
            warn!("Skipping row with empty values: {line}");
            skipped += 1;
            continue;
        }

        let (_, created) = manager.get_or_create(name, unit).await?;
        if created {
            added += 1;
        } else {
            skipped += 1;
        }
    }

    info!("Finished loading ingredients: added={added} skipped={skipped}");
    Ok(())
}
