// ABOUTME: Foodgram HTTP server binary
// ABOUTME: Loads configuration, migrates the database and serves the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Foodgram Server Binary
//!
//! Starts the recipe-sharing REST API. Configuration comes from the
//! environment (a local `.env` file is honored); a few flags override it.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::ServerConfig,
    database::Database,
    logging,
    resources::ServerResources,
    routes,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing REST API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;
    info!("Starting Foodgram server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized and migrated");

    let jwt_secret = config
        .jwt_secret
        .clone()
        .map_or_else(|| generate_jwt_secret().to_vec(), String::into_bytes);
    let auth_manager = AuthManager::new(jwt_secret, config.jwt_expiry_hours);

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(database, auth_manager, config.clone()));

    let app = routes::router(resources);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
