// ABOUTME: Main library entry point for the Foodgram recipe-sharing backend
// ABOUTME: REST API for recipes, favorites, subscriptions and shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Foodgram Server
//!
//! A recipe-sharing web backend: users publish recipes composed of catalog
//! ingredients, favorite and subscribe to other users, and download an
//! aggregated shopping list for everything in their cart.
//!
//! ## Architecture
//!
//! - **Models**: domain types and write-payload validation
//! - **Database**: SQLite storage with per-domain manager structs
//! - **Routes**: axum routers per domain with thin handlers
//! - **Shopping list**: pure rendering of the aggregated cart report
//! - **Auth**: bearer JWT identifying the current user; account lifecycle
//!   lives in an external auth subsystem
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use foodgram_server::config::ServerConfig;
//! use foodgram_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication and request identity extraction
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Database management and per-domain operation managers
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Logging configuration
pub mod logging;

/// Core domain models
pub mod models;

/// Shared resource container for dependency injection
pub mod resources;

/// HTTP routes organized by domain
pub mod routes;

/// Shopping list aggregation report rendering
pub mod shopping_list;
