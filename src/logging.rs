// ABOUTME: Logging setup for the Foodgram server binaries and tests
// ABOUTME: Configures tracing subscriber output format and env-based filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! Structured logging configuration. Level filtering comes from `RUST_LOG`
//! (default `info`); `LOG_FORMAT` selects `pretty`, `compact` or `json`
//! output.

use std::env;

use tracing_subscriber::EnvFilter;

use crate::errors::{AppError, AppResult};

/// Initialize the global tracing subscriber from environment variables
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_from_env() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_owned());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.try_init(),
    };

    result.map_err(|e| AppError::config(format!("Failed to install tracing subscriber: {e}")))
}
