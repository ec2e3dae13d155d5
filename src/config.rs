// ABOUTME: Environment-driven server configuration with sensible defaults
// ABOUTME: Parses port, database URL and JWT settings from process env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! Server configuration, environment-variable driven. There is no config
//! file layer; deployments set env vars (a `.env` file is honored by the
//! binaries for local development).

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database URL when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:foodgram.db";

/// Default JWT lifetime in hours when `JWT_EXPIRY_HOURS` is unset
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Runtime configuration for the Foodgram server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
    /// JWT signing secret; generated at startup when unset
    pub jwt_secret: Option<String>,
    /// JWT token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            jwt_secret: None,
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `HTTP_PORT` or
    /// `JWT_EXPIRY_HOURS` is set but not parseable.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid HTTP_PORT {value:?}: {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let jwt_secret = env::var("JWT_SECRET").ok();

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(value) => value.parse::<i64>().map_err(|e| {
                AppError::config(format!("Invalid JWT_EXPIRY_HOURS {value:?}: {e}"))
            })?,
            Err(_) => DEFAULT_JWT_EXPIRY_HOURS,
        };

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            jwt_expiry_hours,
        })
    }

    /// One-line startup summary for the log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} jwt_expiry={}h jwt_secret={}",
            self.http_port,
            self.database_url,
            self.jwt_expiry_hours,
            if self.jwt_secret.is_some() {
                "from env"
            } else {
                "generated"
            }
        )
    }
}
