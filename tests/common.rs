// ABOUTME: Shared test setup functions for integration tests
// ABOUTME: In-memory database, auth manager and user/catalog factories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared test utilities for `foodgram_server` integration tests.

use std::sync::Arc;

use anyhow::Result;
use foodgram_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::ServerConfig,
    database::ingredients::IngredientsManager,
    database::users::UsersManager,
    database::Database,
    models::{Ingredient, User},
    resources::ServerResources,
};
use uuid::Uuid;

/// Standard in-memory test database
pub async fn create_test_database() -> Result<Database> {
    Ok(Database::new("sqlite::memory:").await?)
}

/// Create a test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret().to_vec(), 24)
}

/// Assemble server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let auth_manager = create_test_auth_manager();
    let config = Arc::new(ServerConfig::default());
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        config,
    )))
}

/// Create a test user with the given email and username
pub async fn create_test_user_with_email(
    resources: &Arc<ServerResources>,
    email: &str,
    username: &str,
) -> Result<(Uuid, User)> {
    let user = User::new(email, username, "Test", "User")?;
    UsersManager::new(resources.database.pool().clone())
        .create_user(&user)
        .await?;
    Ok((user.id, user))
}

/// Create the default test user
pub async fn create_test_user(resources: &Arc<ServerResources>) -> Result<(Uuid, User)> {
    create_test_user_with_email(resources, "test@example.com", "test_user").await
}

/// Mint a bearer header value for a user
pub fn bearer_for(resources: &Arc<ServerResources>, user: &User) -> String {
    let token = resources
        .auth_manager
        .generate_token(user)
        .expect("Failed to generate JWT");
    format!("Bearer {token}")
}

/// Seed a few catalog ingredients and return them in insertion order
pub async fn seed_ingredients(resources: &Arc<ServerResources>) -> Result<Vec<Ingredient>> {
    let manager = IngredientsManager::new(resources.database.pool().clone());
    let mut out = Vec::new();
    for (name, unit) in [
        ("flour", "g"),
        ("milk", "ml"),
        ("egg", "pcs"),
        ("sugar", "g"),
    ] {
        let (ingredient, _) = manager.get_or_create(name, unit).await?;
        out.push(ingredient);
    }
    Ok(out)
}
