// ABOUTME: Route module organization for the Foodgram HTTP API
// ABOUTME: Domain routers plus the assembled application router with shared layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! Route modules for the Foodgram server, organized by domain. Each module
//! owns its request/response types and thin handlers that delegate to the
//! database managers.

/// Health check route
pub mod health;
/// Ingredient catalog routes (read only)
pub mod ingredients;
/// Recipe CRUD, favorite/cart toggles and the shopping list download
pub mod recipes;
/// User profile, subscription toggle and subscriptions listing routes
pub mod users;

pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use users::UserRoutes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::resources::ServerResources;

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(IngredientRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
