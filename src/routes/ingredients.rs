// ABOUTME: Route handlers for the ingredient catalog REST API (read only)
// ABOUTME: Listing with name-prefix search and single-ingredient lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! Ingredient catalog routes
//!
//! The catalog is reference data: anyone may read it, nobody writes it
//! through the API (the loader binary ingests it).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::database::ingredients::IngredientsManager;
use crate::errors::AppError;
use crate::models::Ingredient;
use crate::resources::ServerResources;

/// Response for a catalog ingredient
#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientResponse {
    /// Catalog id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Query parameters for catalog listing
#[derive(Debug, Deserialize, Default)]
pub struct IngredientListQuery {
    /// Case-insensitive name prefix filter
    pub name: Option<String>,
}

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients", get(Self::handle_list))
            .route("/api/ingredients/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients - list the catalog
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientListQuery>,
    ) -> Result<Response, AppError> {
        let manager = IngredientsManager::new(resources.database.pool().clone());
        let ingredients = manager.list(query.name.as_deref()).await?;

        let response: Vec<IngredientResponse> =
            ingredients.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/ingredients/:id - fetch one catalog entry
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let manager = IngredientsManager::new(resources.database.pool().clone());
        let ingredient = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;

        let response: IngredientResponse = ingredient.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
