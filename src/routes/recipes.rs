// ABOUTME: Route handlers for the Recipe REST API
// ABOUTME: CRUD, favorite/shopping-cart toggles and the shopping list download
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! Recipe routes
//!
//! Reads are open to everyone; writes require authentication and are
//! restricted to the recipe's author. The favorite and shopping-cart
//! toggles share one implementation differing only in the relation they
//! touch.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authenticate_optional, authenticate_request, AuthResult};
use crate::database::memberships::MembershipsManager;
use crate::database::recipes::{RecipeListFilter, RecipesManager};
use crate::database::subscriptions::SubscriptionsManager;
use crate::database::users::UsersManager;
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientAmount, IngredientLine, MembershipKind, NewRecipe, Recipe};
use crate::resources::ServerResources;
use crate::routes::users::UserProfileResponse;
use crate::shopping_list::{self, SHOPPING_LIST_FILENAME};

// ============================================================================
// Response Types
// ============================================================================

/// Response for one ingredient line within a recipe
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeIngredientResponse {
    /// Catalog ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Required amount
    pub amount: i64,
}

impl From<IngredientLine> for RecipeIngredientResponse {
    fn from(line: IngredientLine) -> Self {
        Self {
            id: line.ingredient_id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe representation for reads
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Author profile relative to the requesting user
    pub author: UserProfileResponse,
    /// Ingredient lines
    pub ingredients: Vec<RecipeIngredientResponse>,
    /// Whether the requesting user favorited this recipe
    pub is_favorited: bool,
    /// Whether this recipe is in the requesting user's shopping cart
    pub is_in_shopping_cart: bool,
    /// Recipe name
    pub name: String,
    /// Image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

/// Compact recipe representation used by toggles and subscription listings
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortRecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Image reference
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl From<Recipe> for ShortRecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Request to create a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeBody {
    /// Ingredient requirements
    pub ingredients: Vec<IngredientAmount>,
    /// Recipe name
    pub name: String,
    /// Image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl From<CreateRecipeBody> for NewRecipe {
    fn from(body: CreateRecipeBody) -> Self {
        Self {
            name: body.name,
            image: body.image,
            text: body.text,
            cooking_time: body.cooking_time,
            ingredients: body.ingredients,
        }
    }
}

/// Request to update a recipe
///
/// Every field is optional except that `ingredients` must be present: a
/// partial edit silently dropping the line items is rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeBody {
    /// Replacement ingredient requirements (required)
    pub ingredients: Option<Vec<IngredientAmount>>,
    /// New recipe name
    pub name: Option<String>,
    /// New image reference
    pub image: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time in minutes
    pub cooking_time: Option<i64>,
}

// ============================================================================
// Query Types
// ============================================================================

/// Query parameters for recipe listing
#[derive(Debug, Deserialize, Default)]
pub struct RecipeListQuery {
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Only the requesting user's favorites (`1` or `true`)
    pub is_favorited: Option<String>,
    /// Only the requesting user's cart (`1` or `true`)
    pub is_in_shopping_cart: Option<String>,
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

// ============================================================================
// Routes
// ============================================================================

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route(
                "/api/recipes/download_shopping_cart",
                get(Self::handle_download_shopping_cart),
            )
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", patch(Self::handle_update))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .route("/api/recipes/:id/favorite", post(Self::handle_add_favorite))
            .route(
                "/api/recipes/:id/favorite",
                delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                post(Self::handle_add_to_cart),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes - list recipes newest-first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.auth_manager)?;
        let viewer_id = viewer.map(|auth| auth.user_id);

        // Relation filters are meaningless for anonymous callers and are
        // ignored for them, matching the read-for-everyone contract
        let filter = RecipeListFilter {
            author: query.author,
            favorited_by: viewer_id.filter(|_| is_truthy(query.is_favorited.as_deref())),
            in_cart_of: viewer_id.filter(|_| is_truthy(query.is_in_shopping_cart.as_deref())),
        };

        let recipes = RecipesManager::new(resources.database.pool().clone())
            .list(&filter)
            .await?;

        let mut response = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            response.push(build_recipe_response(&resources, recipe, viewer_id).await?);
        }

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipes - create a recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateRecipeBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;

        let draft: NewRecipe = body.into();
        draft.validate()?;

        let recipe = RecipesManager::new(resources.database.pool().clone())
            .create(auth.user_id, &draft)
            .await?;

        let response = build_recipe_response(&resources, recipe, Some(auth.user_id)).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id - fetch one recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.auth_manager)?;

        let recipe = RecipesManager::new(resources.database.pool().clone())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        let response =
            build_recipe_response(&resources, recipe, viewer.map(|auth| auth.user_id)).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH /api/recipes/:id - update own recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateRecipeBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let manager = RecipesManager::new(resources.database.pool().clone());

        let existing = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        if existing.author_id != auth.user_id {
            return Err(AppError::permission_denied(
                "Only the author can edit a recipe",
            ));
        }

        // A partial edit must restate the line items; omitting them would
        // silently drop data
        let ingredients = body
            .ingredients
            .ok_or_else(|| AppError::missing_field("ingredients"))?;

        let draft = NewRecipe {
            name: body.name.unwrap_or(existing.name),
            image: body.image.unwrap_or(existing.image),
            text: body.text.unwrap_or(existing.text),
            cooking_time: body.cooking_time.unwrap_or(existing.cooking_time),
            ingredients,
        };
        draft.validate()?;

        manager.update(id, &draft).await?;

        let updated = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        let response = build_recipe_response(&resources, updated, Some(auth.user_id)).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - delete own recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let manager = RecipesManager::new(resources.database.pool().clone());

        let existing = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        if existing.author_id != auth.user_id {
            return Err(AppError::permission_denied(
                "Only the author can delete a recipe",
            ));
        }

        manager.delete(id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        toggle_add(&resources, auth, id, MembershipKind::Favorite).await
    }

    /// Handle DELETE /api/recipes/:id/favorite
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        toggle_remove(&resources, auth, id, MembershipKind::Favorite).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        toggle_add(&resources, auth, id, MembershipKind::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        toggle_remove(&resources, auth, id, MembershipKind::ShoppingCart).await
    }

    /// Handle GET /api/recipes/download_shopping_cart - text report
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let manager = MembershipsManager::new(resources.database.pool().clone());

        let items = manager.aggregate_cart(auth.user_id).await?;
        let recipes = manager.cart_recipes(auth.user_id).await?;
        let report = shopping_list::render(&items, &recipes);

        Ok((
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_owned(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
                ),
            ],
            report,
        )
            .into_response())
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Add the recipe to a membership relation, responding with the short
/// recipe body on success
async fn toggle_add(
    resources: &Arc<ServerResources>,
    auth: AuthResult,
    recipe_id: i64,
    kind: MembershipKind,
) -> Result<Response, AppError> {
    let recipe = RecipesManager::new(resources.database.pool().clone())
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    MembershipsManager::new(resources.database.pool().clone())
        .add(kind, auth.user_id, recipe_id)
        .await?;

    let response: ShortRecipeResponse = recipe.into();
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Remove the recipe from a membership relation
async fn toggle_remove(
    resources: &Arc<ServerResources>,
    auth: AuthResult,
    recipe_id: i64,
    kind: MembershipKind,
) -> Result<Response, AppError> {
    RecipesManager::new(resources.database.pool().clone())
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    MembershipsManager::new(resources.database.pool().clone())
        .remove(kind, auth.user_id, recipe_id)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Assemble the full recipe representation for the requesting user
async fn build_recipe_response(
    resources: &Arc<ServerResources>,
    recipe: Recipe,
    viewer: Option<Uuid>,
) -> AppResult<RecipeResponse> {
    let pool = resources.database.pool();

    let author = UsersManager::new(pool.clone())
        .get_user(recipe.author_id)
        .await?
        .ok_or_else(|| AppError::internal("Recipe author row is missing"))?;

    let lines = RecipesManager::new(pool.clone()).get_lines(recipe.id).await?;

    let (is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => {
            let memberships = MembershipsManager::new(pool.clone());
            (
                SubscriptionsManager::new(pool.clone())
                    .is_subscribed(viewer_id, recipe.author_id)
                    .await?,
                memberships
                    .contains(MembershipKind::Favorite, viewer_id, recipe.id)
                    .await?,
                memberships
                    .contains(MembershipKind::ShoppingCart, viewer_id, recipe.id)
                    .await?,
            )
        }
        None => (false, false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        author: UserProfileResponse::from_user(author, is_subscribed),
        ingredients: lines.into_iter().map(Into::into).collect(),
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    })
}
