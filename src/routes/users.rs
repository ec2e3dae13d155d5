// ABOUTME: Route handlers for user profiles and the subscription graph
// ABOUTME: Profile lookup, subscribe/unsubscribe toggle and subscriptions listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! User routes
//!
//! Account lifecycle is owned by the external auth subsystem; these routes
//! cover what the recipe domain needs: reading profiles and maintaining
//! the directed follow graph between users.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authenticate_optional, authenticate_request};
use crate::database::recipes::RecipesManager;
use crate::database::subscriptions::SubscriptionsManager;
use crate::database::users::UsersManager;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;
use crate::routes::recipes::ShortRecipeResponse;

// ============================================================================
// Response Types
// ============================================================================

/// Response for a user profile
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileResponse {
    /// User id
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the requesting user follows this user
    pub is_subscribed: bool,
    /// Avatar reference, if set
    pub avatar: Option<String>,
}

impl UserProfileResponse {
    /// Build a profile response relative to the requesting user
    #[must_use]
    pub fn from_user(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}

/// Response for a followed author with their recipes
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// The author's profile
    #[serde(flatten)]
    pub profile: UserProfileResponse,
    /// The author's recipes, newest first, possibly truncated
    pub recipes: Vec<ShortRecipeResponse>,
    /// Total number of recipes by the author
    pub recipes_count: i64,
}

// ============================================================================
// Query Types
// ============================================================================

/// Query parameters for subscription listings
#[derive(Debug, Deserialize, Default)]
pub struct SubscriptionsQuery {
    /// Maximum recipes to embed per author
    pub recipes_limit: Option<i64>,
}

// ============================================================================
// Routes
// ============================================================================

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/subscriptions",
                get(Self::handle_list_subscriptions),
            )
            .route("/api/users/:id", get(Self::handle_get_user))
            .route("/api/users/:id/subscribe", post(Self::handle_subscribe))
            .route("/api/users/:id/subscribe", delete(Self::handle_unsubscribe))
            .with_state(resources)
    }

    /// Handle GET /api/users/:id - fetch a profile
    async fn handle_get_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources.auth_manager)?;
        let pool = resources.database.pool();

        let user = UsersManager::new(pool.clone())
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let is_subscribed = match viewer {
            Some(auth) => {
                SubscriptionsManager::new(pool.clone())
                    .is_subscribed(auth.user_id, id)
                    .await?
            }
            None => false,
        };

        let response = UserProfileResponse::from_user(user, is_subscribed);
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe - follow an author
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let pool = resources.database.pool();

        let author = UsersManager::new(pool.clone())
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if auth.user_id == author.id {
            return Err(AppError::invalid_input("Cannot subscribe to yourself"));
        }

        SubscriptionsManager::new(pool.clone())
            .add(auth.user_id, author.id)
            .await?;

        let response =
            build_subscription_response(&resources, author, true, query.recipes_limit).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe - unfollow an author
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let pool = resources.database.pool();

        UsersManager::new(pool.clone())
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        SubscriptionsManager::new(pool.clone())
            .remove(auth.user_id, id)
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/users/subscriptions - list followed authors
    async fn handle_list_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate_request(&headers, &resources.auth_manager)?;
        let pool = resources.database.pool();

        let authors = SubscriptionsManager::new(pool.clone())
            .subscribed_authors(auth.user_id)
            .await?;

        let mut response = Vec::with_capacity(authors.len());
        for author in authors {
            response
                .push(build_subscription_response(&resources, author, true, query.recipes_limit).await?);
        }

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

async fn build_subscription_response(
    resources: &Arc<ServerResources>,
    author: User,
    is_subscribed: bool,
    recipes_limit: Option<i64>,
) -> AppResult<SubscriptionResponse> {
    let recipes_manager = RecipesManager::new(resources.database.pool().clone());

    let recipes = recipes_manager
        .list_by_author(author.id, recipes_limit)
        .await?;
    let recipes_count = recipes_manager.count_by_author(author.id).await?;

    Ok(SubscriptionResponse {
        profile: UserProfileResponse::from_user(author, is_subscribed),
        recipes: recipes.into_iter().map(Into::into).collect(),
        recipes_count,
    })
}
