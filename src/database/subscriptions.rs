// ABOUTME: Subscription graph database operations (directed follow edges)
// ABOUTME: Conflict-signaling subscribe/unsubscribe with a self-loop check constraint backstop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::users::row_to_user;
use crate::database::{is_check_violation, is_unique_violation};
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Subscription graph operations manager
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe a follower to an author
    ///
    /// Route handlers reject self-subscription before calling this; the
    /// schema check constraint stays as the authoritative guard against
    /// races and direct writes, and its violation maps onto the same
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when already subscribed or when
    /// follower == author, or a database error otherwise.
    pub async fn add(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO subscriptions (follower_id, author_id) VALUES ($1, $2)")
            .bind(follower_id.to_string())
            .bind(author_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::invalid_input("Already subscribed to this author")
                } else if is_check_violation(&e) {
                    AppError::invalid_input("Cannot subscribe to yourself")
                } else {
                    AppError::database(format!("Failed to subscribe: {e}"))
                }
            })?;

        Ok(())
    }

    /// Unsubscribe a follower from an author
    ///
    /// # Errors
    ///
    /// Returns a conflict error when there is no subscription, or a
    /// database error otherwise.
    pub async fn remove(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE follower_id = $1 AND author_id = $2")
                .bind(follower_id.to_string())
                .bind(author_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input("Not subscribed to this author"));
        }
        Ok(())
    }

    /// Whether the follower is subscribed to the author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_subscribed(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS count
            FROM subscriptions
            WHERE follower_id = $1 AND author_id = $2
            ",
        )
        .bind(follower_id.to_string())
        .bind(author_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// The authors the user follows, ordered by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn subscribed_authors(&self, follower_id: Uuid) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.avatar, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.follower_id = $1
            ORDER BY u.username
            ",
        )
        .bind(follower_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }
}
