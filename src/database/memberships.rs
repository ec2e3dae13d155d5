// ABOUTME: Favorite and shopping-cart membership database operations
// ABOUTME: Conflict-signaling toggles plus the shopping-list aggregation queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::{CartRecipe, MembershipKind, ShoppingListItem};

/// Favorite / shopping-cart membership operations manager
///
/// Both relations are unique (user, recipe) sets with identical toggle
/// semantics; [`MembershipKind`] selects the table.
pub struct MembershipsManager {
    pool: SqlitePool,
}

impl MembershipsManager {
    /// Create a new memberships manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to the user's relation
    ///
    /// The insert goes straight to the unique constraint; a concurrent
    /// duplicate request loses there and surfaces the same conflict error
    /// a sequential repeat does.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the membership already exists, or a
    /// database error otherwise.
    pub async fn add(&self, kind: MembershipKind, user_id: Uuid, recipe_id: i64) -> AppResult<()> {
        let sql = match kind {
            MembershipKind::Favorite => {
                "INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2)"
            }
            MembershipKind::ShoppingCart => {
                "INSERT INTO shopping_cart (user_id, recipe_id) VALUES ($1, $2)"
            }
        };

        sqlx::query(sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::invalid_input(format!("Recipe is already in {kind}"))
                } else {
                    AppError::database(format!("Failed to add to {kind}: {e}"))
                }
            })?;

        Ok(())
    }

    /// Remove a recipe from the user's relation
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the membership does not exist, or a
    /// database error otherwise.
    pub async fn remove(
        &self,
        kind: MembershipKind,
        user_id: Uuid,
        recipe_id: i64,
    ) -> AppResult<()> {
        let sql = match kind {
            MembershipKind::Favorite => {
                "DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2"
            }
            MembershipKind::ShoppingCart => {
                "DELETE FROM shopping_cart WHERE user_id = $1 AND recipe_id = $2"
            }
        };

        let result = sqlx::query(sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove from {kind}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input(format!("Recipe is not in {kind}")));
        }
        Ok(())
    }

    /// Whether the user's relation contains the recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn contains(
        &self,
        kind: MembershipKind,
        user_id: Uuid,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let sql = match kind {
            MembershipKind::Favorite => {
                "SELECT COUNT(*) AS count FROM favorites WHERE user_id = $1 AND recipe_id = $2"
            }
            MembershipKind::ShoppingCart => {
                "SELECT COUNT(*) AS count FROM shopping_cart WHERE user_id = $1 AND recipe_id = $2"
            }
        };

        let row = sqlx::query(sql)
            .bind(user_id.to_string())
            .bind(recipe_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check {kind}: {e}")))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Aggregate the user's shopping cart into summed ingredient rows
    ///
    /// Groups by (name, unit), sums amounts, orders by case-normalized
    /// ingredient name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn aggregate_cart(&self, user_id: Uuid) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            JOIN shopping_cart sc ON sc.recipe_id = ri.recipe_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY LOWER(i.name), i.measurement_unit
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate shopping cart: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListItem {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total_amount: row.get("total_amount"),
            })
            .collect())
    }

    /// The distinct recipes in the user's cart with their authors, ordered
    /// by recipe name for the report appendix
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn cart_recipes(&self, user_id: Uuid) -> AppResult<Vec<CartRecipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.name, u.username AS author
            FROM shopping_cart sc
            JOIN recipes r ON r.id = sc.recipe_id
            JOIN users u ON u.id = r.author_id
            WHERE sc.user_id = $1
            ORDER BY LOWER(r.name), r.id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cart recipes: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| CartRecipe {
                name: row.get("name"),
                author: row.get("author"),
            })
            .collect())
    }
}
