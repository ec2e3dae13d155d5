// ABOUTME: Recipe database operations including transactional line-item writes
// ABOUTME: Create/update replace ingredient lines atomically; lists support relation filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::database::{is_foreign_key_violation, is_unique_violation};
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientAmount, IngredientLine, NewRecipe, Recipe};

/// Optional relation filters for recipe listing
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeListFilter {
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Only recipes favorited by this user
    pub favorited_by: Option<Uuid>,
    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<Uuid>,
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a recipe and its ingredient lines in one transaction
    ///
    /// The payload must already be validated; this method still maps
    /// constraint violations (unknown ingredient id, racing duplicate
    /// line) onto field-keyed validation errors so nothing persists.
    ///
    /// # Errors
    ///
    /// Returns a validation error for constraint violations or a database
    /// error otherwise.
    pub async fn create(&self, author_id: Uuid, draft: &NewRecipe) -> AppResult<Recipe> {
        let created_at = Utc::now();
        let mut tx = begin(&self.pool).await?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id.to_string())
        .bind(&draft.name)
        .bind(&draft.image)
        .bind(&draft.text)
        .bind(draft.cooking_time)
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        let recipe_id = result.last_insert_rowid();
        insert_lines(&mut tx, recipe_id, &draft.ingredients).await?;

        commit(tx).await?;

        Ok(Recipe {
            id: recipe_id,
            author_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            text: draft.text.clone(),
            cooking_time: draft.cooking_time,
            created_at,
        })
    }

    /// Update a recipe's fields and replace all its ingredient lines in
    /// one transaction
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown recipe id, a validation
    /// error for constraint violations, or a database error otherwise.
    pub async fn update(&self, recipe_id: i64, draft: &NewRecipe) -> AppResult<()> {
        let mut tx = begin(&self.pool).await?;

        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, image = $2, text = $3, cooking_time = $4
            WHERE id = $5
            ",
        )
        .bind(&draft.name)
        .bind(&draft.image)
        .bind(&draft.text)
        .bind(draft.cooking_time)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe lines: {e}")))?;

        insert_lines(&mut tx, recipe_id, &draft.ingredients).await?;

        commit(tx).await
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, author_id, name, image, text, cooking_time, created_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Get a recipe's ingredient lines joined with catalog data
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_lines(&self, recipe_id: i64) -> AppResult<Vec<IngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT ri.ingredient_id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe lines: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| IngredientLine {
                ingredient_id: row.get("ingredient_id"),
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get("amount"),
            })
            .collect())
    }

    /// List recipes newest-first, applying the given relation filters
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, filter: &RecipeListFilter) -> AppResult<Vec<Recipe>> {
        let mut sql = String::from(
            "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.created_at \
             FROM recipes r",
        );
        let mut binds: Vec<String> = Vec::new();

        if let Some(user_id) = filter.favorited_by {
            sql.push_str(" JOIN favorites f ON f.recipe_id = r.id AND f.user_id = ?");
            binds.push(user_id.to_string());
        }
        if let Some(user_id) = filter.in_cart_of {
            sql.push_str(" JOIN shopping_cart c ON c.recipe_id = r.id AND c.user_id = ?");
            binds.push(user_id.to_string());
        }
        if let Some(author_id) = filter.author {
            sql.push_str(" WHERE r.author_id = ?");
            binds.push(author_id.to_string());
        }
        sql.push_str(" ORDER BY r.created_at DESC, r.id DESC");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// List an author's recipes newest-first, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, author_id, name, image, text, cooking_time, created_at
            FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(author_id.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Count an author's recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_by_author(&self, author_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM recipes WHERE author_id = $1")
            .bind(author_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;

        Ok(row.get("count"))
    }

    /// Delete a recipe; lines and memberships disappear via cascade
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown recipe id or a database
    /// error otherwise.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }
        Ok(())
    }
}

async fn begin(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    pool.begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
}

async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))
}

async fn insert_lines(
    tx: &mut Transaction<'static, Sqlite>,
    recipe_id: i64,
    lines: &[IngredientAmount],
) -> AppResult<()> {
    for line in lines {
        sqlx::query(
            r"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(recipe_id)
        .bind(line.ingredient_id)
        .bind(line.amount)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::validation(
                    "ingredients",
                    format!("Unknown ingredient id {}", line.ingredient_id),
                )
            } else if is_unique_violation(&e) {
                AppError::validation("ingredients", "Ingredients must not repeat within a recipe")
            } else {
                AppError::database(format!("Failed to insert recipe line: {e}"))
            }
        })?;
    }
    Ok(())
}

pub(crate) fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let author_id_str: String = row.get("author_id");
    let created_at_str: String = row.get("created_at");

    Ok(Recipe {
        id: row.get("id"),
        author_id: Uuid::parse_str(&author_id_str)
            .map_err(|e| AppError::database(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        image: row.get("image"),
        text: row.get("text"),
        cooking_time: row.get("cooking_time"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::database(format!("Invalid date: {e}")))?
            .with_timezone(&Utc),
    })
}
