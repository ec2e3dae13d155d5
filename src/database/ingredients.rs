// ABOUTME: Ingredient catalog database operations
// ABOUTME: Read-mostly reference data with protected deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::database::{is_foreign_key_violation, is_unique_violation};
use crate::errors::{AppError, AppResult};
use crate::models::Ingredient;

/// Ingredient catalog database operations manager
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List catalog ingredients ordered by name, optionally filtered by a
    /// case-insensitive name prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = match name_prefix {
            Some(prefix) => {
                // Escape LIKE wildcards so a literal "%" in the query
                // cannot widen the match
                let escaped = prefix.replace('\\', r"\\").replace('%', r"\%").replace('_', r"\_");
                sqlx::query(
                    r"
                    SELECT id, name, measurement_unit
                    FROM ingredients
                    WHERE name LIKE $1 ESCAPE '\'
                    ORDER BY name
                    ",
                )
                .bind(format!("{escaped}%"))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, name, measurement_unit
                    FROM ingredients
                    ORDER BY name
                    ",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// Insert a catalog entry unless the (name, unit) pair already exists
    ///
    /// Returns the ingredient and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_or_create(&self, name: &str, measurement_unit: &str) -> AppResult<(Ingredient, bool)> {
        let insert = sqlx::query(
            r"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            ",
        )
        .bind(name)
        .bind(measurement_unit)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(result) => Ok((
                Ingredient {
                    id: result.last_insert_rowid(),
                    name: name.to_owned(),
                    measurement_unit: measurement_unit.to_owned(),
                },
                true,
            )),
            Err(e) if is_unique_violation(&e) => {
                let existing = self.find(name, measurement_unit).await?.ok_or_else(|| {
                    AppError::database("Ingredient vanished between insert and lookup")
                })?;
                Ok((existing, false))
            }
            Err(e) => Err(AppError::database(format!(
                "Failed to create ingredient: {e}"
            ))),
        }
    }

    /// Delete an ingredient; refused while any recipe line references it
    ///
    /// # Errors
    ///
    /// Returns a validation error when the ingredient is still referenced,
    /// a not-found error when the id is unknown, or a database error.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::invalid_input("Ingredient is referenced by existing recipes")
                } else {
                    AppError::database(format!("Failed to delete ingredient: {e}"))
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Ingredient"));
        }
        Ok(())
    }

    async fn find(&self, name: &str, measurement_unit: &str) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE name = $1 AND measurement_unit = $2
            ",
        )
        .bind(name)
        .bind(measurement_unit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find ingredient: {e}")))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }
}

pub(crate) fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    Ok(Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    })
}
