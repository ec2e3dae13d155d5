// ABOUTME: Core domain models for the Foodgram recipe-sharing backend
// ABOUTME: Defines User, Ingredient, Recipe, ingredient lines and membership kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Data Models
//!
//! Domain types shared across the database and route layers. Validation of
//! write payloads lives here so it can be exercised without a database.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Allowed username characters, mirroring the account subsystem's contract
#[allow(clippy::unwrap_used)] // the pattern is a literal
fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w.@+-]+$").unwrap())
}

/// A registered user
///
/// Account lifecycle (registration, passwords, login) is owned by the auth
/// subsystem; this server only stores the profile attributes it reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address, unique, used as the login id
    pub email: String,
    /// Unique username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Opaque reference to the stored avatar image, if any
    pub avatar: Option<String>,
    /// When the account row was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user profile
    ///
    /// # Errors
    ///
    /// Returns a validation error if the username contains characters
    /// outside `[\w.@+-]` or the email has no `@`.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> AppResult<Self> {
        let email = email.into();
        let username = username.into();

        if !email.contains('@') {
            return Err(AppError::validation("email", "Invalid email address"));
        }
        if !username_pattern().is_match(&username) {
            return Err(AppError::validation(
                "username",
                "Username contains invalid characters",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            username,
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar: None,
            created_at: Utc::now(),
        })
    }
}

/// A catalog ingredient: name plus its measurement unit
///
/// The (name, unit) pair is unique; the same name may appear with several
/// units ("milk, ml" and "milk, g" are distinct catalog entries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit the amount is expressed in
    pub measurement_unit: String,
}

/// A stored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Author's user id
    pub author_id: Uuid,
    /// Recipe name
    pub name: String,
    /// Opaque reference to the stored recipe image
    pub image: String,
    /// Free-form description
    pub text: String,
    /// Cooking time in minutes, at least 1
    pub cooking_time: i64,
    /// Publication timestamp
    pub created_at: DateTime<Utc>,
}

/// One ingredient requirement within a recipe, joined with catalog data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Catalog ingredient id
    pub ingredient_id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Required amount, at least 1
    pub amount: i64,
}

/// An (ingredient id, amount) pair in a recipe write payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngredientAmount {
    /// Catalog ingredient id
    #[serde(rename = "id")]
    pub ingredient_id: i64,
    /// Required amount, at least 1
    pub amount: i64,
}

/// Validated payload for creating or replacing a recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Recipe name
    pub name: String,
    /// Opaque reference to the recipe image
    pub image: String,
    /// Free-form description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Ingredient requirements
    pub ingredients: Vec<IngredientAmount>,
}

impl NewRecipe {
    /// Validate the write payload
    ///
    /// # Errors
    ///
    /// Returns a field-keyed validation error when the ingredient list is
    /// empty or repeats an ingredient, when any amount is below 1, or when
    /// the cooking time is below 1.
    pub fn validate(&self) -> AppResult<()> {
        if self.cooking_time < 1 {
            return Err(AppError::out_of_range(
                "cooking_time",
                "Cooking time must be at least 1 minute",
            ));
        }
        if self.ingredients.is_empty() {
            return Err(AppError::validation(
                "ingredients",
                "At least one ingredient is required",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for item in &self.ingredients {
            if item.amount < 1 {
                return Err(AppError::out_of_range(
                    "ingredients",
                    "Ingredient amount must be at least 1",
                ));
            }
            if !seen.insert(item.ingredient_id) {
                return Err(AppError::validation(
                    "ingredients",
                    "Ingredients must not repeat within a recipe",
                ));
            }
        }

        Ok(())
    }
}

/// One aggregated shopping-list row: an ingredient with its summed amount
/// across every recipe in the user's cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Amount summed across cart recipes
    pub total_amount: i64,
}

/// A recipe contributing to the shopping list, for the report appendix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecipe {
    /// Recipe name
    pub name: String,
    /// Author's username
    pub author: String,
}

/// The two user-recipe membership relations sharing toggle semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipKind {
    /// The user's favorite recipes
    Favorite,
    /// The user's shopping cart
    ShoppingCart,
}

impl MembershipKind {
    /// Human-readable relation name used in conflict messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }
}

impl Display for MembershipKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
