// ABOUTME: HTTP integration tests for the shopping list download
// ABOUTME: Aggregated sums, deterministic ordering and the empty-cart message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use foodgram_server::models::{Ingredient, User};
use foodgram_server::resources::ServerResources;
use foodgram_server::routes::RecipeRoutes;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

struct ShoppingListTestSetup {
    resources: Arc<ServerResources>,
    user: User,
    ingredients: Vec<Ingredient>,
}

impl ShoppingListTestSetup {
    async fn new() -> anyhow::Result<Self> {
        let resources = common::create_test_resources().await?;
        let (_, user) = common::create_test_user(&resources).await?;
        let ingredients = common::seed_ingredients(&resources).await?;
        Ok(Self {
            resources,
            user,
            ingredients,
        })
    }

    fn routes(&self) -> axum::Router {
        RecipeRoutes::routes(self.resources.clone())
    }

    fn auth_header(&self) -> String {
        common::bearer_for(&self.resources, &self.user)
    }

    /// Create a recipe from (ingredient index, amount) pairs and put it in
    /// the user's cart
    async fn add_cart_recipe(&self, name: &str, lines: &[(usize, i64)]) -> i64 {
        let ingredients: Vec<Value> = lines
            .iter()
            .map(|(index, amount)| json!({ "id": self.ingredients[*index].id, "amount": amount }))
            .collect();
        let body = json!({
            "name": name,
            "image": "recipes/images/dish.png",
            "text": "Cook it",
            "cooking_time": 10,
            "ingredients": ingredients
        });

        let response = AxumTestRequest::post("/api/recipes")
            .header("authorization", &self.auth_header())
            .json(&body)
            .send(self.routes())
            .await;
        assert_eq!(response.status(), 201);
        let created: Value = response.json();
        let recipe_id = created["id"].as_i64().expect("recipe id");

        let response = AxumTestRequest::post(&format!("/api/recipes/{recipe_id}/shopping_cart"))
            .header("authorization", &self.auth_header())
            .send(self.routes())
            .await;
        assert_eq!(response.status(), 201);

        recipe_id
    }

    async fn download(&self) -> helpers::axum_test::AxumTestResponse {
        AxumTestRequest::get("/api/recipes/download_shopping_cart")
            .header("authorization", &self.auth_header())
            .send(self.routes())
            .await
    }
}

#[tokio::test]
async fn test_download_requires_auth() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .send(setup.routes())
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_empty_cart_report() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");

    let response = setup.download().await;
    assert_eq!(response.status(), 200);
    assert!(response.text().contains("Your shopping cart is empty."));
}

#[tokio::test]
async fn test_download_is_text_attachment_with_fixed_filename() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");

    let response = setup.download().await;
    assert_eq!(response.status(), 200);
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        response.header("content-disposition").unwrap(),
        "attachment; filename=\"foodgram_shopping_list.txt\""
    );
}

#[tokio::test]
async fn test_amounts_sum_across_recipes() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");
    // flour appears in both recipes: 100 g + 50 g
    setup.add_cart_recipe("Bread", &[(0, 100), (1, 500)]).await;
    setup.add_cart_recipe("Pancakes", &[(0, 50), (2, 3)]).await;

    let response = setup.download().await;
    assert_eq!(response.status(), 200);
    let report = response.text();

    assert!(report.contains("Flour (g) — 150"));
    assert_eq!(report.matches("Flour").count(), 1);
    assert!(report.contains("Milk (ml) — 500"));
    assert!(report.contains("Egg (pcs) — 3"));
}

#[tokio::test]
async fn test_report_lists_contributing_recipes_by_name() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");
    setup.add_cart_recipe("Pancakes", &[(0, 50)]).await;
    setup.add_cart_recipe("Bread", &[(0, 100)]).await;

    let report = setup.download().await.text();

    let bread_at = report.find("- Bread (by test_user)").unwrap();
    let pancakes_at = report.find("- Pancakes (by test_user)").unwrap();
    assert!(bread_at < pancakes_at);
}

#[tokio::test]
async fn test_items_ordered_by_name_case_normalized() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");
    // insertion order scrambled on purpose; expected order:
    // egg, flour, milk, sugar
    setup
        .add_cart_recipe("Cake", &[(3, 200), (0, 100), (2, 4), (1, 300)])
        .await;

    let report = setup.download().await.text();

    assert!(report.contains("1. Egg (pcs) — 4"));
    assert!(report.contains("2. Flour (g) — 100"));
    assert!(report.contains("3. Milk (ml) — 300"));
    assert!(report.contains("4. Sugar (g) — 200"));
}

#[tokio::test]
async fn test_emptied_cart_reports_empty_again() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");
    let recipe_id = setup.add_cart_recipe("Bread", &[(0, 100)]).await;

    let report = setup.download().await.text();
    assert!(report.contains("Flour (g) — 100"));

    let response = AxumTestRequest::delete(&format!("/api/recipes/{recipe_id}/shopping_cart"))
        .header("authorization", &setup.auth_header())
        .send(setup.routes())
        .await;
    assert_eq!(response.status(), 204);

    let report = setup.download().await.text();
    assert!(report.contains("Your shopping cart is empty."));
    assert!(!report.contains("Flour"));
}

#[tokio::test]
async fn test_report_only_covers_own_cart() {
    let setup = ShoppingListTestSetup::new().await.expect("Setup failed");
    setup.add_cart_recipe("Bread", &[(0, 100)]).await;

    let (_, other) = common::create_test_user_with_email(
        &setup.resources,
        "other@example.com",
        "other_user",
    )
    .await
    .expect("Failed to create second user");

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .header(
            "authorization",
            &common::bearer_for(&setup.resources, &other),
        )
        .send(setup.routes())
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.text().contains("Your shopping cart is empty."));
}
