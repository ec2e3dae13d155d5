// ABOUTME: Database-level tests for referential actions and constraint mapping
// ABOUTME: Cascade on recipe deletion, protected ingredients, toggle race backstops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use foodgram_server::database::ingredients::IngredientsManager;
use foodgram_server::database::memberships::MembershipsManager;
use foodgram_server::database::recipes::RecipesManager;
use foodgram_server::database::subscriptions::SubscriptionsManager;
use foodgram_server::errors::ErrorCode;
use foodgram_server::models::{IngredientAmount, MembershipKind, NewRecipe};

fn draft(ingredient_id: i64, amount: i64) -> NewRecipe {
    NewRecipe {
        name: "Bread".into(),
        image: "recipes/images/bread.png".into(),
        text: "Bake it".into(),
        cooking_time: 45,
        ingredients: vec![IngredientAmount {
            ingredient_id,
            amount,
        }],
    }
}

#[tokio::test]
async fn test_recipe_delete_cascades_lines_and_memberships() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();
    let ingredients = common::seed_ingredients(&resources).await.unwrap();

    let pool = resources.database.pool().clone();
    let recipes = RecipesManager::new(pool.clone());
    let memberships = MembershipsManager::new(pool.clone());

    let recipe = recipes
        .create(user_id, &draft(ingredients[0].id, 100))
        .await
        .unwrap();
    memberships
        .add(MembershipKind::Favorite, user_id, recipe.id)
        .await
        .unwrap();
    memberships
        .add(MembershipKind::ShoppingCart, user_id, recipe.id)
        .await
        .unwrap();

    recipes.delete(recipe.id).await.unwrap();

    assert!(recipes.get(recipe.id).await.unwrap().is_none());
    assert!(recipes.get_lines(recipe.id).await.unwrap().is_empty());
    assert!(!memberships
        .contains(MembershipKind::Favorite, user_id, recipe.id)
        .await
        .unwrap());
    assert!(!memberships
        .contains(MembershipKind::ShoppingCart, user_id, recipe.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_referenced_ingredient_is_delete_protected() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();
    let ingredients = common::seed_ingredients(&resources).await.unwrap();

    let pool = resources.database.pool().clone();
    let recipes = RecipesManager::new(pool.clone());
    let catalog = IngredientsManager::new(pool.clone());

    let recipe = recipes
        .create(user_id, &draft(ingredients[0].id, 100))
        .await
        .unwrap();

    let error = catalog.delete(ingredients[0].id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    // Once nothing references the ingredient, deletion goes through
    recipes.delete(recipe.id).await.unwrap();
    catalog.delete(ingredients[0].id).await.unwrap();
    assert!(catalog.get(ingredients[0].id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_membership_insert_maps_to_conflict() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();
    let ingredients = common::seed_ingredients(&resources).await.unwrap();

    let pool = resources.database.pool().clone();
    let recipe = RecipesManager::new(pool.clone())
        .create(user_id, &draft(ingredients[0].id, 100))
        .await
        .unwrap();
    let memberships = MembershipsManager::new(pool);

    memberships
        .add(MembershipKind::Favorite, user_id, recipe.id)
        .await
        .unwrap();

    // No pre-check in the manager: the unique constraint itself converts
    // the duplicate insert into the conflict error
    let error = memberships
        .add(MembershipKind::Favorite, user_id, recipe.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(error.message.contains("already"));
}

#[tokio::test]
async fn test_self_subscription_blocked_by_check_constraint() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();

    // Bypass the route-level guard; the schema constraint still refuses
    let error = SubscriptionsManager::new(resources.database.pool().clone())
        .add(user_id, user_id)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(error.message.contains("yourself"));
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, user) = common::create_test_user(&resources).await.unwrap();

    let users = foodgram_server::database::users::UsersManager::new(
        resources.database.pool().clone(),
    );
    let found = users
        .get_user_by_email("test@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);

    let duplicate =
        foodgram_server::models::User::new("test@example.com", "someone_else", "A", "B").unwrap();
    let error = users.create_user(&duplicate).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_update_replaces_lines_atomically() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();
    let ingredients = common::seed_ingredients(&resources).await.unwrap();

    let recipes = RecipesManager::new(resources.database.pool().clone());
    let recipe = recipes
        .create(user_id, &draft(ingredients[0].id, 100))
        .await
        .unwrap();

    // A replacement referencing an unknown ingredient fails and must leave
    // the original lines untouched
    let bad = draft(99_999, 10);
    assert!(recipes.update(recipe.id, &bad).await.is_err());

    let lines = recipes.get_lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].ingredient_id, ingredients[0].id);
    assert_eq!(lines[0].amount, 100);

    let good = draft(ingredients[1].id, 42);
    recipes.update(recipe.id, &good).await.unwrap();
    let lines = recipes.get_lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].ingredient_id, ingredients[1].id);
}

#[tokio::test]
async fn test_aggregation_groups_by_name_and_unit() {
    let resources = common::create_test_resources().await.unwrap();
    let (user_id, _) = common::create_test_user(&resources).await.unwrap();

    let pool = resources.database.pool().clone();
    let catalog = IngredientsManager::new(pool.clone());
    // Same name under two units stays two separate rows
    let (milk_ml, _) = catalog.get_or_create("milk", "ml").await.unwrap();
    let (milk_g, _) = catalog.get_or_create("milk", "g").await.unwrap();

    let recipes = RecipesManager::new(pool.clone());
    let memberships = MembershipsManager::new(pool);

    let recipe = recipes
        .create(
            user_id,
            &NewRecipe {
                name: "Custard".into(),
                image: "recipes/images/custard.png".into(),
                text: "Whisk".into(),
                cooking_time: 25,
                ingredients: vec![
                    IngredientAmount {
                        ingredient_id: milk_ml.id,
                        amount: 200,
                    },
                    IngredientAmount {
                        ingredient_id: milk_g.id,
                        amount: 30,
                    },
                ],
            },
        )
        .await
        .unwrap();
    memberships
        .add(MembershipKind::ShoppingCart, user_id, recipe.id)
        .await
        .unwrap();

    let items = memberships.aggregate_cart(user_id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .any(|i| i.measurement_unit == "ml" && i.total_amount == 200));
    assert!(items
        .iter()
        .any(|i| i.measurement_unit == "g" && i.total_amount == 30));
}
