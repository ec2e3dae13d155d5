// ABOUTME: Shopping list report rendering
// ABOUTME: Formats aggregated cart rows into the downloadable text report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram

//! # Shopping List Report
//!
//! Pure rendering of the consolidated shopping list. The database layer
//! supplies rows already grouped, summed and ordered
//! ([`MembershipsManager::aggregate_cart`]); this module only turns them
//! into the deterministic text the download endpoint serves.
//!
//! [`MembershipsManager::aggregate_cart`]: crate::database::memberships::MembershipsManager::aggregate_cart

use std::fmt::Write as _;

use crate::models::{CartRecipe, ShoppingListItem};

/// Fixed attachment filename for the downloaded report
pub const SHOPPING_LIST_FILENAME: &str = "foodgram_shopping_list.txt";

const HEADER: &str = "Foodgram shopping list:";
const EMPTY_MESSAGE: &str = "Your shopping cart is empty.";

/// Render the shopping list report
///
/// `items` must be ordered by case-normalized ingredient name and
/// `recipes` by recipe name; both come from the aggregation queries that
/// order exactly so.
#[must_use]
pub fn render(items: &[ShoppingListItem], recipes: &[CartRecipe]) -> String {
    let mut report = String::new();
    report.push_str(HEADER);
    report.push_str("\n\n");

    if items.is_empty() {
        report.push_str(EMPTY_MESSAGE);
        report.push('\n');
        return report;
    }

    for (index, item) in items.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(
            report,
            "{}. {} ({}) — {}",
            index + 1,
            capitalize(&item.name),
            item.measurement_unit,
            item.total_amount
        );
    }

    report.push_str("\nRecipes:\n");
    for recipe in recipes {
        let _ = writeln!(report, "- {} (by {})", recipe.name, recipe.author);
    }

    report
}

/// Uppercase the first character, leaving the rest untouched
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            total_amount: total,
        }
    }

    fn recipe(name: &str, author: &str) -> CartRecipe {
        CartRecipe {
            name: name.to_owned(),
            author: author.to_owned(),
        }
    }

    #[test]
    fn test_empty_cart_message() {
        let report = render(&[], &[]);
        assert_eq!(report, "Foodgram shopping list:\n\nYour shopping cart is empty.\n");
    }

    #[test]
    fn test_numbered_capitalized_lines() {
        let report = render(
            &[item("flour", "g", 150), item("milk", "ml", 500)],
            &[recipe("Bread", "baker"), recipe("Pancakes", "chef_anna")],
        );

        assert!(report.contains("1. Flour (g) — 150"));
        assert!(report.contains("2. Milk (ml) — 500"));
        assert!(report.contains("- Bread (by baker)"));
        assert!(report.contains("- Pancakes (by chef_anna)"));
    }

    #[test]
    fn test_summed_ingredient_appears_once() {
        let report = render(&[item("flour", "g", 150)], &[recipe("Bread", "baker")]);
        assert_eq!(report.matches("Flour").count(), 1);
    }

    #[test]
    fn test_recipe_appendix_follows_items() {
        let report = render(&[item("egg", "pcs", 3)], &[recipe("Omelette", "cook")]);
        let items_at = report.find("1. Egg").unwrap();
        let recipes_at = report.find("Recipes:").unwrap();
        assert!(items_at < recipes_at);
    }

    #[test]
    fn test_capitalize_keeps_rest_of_name() {
        assert_eq!(capitalize("olive oil"), "Olive oil");
        assert_eq!(capitalize(""), "");
    }
}
