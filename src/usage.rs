//! # Usage Aggregator
//!
//! Multiplies each recipe's per-unit ingredient quantities by the units sold in
//! one month and sums the result per ingredient.

use crate::inventory_model::{IngredientUsage, MonthlySales, Recipe};
use log::debug;
use std::collections::BTreeMap;

/// Ingredient usage for one month of sales
///
/// Only ingredients of recipes that actually sold that month appear in the
/// result; an ingredient with no sales is absent rather than zero. Each call
/// builds a fresh mapping, nothing is shared between months.
///
/// # Examples
///
/// ```rust
/// use inventory_intelligence::inventory_model::{MonthlySales, Recipe};
/// use inventory_intelligence::usage::aggregate_usage;
///
/// let recipes = vec![Recipe::new("Beef Ramen").with_ingredient("Beef", 140.0)];
/// let january = MonthlySales::new("January").with_sale("Beef Ramen", 10);
///
/// let usage = aggregate_usage(&recipes, &january);
/// assert_eq!(usage["Beef"], 1400.0);
/// ```
pub fn aggregate_usage(recipes: &[Recipe], sales: &MonthlySales) -> BTreeMap<String, f64> {
    let usage = recipes
        .iter()
        .map(|recipe| (recipe, sales.units_sold(&recipe.item_name)))
        .filter(|(_, units_sold)| *units_sold > 0)
        .flat_map(|(recipe, units_sold)| {
            recipe
                .ingredients
                .iter()
                .map(move |(ingredient, per_unit)| (ingredient, per_unit * units_sold as f64))
        })
        .fold(BTreeMap::new(), |mut acc, (ingredient, quantity)| {
            *acc.entry(ingredient.clone()).or_insert(0.0) += quantity;
            acc
        });

    debug!(
        "Aggregated usage of {} ingredients for {}",
        usage.len(),
        sales.month
    );
    usage
}

/// Usage mapping as a list of records, sorted by ingredient name
pub fn usage_records(usage: &BTreeMap<String, f64>) -> Vec<IngredientUsage> {
    usage
        .iter()
        .map(|(name, usage)| IngredientUsage {
            name: name.clone(),
            usage: *usage,
        })
        .collect()
}
