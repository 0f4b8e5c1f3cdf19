//! Shared fixtures for integration tests
#![allow(dead_code)]

use inventory_intelligence::inventory_model::{Frequency, MonthlySales, Recipe, Shipment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic purchase record: quantity bought and unit cost
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPurchase {
    pub quantity: u32,
    pub unit_cost: f64,
}

/// Deterministic purchase record for `record_id`
///
/// Quantity is in 30..=50, unit cost in 2.0..12.0; the same id always yields
/// the same record.
pub fn synthetic_purchase(record_id: u64) -> SyntheticPurchase {
    let mut rng = StdRng::seed_from_u64(record_id);
    SyntheticPurchase {
        quantity: rng.gen_range(30..=50),
        unit_cost: rng.gen_range(2.0..12.0),
    }
}

/// Monthly shipments derived from synthetic purchases, one line per ingredient
pub fn synthetic_shipments(ingredients: &[&str]) -> Vec<Shipment> {
    ingredients
        .iter()
        .enumerate()
        .map(|(id, ingredient)| Shipment {
            ingredient: ingredient.to_string(),
            quantity_per_shipment: f64::from(synthetic_purchase(id as u64).quantity),
            unit: "pieces".to_string(),
            shipments_per_period: 1,
            frequency: Frequency::Monthly,
        })
        .collect()
}

/// The pizza restaurant used across tests
pub fn pizza_recipes() -> Vec<Recipe> {
    vec![Recipe::new("Pizza")
        .with_ingredient("Dough", 0.25)
        .with_ingredient("Tomatoes", 0.2)]
}

pub fn pizza_sales(month: &str, units: i64) -> MonthlySales {
    MonthlySales::new(month).with_sale("Pizza", units)
}

pub const PIZZA_SHIPMENTS_CSV: &str = "Ingredient,Quantity per shipment,Unit of shipment,Number of shipments,frequency
Dough,50,lbs,2,weekly
Tomatoes,30,lbs,1,monthly";
