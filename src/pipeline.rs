//! # Monthly Data Pipeline
//!
//! Recomputes usage and inventory levels for every month of sales from the
//! three ingested inputs: recipes, shipments and sales. The result is a pure
//! function of those inputs and is rebuilt wholesale whenever one changes.
//!
//! ```rust
//! use inventory_intelligence::engine_config::EngineConfig;
//! use inventory_intelligence::ingestion::{parse_recipes, parse_sales, parse_shipments};
//! use inventory_intelligence::inventory_model::SalesData;
//! use inventory_intelligence::pipeline::calculate_all_months;
//!
//! let config = EngineConfig::default();
//! let recipes = parse_recipes("Item,Dough\nPizza,0.25", &config.synonyms);
//! let shipments = parse_shipments(
//!     "Ingredient,Qty,Unit,Count,Frequency\nDough,10,kg,1,Monthly",
//!     &config.synonyms,
//! );
//! let sales: SalesData = vec![parse_sales("January", "Item,Sold\nPizza,100")]
//!     .into_iter()
//!     .collect();
//!
//! let months = calculate_all_months(&sales, &recipes, &shipments, &config.conversion);
//! assert_eq!(months["January"].inventory_levels[0].net, -15.0);
//! ```

use crate::inventory_levels::compute_levels;
use crate::inventory_model::{MonthlyData, MonthlySales, Recipe, SalesData, Shipment};
use crate::purchases::{project_monthly_purchases, PurchaseConversion};
use crate::usage::{aggregate_usage, usage_records};
use log::info;
use std::collections::{BTreeMap, HashMap};

/// Usage and inventory levels of a single month, given the projected purchases
pub fn calculate_month(
    purchases: &BTreeMap<String, f64>,
    recipes: &[Recipe],
    sales: &MonthlySales,
) -> MonthlyData {
    let usage = aggregate_usage(recipes, sales);
    MonthlyData {
        inventory_levels: compute_levels(purchases, &usage),
        ingredient_usage: usage_records(&usage),
    }
}

/// Derived data for every month in `sales_data`, keyed by month name
///
/// Purchases are projected once; the shipment schedule is month-invariant.
pub fn calculate_all_months(
    sales_data: &SalesData,
    recipes: &[Recipe],
    shipments: &[Shipment],
    conversion: &PurchaseConversion,
) -> HashMap<String, MonthlyData> {
    let purchases = project_monthly_purchases(shipments, conversion);

    let all_months: HashMap<String, MonthlyData> = sales_data
        .iter()
        .map(|month| (month.month.clone(), calculate_month(&purchases, recipes, month)))
        .collect();

    info!(
        "Recalculated {} months from {} recipes and {} shipment lines",
        all_months.len(),
        recipes.len(),
        shipments.len()
    );
    all_months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_model::Frequency;

    fn shipments() -> Vec<Shipment> {
        vec![
            Shipment {
                ingredient: "Rice".to_string(),
                quantity_per_shipment: 10.0,
                unit: "kg".to_string(),
                shipments_per_period: 1,
                frequency: Frequency::Monthly,
            },
            Shipment {
                ingredient: "Peas".to_string(),
                quantity_per_shipment: 3.0,
                unit: "bags".to_string(),
                shipments_per_period: 1,
                frequency: Frequency::Monthly,
            },
        ]
    }

    #[test]
    fn test_every_month_is_calculated_independently() {
        let recipes = vec![Recipe::new("Fried Rice").with_ingredient("Rice", 2.0)];
        let sales: SalesData = vec![
            MonthlySales::new("January").with_sale("Fried Rice", 1),
            MonthlySales::new("February").with_sale("Fried Rice", 4),
        ]
        .into_iter()
        .collect();

        let months = calculate_all_months(&sales, &recipes, &shipments(), &PurchaseConversion::default());

        assert_eq!(months.len(), 2);
        assert_eq!(months["January"].inventory_levels[1].name, "Rice");
        assert_eq!(months["January"].inventory_levels[1].net, 8.0);
        assert_eq!(months["February"].inventory_levels[1].net, 2.0);
        // purchases are identical across months
        assert_eq!(
            months["January"].inventory_levels[0],
            months["February"].inventory_levels[0]
        );
    }

    #[test]
    fn test_month_without_matching_sales_has_no_usage() {
        let recipes = vec![Recipe::new("Fried Rice").with_ingredient("Rice", 2.0)];
        let sales: SalesData = vec![MonthlySales::new("March").with_sale("Soup", 9)]
            .into_iter()
            .collect();

        let months = calculate_all_months(&sales, &recipes, &shipments(), &PurchaseConversion::default());
        let march = &months["March"];

        assert!(march.ingredient_usage.is_empty());
        assert_eq!(march.inventory_levels.len(), 2);
        assert!(march.inventory_levels.iter().all(|l| l.used == 0.0));
    }

    #[test]
    fn test_no_sales_no_months() {
        let months = calculate_all_months(
            &SalesData::new(),
            &[],
            &shipments(),
            &PurchaseConversion::default(),
        );
        assert!(months.is_empty());
    }
}
