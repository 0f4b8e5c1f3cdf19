//! # Pipeline Tests
//!
//! End-to-end tests of the calculation pipeline: text tables in, inventory
//! levels and re-order predictions out.

mod common;

use inventory_intelligence::engine_config::{EngineConfig, LBS_TO_GRAMS, WEEKLY_MULTIPLIER};
use inventory_intelligence::ingestion::{parse_recipes, parse_sales, parse_shipments};
use inventory_intelligence::inventory_model::{ReorderStatus, SalesData};
use inventory_intelligence::normalizer::SynonymTable;
use inventory_intelligence::pipeline::calculate_all_months;
use inventory_intelligence::purchases::project_monthly_purchases;
use inventory_intelligence::reorder::predict_reorders;
use inventory_intelligence::sample_data;

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

#[test]
fn test_pizza_scenario_uses_one_unit_system() {
    let config = EngineConfig::default();
    let recipes = common::pizza_recipes();
    let shipments = parse_shipments(common::PIZZA_SHIPMENTS_CSV, &config.synonyms);
    let sales: SalesData = vec![common::pizza_sales("January", 100)].into_iter().collect();

    let months = calculate_all_months(&sales, &recipes, &shipments, &config.conversion);
    let january = &months["January"];

    let usage = january.usage_map();
    assert_eq!(usage.len(), 2);
    assert!(approx(usage["Dough"], 25.0));
    assert!(approx(usage["Tomatoes"], 20.0));

    let dough = &january.inventory_levels[0];
    let tomatoes = &january.inventory_levels[1];
    assert_eq!(dough.name, "Dough");
    assert!(approx(dough.purchased, 50.0 * 2.0 * WEEKLY_MULTIPLIER * LBS_TO_GRAMS));
    assert!(approx(tomatoes.purchased, 30.0 * LBS_TO_GRAMS));

    // Gram recipe quantities meet converted shipments on the same key
    assert!(approx(dough.used, 25.0));
    assert!(approx(tomatoes.used, 20.0));
}

#[test]
fn test_pound_recipe_and_pound_shipment_meet_in_grams() {
    let config = EngineConfig::default();
    let recipes = parse_recipes("Item name,Dough (lbs)\nPizza,0.25", &config.synonyms);
    let shipments = parse_shipments(common::PIZZA_SHIPMENTS_CSV, &config.synonyms);
    let sales: SalesData = vec![common::pizza_sales("January", 100)].into_iter().collect();

    let months = calculate_all_months(&sales, &recipes, &shipments, &config.conversion);
    let dough = months["January"]
        .inventory_levels
        .iter()
        .find(|level| level.name == "Dough")
        .unwrap();

    // 25 lbs used against 433 lbs bought, both expressed in grams
    assert!(approx(dough.used, 25.0 * LBS_TO_GRAMS));
    assert!(approx(dough.purchased, 100.0 * WEEKLY_MULTIPLIER * LBS_TO_GRAMS));
    assert!(approx(dough.purchased / dough.used, 4.0 * WEEKLY_MULTIPLIER));
    assert!(!months["January"].usage_map().contains_key("Dough (lbs)"));
}

#[test]
fn test_pizza_predictions() {
    let config = EngineConfig::default();
    let shipments = parse_shipments(common::PIZZA_SHIPMENTS_CSV, &config.synonyms);
    let sales: SalesData = vec![common::pizza_sales("January", 100)].into_iter().collect();
    let months = calculate_all_months(&sales, &common::pizza_recipes(), &shipments, &config.conversion);
    let january = &months["January"];

    let predictions = predict_reorders(&january.inventory_levels, &january.ingredient_usage, &config.reorder);

    assert_eq!(predictions.len(), 2);
    // Tomatoes: 13587.76 g left at 2/3 g a day
    assert_eq!(predictions[0].name, "Tomatoes");
    assert!(approx(predictions[0].avg_daily_usage, 20.0 / 30.0));
    assert!(predictions.iter().all(|p| p.status == ReorderStatus::SufficientStock));
}

#[test]
fn test_sample_data_march_reorders() {
    let config = EngineConfig::default();
    let tables = sample_data::tables();
    let recipes = parse_recipes(tables.recipes, &config.synonyms);
    let shipments = parse_shipments(tables.shipments, &config.synonyms);
    let sales: SalesData = tables
        .sales
        .iter()
        .map(|(month, text)| parse_sales(month, text))
        .collect();

    let months = calculate_all_months(&sales, &recipes, &shipments, &config.conversion);
    assert_eq!(months.len(), 3);

    let march = &months["March"];
    let usage = march.usage_map();
    assert!(approx(usage["Beef"], 93_800.0));
    // Braised chicken and chicken thigh share the "Chicken" name
    assert!(approx(usage["Chicken"], 97_790.0));
    assert!(approx(usage["Egg"], 1_390.0));

    let predictions = predict_reorders(&march.inventory_levels, &march.ingredient_usage, &config.reorder);
    let urgent: Vec<&str> = predictions
        .iter()
        .filter(|p| p.needs_reorder())
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        urgent,
        vec!["Cilantro", "Rice", "Rice Noodles", "Tapioca Starch", "White onion", "Pickle Cabbage"]
    );

    let pickle = predictions.iter().find(|p| p.name == "Pickle Cabbage").unwrap();
    assert_eq!(pickle.whole_days_left(), Some(4));

    // Ties keep name order
    let last: Vec<&str> = predictions.iter().rev().take(2).map(|p| p.name.as_str()).collect();
    assert_eq!(last, vec!["Peas", "Carrot"]);
    assert_eq!(predictions.len(), 17);
}

#[test]
fn test_sample_data_january_tapioca_is_close_to_stock_out() {
    let config = EngineConfig::default();
    let tables = sample_data::tables();
    let recipes = parse_recipes(tables.recipes, &config.synonyms);
    let shipments = parse_shipments(tables.shipments, &config.synonyms);
    let sales: SalesData = vec![parse_sales("January", sample_data::JANUARY_SALES_CSV)]
        .into_iter()
        .collect();

    let months = calculate_all_months(&sales, &recipes, &shipments, &config.conversion);
    let january = &months["January"];
    let predictions = predict_reorders(&january.inventory_levels, &january.ingredient_usage, &config.reorder);

    let tapioca = predictions.iter().find(|p| p.name == "Tapioca Starch").unwrap();
    assert_eq!(tapioca.status, ReorderStatus::ReorderNow);
    assert!((tapioca.days_left - 5.4369).abs() < 1e-3);
    assert_eq!(tapioca.to_string(), "Tapioca Starch: 1740 left, 320.00/day, 5 days (Re-order Now)");
}

#[test]
fn test_purchases_from_synthetic_fixture_are_deterministic() {
    let shipments = common::synthetic_shipments(&["Basil", "Mozzarella", "Olive Oil"]);
    let first = project_monthly_purchases(&shipments, &EngineConfig::default().conversion);
    let second = project_monthly_purchases(
        &common::synthetic_shipments(&["Basil", "Mozzarella", "Olive Oil"]),
        &EngineConfig::default().conversion,
    );

    assert_eq!(first, second);
    assert!(first.values().all(|quantity| (30.0..=50.0).contains(quantity)));

    let purchase = common::synthetic_purchase(7);
    assert_eq!(purchase, common::synthetic_purchase(7));
    assert!((2.0..12.0).contains(&purchase.unit_cost));
}

#[test]
fn test_custom_synonym_table_changes_the_join() {
    let synonyms = SynonymTable::new([("dough (g)", "Dough"), ("tomato sauce", "Tomatoes")]).unwrap();
    let recipes = parse_recipes("Item name,Dough (g),Tomato Sauce\nPizza,250,80", &synonyms);
    let shipments = parse_shipments(
        "Ingredient,Quantity,Unit,Count,Frequency\nDough,5000,g,1,monthly\ntomato sauce,4000,g,1,monthly",
        &synonyms,
    );
    let sales: SalesData = vec![common::pizza_sales("May", 10)].into_iter().collect();

    let months = calculate_all_months(&sales, &recipes, &shipments, &EngineConfig::default().conversion);
    let levels = &months["May"].inventory_levels;

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].name, "Dough");
    assert_eq!(levels[0].net, 2500.0);
    assert_eq!(levels[1].name, "Tomatoes");
    assert_eq!(levels[1].net, 3200.0);
}
