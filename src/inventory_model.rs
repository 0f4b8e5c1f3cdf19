//! # Inventory Data Model
//!
//! Records produced by ingestion (recipes, shipments, monthly sales) and the
//! values derived from them by the calculation pipeline (usage, inventory
//! levels, re-order predictions).
//!
//! ## Core Concepts
//!
//! - **Recipe**: a menu item and the quantity of each ingredient per unit sold
//! - **Shipment**: one supplier line: quantity per shipment, unit, count and frequency
//! - **MonthlySales**: units sold per menu item for one month
//! - **InventoryLevel**: purchased, used and net quantity of an ingredient for a month
//! - **ReorderPrediction**: days of stock left and the resulting urgency
//!
//! Ingested records are immutable once built; derived records are recomputed
//! from scratch whenever an input changes.
//!
//! ## Usage
//!
//! ```rust
//! use inventory_intelligence::inventory_model::{InventoryLevel, Recipe};
//!
//! let pizza = Recipe::new("Pizza")
//!     .with_ingredient("Dough", 0.25)
//!     .with_ingredient("Tomatoes", 0.2);
//! assert_eq!(pizza.quantity_of("Dough"), Some(0.25));
//!
//! let level = InventoryLevel::new("Dough", 100.0, 125.0);
//! assert_eq!(level.net, -25.0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Forecasted quantity per ingredient for the next month
pub type Forecast = BTreeMap<String, f64>;

/// Bill of materials for one menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Menu item name, as it appears in the sales tables
    pub item_name: String,

    /// Canonical ingredient name → quantity per unit sold (always > 0)
    pub ingredients: BTreeMap<String, f64>,
}

impl Recipe {
    /// Create a recipe without ingredients
    pub fn new(item_name: &str) -> Self {
        Self {
            item_name: item_name.to_string(),
            ingredients: BTreeMap::new(),
        }
    }

    /// Add an ingredient quantity; non-positive or non-finite quantities are ignored
    pub fn with_ingredient(mut self, ingredient: &str, quantity: f64) -> Self {
        if quantity.is_finite() && quantity > 0.0 {
            self.ingredients.insert(ingredient.to_string(), quantity);
        }
        self
    }

    /// Quantity of an ingredient per unit sold
    pub fn quantity_of(&self, ingredient: &str) -> Option<f64> {
        self.ingredients.get(ingredient).copied()
    }
}

/// How often a shipment arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    /// Anything else; kept on the record but projects no purchases
    Unknown,
}

impl Frequency {
    /// Classify a raw frequency cell (trimmed, case-insensitive)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Unknown,
        }
    }

    /// Lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit label that triggers pound → gram conversion
pub const POUNDS_UNIT: &str = "lbs";

/// One ingredient/supplier line of the shipment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Canonical ingredient name
    pub ingredient: String,

    /// Quantity delivered per shipment, in `unit`
    pub quantity_per_shipment: f64,

    /// Shipment unit (`lbs` or anything else, passed through unconverted)
    pub unit: String,

    /// Number of shipments per frequency period
    pub shipments_per_period: i64,

    /// Frequency class
    pub frequency: Frequency,
}

impl Shipment {
    /// Whether quantities are in pounds
    pub fn is_pounds(&self) -> bool {
        self.unit == POUNDS_UNIT
    }
}

/// Units sold per menu item for one month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlySales {
    /// Month key, e.g. "January"
    pub month: String,

    /// Menu item name → units sold
    pub sales: BTreeMap<String, i64>,
}

impl MonthlySales {
    /// Create an empty month
    pub fn new(month: &str) -> Self {
        Self {
            month: month.to_string(),
            sales: BTreeMap::new(),
        }
    }

    /// Record units sold for an item
    pub fn with_sale(mut self, item_name: &str, units: i64) -> Self {
        self.sales.insert(item_name.to_string(), units);
        self
    }

    /// Units sold for an item, 0 when the item is absent
    pub fn units_sold(&self, item_name: &str) -> i64 {
        self.sales.get(item_name).copied().unwrap_or(0)
    }

    /// Total units sold over every item, saturating at `i64::MAX`
    pub fn total_units(&self) -> i64 {
        self.sales
            .values()
            .fold(0i64, |total, units| total.saturating_add(*units))
    }
}

/// Sales for every known month, in the order the months were first added
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesData {
    months: Vec<MonthlySales>,
}

impl SalesData {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { months: Vec::new() }
    }

    /// Add a month, replacing the month with the same key if present
    ///
    /// Returns `true` when the month key was not known before.
    pub fn upsert(&mut self, month: MonthlySales) -> bool {
        match self.months.iter_mut().find(|m| m.month == month.month) {
            Some(existing) => {
                *existing = month;
                false
            }
            None => {
                self.months.push(month);
                true
            }
        }
    }

    /// Sales for a month
    pub fn get(&self, month: &str) -> Option<&MonthlySales> {
        self.months.iter().find(|m| m.month == month)
    }

    /// Month keys in insertion order
    pub fn month_names(&self) -> Vec<String> {
        self.months.iter().map(|m| m.month.clone()).collect()
    }

    /// Iterate over months in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &MonthlySales> {
        self.months.iter()
    }

    /// Number of months
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Whether no month is known
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl FromIterator<MonthlySales> for SalesData {
    fn from_iter<T: IntoIterator<Item = MonthlySales>>(iter: T) -> Self {
        let mut data = SalesData::new();
        for month in iter {
            data.upsert(month);
        }
        data
    }
}

/// Total consumption of one ingredient in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientUsage {
    pub name: String,
    pub usage: f64,
}

/// Purchased, used and net quantity of an ingredient for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub name: String,
    pub purchased: f64,
    pub used: f64,
    /// `purchased - used`; negative when usage exceeded projected purchases
    pub net: f64,
}

impl InventoryLevel {
    /// Build a level, deriving `net`
    pub fn new(name: &str, purchased: f64, used: f64) -> Self {
        Self {
            name: name.to_string(),
            purchased,
            used,
            net: purchased - used,
        }
    }
}

impl fmt::Display for InventoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.net > 0.0 { "+" } else { "" };
        write!(
            f,
            "{}: {}{:.0} net (purchased {:.0}, used {:.0})",
            self.name, sign, self.net, self.purchased, self.used
        )
    }
}

/// Urgency classification of a re-order prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderStatus {
    #[serde(rename = "Re-order Now")]
    ReorderNow,
    #[serde(rename = "Sufficient Stock")]
    SufficientStock,
}

impl ReorderStatus {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ReorderStatus::ReorderNow => "Re-order Now",
            ReorderStatus::SufficientStock => "Sufficient Stock",
        }
    }
}

impl fmt::Display for ReorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Days-of-stock estimate for one ingredient at the end of a month
///
/// Values are stored unrounded; rounding only happens when displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPrediction {
    pub name: String,
    /// Net stock floored at zero
    pub end_of_month_stock: f64,
    /// Monthly usage spread over the days of the month
    pub avg_daily_usage: f64,
    /// Days until stock-out; `f64::INFINITY` without consumption
    pub days_left: f64,
    pub status: ReorderStatus,
}

impl ReorderPrediction {
    /// Whether the ingredient has to be re-ordered now
    pub fn needs_reorder(&self) -> bool {
        self.status == ReorderStatus::ReorderNow
    }

    /// Whole days left, `None` when infinite
    pub fn whole_days_left(&self) -> Option<i64> {
        self.days_left
            .is_finite()
            .then(|| self.days_left.floor() as i64)
    }
}

impl fmt::Display for ReorderPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = match self.whole_days_left() {
            Some(days) => days.to_string(),
            None => "N/A".to_string(),
        };
        write!(
            f,
            "{}: {:.0} left, {:.2}/day, {} days ({})",
            self.name, self.end_of_month_stock, self.avg_daily_usage, days, self.status
        )
    }
}

/// Derived data for one month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyData {
    /// Usage of every ingredient consumed that month, sorted by name
    pub ingredient_usage: Vec<IngredientUsage>,
    /// Levels of every shipped ingredient, sorted by name
    pub inventory_levels: Vec<InventoryLevel>,
}

impl MonthlyData {
    /// Usage as a name → quantity mapping
    pub fn usage_map(&self) -> BTreeMap<String, f64> {
        self.ingredient_usage
            .iter()
            .map(|u| (u.name.clone(), u.usage))
            .collect()
    }
}

/// One row of a sales-detail table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesDetail {
    pub name: String,
    pub count: i64,
    pub amount: f64,
}

/// Which sales-detail table a row set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesDetailView {
    Item,
    Category,
    Group,
}

impl SalesDetailView {
    /// Header of the name column for this view
    pub fn name_header(&self) -> &'static str {
        match self {
            SalesDetailView::Item => "Item Name",
            SalesDetailView::Category => "Category",
            SalesDetailView::Group => "Group",
        }
    }
}

/// The three sales-detail views of one month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlySalesDetails {
    pub by_item: Vec<SalesDetail>,
    pub by_category: Vec<SalesDetail>,
    pub by_group: Vec<SalesDetail>,
}

impl MonthlySalesDetails {
    /// Revenue over every item row
    pub fn total_amount(&self) -> f64 {
        self.by_item.iter().map(|d| d.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_ignores_non_positive_quantities() {
        let recipe = Recipe::new("Beef Ramen")
            .with_ingredient("Beef", 140.0)
            .with_ingredient("Egg", 0.0)
            .with_ingredient("Rice", f64::NAN);

        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.quantity_of("Beef"), Some(140.0));
        assert_eq!(recipe.quantity_of("Egg"), None);
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::parse(" Weekly "), Frequency::Weekly);
        assert_eq!(Frequency::parse("BIWEEKLY"), Frequency::Biweekly);
        assert_eq!(Frequency::parse("monthly"), Frequency::Monthly);
        assert_eq!(Frequency::parse("daily"), Frequency::Unknown);
        assert_eq!(Frequency::parse(""), Frequency::Unknown);
    }

    #[test]
    fn test_sales_data_upsert_keeps_order_and_overrides() {
        let mut data = SalesData::new();
        assert!(data.upsert(MonthlySales::new("January").with_sale("Pizza", 10)));
        assert!(data.upsert(MonthlySales::new("February").with_sale("Pizza", 20)));
        assert!(!data.upsert(MonthlySales::new("January").with_sale("Pizza", 99)));

        assert_eq!(data.month_names(), vec!["January", "February"]);
        assert_eq!(data.get("January").unwrap().units_sold("Pizza"), 99);
        assert_eq!(data.get("January").unwrap().units_sold("Pasta"), 0);
    }

    #[test]
    fn test_inventory_level_keeps_negative_net() {
        let level = InventoryLevel::new("Beef", 1000.0, 1500.25);
        assert_eq!(level.net, -500.25);
        assert_eq!(level.to_string(), "Beef: -500 net (purchased 1000, used 1500)");
    }

    #[test]
    fn test_reorder_prediction_display() {
        let prediction = ReorderPrediction {
            name: "Rice".to_string(),
            end_of_month_stock: 1234.6,
            avg_daily_usage: 7.456,
            days_left: 165.6,
            status: ReorderStatus::SufficientStock,
        };
        assert_eq!(
            prediction.to_string(),
            "Rice: 1235 left, 7.46/day, 165 days (Sufficient Stock)"
        );

        let idle = ReorderPrediction {
            days_left: f64::INFINITY,
            ..prediction
        };
        assert_eq!(idle.whole_days_left(), None);
        assert!(idle.to_string().contains("N/A days"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ReorderStatus::ReorderNow).unwrap();
        assert_eq!(json, "\"Re-order Now\"");
    }
}
