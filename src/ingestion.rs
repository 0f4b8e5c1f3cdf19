//! # Table Ingestion
//!
//! Builds recipes, shipments, monthly sales and sales-detail rows from
//! delimited text tables. The first row of every table is a header.
//!
//! Ingestion never fails: a malformed row or cell contributes nothing instead
//! of aborting the table, so a bad line only means fewer entries.
//!
//! ## Usage
//!
//! ```rust
//! use inventory_intelligence::ingestion::parse_recipes;
//! use inventory_intelligence::normalizer::SynonymTable;
//!
//! let csv = "Item name,Braised Pork(g),Egg(count),Rice(g)\nPork Fried Rice,100,1,350";
//! let recipes = parse_recipes(csv, &SynonymTable::default());
//!
//! assert_eq!(recipes[0].item_name, "Pork Fried Rice");
//! assert_eq!(recipes[0].quantity_of("Pork"), Some(100.0));
//! assert_eq!(recipes[0].quantity_of("Rice"), Some(350.0));
//! ```

use crate::inventory_model::{
    Frequency, MonthlySales, Recipe, SalesDetail, SalesDetailView, Shipment, POUNDS_UNIT,
};
use crate::normalizer::SynonymTable;
use crate::purchases::PurchaseConversion;
use crate::tabular::{cell, parse_table};
use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use regex::Regex;

// Shipment table column layout
const SHIPMENT_INGREDIENT: usize = 0;
const SHIPMENT_QUANTITY: usize = 1;
const SHIPMENT_UNIT: usize = 2;
const SHIPMENT_COUNT: usize = 3;
const SHIPMENT_FREQUENCY: usize = 4;

pub const COUNT_HEADER: &str = "Count";
pub const AMOUNT_HEADER: &str = "Amount";

lazy_static! {
    // Everything that cannot be part of a plain decimal number ("$3,990" -> "3990")
    static ref NON_NUMERIC: Regex =
        Regex::new(r"[^0-9.\-]+").expect("Amount cleaning pattern should be valid");

    // Trailing unit in parentheses: "Dough (lbs)" -> "Dough", "lbs"
    static ref HEADER_UNIT: Regex =
        Regex::new(r"^(.*?)\s*\(\s*([^()]*?)\s*\)\s*$").expect("Header unit pattern should be valid");
}

/// Parse the recipe table with the default unit conversion
///
/// See [`parse_recipes_with_conversion`].
pub fn parse_recipes(text: &str, synonyms: &SynonymTable) -> Vec<Recipe> {
    parse_recipes_with_conversion(text, synonyms, &PurchaseConversion::default())
}

/// Parse the recipe table
///
/// The first header names the item column; every other header is an ingredient,
/// normalized through `synonyms`. A cell becomes an ingredient entry only when it
/// is a finite number greater than zero, so blank and zero cells are absent
/// rather than stored as zero.
///
/// A header ending in `(lbs)` names the ingredient without the unit, and its
/// cells are converted to grams with the same factor as `lbs` shipments. Other
/// suffixes such as `(g)` or `(pcs)` are left to the synonym table.
pub fn parse_recipes_with_conversion(
    text: &str,
    synonyms: &SynonymTable,
    conversion: &PurchaseConversion,
) -> Vec<Recipe> {
    let rows = parse_table(text);
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let ingredient_columns: Vec<(String, f64)> = header
        .iter()
        .skip(1)
        .map(|h| recipe_column(h, synonyms, conversion))
        .collect();

    let mut recipes: Vec<Recipe> = Vec::new();
    for row in data {
        let item_name = cell(row, 0).unwrap_or("").trim();
        if item_name.is_empty() {
            trace!("Skipping recipe row without item name: {:?}", row);
            continue;
        }

        let recipe = ingredient_columns
            .iter()
            .enumerate()
            .filter_map(|(index, (ingredient, factor))| {
                cell(row, index + 1)
                    .and_then(parse_positive_quantity)
                    .map(|quantity| (ingredient, quantity * factor))
            })
            .fold(Recipe::new(item_name), |recipe, (ingredient, quantity)| {
                // Two headers folding into one canonical name add up
                let total = recipe.quantity_of(ingredient).unwrap_or(0.0) + quantity;
                recipe.with_ingredient(ingredient, total)
            });

        match recipes.iter_mut().find(|r| r.item_name == recipe.item_name) {
            Some(existing) => {
                debug!("Recipe '{}' defined twice, keeping the later row", item_name);
                *existing = recipe;
            }
            None => recipes.push(recipe),
        }
    }

    info!("Parsed {} recipes", recipes.len());
    recipes
}

/// Canonical ingredient name and base-unit factor of a recipe header
fn recipe_column(header: &str, synonyms: &SynonymTable, conversion: &PurchaseConversion) -> (String, f64) {
    let header = header.trim();
    if let Some(caps) = HEADER_UNIT.captures(header) {
        if &caps[2] == POUNDS_UNIT && !caps[1].is_empty() {
            trace!("Recipe column '{}' is in {}", &caps[1], POUNDS_UNIT);
            return (synonyms.normalize(&caps[1]), conversion.unit_factor(POUNDS_UNIT));
        }
    }
    (synonyms.normalize(header), 1.0)
}

/// Parse the shipment table
///
/// Fixed layout: ingredient, quantity per shipment, unit, shipment count,
/// frequency. Unknown frequencies are kept as [`Frequency::Unknown`];
/// non-numeric quantity or count cells count as zero.
pub fn parse_shipments(text: &str, synonyms: &SynonymTable) -> Vec<Shipment> {
    let rows = parse_table(text);

    let shipments: Vec<Shipment> = rows
        .iter()
        .skip(1)
        .filter_map(|row| {
            let ingredient = cell(row, SHIPMENT_INGREDIENT).unwrap_or("").trim();
            if ingredient.is_empty() {
                trace!("Skipping shipment row without ingredient: {:?}", row);
                return None;
            }

            let frequency = Frequency::parse(cell(row, SHIPMENT_FREQUENCY).unwrap_or(""));
            if frequency == Frequency::Unknown {
                debug!("Shipment of '{}' has an unknown frequency", ingredient);
            }

            Some(Shipment {
                ingredient: synonyms.normalize(ingredient),
                quantity_per_shipment: cell(row, SHIPMENT_QUANTITY)
                    .and_then(parse_number)
                    .unwrap_or(0.0),
                unit: cell(row, SHIPMENT_UNIT).unwrap_or("").trim().to_string(),
                shipments_per_period: cell(row, SHIPMENT_COUNT)
                    .and_then(parse_integer)
                    .unwrap_or(0),
                frequency,
            })
        })
        .collect();

    info!("Parsed {} shipments", shipments.len());
    shipments
}

/// Parse one month of the two-column sales table (item name, units sold)
///
/// Rows with an empty name or a zero/unparsable count are skipped. A later row
/// for the same item replaces the earlier one.
pub fn parse_sales(month: &str, text: &str) -> MonthlySales {
    let rows = parse_table(text);

    let sales = rows
        .iter()
        .skip(1)
        .filter_map(|row| {
            let name = cell(row, 0)?.trim();
            let units = cell(row, 1).and_then(parse_integer)?;
            (!name.is_empty() && units != 0).then(|| (name.to_string(), units))
        })
        .fold(MonthlySales::new(month), |sales, (name, units)| {
            sales.with_sale(&name, units)
        });

    debug!("Parsed {} sales rows for {}", sales.sales.len(), month);
    sales
}

/// Parse one of the three sales-detail tables (`Name`, `Count`, `Amount`)
///
/// Columns are found by header; when one of them is missing nothing is
/// returned. Counts may carry thousands separators and amounts may be currency
/// formatted (`"$3,990"`). Rows without a name or without a positive amount are
/// dropped.
///
/// # Examples
///
/// ```rust
/// use inventory_intelligence::ingestion::parse_sales_details;
/// use inventory_intelligence::inventory_model::SalesDetailView;
///
/// let csv = "Group,Count,Amount\nAll Day Menu,\"5,100\",\"$38,000\"";
/// let details = parse_sales_details(csv, SalesDetailView::Group);
///
/// assert_eq!(details[0].name, "All Day Menu");
/// assert_eq!(details[0].count, 5100);
/// assert_eq!(details[0].amount, 38000.0);
/// ```
pub fn parse_sales_details(text: &str, view: SalesDetailView) -> Vec<SalesDetail> {
    let rows = parse_table(text);
    if rows.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = rows[0]
        .iter()
        .map(|h| h.trim().trim_matches('"').to_string())
        .collect();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let (Some(name_index), Some(count_index), Some(amount_index)) = (
        position(view.name_header()),
        position(COUNT_HEADER),
        position(AMOUNT_HEADER),
    ) else {
        warn!(
            "Could not find required headers ('{}', '{}', '{}') in sales detail table",
            view.name_header(),
            COUNT_HEADER,
            AMOUNT_HEADER
        );
        return Vec::new();
    };

    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let name = cell(row, name_index)?.replace('"', "").trim().to_string();
            let amount = clean_amount(cell(row, amount_index).unwrap_or(""))?;
            if name.is_empty() || !amount.is_finite() || amount <= 0.0 {
                return None;
            }
            Some(SalesDetail {
                name,
                count: clean_count(cell(row, count_index).unwrap_or("")),
                amount,
            })
        })
        .collect()
}

/// Parse a currency-formatted amount, `None` when nothing numeric is left
pub fn clean_amount(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(0.0);
    }
    NON_NUMERIC.replace_all(raw, "").parse::<f64>().ok()
}

/// Parse a count with thousands separators, 0 when unparsable
pub fn clean_count(raw: &str) -> i64 {
    parse_integer(&raw.replace(',', "")).unwrap_or(0)
}

/// Finite number strictly greater than zero
fn parse_positive_quantity(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|value| *value > 0.0)
}

/// Finite number
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Integer, also accepted in float notation (`12.0`, `1e3`)
///
/// Fractional values and values outside the `i64` range are rejected rather
/// than truncated or saturated.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        parse_number(raw)
            .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
            .map(|value| value as i64)
    })
}
