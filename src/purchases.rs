//! # Purchase Projector
//!
//! Turns the shipment schedule into an expected monthly purchased quantity per
//! ingredient. The schedule is assumed constant, so the projection is the same
//! for every month until the shipment table changes.
//!
//! Shipments whose frequency is [`Frequency::Unknown`] use a multiplier of zero:
//! they stay visible in the inventory view with nothing purchased, instead of
//! being guessed at or rejected.

use crate::engine_config::{
    BIWEEKLY_MULTIPLIER, LBS_TO_GRAMS, MONTHLY_MULTIPLIER, WEEKLY_MULTIPLIER,
};
use crate::inventory_model::{Frequency, Shipment, POUNDS_UNIT};
use log::{debug, trace};
use std::collections::BTreeMap;

/// Frequency multipliers and unit conversion used by the projection
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseConversion {
    /// Shipments per month for a weekly schedule
    pub weekly: f64,
    /// Shipments per month for a biweekly schedule
    pub biweekly: f64,
    /// Shipments per month for a monthly schedule
    pub monthly: f64,
    /// Grams per pound
    pub lbs_to_grams: f64,
}

impl Default for PurchaseConversion {
    fn default() -> Self {
        Self {
            weekly: WEEKLY_MULTIPLIER,
            biweekly: BIWEEKLY_MULTIPLIER,
            monthly: MONTHLY_MULTIPLIER,
            lbs_to_grams: LBS_TO_GRAMS,
        }
    }
}

impl PurchaseConversion {
    /// Monthly multiplier of a frequency class
    pub fn multiplier(&self, frequency: Frequency) -> f64 {
        match frequency {
            Frequency::Weekly => self.weekly,
            Frequency::Biweekly => self.biweekly,
            Frequency::Monthly => self.monthly,
            Frequency::Unknown => 0.0,
        }
    }

    /// Base-unit factor of a unit: grams per pound for `lbs`, 1 otherwise
    pub fn unit_factor(&self, unit: &str) -> f64 {
        if unit.trim() == POUNDS_UNIT {
            self.lbs_to_grams
        } else {
            1.0
        }
    }

    /// Expected monthly quantity of a single shipment line, in base units
    pub fn monthly_quantity(&self, shipment: &Shipment) -> f64 {
        shipment.quantity_per_shipment
            * shipment.shipments_per_period as f64
            * self.multiplier(shipment.frequency)
            * self.unit_factor(&shipment.unit)
    }
}

/// Project monthly purchases per ingredient
///
/// Lines for the same ingredient are summed. Every shipped ingredient gets an
/// entry, including those whose lines all project to zero.
///
/// # Examples
///
/// ```rust
/// use inventory_intelligence::inventory_model::{Frequency, Shipment};
/// use inventory_intelligence::purchases::{project_monthly_purchases, PurchaseConversion};
///
/// let beef = Shipment {
///     ingredient: "Beef".to_string(),
///     quantity_per_shipment: 40.0,
///     unit: "lbs".to_string(),
///     shipments_per_period: 3,
///     frequency: Frequency::Weekly,
/// };
/// let purchases = project_monthly_purchases(&[beef], &PurchaseConversion::default());
/// assert!((purchases["Beef"] - 235_686.4).abs() < 0.01);
/// ```
pub fn project_monthly_purchases(
    shipments: &[Shipment],
    conversion: &PurchaseConversion,
) -> BTreeMap<String, f64> {
    let purchases = shipments.iter().fold(BTreeMap::new(), |mut acc, shipment| {
        let quantity = conversion.monthly_quantity(shipment);
        trace!(
            "Shipment of '{}' ({} x {} {}, {}) projects {}",
            shipment.ingredient,
            shipment.shipments_per_period,
            shipment.quantity_per_shipment,
            shipment.unit,
            shipment.frequency,
            quantity
        );
        *acc.entry(shipment.ingredient.clone()).or_insert(0.0) += quantity;
        acc
    });

    debug!(
        "Projected monthly purchases for {} ingredients from {} shipment lines",
        purchases.len(),
        shipments.len()
    );
    purchases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment(ingredient: &str, quantity: f64, unit: &str, count: i64, frequency: Frequency) -> Shipment {
        Shipment {
            ingredient: ingredient.to_string(),
            quantity_per_shipment: quantity,
            unit: unit.to_string(),
            shipments_per_period: count,
            frequency,
        }
    }

    #[test]
    fn test_weekly_pounds_converted_to_grams() {
        let purchases = project_monthly_purchases(
            &[shipment("Beef", 40.0, "lbs", 3, Frequency::Weekly)],
            &PurchaseConversion::default(),
        );
        let expected = 40.0 * 3.0 * 4.33 * 453.592;
        assert!((purchases["Beef"] - expected).abs() < 1e-6);
        assert!((purchases["Beef"] - 235_686.4).abs() < 0.01);
    }

    #[test]
    fn test_other_units_pass_through() {
        let purchases = project_monthly_purchases(
            &[
                shipment("Ramen", 50.0, "rolls", 15, Frequency::Biweekly),
                shipment("Egg", 120.0, "eggs", 5, Frequency::Monthly),
                shipment("Flour", 2.0, "LBS", 1, Frequency::Monthly),
            ],
            &PurchaseConversion::default(),
        );
        assert!((purchases["Ramen"] - 50.0 * 15.0 * 2.16).abs() < 1e-9);
        assert_eq!(purchases["Egg"], 600.0);
        // unit match is exact
        assert_eq!(purchases["Flour"], 2.0);
    }

    #[test]
    fn test_unknown_frequency_projects_zero_but_is_listed() {
        let purchases = project_monthly_purchases(
            &[shipment("Cilantro", 5.0, "lbs", 2, Frequency::Unknown)],
            &PurchaseConversion::default(),
        );
        assert_eq!(purchases.get("Cilantro"), Some(&0.0));
    }

    #[test]
    fn test_lines_for_same_ingredient_are_summed() {
        let purchases = project_monthly_purchases(
            &[
                shipment("Chicken", 10.0, "kg", 1, Frequency::Monthly),
                shipment("Chicken", 5.0, "kg", 2, Frequency::Monthly),
            ],
            &PurchaseConversion::default(),
        );
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases["Chicken"], 20.0);
    }

    #[test]
    fn test_custom_multipliers() {
        let conversion = PurchaseConversion {
            weekly: 4.0,
            ..PurchaseConversion::default()
        };
        let line = shipment("Peas", 1.0, "bags", 1, Frequency::Weekly);
        assert_eq!(conversion.monthly_quantity(&line), 4.0);
    }
}
