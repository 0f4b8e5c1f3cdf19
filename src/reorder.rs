//! # Reorder Predictor
//!
//! Converts one month's inventory levels and usage into days of stock left and
//! a re-order urgency.
//!
//! Only ingredients that have both an inventory level and a positive usage are
//! predicted. Without consumption there is no rate to divide by, so idle
//! ingredients are left out instead of being reported with a sentinel value.

use crate::engine_config::{AVG_DAYS_IN_MONTH, REORDER_THRESHOLD_DAYS};
use crate::inventory_model::{IngredientUsage, InventoryLevel, ReorderPrediction, ReorderStatus};
use log::debug;
use std::collections::HashMap;

/// Calendar and lead-time assumptions of the prediction
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPolicy {
    /// Days a month of usage is spread over
    pub days_in_month: f64,
    /// Below this many days left an ingredient must be re-ordered
    pub threshold_days: f64,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            days_in_month: AVG_DAYS_IN_MONTH,
            threshold_days: REORDER_THRESHOLD_DAYS,
        }
    }
}

impl ReorderPolicy {
    /// Prediction for a single ingredient, `None` without positive usage
    pub fn predict(&self, level: &InventoryLevel, monthly_usage: f64) -> Option<ReorderPrediction> {
        if monthly_usage.is_nan() || monthly_usage <= 0.0 {
            return None;
        }

        let end_of_month_stock = level.net.max(0.0);
        let avg_daily_usage = monthly_usage / self.days_in_month;
        let days_left = if avg_daily_usage > 0.0 {
            end_of_month_stock / avg_daily_usage
        } else {
            f64::INFINITY
        };
        let status = if days_left < self.threshold_days {
            ReorderStatus::ReorderNow
        } else {
            ReorderStatus::SufficientStock
        };

        Some(ReorderPrediction {
            name: level.name.clone(),
            end_of_month_stock,
            avg_daily_usage,
            days_left,
            status,
        })
    }
}

/// Re-order predictions for one month, closest to stock-out first
///
/// Ties keep the order of `levels` (sorted by name); infinite days sort last.
///
/// # Examples
///
/// ```rust
/// use inventory_intelligence::inventory_model::{IngredientUsage, InventoryLevel, ReorderStatus};
/// use inventory_intelligence::reorder::{predict_reorders, ReorderPolicy};
///
/// let levels = vec![InventoryLevel::new("Beef", 210.0, 210.0)];
/// let usage = vec![IngredientUsage { name: "Beef".to_string(), usage: 210.0 }];
///
/// let predictions = predict_reorders(&levels, &usage, &ReorderPolicy::default());
/// assert_eq!(predictions[0].avg_daily_usage, 7.0);
/// assert_eq!(predictions[0].days_left, 0.0);
/// assert_eq!(predictions[0].status, ReorderStatus::ReorderNow);
/// ```
pub fn predict_reorders(
    levels: &[InventoryLevel],
    usage: &[IngredientUsage],
    policy: &ReorderPolicy,
) -> Vec<ReorderPrediction> {
    let usage_by_name: HashMap<&str, f64> = usage
        .iter()
        .map(|u| (u.name.as_str(), u.usage))
        .collect();

    let mut predictions: Vec<ReorderPrediction> = levels
        .iter()
        .filter_map(|level| {
            let monthly_usage = usage_by_name.get(level.name.as_str()).copied()?;
            policy.predict(level, monthly_usage)
        })
        .collect();
    predictions.sort_by(|a, b| a.days_left.total_cmp(&b.days_left));

    debug!(
        "Predicted {} re-orders, {} urgent",
        predictions.len(),
        predictions.iter().filter(|p| p.needs_reorder()).count()
    );
    predictions
}
