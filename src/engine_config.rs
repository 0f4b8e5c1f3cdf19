//! # Engine Configuration Module
//!
//! Fixed constants of the inventory calculation, the aggregated
//! [`EngineConfig`] handed to the pipeline, and the environment-driven
//! [`AppConfig`] used by the binary.

use crate::normalizer::SynonymTable;
use crate::purchases::PurchaseConversion;
use crate::reorder::ReorderPolicy;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

// Constants for the purchase projection
pub const LBS_TO_GRAMS: f64 = 453.592;
pub const WEEKLY_MULTIPLIER: f64 = 4.33;
pub const BIWEEKLY_MULTIPLIER: f64 = 2.16;
pub const MONTHLY_MULTIPLIER: f64 = 1.0;

// Constants for re-order prediction
pub const AVG_DAYS_IN_MONTH: f64 = 30.0;
pub const REORDER_THRESHOLD_DAYS: f64 = 7.0; // Assumed lead time for shipments

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_COLLABORATOR_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Everything the calculation pipeline needs besides its three inputs
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Ingredient synonym table
    pub synonyms: SynonymTable,
    /// Frequency multipliers and unit conversion for shipments
    pub conversion: PurchaseConversion,
    /// Days-per-month and lead-time threshold
    pub reorder: ReorderPolicy,
}

/// Binary configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key; forecasting falls back to the local trend model without it
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Directory with `recipes.csv`, `shipments.csv` and `<Month>_sales.csv` files
    pub data_dir: Option<PathBuf>,
    /// Month to select after loading
    pub selected_month: Option<String>,
    /// Optional JSON synonym table replacing the default one
    pub synonyms_path: Option<PathBuf>,
    /// Language for user-visible messages
    pub language: String,
    /// Timeout for every collaborator call in seconds
    pub collaborator_timeout_secs: u64,
    /// Lead-time threshold override in days
    pub reorder_threshold_days: f64,
    /// Emit JSON log lines instead of text
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            data_dir: None,
            selected_month: None,
            synonyms_path: None,
            language: DEFAULT_LANGUAGE.to_string(),
            collaborator_timeout_secs: DEFAULT_COLLABORATOR_TIMEOUT_SECS,
            reorder_threshold_days: REORDER_THRESHOLD_DAYS,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables
    ///
    /// Unset or empty variables keep their defaults; malformed numbers are errors.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let collaborator_timeout_secs = match non_empty_var("COLLABORATOR_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("COLLABORATOR_TIMEOUT_SECS is not a number: {value}"))?,
            None => defaults.collaborator_timeout_secs,
        };

        let reorder_threshold_days = match non_empty_var("REORDER_THRESHOLD_DAYS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("REORDER_THRESHOLD_DAYS is not a number: {value}"))?,
            None => defaults.reorder_threshold_days,
        };

        Ok(Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            data_dir: non_empty_var("INVENTORY_DATA_DIR").map(PathBuf::from),
            selected_month: non_empty_var("INVENTORY_MONTH"),
            synonyms_path: non_empty_var("INVENTORY_SYNONYMS").map(PathBuf::from),
            language: non_empty_var("INVENTORY_LANGUAGE").unwrap_or(defaults.language),
            collaborator_timeout_secs,
            reorder_threshold_days,
            json_logs: non_empty_var("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Engine configuration derived from this application configuration
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let synonyms = match &self.synonyms_path {
            Some(path) => SynonymTable::from_json_file(path)?,
            None => SynonymTable::default(),
        };

        Ok(EngineConfig {
            synonyms,
            conversion: PurchaseConversion::default(),
            reorder: ReorderPolicy {
                threshold_days: self.reorder_threshold_days,
                ..ReorderPolicy::default()
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.conversion.lbs_to_grams, LBS_TO_GRAMS);
        assert_eq!(config.conversion.weekly, WEEKLY_MULTIPLIER);
        assert_eq!(config.reorder.days_in_month, AVG_DAYS_IN_MONTH);
        assert_eq!(config.reorder.threshold_days, REORDER_THRESHOLD_DAYS);
        assert!(!config.synonyms.is_empty());
    }

    #[test]
    fn test_app_config_engine_threshold_override() {
        let app = AppConfig {
            reorder_threshold_days: 10.0,
            ..AppConfig::default()
        };
        let engine = app.engine_config().unwrap();
        assert_eq!(engine.reorder.threshold_days, 10.0);
        assert_eq!(engine.reorder.days_in_month, AVG_DAYS_IN_MONTH);
    }

    #[test]
    fn test_missing_synonym_file_is_an_error() {
        let app = AppConfig {
            synonyms_path: Some(PathBuf::from("/nonexistent/synonyms.json")),
            ..AppConfig::default()
        };
        assert!(app.engine_config().is_err());
    }
}
