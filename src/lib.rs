//! # Inventory Intelligence
//!
//! Inventory calculation and re-order prediction for a restaurant. Recipe,
//! shipment and sales tables are turned into monthly ingredient usage,
//! purchased/used/net inventory levels and re-order urgency, with optional
//! demand forecasts and inventory analyses from external collaborators.
//!
//! The calculation is a pure function of the three inputs:
//!
//! ```text
//! tabular -> ingestion -> purchases ─┐
//!                      -> usage ─────┴-> inventory_levels -> reorder
//! ```
//!
//! [`dashboard::InventoryDashboard`] holds one session of inputs, derived data
//! and collaborator results.

pub mod collaborators;
pub mod dashboard;
pub mod engine_config;
pub mod engine_errors;
pub mod gemini;
pub mod ingestion;
pub mod inventory_levels;
pub mod inventory_model;
pub mod localization;
pub mod normalizer;
pub mod pipeline;
pub mod purchases;
pub mod reorder;
pub mod sample_data;
pub mod tabular;
pub mod trend_forecast;
pub mod usage;
