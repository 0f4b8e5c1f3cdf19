//! # Inventory Dashboard Session
//!
//! Holds the ingested inputs of one session (recipes, shipments, per-month
//! sales and sales details), the data derived from them, and the results of the
//! external collaborators.
//!
//! ## State model
//!
//! - Derived data is recomputed wholesale whenever an input changes, never
//!   patched in place.
//! - Months keep the order in which they were first added; the latest one is
//!   selected after loading and after an upload.
//! - A failed operation leaves exactly one localized message in [`error`] and
//!   does not touch any previously derived data.
//! - Forecasts and analyses are tagged with the month they were requested
//!   for and only returned while that month is still selected.
//!
//! ## Concurrency
//!
//! Collaborator calls are split into a `begin_*` step that builds the request
//! and marks the operation as outstanding, and a `finish_*` step that applies
//! the result. Callers sharing the session behind a lock can release it while
//! the collaborator runs. A second request of the same kind while one is
//! outstanding is rejected. Every call is bounded by a timeout.
//!
//! [`error`]: InventoryDashboard::error

use crate::collaborators::{
    next_month_name, AnalysisRequest, ForecastProvider, ForecastRequest, ForecastResponse,
    InventoryAnalyst, MonthlyUsage, SalesFile, SalesFileReader, UploadedSales,
};
use crate::engine_config::{EngineConfig, DEFAULT_COLLABORATOR_TIMEOUT_SECS, DEFAULT_LANGUAGE};
use crate::engine_errors::CollaboratorError;
use crate::ingestion::{
    parse_recipes_with_conversion, parse_sales, parse_sales_details, parse_shipments,
};
use crate::inventory_model::{
    MonthlyData, MonthlySales, MonthlySalesDetails, Recipe, ReorderPrediction, SalesData,
    SalesDetailView, Shipment,
};
use crate::localization::LocalizationManager;
use crate::pipeline::calculate_all_months;
use crate::reorder::predict_reorders;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Raw sales-detail tables of one month
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesDetailTables<'a> {
    pub by_item: &'a str,
    pub by_category: &'a str,
    pub by_group: &'a str,
}

impl SalesDetailTables<'_> {
    /// Parse the three views
    pub fn parse(&self) -> MonthlySalesDetails {
        MonthlySalesDetails {
            by_item: parse_sales_details(self.by_item, SalesDetailView::Item),
            by_category: parse_sales_details(self.by_category, SalesDetailView::Category),
            by_group: parse_sales_details(self.by_group, SalesDetailView::Group),
        }
    }
}

/// Text tables a session is loaded from
#[derive(Debug, Clone, Default)]
pub struct DashboardTables<'a> {
    pub recipes: &'a str,
    pub shipments: &'a str,
    /// `(month, sales table)` in chronological order
    pub sales: Vec<(&'a str, &'a str)>,
    /// `(month, detail tables)`
    pub sales_details: Vec<(&'a str, SalesDetailTables<'a>)>,
}

/// A collaborator result and the month it was requested for
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTagged<T> {
    pub month: String,
    pub value: T,
}

/// One inventory-analytics session
#[derive(Debug)]
pub struct InventoryDashboard {
    config: EngineConfig,
    recipes: Vec<Recipe>,
    shipments: Vec<Shipment>,
    sales_data: SalesData,
    sales_details: HashMap<String, MonthlySalesDetails>,
    all_months: HashMap<String, MonthlyData>,
    selected_month: String,
    forecast: Option<MonthTagged<ForecastResponse>>,
    inventory_analysis: Option<MonthTagged<String>>,
    is_forecasting: bool,
    is_analyzing: bool,
    error: Option<String>,
    localization: Arc<LocalizationManager>,
    language: String,
    collaborator_timeout: Duration,
}

impl InventoryDashboard {
    /// Empty session
    pub fn new(config: EngineConfig, localization: Arc<LocalizationManager>) -> Self {
        Self {
            config,
            recipes: Vec::new(),
            shipments: Vec::new(),
            sales_data: SalesData::new(),
            sales_details: HashMap::new(),
            all_months: HashMap::new(),
            selected_month: String::new(),
            forecast: None,
            inventory_analysis: None,
            is_forecasting: false,
            is_analyzing: false,
            error: None,
            localization,
            language: DEFAULT_LANGUAGE.to_string(),
            collaborator_timeout: Duration::from_secs(DEFAULT_COLLABORATOR_TIMEOUT_SECS),
        }
    }

    /// Session loaded from text tables, latest month selected
    pub fn from_tables(
        tables: &DashboardTables<'_>,
        config: EngineConfig,
        localization: Arc<LocalizationManager>,
    ) -> Self {
        let mut dashboard = Self::new(config, localization);
        dashboard.recipes = parse_recipes_with_conversion(
            tables.recipes,
            &dashboard.config.synonyms,
            &dashboard.config.conversion,
        );
        dashboard.shipments = parse_shipments(tables.shipments, &dashboard.config.synonyms);
        dashboard.sales_data = tables
            .sales
            .iter()
            .map(|(month, text)| parse_sales(month, text))
            .collect();
        dashboard.sales_details = tables
            .sales_details
            .iter()
            .map(|(month, detail_tables)| (month.to_string(), detail_tables.parse()))
            .collect();

        dashboard.recalculate();
        dashboard.select_latest_month();
        info!(
            recipes = dashboard.recipes.len(),
            shipments = dashboard.shipments.len(),
            months = dashboard.sales_data.len(),
            "Dashboard loaded"
        );
        dashboard
    }

    /// Language of user-visible messages (`en`, `fr`)
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Upper bound for every collaborator call
    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    // --- Inputs -----------------------------------------------------------

    /// Replace the recipe table and recompute
    pub fn load_recipes(&mut self, text: &str) {
        self.recipes = parse_recipes_with_conversion(text, &self.config.synonyms, &self.config.conversion);
        self.recalculate();
    }

    /// Replace the shipment table and recompute
    pub fn load_shipments(&mut self, text: &str) {
        self.shipments = parse_shipments(text, &self.config.synonyms);
        self.recalculate();
    }

    /// Merge a pasted two-column sales table for `month`
    pub fn load_sales_table(&mut self, month: &str, text: &str) {
        self.merge_sales(parse_sales(month, text));
    }

    /// Sales details of one month, replacing any previous ones
    pub fn set_sales_details(&mut self, month: &str, details: MonthlySalesDetails) {
        self.sales_details.insert(month.to_string(), details);
    }

    /// Merge one month of sales (override by month key) and recompute
    ///
    /// A new month gets empty sales details. The month is not selected.
    pub fn merge_sales(&mut self, sales: MonthlySales) {
        let month = sales.month.clone();
        if self.sales_data.upsert(sales) {
            self.sales_details.entry(month.clone()).or_default();
            debug!(month = %month, "Added new month");
        } else {
            debug!(month = %month, "Replaced sales of existing month");
        }
        self.recalculate();
    }

    /// Apply the output of a file reader and select its month
    pub fn apply_upload(&mut self, uploaded: UploadedSales) {
        let UploadedSales { month_name, mut sales } = uploaded;
        sales.month = month_name.clone();
        self.merge_sales(sales);
        self.selected_month = month_name;
    }

    fn recalculate(&mut self) {
        self.all_months = calculate_all_months(
            &self.sales_data,
            &self.recipes,
            &self.shipments,
            &self.config.conversion,
        );
    }

    // --- Selection and derived views --------------------------------------

    /// Months with sales, in the order they were added
    pub fn available_months(&self) -> Vec<String> {
        self.sales_data.month_names()
    }

    pub fn selected_month(&self) -> &str {
        &self.selected_month
    }

    /// Select a month with sales data; unknown months leave the selection as is
    pub fn select_month(&mut self, month: &str) -> bool {
        if self.sales_data.get(month).is_none() {
            warn!(month = %month, "Cannot select a month without sales data");
            return false;
        }
        self.selected_month = month.to_string();
        true
    }

    /// Select the most recently added month
    pub fn select_latest_month(&mut self) {
        if let Some(latest) = self.sales_data.iter().last() {
            self.selected_month = latest.month.clone();
        }
    }

    /// Derived data of the selected month, empty when not calculated
    pub fn current_month_data(&self) -> MonthlyData {
        self.monthly_data(&self.selected_month)
            .cloned()
            .unwrap_or_default()
    }

    /// Derived data of any month
    pub fn monthly_data(&self, month: &str) -> Option<&MonthlyData> {
        self.all_months.get(month)
    }

    /// Sales details of the selected month, empty views when absent
    pub fn current_month_sales_details(&self) -> MonthlySalesDetails {
        self.sales_details
            .get(&self.selected_month)
            .cloned()
            .unwrap_or_default()
    }

    /// Re-order predictions of the selected month
    pub fn reorder_predictions(&self) -> Vec<ReorderPrediction> {
        match self.monthly_data(&self.selected_month) {
            Some(data) => predict_reorders(
                &data.inventory_levels,
                &data.ingredient_usage,
                &self.config.reorder,
            ),
            None => Vec::new(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn sales_data(&self) -> &SalesData {
        &self.sales_data
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Collaborator results ---------------------------------------------

    /// Forecast requested for the selected month, if any
    pub fn forecast(&self) -> Option<&ForecastResponse> {
        self.forecast
            .as_ref()
            .filter(|tagged| tagged.month == self.selected_month)
            .map(|tagged| &tagged.value)
    }

    /// Inventory analysis of the selected month, if any
    pub fn inventory_analysis(&self) -> Option<&str> {
        self.inventory_analysis
            .as_ref()
            .filter(|tagged| tagged.month == self.selected_month)
            .map(|tagged| tagged.value.as_str())
    }

    pub fn is_forecasting(&self) -> bool {
        self.is_forecasting
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    /// Message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // --- Upload -------------------------------------------------------------

    /// Read a sales file through `reader`, merge it and select its month
    ///
    /// On failure only the error message changes.
    pub async fn upload_sales<R: SalesFileReader>(
        &mut self,
        reader: &R,
        file: &SalesFile,
    ) -> Result<String, CollaboratorError> {
        self.error = None;
        let result = with_timeout(self.collaborator_timeout, "Sales upload", reader.read_sales(file)).await;

        match result {
            Ok(uploaded) => {
                let month = uploaded.month_name.clone();
                info!(file = %file.file_name, month = %month, "Sales file uploaded");
                self.apply_upload(uploaded);
                Ok(month)
            }
            Err(e) => {
                error!(file = %file.file_name, error = %e, "Error processing file");
                self.fail("error-upload", &e);
                Err(e)
            }
        }
    }

    // --- Forecast -----------------------------------------------------------

    /// Mark a forecast as outstanding and build its request
    pub fn begin_forecast(&mut self) -> Result<ForecastRequest, CollaboratorError> {
        if self.is_forecasting {
            let e = CollaboratorError::Busy("forecast".to_string());
            self.error = Some(self.message("error-busy-forecast"));
            return Err(e);
        }

        self.is_forecasting = true;
        self.error = None;
        self.forecast = None;

        let usage_history = self
            .sales_data
            .iter()
            .map(|month| MonthlyUsage {
                month: month.month.clone(),
                usage: self
                    .all_months
                    .get(&month.month)
                    .map(|data| data.ingredient_usage.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ForecastRequest {
            sales_history: self.sales_data.clone(),
            usage_history,
            current_month: self.selected_month.clone(),
            next_month: next_month_name(&self.selected_month),
        })
    }

    /// Apply the outcome of a forecast requested for `month`
    pub fn finish_forecast(
        &mut self,
        month: &str,
        result: Result<ForecastResponse, CollaboratorError>,
    ) -> Result<(), CollaboratorError> {
        self.is_forecasting = false;
        match result {
            Ok(response) => {
                info!(month = %month, ingredients = response.forecast.len(), "Forecast stored");
                self.forecast = Some(MonthTagged {
                    month: month.to_string(),
                    value: response,
                });
                Ok(())
            }
            Err(e) => {
                error!(month = %month, error = %e, "Forecast failed");
                self.fail("error-forecast", &e);
                Err(e)
            }
        }
    }

    /// Request a forecast for the month after the selected one
    pub async fn generate_forecast<P: ForecastProvider>(
        &mut self,
        provider: &P,
    ) -> Result<(), CollaboratorError> {
        let request = self.begin_forecast()?;
        let outstanding = OutstandingCall(&mut self.is_forecasting);
        let result = with_timeout(self.collaborator_timeout, "Forecast", provider.forecast(&request)).await;
        drop(outstanding);
        self.finish_forecast(&request.current_month, result)
    }

    // --- Inventory analysis -------------------------------------------------

    /// Mark an analysis as outstanding and build its request
    pub fn begin_inventory_analysis(&mut self) -> Result<AnalysisRequest, CollaboratorError> {
        if self.is_analyzing {
            let e = CollaboratorError::Busy("inventory analysis".to_string());
            self.error = Some(self.message("error-busy-analysis"));
            return Err(e);
        }

        self.is_analyzing = true;
        self.error = None;
        self.inventory_analysis = None;

        Ok(AnalysisRequest {
            month: self.selected_month.clone(),
            inventory_levels: self.current_month_data().inventory_levels,
        })
    }

    /// Apply the outcome of an analysis requested for `month`
    pub fn finish_inventory_analysis(
        &mut self,
        month: &str,
        result: Result<String, CollaboratorError>,
    ) -> Result<(), CollaboratorError> {
        self.is_analyzing = false;
        match result {
            Ok(text) => {
                info!(month = %month, "Inventory analysis stored");
                self.inventory_analysis = Some(MonthTagged {
                    month: month.to_string(),
                    value: text,
                });
                Ok(())
            }
            Err(e) => {
                error!(month = %month, error = %e, "Inventory analysis failed");
                self.fail("error-analysis", &e);
                Err(e)
            }
        }
    }

    /// Request a markdown analysis of the selected month's inventory levels
    pub async fn generate_inventory_analysis<A: InventoryAnalyst>(
        &mut self,
        analyst: &A,
    ) -> Result<(), CollaboratorError> {
        let request = self.begin_inventory_analysis()?;
        let outstanding = OutstandingCall(&mut self.is_analyzing);
        let result = with_timeout(self.collaborator_timeout, "Inventory analysis", analyst.analyze(&request)).await;
        drop(outstanding);
        self.finish_inventory_analysis(&request.month, result)
    }

    // --- Messages -----------------------------------------------------------

    fn message(&self, key: &str) -> String {
        self.localization
            .get_message_in_language(key, &self.language, None)
    }

    /// Record the single user-visible message of a failed operation
    fn fail(&mut self, key: &str, cause: &CollaboratorError) {
        let key = match cause {
            CollaboratorError::Configuration(_) => "error-missing-api-key",
            _ => key,
        };
        self.error = Some(self.message(key));
    }
}

/// Clears a busy flag when dropped, including when the call's future is
/// abandoned before it completes
struct OutstandingCall<'a>(&'a mut bool);

impl Drop for OutstandingCall<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

async fn with_timeout<T>(
    limit: Duration,
    operation: &str,
    future: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(format!(
            "{} did not finish within {:?}",
            operation, limit
        ))),
    }
}
