//! # External Collaborators
//!
//! Seams between the calculation engine and the services it does not own:
//! reading an uploaded sales file, forecasting next month's demand and writing
//! a free-text inventory analysis. The engine only consumes their results;
//! their correctness is not checked beyond the shape of the data.
//!
//! [`CsvSalesFileReader`] is the bundled file reader. Forecasting and analysis
//! are provided by [`crate::gemini::GeminiClient`] and, offline, by
//! [`crate::trend_forecast::TrendForecaster`].

use crate::engine_errors::CollaboratorError;
use crate::ingestion::clean_count;
use crate::inventory_model::{Forecast, IngredientUsage, InventoryLevel, MonthlySales, SalesData};
use crate::tabular::{cell, parse_table};
use chrono::Month;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Month name used when the current month is not a calendar month name
pub const FALLBACK_NEXT_MONTH: &str = "Next Month";

/// Header of the item column in an uploaded sales file
pub const UPLOAD_ITEM_HEADER: &str = "Item name";
/// Header of the units-sold column in an uploaded sales file
pub const UPLOAD_SALES_HEADER: &str = "Sales";

lazy_static! {
    static ref FILE_NAME_SEPARATOR: Regex =
        Regex::new(r"[_.]").expect("File name separator pattern should be valid");
}

/// A sales file handed over for ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFile {
    /// Name the month is derived from (`April_sales.csv`)
    pub file_name: String,
    pub path: PathBuf,
}

impl SalesFile {
    /// Sales file named after the last component of `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file_name, path }
    }
}

/// One month of sales produced by a file reader
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedSales {
    pub month_name: String,
    pub sales: MonthlySales,
}

/// Usage of one month, in sales-history order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUsage {
    pub month: String,
    pub usage: Vec<IngredientUsage>,
}

/// Everything a forecaster gets to see
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub sales_history: SalesData,
    /// Per-month usage, oldest month first
    pub usage_history: Vec<MonthlyUsage>,
    pub current_month: String,
    /// Month the forecast is for
    pub next_month: String,
}

/// Forecast returned by a provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastResponse {
    pub forecast: Forecast,
    pub reasoning: Option<String>,
}

/// Inventory levels of the month to analyse
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub month: String,
    pub inventory_levels: Vec<InventoryLevel>,
}

/// Turns an uploaded file into one month of sales
pub trait SalesFileReader {
    fn read_sales(
        &self,
        file: &SalesFile,
    ) -> impl Future<Output = Result<UploadedSales, CollaboratorError>> + Send;
}

/// Predicts next month's ingredient demand from the usage history
pub trait ForecastProvider {
    fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> impl Future<Output = Result<ForecastResponse, CollaboratorError>> + Send;
}

/// Writes a markdown analysis of one month's inventory levels
pub trait InventoryAnalyst {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<String, CollaboratorError>> + Send;
}

/// Month named by a sales file: the prefix before the first `_` or `.`,
/// first character upper-cased
///
/// ```rust
/// use inventory_intelligence::collaborators::month_from_file_name;
///
/// assert_eq!(month_from_file_name("april_sales.xlsx").as_deref(), Some("April"));
/// assert_eq!(month_from_file_name("May.csv").as_deref(), Some("May"));
/// assert_eq!(month_from_file_name("_sales.csv"), None);
/// ```
pub fn month_from_file_name(file_name: &str) -> Option<String> {
    let prefix = FILE_NAME_SEPARATOR.split(file_name).next().unwrap_or("");
    let mut chars = prefix.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Calendar month following `current`, or [`FALLBACK_NEXT_MONTH`]
///
/// Only full English month names are recognized.
pub fn next_month_name(current: &str) -> String {
    current
        .parse::<Month>()
        .ok()
        .filter(|month| month.name() == current)
        .map(|month| month.succ().name().to_string())
        .unwrap_or_else(|| FALLBACK_NEXT_MONTH.to_string())
}

/// Reads delimited text sales files with `Item name` and `Sales` columns
#[derive(Debug, Clone, Default)]
pub struct CsvSalesFileReader;

impl CsvSalesFileReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the contents of a sales file for `month_name`
    pub fn parse_contents(&self, month_name: &str, text: &str) -> Result<MonthlySales, CollaboratorError> {
        let rows = parse_table(text);
        let Some((header, data)) = rows.split_first() else {
            return Err(CollaboratorError::Upload("Sales file is empty".to_string()));
        };

        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let (Some(item_index), Some(sales_index)) =
            (position(UPLOAD_ITEM_HEADER), position(UPLOAD_SALES_HEADER))
        else {
            return Err(CollaboratorError::Upload(format!(
                "Sales file needs '{}' and '{}' columns",
                UPLOAD_ITEM_HEADER, UPLOAD_SALES_HEADER
            )));
        };

        let sales = data
            .iter()
            .filter_map(|row| {
                let name = cell(row, item_index)?.trim();
                let units = clean_count(cell(row, sales_index).unwrap_or(""));
                (!name.is_empty() && units != 0).then_some((name, units))
            })
            .fold(MonthlySales::new(month_name), |sales, (name, units)| {
                sales.with_sale(name, units)
            });

        debug!("Read {} sales rows for {}", sales.sales.len(), month_name);
        Ok(sales)
    }

    async fn read_path(&self, path: &Path, file_name: &str) -> Result<UploadedSales, CollaboratorError> {
        let month_name = month_from_file_name(file_name).ok_or_else(|| {
            CollaboratorError::Upload(format!("Cannot derive a month from '{}'", file_name))
        })?;
        let text = tokio::fs::read_to_string(path).await?;
        let sales = self.parse_contents(&month_name, &text)?;

        info!("Loaded {} sales for {} from {}", sales.total_units(), month_name, file_name);
        Ok(UploadedSales { month_name, sales })
    }
}

impl SalesFileReader for CsvSalesFileReader {
    async fn read_sales(&self, file: &SalesFile) -> Result<UploadedSales, CollaboratorError> {
        self.read_path(&file.path, &file.file_name).await
    }
}
