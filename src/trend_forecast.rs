//! # Trend Forecaster
//!
//! Offline demand forecast: fits a least-squares polynomial to each
//! ingredient's monthly usage and evaluates it one month ahead.
//!
//! The fit degree follows the amount of history: quadratic with three or more
//! months, linear with two, the last value with one. Months in which an
//! ingredient was not used count as zero usage. Forecasts are floored at zero.

use crate::collaborators::{ForecastProvider, ForecastRequest, ForecastResponse, MonthlyUsage};
use crate::engine_errors::CollaboratorError;
use crate::inventory_model::Forecast;
use log::debug;
use std::collections::BTreeSet;

/// Highest polynomial degree used for the trend
pub const MAX_TREND_DEGREE: usize = 2;

/// Local forecaster based on polynomial trends
#[derive(Debug, Clone)]
pub struct TrendForecaster {
    max_degree: usize,
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self {
            max_degree: MAX_TREND_DEGREE,
        }
    }
}

impl TrendForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forecaster limited to `max_degree` (0 = last value, 1 = linear)
    pub fn with_max_degree(max_degree: usize) -> Self {
        Self { max_degree }
    }

    /// Next value of an evenly spaced series
    ///
    /// ```rust
    /// use inventory_intelligence::trend_forecast::TrendForecaster;
    ///
    /// let forecaster = TrendForecaster::new();
    /// assert!((forecaster.predict_next(&[100.0, 200.0, 300.0]) - 400.0).abs() < 1e-6);
    /// assert_eq!(forecaster.predict_next(&[500.0, 100.0]), 0.0);
    /// assert_eq!(forecaster.predict_next(&[]), 0.0);
    /// ```
    pub fn predict_next(&self, series: &[f64]) -> f64 {
        let Some(last) = series.last() else {
            return 0.0;
        };

        let degree = self.max_degree.min(series.len() - 1);
        let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
        let next_x = series.len() as f64;

        let predicted = match fit_polynomial(&xs, series, degree) {
            Some(coefficients) => evaluate(&coefficients, next_x),
            None => *last,
        };
        predicted.max(0.0)
    }

    /// Forecast every ingredient seen in `history`
    pub fn forecast_usage(&self, history: &[MonthlyUsage]) -> Forecast {
        let ingredients: BTreeSet<&str> = history
            .iter()
            .flat_map(|month| month.usage.iter().map(|u| u.name.as_str()))
            .collect();

        ingredients
            .into_iter()
            .map(|ingredient| {
                let series: Vec<f64> = history
                    .iter()
                    .map(|month| {
                        month
                            .usage
                            .iter()
                            .find(|u| u.name == ingredient)
                            .map(|u| u.usage)
                            .unwrap_or(0.0)
                    })
                    .collect();
                (ingredient.to_string(), self.predict_next(&series))
            })
            .collect()
    }
}

impl ForecastProvider for TrendForecaster {
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, CollaboratorError> {
        if request.usage_history.is_empty() {
            return Err(CollaboratorError::Forecast(
                "No usage history to extrapolate".to_string(),
            ));
        }

        let forecast = self.forecast_usage(&request.usage_history);
        let degree = self.max_degree.min(request.usage_history.len() - 1);
        debug!(
            "Trend forecast for {} from {} months, degree {}",
            request.next_month,
            request.usage_history.len(),
            degree
        );

        Ok(ForecastResponse {
            forecast,
            reasoning: Some(format!(
                "Least-squares trend of degree {} over {} months of usage, extrapolated to {}.",
                degree,
                request.usage_history.len(),
                request.next_month
            )),
        })
    }
}

/// Least-squares polynomial coefficients, lowest power first
///
/// Solves the normal equations with Gaussian elimination; `None` when the
/// system is singular.
fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let size = degree + 1;
    if xs.len() < size {
        return None;
    }

    // Augmented normal-equation matrix [XᵀX | Xᵀy]
    let mut matrix = vec![vec![0.0; size + 1]; size];
    for (x, y) in xs.iter().zip(ys) {
        for row in 0..size {
            for col in 0..size {
                matrix[row][col] += x.powi((row + col) as i32);
            }
            matrix[row][size] += y * x.powi(row as i32);
        }
    }

    for pivot in 0..size {
        let best = (pivot..size).max_by(|a, b| matrix[*a][pivot].abs().total_cmp(&matrix[*b][pivot].abs()))?;
        if matrix[best][pivot].abs() < 1e-12 {
            return None;
        }
        matrix.swap(pivot, best);

        for row in 0..size {
            if row == pivot {
                continue;
            }
            let factor = matrix[row][pivot] / matrix[pivot][pivot];
            for col in pivot..=size {
                matrix[row][col] -= factor * matrix[pivot][col];
            }
        }
    }

    Some((0..size).map(|i| matrix[i][size] / matrix[i][i]).collect())
}

fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, coefficient| acc * x + coefficient)
}
