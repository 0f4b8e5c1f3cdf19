//! # Gemini Collaborator
//!
//! Demand forecast and inventory analysis over the Gemini `generateContent`
//! REST endpoint. Requests are sent once, without retries; the dashboard puts
//! a timeout around every call. Forecast magnitudes are taken as returned.

use crate::collaborators::{
    AnalysisRequest, ForecastProvider, ForecastRequest, ForecastResponse, InventoryAnalyst,
};
use crate::engine_config::AppConfig;
use crate::engine_errors::CollaboratorError;
use crate::inventory_model::{Forecast, InventoryLevel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Base URL of the Gemini REST API
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Ingredients per month included in the forecast prompt
const PROMPT_TOP_INGREDIENTS: usize = 10;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model_name: String) -> Self {
        Self {
            api_key,
            model_name,
            base_url: GEMINI_API_BASE.to_string(),
            client: Client::new(),
        }
    }

    /// Client for the configured key and model
    pub fn from_config(config: &AppConfig) -> Result<Self, CollaboratorError> {
        match config.gemini_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                Ok(Self::new(key.to_string(), config.gemini_model.clone()))
            }
            _ => Err(CollaboratorError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            )),
        }
    }

    /// Point the client at another endpoint (proxy, local mock)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CollaboratorError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model_name);
        tracing::debug!(model = %self.model_name, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                CollaboratorError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CollaboratorError::Transport(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CollaboratorError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        gemini_response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| CollaboratorError::InvalidResponse("Empty response from Gemini".to_string()))
    }
}

impl ForecastProvider for GeminiClient {
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, CollaboratorError> {
        let gemini_request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: forecast_prompt(request),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: forecast_schema(),
            }),
        };

        let text = self.call_gemini_api(gemini_request).await?;
        let response = parse_forecast_response(&text)?;
        tracing::info!(
            month = %request.next_month,
            ingredients = response.forecast.len(),
            "Received Gemini forecast"
        );
        Ok(response)
    }
}

impl InventoryAnalyst for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, CollaboratorError> {
        let gemini_request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: analysis_prompt(&request.month, &request.inventory_levels),
                }],
            }],
            generation_config: None,
        };

        self.call_gemini_api(gemini_request)
            .await
            .map_err(|e| match e {
                CollaboratorError::InvalidResponse(msg) => CollaboratorError::Analysis(msg),
                other => other,
            })
    }
}

/// JSON schema of the structured forecast answer
pub fn forecast_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "forecast": {
                "type": "ARRAY",
                "description": "Ingredient names with their forecasted quantity in grams or pieces.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "ingredient": { "type": "STRING", "description": "Name of the ingredient." },
                        "quantity": { "type": "NUMBER", "description": "Forecasted quantity." }
                    },
                    "required": ["ingredient", "quantity"]
                }
            },
            "reasoning": {
                "type": "STRING",
                "description": "A brief explanation of the forecast logic."
            }
        }
    })
}

/// Decode a structured forecast answer
///
/// Items without a string ingredient or a numeric quantity are skipped; a later
/// item for the same ingredient replaces the earlier one.
pub fn parse_forecast_response(text: &str) -> Result<ForecastResponse, CollaboratorError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        CollaboratorError::Forecast(format!("Forecast is not valid JSON: {}", e))
    })?;

    let forecast: Forecast = value
        .get("forecast")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let ingredient = item.get("ingredient")?.as_str()?;
                    let quantity = item.get("quantity")?.as_f64()?;
                    (!ingredient.is_empty()).then(|| (ingredient.to_string(), quantity))
                })
                .collect()
        })
        .unwrap_or_default();

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ForecastResponse { forecast, reasoning })
}

fn forecast_prompt(request: &ForecastRequest) -> String {
    let history = request
        .usage_history
        .iter()
        .map(|month| {
            let mut usage = month.usage.clone();
            usage.sort_by(|a, b| b.usage.total_cmp(&a.usage));
            let top = usage
                .iter()
                .take(PROMPT_TOP_INGREDIENTS)
                .map(|u| format!("{}: {:.0}g", u.name, u.usage))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Month: {}\nTop {} Ingredient Usage: {}",
                month.month, PROMPT_TOP_INGREDIENTS, top
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a supply chain analyst for a restaurant. Based on the following monthly \
         ingredient usage data, predict the required quantity (in grams or pieces) for all key \
         ingredients for the next month. Analyze trends and seasonality if possible from the \
         data provided.\n\nHistorical Data:\n{}\n\nProvide a forecast for {}. Return a list of \
         all key ingredients and their forecasted amounts.",
        history, request.next_month
    )
}

fn analysis_prompt(month: &str, levels: &[InventoryLevel]) -> String {
    let summary = levels
        .iter()
        .map(|level| {
            format!(
                "{}: {}{:.0}g net (Purchased: {:.0}g, Used: {:.0}g)",
                level.name,
                if level.net > 0.0 { "+" } else { "" },
                level.net,
                level.purchased,
                level.used
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert restaurant supply chain analyst. Based on the following net inventory \
         data for the month of {month}, provide a brief analysis and actionable suggestions.\n\n\
         Inventory Data (Net = Purchased - Used):\n{summary}\n\n\
         Your analysis should:\n\
         1. Identify the top 2-3 most overstocked and understocked items.\n\
         2. Provide specific, actionable suggestions for adjusting the next month's shipments for these items.\n\
         3. Briefly mention whether {month}'s sales look typical or seasonal.\n\n\
         Keep the response concise, formatted as markdown, with bullet points for suggestions."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MonthlyUsage;
    use crate::inventory_model::{IngredientUsage, SalesData};

    #[test]
    fn test_parse_forecast_response_skips_malformed_items() {
        let text = r#"{
            "forecast": [
                {"ingredient": "Beef", "quantity": 12000},
                {"ingredient": "Rice", "quantity": "lots"},
                {"quantity": 3},
                {"ingredient": "Egg", "quantity": 850.5}
            ],
            "reasoning": "Steady growth"
        }"#;
        let response = parse_forecast_response(text).unwrap();

        assert_eq!(response.forecast.len(), 2);
        assert_eq!(response.forecast["Beef"], 12000.0);
        assert_eq!(response.forecast["Egg"], 850.5);
        assert_eq!(response.reasoning.as_deref(), Some("Steady growth"));
    }

    #[test]
    fn test_parse_forecast_response_without_forecast_array() {
        let response = parse_forecast_response(r#"{"reasoning": "no data"}"#).unwrap();
        assert!(response.forecast.is_empty());
    }

    #[test]
    fn test_parse_forecast_response_rejects_invalid_json() {
        let result = parse_forecast_response("Sure! Here is your forecast");
        assert!(matches!(result, Err(CollaboratorError::Forecast(_))));
    }

    #[test]
    fn test_forecast_prompt_lists_top_usage_per_month() {
        let request = ForecastRequest {
            sales_history: SalesData::new(),
            usage_history: vec![MonthlyUsage {
                month: "March".to_string(),
                usage: vec![
                    IngredientUsage { name: "Egg".to_string(), usage: 10.0 },
                    IngredientUsage { name: "Beef".to_string(), usage: 1400.4 },
                ],
            }],
            current_month: "March".to_string(),
            next_month: "April".to_string(),
        };
        let prompt = forecast_prompt(&request);

        assert!(prompt.contains("Month: March\nTop 10 Ingredient Usage: Beef: 1400g, Egg: 10g"));
        assert!(prompt.contains("Provide a forecast for April."));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(CollaboratorError::Configuration(_))
        ));

        let config = AppConfig {
            gemini_api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.model_name(), config.gemini_model);
    }
}
