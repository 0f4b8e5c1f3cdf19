use anyhow::{Context, Result};
use chrono::Month;
use inventory_intelligence::collaborators::{
    month_from_file_name, next_month_name, CsvSalesFileReader, SalesFile,
};
use inventory_intelligence::dashboard::InventoryDashboard;
use inventory_intelligence::engine_config::AppConfig;
use inventory_intelligence::gemini::GeminiClient;
use inventory_intelligence::localization::{
    detect_language, init_localization, primary_language, t_args_lang, t_lang,
};
use inventory_intelligence::sample_data;
use inventory_intelligence::trend_forecast::TrendForecaster;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RECIPES_FILE: &str = "recipes.csv";
const SHIPMENTS_FILE: &str = "shipments.csv";
const SALES_FILE_SUFFIX: &str = "_sales.csv";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.json_logs);

    info!("Starting Inventory Intelligence");

    let localization = init_localization()?;
    let language = detect_language(Some(&config.language));
    if !localization.is_supported(&primary_language(&config.language)) {
        warn!(requested = %config.language, using = %language, "Unsupported language");
    }

    let engine_config = config.engine_config()?;
    let timeout = Duration::from_secs(config.collaborator_timeout_secs);
    let mut dashboard = match &config.data_dir {
        Some(dir) => {
            info!("Loading data from {}", dir.display());
            let mut dashboard = InventoryDashboard::new(engine_config, localization)
                .with_language(&language)
                .with_collaborator_timeout(timeout);
            load_data_dir(dir, &mut dashboard).await?;
            dashboard
        }
        None => {
            info!("No INVENTORY_DATA_DIR set, using the sample dataset");
            InventoryDashboard::from_tables(&sample_data::tables(), engine_config, localization)
                .with_language(&language)
                .with_collaborator_timeout(timeout)
        }
    };

    dashboard.select_latest_month();
    if let Some(month) = &config.selected_month {
        if !dashboard.select_month(month) {
            println!("{}", t_args_lang("error-unknown-month", &[("month", month.as_str())], Some(&language)));
        }
    }

    print_inventory(&dashboard, &language);

    match GeminiClient::from_config(&config) {
        Ok(client) => {
            let _ = dashboard.generate_forecast(&client).await;
            print_forecast(&dashboard, &language, "report-forecast-source-gemini");

            let _ = dashboard.generate_inventory_analysis(&client).await;
            println!("\n## {}", t_lang("report-analysis-heading", Some(&language)));
            match (dashboard.inventory_analysis(), dashboard.error()) {
                (Some(analysis), _) => println!("{}", analysis),
                (None, Some(message)) => println!("{}", message),
                (None, None) => {}
            }
        }
        Err(e) => {
            info!("Gemini unavailable ({}), forecasting with the local trend model", e);
            let _ = dashboard.generate_forecast(&TrendForecaster::new()).await;
            print_forecast(&dashboard, &language, "report-forecast-source-trend");

            let reason = t_lang("error-missing-api-key", Some(&language));
            println!(
                "\n{}",
                t_args_lang("report-analysis-skipped", &[("reason", reason.as_str())], Some(&language))
            );
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Load recipes, shipments and every `<Month>_sales.csv` of `dir`
///
/// Sales files are uploaded in calendar order; a file that cannot be read is
/// reported and skipped.
async fn load_data_dir(dir: &Path, dashboard: &mut InventoryDashboard) -> Result<()> {
    let recipes = tokio::fs::read_to_string(dir.join(RECIPES_FILE))
        .await
        .with_context(|| format!("Failed to read {}", dir.join(RECIPES_FILE).display()))?;
    dashboard.load_recipes(&recipes);

    let shipments = tokio::fs::read_to_string(dir.join(SHIPMENTS_FILE))
        .await
        .with_context(|| format!("Failed to read {}", dir.join(SHIPMENTS_FILE).display()))?;
    dashboard.load_shipments(&shipments);

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let file = SalesFile::new(entry.path());
        if file.file_name.to_lowercase().ends_with(SALES_FILE_SUFFIX) {
            files.push(file);
        }
    }
    files.sort_by_key(|file| (calendar_position(&file.file_name), file.file_name.clone()));

    let reader = CsvSalesFileReader::new();
    for file in &files {
        if let Err(e) = dashboard.upload_sales(&reader, file).await {
            warn!(file = %file.file_name, error = %e, "Skipping sales file");
            if let Some(message) = dashboard.error() {
                println!("{}: {}", file.file_name, message);
            }
        }
    }
    Ok(())
}

/// Month number of a sales file, files without a calendar month sort last
fn calendar_position(file_name: &str) -> u32 {
    month_from_file_name(file_name)
        .and_then(|month| month.parse::<Month>().ok())
        .map(|month| month.number_from_month())
        .unwrap_or(13)
}

fn print_inventory(dashboard: &InventoryDashboard, language: &str) {
    let month = dashboard.selected_month();
    println!("# {}", t_args_lang("report-title", &[("month", month)], Some(language)));
    println!(
        "{}",
        t_args_lang(
            "report-months",
            &[("months", dashboard.available_months().join(", ").as_str())],
            Some(language)
        )
    );

    let total_amount = dashboard.current_month_sales_details().total_amount();
    if total_amount > 0.0 {
        let amount = format!("${:.2}", total_amount);
        println!("{}", t_args_lang("report-sales-total", &[("amount", amount.as_str())], Some(language)));
    }

    println!("\n## {}", t_lang("report-levels-heading", Some(language)));
    for level in dashboard.current_month_data().inventory_levels {
        println!("- {}", level);
    }

    println!("\n## {}", t_lang("report-reorder-heading", Some(language)));
    let predictions = dashboard.reorder_predictions();
    if predictions.is_empty() {
        println!("{}", t_lang("report-reorder-empty", Some(language)));
        return;
    }
    for prediction in &predictions {
        println!("- {}", prediction);
    }
    let urgent = predictions.iter().filter(|p| p.needs_reorder()).count().to_string();
    let total = predictions.len().to_string();
    println!(
        "{}",
        t_args_lang(
            "report-reorder-summary",
            &[("urgent", urgent.as_str()), ("total", total.as_str())],
            Some(language)
        )
    );
}

fn print_forecast(dashboard: &InventoryDashboard, language: &str, source_key: &str) {
    let Some(response) = dashboard.forecast() else {
        if let Some(message) = dashboard.error() {
            println!("\n{}", message);
        }
        return;
    };

    let next_month = next_month_name(dashboard.selected_month());
    let source = t_lang(source_key, Some(language));
    println!(
        "\n## {}",
        t_args_lang(
            "report-forecast-heading",
            &[("month", next_month.as_str()), ("source", source.as_str())],
            Some(language)
        )
    );
    for (ingredient, quantity) in &response.forecast {
        println!("- {}: {:.0}", ingredient, quantity);
    }
    if let Some(reasoning) = &response.reasoning {
        println!(
            "{}",
            t_args_lang("report-forecast-reasoning", &[("reasoning", reasoning.as_str())], Some(language))
        );
    }
}
