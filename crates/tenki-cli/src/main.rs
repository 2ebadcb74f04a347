use std::time::Duration;

use anyhow::{Context, Result};
use tenki_core::{AppError, Config, ConfigError};
use tenki_forecast::{ForecastRow, ForecastService, TelopsTable};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    tenki_core::init()?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            let app_err = AppError::Config(ConfigError::Invalid(e.to_string()));
            eprintln!("{}", app_err.user_message());
            return Err(app_err.into());
        }
    };

    let area_code = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.forecast.default_area.clone());

    let service = service_from_config(&config)?;
    let telops = TelopsTable::bundled()?;

    tracing::info!("Fetching forecast for area {}", area_code);

    let rows = match service.get(&area_code).await {
        Ok(rows) => rows,
        Err(e) => {
            let app_err = AppError::from(e);
            eprintln!("{}", app_err.user_message());
            return Err(app_err.into());
        }
    };

    print_forecast(&area_code, &rows, &telops);

    Ok(())
}

/// Build the service against the configured endpoint, timeout, and cache path.
fn service_from_config(config: &Config) -> Result<ForecastService> {
    let db_path = config.cache_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }

    ForecastService::with_base_url(
        &db_path,
        &config.forecast.base_url,
        Duration::from_secs(config.forecast.request_timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start forecast service: {}", e))
}

/// Print one text block per sub-area: seven day lines of date, label, temps.
fn print_forecast(area_code: &str, rows: &[ForecastRow], telops: &TelopsTable) {
    println!("Forecast for area {}", area_code);

    let mut current_sub_area: Option<&str> = None;
    for row in rows {
        if current_sub_area != Some(row.area_name_primary.as_str()) {
            current_sub_area = Some(row.area_name_primary.as_str());
            println!();
            println!("{} (temperatures: {})", row.area_name_primary, row.area_name_secondary);
        }

        println!(
            "  {}  {:<12}  {} / {}",
            row.date,
            telops.label(&row.weather_code),
            format_temp(row.min_temp),
            format_temp(row.max_temp),
        );
    }
}

fn format_temp(temp: Option<f64>) -> String {
    match temp {
        Some(t) => format!("{:>3.0} °C", t),
        None => " -- °C".to_string(),
    }
}
