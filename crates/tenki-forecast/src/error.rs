//! Forecast-specific error types.

use tenki_core::error::{AppError, ReqwestErrorExt, RusqliteErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Area not found: {0}")]
    AreaNotFound(String),

    #[error("No 7-day forecast published for area {0}")]
    NoWeeklyEdition(String),

    #[error("Malformed forecast document: {0}")]
    Malformed(String),

    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ForecastError {
    /// User-friendly error message for frontend display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AreaNotFound(code) => format!("No forecast exists for area {}", code),
            Self::NoWeeklyEdition(_) => {
                "The weekly forecast is not available for this area right now.".to_string()
            }
            Self::Malformed(_) => "Failed to read the forecast data.".to_string(),
            Self::Upstream { .. } => "The forecast service returned an error.".to_string(),
            Self::Cache(_) => "Local cache error.".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether a retry on the next request can succeed without intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Upstream { .. } | Self::NoWeeklyEdition(_)
        )
    }
}

/// Lift forecast errors into the application-level hierarchy: transport and
/// storage failures become their typed kinds, everything else keeps its
/// forecast-specific message.
impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Network(e) => AppError::Network(e.into_network_error()),
            ForecastError::Cache(e) => AppError::Database(e.into_database_error()),
            other => AppError::Forecast(other.user_message()),
        }
    }
}
