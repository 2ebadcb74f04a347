//! HTTP client for the JMA bosai endpoints.

use std::time::Duration;

use tracing::instrument;

use crate::error::ForecastError;
use crate::types::{AreaDirectory, Edition};

const JMA_BASE: &str = "https://www.jma.go.jp/bosai";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct JmaClient {
    client: reqwest::Client,
    base_url: String,
}

impl JmaClient {
    pub fn new() -> Result<Self, ForecastError> {
        Self::with_base_url(JMA_BASE, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Build a client against an alternate endpoint (also used by tests to
    /// point at a mock server).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every published forecast edition for an area code.
    ///
    /// The response is a JSON array of editions with differing horizons;
    /// selection of the weekly one happens downstream.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, area_code: &str) -> Result<Vec<Edition>, ForecastError> {
        let url = format!("{}/forecast/data/forecast/{}.json", self.base_url, area_code);

        let response = self.client.get(&url).send().await?;
        handle_response(response, area_code).await
    }

    /// Fetch the area directory (centers and offices).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_area_directory(&self) -> Result<AreaDirectory, ForecastError> {
        let url = format!("{}/common/const/area.json", self.base_url);

        let response = self.client.get(&url).send().await?;
        handle_response(response, "").await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    area_code: &str,
) -> Result<T, ForecastError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ForecastError::Malformed(format!("JSON parse error: {}", e)))
    } else if status.as_u16() == 404 {
        Err(ForecastError::AreaNotFound(area_code.to_string()))
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(ForecastError::Upstream {
            status: status.as_u16(),
            message: text,
        })
    }
}
