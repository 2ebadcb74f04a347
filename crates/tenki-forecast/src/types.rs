//! JMA forecast document types and row flattening.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Number of days in the weekly forecast edition.
pub const WEEKLY_DAYS: usize = 7;

/// One flattened forecast entry: a single day for a single sub-area.
///
/// This is the shape stored in the cache and handed to frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// JMA office code the forecast was requested for (e.g. "130000").
    pub area_code: String,
    pub date: NaiveDate,
    /// Opaque JMA telop code; resolved to icon/label via [`crate::TelopsTable`].
    pub weather_code: String,
    /// Minimum temperature in °C. `None` when JMA publishes no reading.
    pub min_temp: Option<f64>,
    /// Maximum temperature in °C. `None` when JMA publishes no reading.
    pub max_temp: Option<f64>,
    /// Sub-area the weather series applies to.
    pub area_name_primary: String,
    /// Area the temperature readings apply to (JMA reports weather and
    /// temperature at different granularities).
    pub area_name_secondary: String,
}

/// One forecast edition as published by JMA. The source document is a JSON
/// array of these, with differing time horizons.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    #[serde(default)]
    pub publishing_office: Option<String>,
    #[serde(default)]
    pub report_datetime: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

/// A parallel-array time series: one list of timestamps shared by all areas.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub time_defines: Vec<DateTime<FixedOffset>>,
    #[serde(default)]
    pub areas: Vec<AreaSeries>,
}

/// Per-area values of one time series. Which arrays are populated depends on
/// the series: the weather series carries `weatherCodes`, the temperature
/// series carries `tempsMin`/`tempsMax`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    pub area: AreaRef,
    #[serde(default)]
    pub weather_codes: Vec<String>,
    #[serde(default)]
    pub temps_min: Vec<String>,
    #[serde(default)]
    pub temps_max: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRef {
    pub name: String,
    pub code: String,
}

impl Edition {
    /// Whether this edition is the weekly one: its first series spans
    /// exactly seven days.
    pub fn is_weekly(&self) -> bool {
        self.time_series
            .first()
            .is_some_and(|ts| ts.time_defines.len() == WEEKLY_DAYS)
    }
}

/// Pick the weekly edition out of the published set.
///
/// JMA returns several editions of differing horizons; only the 7-day one
/// feeds the cache. An absent weekly edition is surfaced as an error rather
/// than silently producing no rows.
pub fn select_weekly(
    area_code: &str,
    editions: Vec<Edition>,
) -> Result<Edition, ForecastError> {
    editions
        .into_iter()
        .find(Edition::is_weekly)
        .ok_or_else(|| ForecastError::NoWeeklyEdition(area_code.to_string()))
}

/// JMA encodes temperatures as strings, with `""` for days without a
/// published reading. Anything unparseable is treated as absent too.
fn parse_temp(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Flatten the weekly edition's parallel arrays into per-day, per-sub-area
/// rows, grouped by sub-area then chronologically.
///
/// Series 0 carries dates and weather codes, series 1 the temperatures. Both
/// must list the same sub-areas in the same order; a mismatch means the
/// document does not have the shape this pipeline understands.
pub fn flatten(area_code: &str, edition: &Edition) -> Result<Vec<ForecastRow>, ForecastError> {
    let weather = edition
        .time_series
        .first()
        .ok_or_else(|| ForecastError::Malformed("edition has no time series".into()))?;
    let temps = edition
        .time_series
        .get(1)
        .ok_or_else(|| ForecastError::Malformed("edition has no temperature series".into()))?;

    if weather.areas.len() != temps.areas.len() {
        return Err(ForecastError::Malformed(format!(
            "weather series has {} sub-areas but temperature series has {}",
            weather.areas.len(),
            temps.areas.len()
        )));
    }

    let dates: Vec<NaiveDate> = weather
        .time_defines
        .iter()
        .map(|dt| dt.date_naive())
        .collect();

    let mut rows = Vec::with_capacity(weather.areas.len() * dates.len());
    for (weather_area, temp_area) in weather.areas.iter().zip(&temps.areas) {
        if weather_area.weather_codes.len() != dates.len() {
            return Err(ForecastError::Malformed(format!(
                "sub-area {} has {} weather codes for {} days",
                weather_area.area.name,
                weather_area.weather_codes.len(),
                dates.len()
            )));
        }

        for (day, date) in dates.iter().enumerate() {
            rows.push(ForecastRow {
                area_code: area_code.to_string(),
                date: *date,
                weather_code: weather_area.weather_codes[day].clone(),
                min_temp: temp_area.temps_min.get(day).map(String::as_str).and_then(parse_temp),
                max_temp: temp_area.temps_max.get(day).map(String::as_str).and_then(parse_temp),
                area_name_primary: weather_area.area.name.clone(),
                area_name_secondary: temp_area.area.name.clone(),
            });
        }
    }

    Ok(rows)
}

/// The JMA area directory (`common/const/area.json`): which office codes
/// exist and how they group under regional centers. Frontends build their
/// area pickers from this.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaDirectory {
    #[serde(default)]
    pub centers: std::collections::BTreeMap<String, Center>,
    #[serde(default)]
    pub offices: std::collections::BTreeMap<String, Office>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}
