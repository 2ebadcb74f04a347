//! Weather-code (telop) lookup: code to icon filename and display label.
//!
//! JMA publishes the table as `Forecast.Const.TELOPS`, an object mapping each
//! code to `[day_icon, night_icon, icon_number, label_ja, label_en]`. A
//! snapshot ships with the crate; an on-disk copy can override it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

const BUNDLED_TELOPS: &str = include_str!("../assets/telops.json");

/// One resolved telop entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telop {
    pub day_icon: String,
    pub night_icon: String,
    pub label_ja: String,
    pub label_en: String,
}

/// Static lookup table from weather code to telop, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TelopsTable {
    entries: HashMap<String, Telop>,
}

impl TelopsTable {
    /// Load the snapshot bundled with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TELOPS)
    }

    /// Load a table from an on-disk JSON file in JMA's TELOPS format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        Self::from_json(&contents)
    }

    fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).context("Failed to parse telops table")?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (code, fields) in raw {
            if fields.len() < 5 {
                tracing::warn!("Skipping malformed telop entry for code {}", code);
                continue;
            }
            let mut fields = fields.into_iter();
            let day_icon = fields.next().unwrap_or_default();
            let night_icon = fields.next().unwrap_or_default();
            let _icon_number = fields.next();
            let label_ja = fields.next().unwrap_or_default();
            let label_en = fields.next().unwrap_or_default();
            entries.insert(code, Telop { day_icon, night_icon, label_ja, label_en });
        }

        Ok(Self { entries })
    }

    pub fn lookup(&self, weather_code: &str) -> Option<&Telop> {
        self.entries.get(weather_code)
    }

    /// Japanese label for a code, or the raw code when unknown.
    pub fn label<'a>(&'a self, weather_code: &'a str) -> &'a str {
        self.lookup(weather_code)
            .map(|t| t.label_ja.as_str())
            .unwrap_or(weather_code)
    }

    /// Full URL of the daytime icon for a code, against the JMA image base.
    pub fn icon_url(&self, base_url: &str, weather_code: &str) -> Option<String> {
        self.lookup(weather_code).map(|t| {
            format!("{}/forecast/img/{}", base_url.trim_end_matches('/'), t.day_icon)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
