//! JMA forecast data layer for Tenki
//!
//! Fetches forecast documents from the Japan Meteorological Agency, flattens
//! the weekly edition into per-day per-sub-area rows, and serves them through
//! a SQLite read-through cache.

pub mod cache;
pub mod client;
pub mod error;
pub mod service;
pub mod telops;
pub mod types;

pub use cache::ForecastCache;
pub use client::JmaClient;
pub use error::ForecastError;
pub use service::ForecastService;
pub use telops::{Telop, TelopsTable};
pub use types::{AreaDirectory, Edition, ForecastRow, WEEKLY_DAYS};
