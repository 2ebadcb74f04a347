//! SQLite-backed local cache of flattened forecast rows.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::ForecastError;
use crate::types::ForecastRow;

/// SQLite cache for forecast rows, keyed by area code.
///
/// The table is dropped and recreated on open: cached rows never outlive the
/// process that wrote them, so a restart always refetches.
pub struct ForecastCache {
    conn: Connection,
}

impl ForecastCache {
    /// Open (and reset) the cache at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ForecastError> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.reset_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, ForecastError> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.reset_schema()?;
        Ok(cache)
    }

    /// Drop any previous contents and recreate the schema empty.
    fn reset_schema(&self) -> Result<(), ForecastError> {
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS forecast_rows;

            CREATE TABLE forecast_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_code TEXT NOT NULL,
                date TEXT NOT NULL,
                weather_code TEXT NOT NULL,
                min_temp REAL,
                max_temp REAL,
                area_name_primary TEXT NOT NULL,
                area_name_secondary TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Persist one area's rows as a single batch.
    ///
    /// The whole batch commits inside one transaction: a failure mid-insert
    /// leaves the store untouched for that area code.
    pub fn store_rows(&mut self, rows: &[ForecastRow]) -> Result<(), ForecastError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO forecast_rows
                (area_code, date, weather_code, min_temp, max_temp, area_name_primary, area_name_secondary)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.area_code,
                    row.date.to_string(),
                    row.weather_code,
                    row.min_temp,
                    row.max_temp,
                    row.area_name_primary,
                    row.area_name_secondary,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Rows for an area code in insertion order (grouped by sub-area, then
    /// chronological). Empty when the area has never been fetched.
    pub fn rows_for_area(&self, area_code: &str) -> Result<Vec<ForecastRow>, ForecastError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT area_code, date, weather_code, min_temp, max_temp,
                   area_name_primary, area_name_secondary
            FROM forecast_rows
            WHERE area_code = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![area_code], Self::row_to_forecast)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Whether any rows exist for the area code.
    pub fn has_area(&self, area_code: &str) -> Result<bool, ForecastError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM forecast_rows WHERE area_code = ?1",
            params![area_code],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn row_to_forecast(row: &rusqlite::Row<'_>) -> rusqlite::Result<ForecastRow> {
        let date_str: String = row.get(1)?;
        let date = date_str.parse::<NaiveDate>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(ForecastRow {
            area_code: row.get(0)?,
            date,
            weather_code: row.get(2)?,
            min_temp: row.get(3)?,
            max_temp: row.get(4)?,
            area_name_primary: row.get(5)?,
            area_name_secondary: row.get(6)?,
        })
    }
}
