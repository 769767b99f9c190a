use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;

use crate::error::DatasetError;

/// Column names of the historical dataset
pub mod columns {
    pub const LOCATION: &str = "Location";
    pub const DATE_TIME: &str = "Date_Time";
    pub const TEMPERATURE: &str = "Temperature_C";
    pub const HUMIDITY: &str = "Humidity_pct";
    pub const PRECIPITATION: &str = "Precipitation_mm";
    pub const WIND_SPEED: &str = "Wind_Speed_kmh";
    pub const WEATHER_DESCRIPTION: &str = "Weather_Description";
    pub const WORK_SUITABILITY: &str = "Work_Suitability";
    pub const FLOOD_RISK: &str = "Flood_Risk";
}

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Parse a timestamp leniently; anything unrecognized becomes `None`
pub(crate) fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Rows of a tabular excerpt, e.g. the "recent data" table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The full historical dataset as read from CSV
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} rows from {}",
            dataset.records.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Read CSV with a header row. Rows that fail to parse are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for result in reader.records() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    tracing::debug!("Skipping malformed row: {}", e);
                }
            }
        }
        if skipped > 0 {
            tracing::warn!("Skipped {} malformed dataset rows", skipped);
        }

        Ok(Self { headers, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub(crate) fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Distinct non-empty locations, trimmed and sorted
    pub fn locations(&self) -> Result<Vec<String>, DatasetError> {
        let idx = self.column_index(columns::LOCATION)?;
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.get(idx))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Ok(set.into_iter().map(str::to_string).collect())
    }

    /// Rows whose trimmed location equals `location`
    pub fn for_location(&self, location: &str) -> Result<LocationView<'_>, DatasetError> {
        let idx = self.column_index(columns::LOCATION)?;
        let wanted = location.trim();
        let rows = self
            .records
            .iter()
            .filter(|r| r.get(idx).map(str::trim) == Some(wanted))
            .collect();

        Ok(LocationView {
            dataset: self,
            location: wanted.to_string(),
            rows,
        })
    }
}

/// The rows of one location, in file order
#[derive(Debug, Clone)]
pub struct LocationView<'a> {
    dataset: &'a Dataset,
    location: String,
    rows: Vec<&'a StringRecord>,
}

impl<'a> LocationView<'a> {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fail with `NoData` when the location has no rows
    pub fn require_rows(&self) -> Result<(), DatasetError> {
        if self.rows.is_empty() {
            Err(DatasetError::NoData(self.location.clone()))
        } else {
            Ok(())
        }
    }

    /// The last `n` rows, oldest first
    pub fn recent(&self, n: usize) -> Table {
        let start = self.rows.len().saturating_sub(n);
        Table {
            headers: self.dataset.headers().map(str::to_string).collect(),
            rows: self.rows[start..]
                .iter()
                .map(|r| r.iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Raw trimmed values of a column, empty string for short rows
    pub(crate) fn column(&self, name: &str) -> Result<Vec<&'a str>, DatasetError> {
        let idx = self.dataset.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .copied()
            .map(|r| r.get(idx).map(str::trim).unwrap_or(""))
            .collect())
    }
}
