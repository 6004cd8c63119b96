use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use super::Driver;
use crate::error::{BasinflowError, Result};

/// Reads a historical daily series from a two-column CSV (`date`, `value`)
/// and looks values up by exact date; a missing date is a data error naming
/// the available range rather than a silent interpolation.
#[derive(Debug, Clone)]
pub struct TimeSeriesDriver {
    name: String,
    series: BTreeMap<NaiveDate, f64>,
}

impl TimeSeriesDriver {
    pub fn from_csv(path: impl AsRef<Path>, column: &str, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let date_idx = 0;
        let value_idx = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| BasinflowError::Configuration(format!("column `{column}` not found in {}", path.display())))?;

        let mut series = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            let date_str = record
                .get(date_idx)
                .ok_or_else(|| BasinflowError::Data(format!("missing date column in {}", path.display())))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| BasinflowError::Data(format!("invalid date `{date_str}` in {}: {e}", path.display())))?;
            let value_str = record
                .get(value_idx)
                .ok_or_else(|| BasinflowError::Data(format!("missing value in {}", path.display())))?;
            let value: f64 = value_str
                .parse()
                .map_err(|e| BasinflowError::Data(format!("invalid numeric value `{value_str}` in {}: {e}", path.display())))?;
            series.insert(date, value);
        }

        Ok(Self { name: name.into(), series })
    }

    pub fn from_series(name: impl Into<String>, series: BTreeMap<NaiveDate, f64>) -> Self {
        Self { name: name.into(), series }
    }
}

impl Driver for TimeSeriesDriver {
    fn value_for(&mut self, date: NaiveDate) -> Result<f64> {
        self.series.get(&date).copied().ok_or_else(|| {
            let range = match (self.series.keys().next(), self.series.keys().next_back()) {
                (Some(first), Some(last)) => format!("{first} to {last}"),
                _ => "empty series".to_string(),
            };
            BasinflowError::MissingDataPoint {
                series: format!("{} ({range})", self.name),
                date,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> BTreeMap<NaiveDate, f64> {
        let mut series = BTreeMap::new();
        series.insert(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 1.0);
        series.insert(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), 2.0);
        series
    }

    #[test]
    fn looks_up_exact_date() {
        let mut driver = TimeSeriesDriver::from_series("precip", sample_series());
        let value = driver.value_for(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()).unwrap();
        assert_eq!(value, 2.0);
    }

    #[test]
    fn missing_date_is_a_data_error() {
        let mut driver = TimeSeriesDriver::from_series("precip", sample_series());
        let err = driver.value_for(NaiveDate::from_ymd_opt(2020, 1, 5).unwrap()).unwrap_err();
        assert!(matches!(err, BasinflowError::MissingDataPoint { .. }));
    }
}
