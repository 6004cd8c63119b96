//! Elevation-area-volume table for reservoirs: monotone-in-volume,
//! piecewise-linear, clamp-extrapolated at the endpoints.

use std::path::Path;

use crate::error::{BasinflowError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct EavTable {
    /// Rows sorted ascending by volume.
    rows: Vec<EavRow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EavRow {
    elevation: f64,
    area: f64,
    volume: f64,
}

impl EavTable {
    pub fn new(mut rows: Vec<(f64, f64, f64)>) -> Result<Self> {
        if rows.len() < 2 {
            return Err(BasinflowError::Configuration(
                "EAV table must have at least two rows".to_string(),
            ));
        }
        rows.sort_by(|a, b| a.2.partial_cmp(&b.2).expect("volume is not NaN"));
        for pair in rows.windows(2) {
            if pair[1].2 <= pair[0].2 {
                return Err(BasinflowError::Configuration(
                    "EAV table must be strictly monotone increasing in volume".to_string(),
                ));
            }
        }
        let rows = rows
            .into_iter()
            .map(|(elevation, area, volume)| EavRow { elevation, area, volume })
            .collect();
        Ok(Self { rows })
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let elevation: f64 = record.get(0).unwrap_or_default().parse().map_err(|_| {
                BasinflowError::Configuration("EAV table elevation column is not numeric".to_string())
            })?;
            let area: f64 = record.get(1).unwrap_or_default().parse().map_err(|_| {
                BasinflowError::Configuration("EAV table area column is not numeric".to_string())
            })?;
            let volume: f64 = record.get(2).unwrap_or_default().parse().map_err(|_| {
                BasinflowError::Configuration("EAV table volume column is not numeric".to_string())
            })?;
            rows.push((elevation, area, volume));
        }
        Self::new(rows)
    }

    pub fn min_volume(&self) -> f64 {
        self.rows.first().expect("at least two rows").volume
    }

    pub fn max_volume(&self) -> f64 {
        self.rows.last().expect("at least two rows").volume
    }

    pub fn elevation(&self, volume: f64) -> f64 {
        self.interpolate(volume, |row| row.elevation)
    }

    pub fn area(&self, volume: f64) -> f64 {
        self.interpolate(volume, |row| row.area)
    }

    fn interpolate(&self, volume: f64, field: impl Fn(&EavRow) -> f64) -> f64 {
        if volume <= self.rows[0].volume {
            return field(&self.rows[0]);
        }
        let last = self.rows.len() - 1;
        if volume >= self.rows[last].volume {
            return field(&self.rows[last]);
        }

        // Binary search for the first row whose volume exceeds the query.
        let idx = self.rows.partition_point(|row| row.volume <= volume);
        let lo = &self.rows[idx - 1];
        let hi = &self.rows[idx];

        let fraction = (volume - lo.volume) / (hi.volume - lo.volume);
        field(lo) + fraction * (field(hi) - field(lo))
    }
}
