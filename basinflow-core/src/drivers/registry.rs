use chrono::NaiveDate;

use super::Driver;
use crate::error::Result;

/// Values read by components for the current date; refreshed exactly once
/// per timestep by [`ClimateRegistry::refresh`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateValues {
    pub precipitation: f64,
    pub temperature: f64,
    pub et: f64,
}

/// Type-safe namespace for the three climate drivers a catchment reads.
/// Owns its drivers exclusively; lifetime equals the model's.
pub struct ClimateRegistry {
    precipitation: Box<dyn Driver>,
    temperature: Box<dyn Driver>,
    et: Box<dyn Driver>,
    current: ClimateValues,
}

impl ClimateRegistry {
    pub fn new(precipitation: Box<dyn Driver>, temperature: Box<dyn Driver>, et: Box<dyn Driver>) -> Self {
        Self {
            precipitation,
            temperature,
            et,
            current: ClimateValues::default(),
        }
    }

    /// Pulls today's value from each driver. Called once by the engine at
    /// the top of every timestep, before any component steps.
    pub fn refresh(&mut self, date: NaiveDate) -> Result<()> {
        self.current = ClimateValues {
            precipitation: self.precipitation.value_for(date)?,
            temperature: self.temperature.value_for(date)?,
            et: self.et.value_for(date)?,
        };
        Ok(())
    }

    pub fn current(&self) -> ClimateValues {
        self.current
    }
}

impl std::fmt::Debug for ClimateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClimateRegistry").field("current", &self.current).finish()
    }
}
