//! Per-date value sources for climate series.
//!
//! Two primitive variants (stochastic, time-series) plus a WGEN-backed
//! facade that shares one generator across the precipitation/temperature/et
//! slots it feeds. Every driver owns its own RNG or lookup state; the
//! registry owns the drivers.

pub mod registry;
pub mod stochastic;
pub mod timeseries;
pub mod wgen_driver;

use chrono::NaiveDate;

use crate::error::Result;

pub trait Driver: std::fmt::Debug {
    fn value_for(&mut self, date: NaiveDate) -> Result<f64>;
}

pub use registry::{ClimateRegistry, ClimateValues};
pub use stochastic::{StochasticDriver, StochasticParams};
pub use timeseries::TimeSeriesDriver;
pub use wgen_driver::{new_wgen_generator, WgenEtDriver, WgenPrecipitationDriver, WgenShared, WgenTemperatureDriver};
