use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::Driver;
use crate::error::{BasinflowError, Result};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticParams {
    pub mean: f64,
    pub std: f64,
}

/// Draws a climate value from a stationary Normal distribution each day,
/// clamped non-negative. Unlike WGEN this has no seasonal shape and no
/// day-to-day persistence; it is the simple reference driver for quick
/// models and tests.
#[derive(Debug)]
pub struct StochasticDriver {
    params: StochasticParams,
    rng: ChaCha8Rng,
}

impl StochasticDriver {
    pub fn new(params: StochasticParams, seed: u64) -> Result<Self> {
        if params.std < 0.0 {
            return Err(BasinflowError::Configuration(format!(
                "stochastic driver std must be >= 0, got {}",
                params.std
            )));
        }
        Ok(Self {
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl Driver for StochasticDriver {
    fn value_for(&mut self, _date: NaiveDate) -> Result<f64> {
        let dist = Normal::new(self.params.mean, self.params.std).map_err(|e| {
            BasinflowError::Configuration(format!("invalid stochastic driver parameters: {e}"))
        })?;
        let value = dist.sample(&mut self.rng);
        Ok(value.max(0.0))
    }
}
