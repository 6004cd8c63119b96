//! WGEN stochastic daily weather generator: Markov wet/dry occurrence, Gamma
//! precipitation amounts, Fourier-seasonal temperature and solar radiation.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{BasinflowError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WgenParams {
    pub pww: [f64; 12],
    pub pwd: [f64; 12],
    pub alpha: [f64; 12],
    pub beta: [f64; 12],
    pub txmd: f64,
    pub atx: f64,
    pub txmw: f64,
    pub tn: f64,
    pub atn: f64,
    pub cvtx: f64,
    pub cvtn: f64,
    pub rmd: f64,
    pub ar: f64,
    pub rmw: f64,
    pub latitude: f64,
}

impl WgenParams {
    pub fn validate(&self) -> Result<()> {
        for (i, (&pww, &pwd)) in self.pww.iter().zip(self.pwd.iter()).enumerate() {
            if !(0.0..=1.0).contains(&pww) {
                return Err(BasinflowError::Configuration(format!("wgen pww[{i}] must be in [0,1], got {pww}")));
            }
            if !(0.0..=1.0).contains(&pwd) {
                return Err(BasinflowError::Configuration(format!("wgen pwd[{i}] must be in [0,1], got {pwd}")));
            }
        }
        for (i, (&alpha, &beta)) in self.alpha.iter().zip(self.beta.iter()).enumerate() {
            if alpha <= 0.0 {
                return Err(BasinflowError::Configuration(format!("wgen alpha[{i}] must be > 0, got {alpha}")));
            }
            if beta <= 0.0 {
                return Err(BasinflowError::Configuration(format!("wgen beta[{i}] must be > 0, got {beta}")));
            }
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(BasinflowError::Configuration(format!(
                "wgen latitude must be in [-90,90], got {}",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// Serializable state: the RNG is data, not an ambient source, which is what
/// keeps `step` a pure function of its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgenState {
    pub is_wet: bool,
    pub rng: ChaCha8Rng,
    pub current_date: NaiveDate,
}

impl WgenState {
    pub fn new(seed: u64, start_date: NaiveDate) -> Self {
        Self {
            is_wet: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_date: start_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WgenOutputs {
    pub precip_mm: f64,
    pub tmax_c: f64,
    pub tmin_c: f64,
    pub solar_mjm2: f64,
    pub is_wet: bool,
}

fn celsius_to_kelvin(t: f64) -> f64 {
    t + 273.15
}

fn kelvin_to_celsius(t: f64) -> f64 {
    t - 273.15
}

fn monthly_params(params: &WgenParams, month: u32) -> (f64, f64, f64, f64) {
    let idx = (month - 1) as usize;
    (params.pww[idx], params.pwd[idx], params.alpha[idx], params.beta[idx])
}

fn seasonal_temp(mean: f64, amplitude: f64, day_of_year: u32, latitude: f64) -> f64 {
    let peak_day = if latitude >= 0.0 { 200.0 } else { 20.0 };
    let angle = 2.0 * std::f64::consts::PI * (day_of_year as f64 - peak_day) / 365.0;
    mean + amplitude * angle.cos()
}

fn seasonal_radiation(mean: f64, amplitude: f64, day_of_year: u32, latitude: f64) -> f64 {
    let peak_day = if latitude >= 0.0 { 172.0 } else { 355.0 };
    let angle = 2.0 * std::f64::consts::PI * (day_of_year as f64 - peak_day) / 365.0;
    (mean + amplitude * angle.cos()).max(0.0)
}

pub fn step(params: &WgenParams, state: &WgenState) -> (WgenState, WgenOutputs) {
    let mut rng = state.rng.clone();

    let current_month = state.current_date.month();
    let (pww, pwd, alpha, beta) = monthly_params(params, current_month);

    let is_wet_today = if state.is_wet {
        rng.gen::<f64>() < pww
    } else {
        rng.gen::<f64>() < pwd
    };

    let precip_mm = if is_wet_today && alpha > 0.0 {
        Gamma::new(alpha, beta).expect("alpha, beta validated > 0").sample(&mut rng)
    } else {
        0.0
    };

    let day_of_year = state.current_date.ordinal();

    let txmd_k = celsius_to_kelvin(params.txmd);
    let txmw_k = celsius_to_kelvin(params.txmw);
    let tn_k = celsius_to_kelvin(params.tn);

    let mut tmax_k = if is_wet_today {
        seasonal_temp(txmw_k, params.atx, day_of_year, params.latitude)
    } else {
        seasonal_temp(txmd_k, params.atx, day_of_year, params.latitude)
    };
    let mut tmin_k = seasonal_temp(tn_k, params.atn, day_of_year, params.latitude);

    tmax_k += Normal::new(0.0, (params.cvtx * tmax_k).abs())
        .expect("std dev is non-negative")
        .sample(&mut rng);
    tmin_k += Normal::new(0.0, (params.cvtn * tmin_k).abs())
        .expect("std dev is non-negative")
        .sample(&mut rng);

    let tmax_c = kelvin_to_celsius(tmax_k);
    let tmin_c = kelvin_to_celsius(tmin_k);

    let solar_mjm2 = if is_wet_today {
        seasonal_radiation(params.rmw, params.ar, day_of_year, params.latitude)
    } else {
        seasonal_radiation(params.rmd, params.ar, day_of_year, params.latitude)
    };

    let outputs = WgenOutputs {
        precip_mm,
        tmax_c,
        tmin_c,
        solar_mjm2,
        is_wet: is_wet_today,
    };

    let new_state = WgenState {
        is_wet: is_wet_today,
        rng,
        current_date: state.current_date.succ_opt().expect("calendar does not overflow during a simulation run"),
    };

    (new_state, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> WgenParams {
        WgenParams {
            pww: [0.5; 12],
            pwd: [0.3; 12],
            alpha: [1.0; 12],
            beta: [10.0; 12],
            txmd: 20.0,
            atx: 10.0,
            txmw: 18.0,
            tn: 10.0,
            atn: 8.0,
            cvtx: 0.1,
            cvtn: 0.1,
            rmd: 15.0,
            ar: 5.0,
            rmw: 12.0,
            latitude: 40.0,
        }
    }

    #[test]
    fn same_seed_reproduces_same_sequence() {
        let params = test_params();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let mut state_a = WgenState::new(42, start);
        let mut state_b = WgenState::new(42, start);

        for _ in 0..30 {
            let (next_a, out_a) = step(&params, &state_a);
            let (next_b, out_b) = step(&params, &state_b);
            assert_eq!(out_a, out_b);
            state_a = next_a;
            state_b = next_b;
        }
    }

    #[test]
    fn different_seeds_eventually_diverge() {
        let params = test_params();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let mut state_a = WgenState::new(1, start);
        let mut state_b = WgenState::new(2, start);
        let mut diverged = false;

        for _ in 0..30 {
            let (next_a, out_a) = step(&params, &state_a);
            let (next_b, out_b) = step(&params, &state_b);
            if out_a != out_b {
                diverged = true;
            }
            state_a = next_a;
            state_b = next_b;
        }
        assert!(diverged);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut params = test_params();
        params.pww[0] = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn dry_day_has_zero_precip() {
        let mut params = test_params();
        params.pwd = [0.0; 12];
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let state = WgenState::new(7, start);
        let (_, outputs) = step(&params, &state);
        assert!(!outputs.is_wet);
        assert_eq!(outputs.precip_mm, 0.0);
    }

    #[test]
    fn degenerate_shape_zero_gives_zero_precip_on_a_wet_day() {
        let mut params = test_params();
        params.alpha = [0.0; 12];
        params.pww = [1.0; 12];
        params.pwd = [1.0; 12];
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let state = WgenState::new(3, start);
        let (_, outputs) = step(&params, &state);
        assert!(outputs.is_wet);
        assert_eq!(outputs.precip_mm, 0.0);
    }
}
