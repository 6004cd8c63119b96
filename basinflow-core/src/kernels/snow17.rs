//! NWS Snow-17 daily snow accumulation / ablation kernel.
//!
//! Pure function: no knowledge of components, graphs or drivers. See
//! Anderson, E. A. (2006), "Snow accumulation and ablation model - SNOW-17".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snow17Params {
    pub mfmax: f64,
    pub mfmin: f64,
    pub mbase: f64,
    pub pxtemp1: f64,
    pub pxtemp2: f64,
    pub scf: f64,
    pub nmf: f64,
    pub plwhc: f64,
    pub uadj: f64,
    pub tipm: f64,
    pub lapse_rate: f64,
}

impl Default for Snow17Params {
    fn default() -> Self {
        Self {
            mfmax: 1.6,
            mfmin: 0.6,
            mbase: 0.0,
            pxtemp1: 0.0,
            pxtemp2: 1.0,
            scf: 1.0,
            nmf: 0.15,
            plwhc: 0.04,
            uadj: 0.05,
            tipm: 0.15,
            lapse_rate: 0.006,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snow17State {
    pub w_i: f64,
    pub w_q: f64,
    pub ait: f64,
    pub deficit: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Snow17Inputs {
    pub temp_c: f64,
    pub precip_mm: f64,
    pub elevation_m: f64,
    pub ref_elevation_m: f64,
    pub day_of_year: u32,
    pub days_in_year: u32,
    pub dt_hours: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snow17Outputs {
    pub runoff_mm: f64,
    pub swe_mm: f64,
    pub rain_mm: f64,
    pub snow_mm: f64,
}

pub fn step(inputs: &Snow17Inputs, params: &Snow17Params, state: &Snow17State) -> (Snow17State, Snow17Outputs) {
    let mut w_i = state.w_i;
    let mut w_q = state.w_q;
    let mut ait = state.ait;
    let mut deficit = state.deficit;

    let dt_6hr_intervals = inputs.dt_hours / 6.0;

    // 1. Adjust temperature for elevation.
    let altitude_adj = params.lapse_rate * (inputs.ref_elevation_m - inputs.elevation_m);
    let t_air_mean = inputs.temp_c + altitude_adj;

    // 2. Partition rain / snow.
    let frac_snow = interpolate_temperature(t_air_mean, params.pxtemp1, params.pxtemp2, 1.0, 0.0);
    let frac_rain = 1.0 - frac_snow;

    let rain = frac_rain * inputs.precip_mm;
    let pn = frac_snow * inputs.precip_mm * params.scf;

    w_i += pn;

    // 3. Energy exchange (ATI & heat deficit).
    let t_snow_new = t_air_mean.min(0.0);

    let delta_hd_snow = -(t_snow_new * pn) / 160.0;

    let tipm_dt = 1.0 - (1.0 - params.tipm).powf(dt_6hr_intervals);
    let timestep_threshold = 1.5 * dt_6hr_intervals;

    if pn > timestep_threshold {
        ait = t_snow_new;
    } else {
        ait += tipm_dt * (t_air_mean - ait);
    }
    ait = ait.min(0.0);

    let mf = melt_factor(
        inputs.day_of_year,
        inputs.days_in_year,
        inputs.latitude,
        params.mfmax,
        params.mfmin,
        dt_6hr_intervals,
    );

    let mut delta_hd_t = params.nmf * dt_6hr_intervals * (mf / params.mfmax) * (ait - t_snow_new);
    delta_hd_t = delta_hd_t.clamp(-10.0, 10.0);

    // 4. Melt calculation.
    let mut melt = 0.0;
    if t_air_mean > params.mbase {
        let is_rain = rain > 0.25 * inputs.dt_hours && t_air_mean > 0.0;
        if is_rain {
            melt = rain_on_snow_melt(t_air_mean, rain, inputs.elevation_m, inputs.dt_hours, dt_6hr_intervals, params.uadj);
        } else {
            let t_rain_energy = t_air_mean.max(params.pxtemp1).max(0.0);
            melt = mf * (t_air_mean - params.mbase) + 0.0125 * rain * t_rain_energy;
        }
        melt = melt.max(0.0);
    }

    // 5. Apply melt and liquid water balance.
    let melt_applied = w_i.min(melt);
    w_i -= melt_applied;
    let melt = melt_applied;

    let qw = melt + rain;
    let w_qx = params.plwhc * w_i;

    deficit += delta_hd_snow + delta_hd_t;
    deficit = deficit.clamp(0.0, 0.33 * w_i);

    // 6. Ripeness and excess water (runoff).
    let excess_melt;
    if w_i + w_q > 0.0 {
        let water_demand_to_ripen = deficit * (1.0 + params.plwhc) + w_qx;
        let current_liquid_plus_new = w_q + qw;

        if current_liquid_plus_new > water_demand_to_ripen {
            excess_melt = current_liquid_plus_new - water_demand_to_ripen;
            w_q = w_qx;
            w_i += deficit;
            deficit = 0.0;
        } else if current_liquid_plus_new >= deficit {
            excess_melt = 0.0;
            w_q = w_q + qw - deficit;
            w_i += deficit;
            deficit = 0.0;
        } else {
            excess_melt = 0.0;
            w_i += qw;
            deficit -= qw;
        }
    } else {
        excess_melt = qw + w_q;
        w_i = 0.0;
        w_q = 0.0;
        deficit = 0.0;
    }

    if deficit == 0.0 {
        ait = 0.0;
    }

    let swe = w_i + w_q;

    (
        Snow17State { w_i, w_q, ait, deficit },
        Snow17Outputs {
            runoff_mm: excess_melt,
            swe_mm: swe,
            rain_mm: rain,
            snow_mm: pn,
        },
    )
}

fn interpolate_temperature(temp: f64, t1: f64, t2: f64, v1: f64, v2: f64) -> f64 {
    if temp <= t1 {
        v1
    } else if temp >= t2 {
        v2
    } else {
        let fraction = (temp - t1) / (t2 - t1);
        v1 + fraction * (v2 - v1)
    }
}

fn melt_factor(day_of_year: u32, days_in_year: u32, lat: f64, mfmax: f64, mfmin: f64, dt_6hr_intervals: f64) -> f64 {
    let n = day_of_year as f64 - 80.0;
    let sv = 0.5 * (n * 2.0 * std::f64::consts::PI / days_in_year as f64).sin() + 0.5;

    let mut av = 1.0;
    if lat >= 54.0 {
        av = if day_of_year <= 78 {
            0.0
        } else if day_of_year <= 116 {
            (day_of_year as f64 - 78.0) / 38.0
        } else if day_of_year <= 228 {
            1.0
        } else if day_of_year <= 266 {
            1.0 - (day_of_year as f64 - 228.0) / 38.0
        } else {
            0.0
        };
    }

    dt_6hr_intervals * (sv * av * (mfmax - mfmin) + mfmin)
}

fn rain_on_snow_melt(t_air: f64, rain: f64, elev: f64, dt_hours: f64, dt_6hr_int: f64, uadj: f64) -> f64 {
    let t_k = t_air + 273.15;

    let sigma = 6.12e-10;
    let m_ros1 = sigma * dt_hours * (t_k.powf(4.0) - 273.15f64.powf(4.0));

    let t_rain = t_air.max(0.0);
    let m_ros2 = 0.0125 * rain * t_rain;

    let p_atm = atm_pressure(elev);
    let e_sat = sat_vapor_pressure(t_air);

    let term3 = (0.9 * e_sat - 6.11) + (0.00057 * p_atm * t_air);
    let m_ros3 = 8.5 * uadj * dt_6hr_int * term3;

    m_ros1.max(0.0) + m_ros2.max(0.0) + m_ros3.max(0.0)
}

fn atm_pressure(elev: f64) -> f64 {
    let elev_100m = elev / 100.0;
    33.86 * (29.9 - 0.335 * elev_100m + 0.00022 * elev_100m.powf(2.4))
}

fn sat_vapor_pressure(temp: f64) -> f64 {
    2.7489e8 * (-4278.63 / (temp + 242.792)).exp()
}
