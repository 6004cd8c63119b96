//! Hargreaves-Samani reference evapotranspiration.
//!
//! **[SUPPLEMENT]** not named by the distilled catchment/driver sections, but
//! present in the original reference implementation's climate kernels and
//! needed to derive ET0 from a WGEN-driven climate slot, since WGEN itself
//! only produces temperature and radiation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HargreavesEtParams {
    pub latitude_deg: f64,
    pub coefficient: f64,
}

impl Default for HargreavesEtParams {
    fn default() -> Self {
        Self {
            latitude_deg: 45.0,
            coefficient: 0.0023,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HargreavesEtInputs {
    pub tmin_c: f64,
    pub tmax_c: f64,
    pub day_of_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtOutputs {
    pub et0_mm: f64,
}

pub fn hargreaves_et(inputs: &HargreavesEtInputs, params: &HargreavesEtParams) -> EtOutputs {
    let tmean = (inputs.tmin_c + inputs.tmax_c) / 2.0;
    let trange = (inputs.tmax_c - inputs.tmin_c).max(0.0);

    let ra = extraterrestrial_radiation(inputs.day_of_year, params.latitude_deg);

    let et0_mm = (params.coefficient * ra * (tmean + 17.8) * trange.sqrt()).max(0.0);

    EtOutputs { et0_mm }
}

fn extraterrestrial_radiation(day_of_year: u32, latitude_deg: f64) -> f64 {
    let latitude_rad = latitude_deg.to_radians();
    let gsc = 0.0820;
    let doy = day_of_year as f64;

    let dr = 1.0 + 0.033 * (2.0 * std::f64::consts::PI * doy / 365.0).cos();
    let delta = 0.409 * (2.0 * std::f64::consts::PI * doy / 365.0 - 1.39).sin();
    let ws = (-latitude_rad.tan() * delta.tan()).acos();

    let ra = (24.0 * 60.0 / std::f64::consts::PI)
        * gsc
        * dr
        * (ws * latitude_rad.sin() * delta.sin() + latitude_rad.cos() * delta.cos() * ws.sin());

    ra.max(0.0)
}
