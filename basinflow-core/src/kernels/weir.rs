//! Rectangular sharp-crested weir discharge: Q = C * L * H^1.5

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeirParams {
    pub coefficient: f64,
    pub width_m: f64,
    pub crest_elevation_m: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct WeirInputs {
    pub water_elevation_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeirOutputs {
    pub discharge_m3s: f64,
    pub discharge_m3d: f64,
    pub head_m: f64,
}

pub fn weir_discharge(inputs: &WeirInputs, params: &WeirParams) -> WeirOutputs {
    let head_m = (inputs.water_elevation_m - params.crest_elevation_m).max(0.0);

    let (discharge_m3s, discharge_m3d) = if head_m > 0.0 {
        let q = params.coefficient * params.width_m * head_m.powf(1.5);
        (q, q * 86400.0)
    } else {
        (0.0, 0.0)
    };

    WeirOutputs {
        discharge_m3s,
        discharge_m3d,
        head_m,
    }
}

/// Alias for [`weir_discharge`], provided for semantic clarity when a
/// spillway (typically broad-crested) rather than a sharp-crested weir is
/// being modelled — the underlying equation is identical.
pub fn spillway_discharge(inputs: &WeirInputs, params: &WeirParams) -> WeirOutputs {
    weir_discharge(inputs, params)
}
