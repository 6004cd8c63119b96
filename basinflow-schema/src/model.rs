//! Serde types mirroring a model YAML document one-to-one. Validation and
//! construction of the runtime types these describe happen in `build.rs`;
//! this module only captures shape.

use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub settings: SettingsSchema,
    pub components: IndexMap<String, ComponentSchema>,
    #[serde(default)]
    pub connections: Vec<ConnectionSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSchema {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Only `"1d"` is currently supported; present so a future
    /// sub-daily/weekly timestep has somewhere to be declared.
    #[serde(default = "default_timestep")]
    pub timestep: String,
    pub climate: ClimateSchema,
}

fn default_timestep() -> String {
    "1d".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSchema {
    pub precipitation: DriverSchema,
    pub temperature: DriverSchema,
    pub et: DriverSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DriverSchema {
    Stochastic { mean: f64, std: f64, seed: u64 },
    Timeseries { path: String, column: String },
    /// All three slots set to `wgen` share one generator. Only the
    /// `precipitation` slot needs `params` and `seed`; `temperature`/`et`
    /// slots just need `mode: wgen` to opt into the shared generator.
    Wgen {
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default)]
        params: Option<WgenParamsSchema>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgenParamsSchema {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSchema {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentSchema {
    Catchment {
        area_km2: f64,
        #[serde(default)]
        snow: Option<SnowSchema>,
        #[serde(default)]
        awbm: AwbmSchema,
    },
    Reservoir {
        initial_storage: f64,
        max_storage: f64,
        #[serde(default)]
        surface_area: Option<f64>,
        #[serde(default)]
        spillway_elevation: Option<f64>,
        #[serde(default = "default_spillway_width")]
        spillway_width: f64,
        #[serde(default = "default_spillway_coefficient")]
        spillway_coefficient: f64,
        #[serde(default)]
        eav_table: Option<String>,
    },
    Demand {
        #[serde(flatten)]
        mode: DemandModeSchema,
    },
    Diversion {
        max_diversion: f64,
        #[serde(default)]
        instream_flow: f64,
        #[serde(default)]
        outflows: Vec<OutflowSchema>,
    },
    Junction {},
    Pump {
        #[serde(flatten)]
        control: ControlModeSchema,
        capacity: f64,
        process_variable: String,
        target: TargetSchema,
    },
    LaggedValue {
        #[serde(default)]
        initial_value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowSchema {
    #[serde(default)]
    pub params: Snow17ParamsSchema,
    pub elevation_m: f64,
    pub ref_elevation_m: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Snow17ParamsSchema {
    #[serde(default)]
    pub mfmax: Option<f64>,
    #[serde(default)]
    pub mfmin: Option<f64>,
    #[serde(default)]
    pub mbase: Option<f64>,
    #[serde(default)]
    pub pxtemp1: Option<f64>,
    #[serde(default)]
    pub pxtemp2: Option<f64>,
    #[serde(default)]
    pub scf: Option<f64>,
    #[serde(default)]
    pub nmf: Option<f64>,
    #[serde(default)]
    pub plwhc: Option<f64>,
    #[serde(default)]
    pub uadj: Option<f64>,
    #[serde(default)]
    pub tipm: Option<f64>,
    #[serde(default)]
    pub lapse_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwbmSchema {
    #[serde(default)]
    pub c_vec: Option<[f64; 3]>,
    #[serde(default)]
    pub bfi: Option<f64>,
    #[serde(default)]
    pub ks: Option<f64>,
    #[serde(default)]
    pub kb: Option<f64>,
    #[serde(default)]
    pub a1: Option<f64>,
    #[serde(default)]
    pub a2: Option<f64>,
}

fn default_spillway_width() -> f64 {
    10.0
}

fn default_spillway_coefficient() -> f64 {
    1.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DemandModeSchema {
    Municipal {
        population: f64,
        #[serde(alias = "indoor_demand")]
        per_capita_demand_lpd: f64,
        #[serde(default)]
        outdoor_area: f64,
        #[serde(default = "default_outdoor_coefficient")]
        outdoor_coefficient: f64,
    },
    Agricultural {
        irrigated_area: f64,
        crop_coefficient: f64,
    },
}

fn default_outdoor_coefficient() -> f64 {
    0.8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutflowSchema {
    pub name: String,
    pub priority: i32,
    pub demand: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "control_mode", rename_all = "lowercase")]
pub enum ControlModeSchema {
    Deadband { deadband: f64 },
    Proportional { kp: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSchema {
    Constant(f64),
    Schedule(HashMap<i32, f64>),
}
