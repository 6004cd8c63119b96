//! Network components: stateful nodes that read a generic `inputs` map
//! populated by the network's per-tick data transfer, and write a generic
//! `outputs` map that downstream components and the result table read from.
//!
//! Each variant owns whatever kernel state it wraps; `Component::step`
//! dispatches to the variant's own `step` and is the only thing the
//! scheduler and network need to know about.

pub mod catchment;
pub mod demand;
pub mod diversion;
pub mod junction;
pub mod lagged_value;
pub mod pump;
pub mod reservoir;

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::drivers::ClimateValues;
use crate::error::Result;

pub use catchment::{CatchmentComponent, SnowConfig};
pub use demand::{DemandComponent, DemandMode};
pub use diversion::{DiversionComponent, OutflowSpec};
pub use junction::JunctionComponent;
pub use lagged_value::LaggedValueComponent;
pub use pump::{ControlMode, PumpComponent, Target};
pub use reservoir::{AreaMode, ReservoirComponent};

/// Free-form metadata a schema layer may attach to a component (units,
/// descriptions, provenance) that the simulation engine itself ignores.
pub type ComponentMeta = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub enum Component {
    Catchment(CatchmentComponent),
    Reservoir(ReservoirComponent),
    Demand(DemandComponent),
    Diversion(DiversionComponent),
    Junction(JunctionComponent),
    Pump(PumpComponent),
    LaggedValue(LaggedValueComponent),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Catchment(c) => &c.name,
            Component::Reservoir(c) => &c.name,
            Component::Demand(c) => &c.name,
            Component::Diversion(c) => &c.name,
            Component::Junction(c) => &c.name,
            Component::Pump(c) => &c.name,
            Component::LaggedValue(c) => &c.name,
        }
    }

    pub fn inputs_mut(&mut self) -> &mut HashMap<String, f64> {
        match self {
            Component::Catchment(c) => &mut c.inputs,
            Component::Reservoir(c) => &mut c.inputs,
            Component::Demand(c) => &mut c.inputs,
            Component::Diversion(c) => &mut c.inputs,
            Component::Junction(c) => &mut c.inputs,
            Component::Pump(c) => &mut c.inputs,
            Component::LaggedValue(c) => &mut c.inputs,
        }
    }

    pub fn outputs(&self) -> &HashMap<String, f64> {
        match self {
            Component::Catchment(c) => &c.outputs,
            Component::Reservoir(c) => &c.outputs,
            Component::Demand(c) => &c.outputs,
            Component::Diversion(c) => &c.outputs,
            Component::Junction(c) => &c.outputs,
            Component::Pump(c) => &c.outputs,
            Component::LaggedValue(c) => &c.outputs,
        }
    }

    /// The output name read by a downstream reference that names only the
    /// component (`component`, not `component.output`).
    pub fn default_output(&self) -> Result<&'static str> {
        match self {
            Component::Catchment(_) => Ok("runoff"),
            Component::Reservoir(_) => Ok("outflow"),
            Component::Diversion(_) => Ok("remaining_flow"),
            Component::Junction(_) => Ok("outflow"),
            Component::Pump(_) => Ok("pumped_flow"),
            Component::LaggedValue(_) => Ok("value"),
            Component::Demand(_) => Err(crate::error::BasinflowError::UndefinedReference {
                component: self.name().to_string(),
                output: "<unspecified>".to_string(),
            }),
        }
    }

    pub fn step(&mut self, date: NaiveDate, climate: ClimateValues) -> Result<()> {
        match self {
            Component::Catchment(c) => c.step(date, climate),
            Component::Reservoir(c) => c.step_with_evaporation(date, climate),
            Component::Demand(c) => c.step(date, climate),
            Component::Diversion(c) => c.step(date),
            Component::Junction(c) => c.step(date),
            Component::Pump(c) => c.step(date),
            Component::LaggedValue(c) => c.step(date),
        }
    }
}
