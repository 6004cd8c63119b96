use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::Result;

use super::ComponentMeta;

#[derive(Debug, Clone)]
pub struct OutflowSpec {
    pub name: String,
    pub priority: i32,
    pub demand: f64,
}

/// Priority-based allocation from a single river flow input: instream flow
/// requirement first, then named outflows in ascending priority order (each
/// capped at its own demand), with whatever remains continuing downstream.
#[derive(Debug, Clone)]
pub struct DiversionComponent {
    pub name: String,
    pub meta: ComponentMeta,
    pub max_diversion: f64,
    pub instream_flow_requirement: f64,
    outflows: Vec<OutflowSpec>,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl DiversionComponent {
    pub fn new(
        name: impl Into<String>,
        max_diversion: f64,
        instream_flow_requirement: f64,
        mut outflows: Vec<OutflowSpec>,
    ) -> Self {
        outflows.sort_by_key(|spec| spec.priority);

        let mut outputs = HashMap::new();
        outputs.insert("diverted_flow".to_string(), 0.0);
        outputs.insert("remaining_flow".to_string(), 0.0);
        outputs.insert("instream_flow".to_string(), 0.0);
        for spec in &outflows {
            outputs.insert(spec.name.clone(), 0.0);
            outputs.insert(format!("{}_deficit", spec.name), 0.0);
        }

        Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            max_diversion,
            instream_flow_requirement,
            outflows,
            inputs: HashMap::new(),
            outputs,
        }
    }

    pub fn step(&mut self, _date: NaiveDate) -> Result<()> {
        let river_flow = self.inputs.get("river_flow").copied().unwrap_or(0.0).max(0.0);

        let mut available = river_flow;
        let instream_allocated = available.min(self.instream_flow_requirement);
        available -= instream_allocated;

        let max_divertible = available.min(self.max_diversion);
        let mut available_for_outflows = max_divertible;

        let mut total_diverted = 0.0;
        if self.outflows.is_empty() {
            total_diverted = max_divertible;
        } else {
            for spec in &self.outflows {
                let allocated = available_for_outflows.min(spec.demand);
                let deficit = spec.demand - allocated;
                self.outputs.insert(spec.name.clone(), allocated);
                self.outputs.insert(format!("{}_deficit", spec.name), deficit);
                total_diverted += allocated;
                available_for_outflows -= allocated;
            }
        }

        let remaining_flow = river_flow - instream_allocated - total_diverted;

        self.outputs.insert("diverted_flow".to_string(), total_diverted);
        self.outputs.insert("remaining_flow".to_string(), remaining_flow);
        self.outputs.insert("instream_flow".to_string(), instream_allocated);

        Ok(())
    }
}
