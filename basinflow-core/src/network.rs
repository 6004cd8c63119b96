//! Owns the concrete set of components and their connections, and performs
//! the per-tick data transfer that stands in for direct object references:
//! every input slot is cleared and refilled from the current output of
//! whatever connection feeds it, once per timestep, before any component
//! steps.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::components::Component;
use crate::drivers::ClimateValues;
use crate::error::{BasinflowError, Result};
use crate::graph::{self, Connection, RawConnection};
use crate::scheduler;

#[derive(Debug)]
pub struct Network {
    components: HashMap<String, Component>,
    connections: Vec<Connection>,
    order: Vec<String>,
}

impl Network {
    /// `components` is taken as a `Vec` (rather than a map) purely to give
    /// the scheduler a deterministic tie-break order when several nodes
    /// have no strong-edge dependency on each other; the final order is the
    /// topological sort, not the declaration order.
    pub fn new(components: Vec<(String, Component)>, raw_connections: Vec<RawConnection>) -> Result<Self> {
        let names: Vec<String> = components.iter().map(|(name, _)| name.clone()).collect();
        let map: HashMap<String, Component> = components.into_iter().collect();

        let connections = graph::resolve_connections(&map, &raw_connections)?;
        let order = scheduler::topological_order(&names, &connections)?;

        Ok(Self {
            components: map,
            connections,
            order,
        })
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    fn transfer_inputs(&mut self) {
        for component in self.components.values_mut() {
            component.inputs_mut().clear();
        }

        for connection in &self.connections {
            let value = self
                .components
                .get(&connection.source)
                .and_then(|c| c.outputs().get(&connection.source_output))
                .copied()
                .unwrap_or(0.0);

            if let Some(target) = self.components.get_mut(&connection.target) {
                target.inputs_mut().insert(connection.target_input.clone(), value);
            }
        }
    }

    /// Runs one timestep: clears and refills every input slot, then steps
    /// every component in topological order. On a component failure, wraps
    /// the error with the component's current inputs and date for context.
    pub fn step(&mut self, date: NaiveDate, climate: ClimateValues) -> Result<()> {
        self.transfer_inputs();

        for name in self.order.clone() {
            let component = self.components.get_mut(&name).expect("scheduled node exists");
            let inputs_snapshot = component.inputs_mut().clone();
            component.step(date, climate).map_err(|source| BasinflowError::Simulation {
                component: name.clone(),
                date,
                inputs: inputs_snapshot,
                source: Box::new(source),
            })?;
        }

        Ok(())
    }

    /// Snapshot of every `component.output` value after the most recent
    /// step, for the engine to record into the result table.
    pub fn snapshot(&self) -> Vec<(String, f64)> {
        let mut values = Vec::new();
        for name in &self.order {
            if let Some(component) = self.components.get(name) {
                for (output, value) in component.outputs() {
                    values.push((format!("{name}.{output}"), *value));
                }
            }
        }
        values
    }
}
