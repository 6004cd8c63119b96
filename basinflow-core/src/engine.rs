//! Drives a [`Network`] across a [`Timestepper`]'s date range, refreshing
//! the climate registry once per day before any component steps and
//! recording each day's outputs into a [`ResultTable`].

use std::collections::BTreeMap;

use tracing::info;

use crate::drivers::ClimateRegistry;
use crate::error::Result;
use crate::network::Network;
use crate::result::ResultTable;
use crate::timestep::Timestepper;

pub struct Engine {
    network: Network,
    climate: ClimateRegistry,
    timestepper: Timestepper,
}

impl Engine {
    pub fn new(network: Network, climate: ClimateRegistry, timestepper: Timestepper) -> Self {
        Self {
            network,
            climate,
            timestepper,
        }
    }

    pub fn run(&mut self) -> Result<ResultTable> {
        let timesteps = self.timestepper.timesteps();
        info!(count = timesteps.len(), "starting simulation run");

        let mut result = ResultTable::new();
        for timestep in &timesteps {
            self.climate.refresh(timestep.date)?;
            let climate = self.climate.current();

            self.network.step(timestep.date, climate)?;

            let row: BTreeMap<String, f64> = self.network.snapshot().into_iter().collect();
            result.push_row(timestep.date, row);
        }

        info!(rows = result.len(), "simulation run complete");
        Ok(result)
    }
}
