use chrono::NaiveDate;
use std::collections::HashMap;

use crate::drivers::ClimateValues;
use crate::eav::EavTable;
use crate::error::{BasinflowError, Result};
use crate::kernels::weir::{spillway_discharge, WeirInputs, WeirParams};

use super::ComponentMeta;

/// Simple mode tracks a constant surface area (or none, if evaporation
/// shouldn't be modelled); EAV mode derives area and elevation from a
/// volume table and is the only mode a spillway may be attached to.
#[derive(Debug, Clone)]
pub enum AreaMode {
    Simple { surface_area_m2: Option<f64> },
    Eav(EavTable),
}

/// Storage node with mass-balance inflow/release/evaporation accounting
/// and an optional spillway. Mirrors the two-stage shortfall rule: when
/// storage would go negative, release is cut back first, and only if that
/// still isn't enough is evaporation reduced down to whatever water remains.
#[derive(Debug, Clone)]
pub struct ReservoirComponent {
    pub name: String,
    pub meta: ComponentMeta,
    pub max_storage: f64,
    storage: f64,
    area_mode: AreaMode,
    spillway: Option<WeirParams>,
    current_area: Option<f64>,
    current_elevation: Option<f64>,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl ReservoirComponent {
    pub fn new(
        name: impl Into<String>,
        initial_storage: f64,
        max_storage: f64,
        area_mode: AreaMode,
        spillway: Option<WeirParams>,
    ) -> Result<Self> {
        if initial_storage > max_storage {
            return Err(BasinflowError::Configuration(format!(
                "initial_storage ({initial_storage}) cannot exceed max_storage ({max_storage})"
            )));
        }
        if spillway.is_some() && !matches!(area_mode, AreaMode::Eav(_)) {
            return Err(BasinflowError::Configuration(
                "a spillway requires an EAV table for elevation tracking".to_string(),
            ));
        }

        let (current_area, current_elevation) = match &area_mode {
            AreaMode::Simple { surface_area_m2 } => (*surface_area_m2, None),
            AreaMode::Eav(eav) => (
                Some(eav.area(initial_storage)),
                Some(eav.elevation(initial_storage)),
            ),
        };

        let mut outputs = HashMap::new();
        outputs.insert("storage".to_string(), initial_storage);
        outputs.insert("outflow".to_string(), 0.0);
        outputs.insert("spill".to_string(), 0.0);
        if let Some(elevation) = current_elevation {
            outputs.insert("elevation".to_string(), elevation);
        }
        if let Some(area) = current_area {
            outputs.insert("area".to_string(), area);
        }
        if current_area.is_some() {
            outputs.insert("evaporation_loss".to_string(), 0.0);
        }

        Ok(Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            max_storage,
            storage: initial_storage,
            area_mode,
            spillway,
            current_area,
            current_elevation,
            inputs: HashMap::new(),
            outputs,
        })
    }

    pub fn step(&mut self, date: NaiveDate) -> Result<()> {
        self.step_with_evaporation(date, ClimateValues::default())
    }

    pub fn step_with_evaporation(&mut self, _date: NaiveDate, climate: ClimateValues) -> Result<()> {
        let mut inflow: f64 = self
            .inputs
            .iter()
            .filter(|(key, _)| key.starts_with("inflow_"))
            .map(|(_, value)| *value)
            .sum();
        if let Some(legacy) = self.inputs.get("inflow") {
            inflow += legacy;
        }
        inflow = inflow.max(0.0);

        let mut release = self.inputs.get("release").copied().unwrap_or(0.0).max(0.0);

        let mut evaporation_loss = 0.0;
        if let Some(area) = self.current_area {
            evaporation_loss = ((climate.et * area) / 1000.0).max(0.0);
        }

        let mut new_storage = self.storage + inflow - release - evaporation_loss;

        if new_storage < 0.0 {
            let available = self.storage + inflow;
            let mut actual_release = (available - evaporation_loss).max(0.0);
            if available - evaporation_loss < 0.0 {
                actual_release = 0.0;
                evaporation_loss = available;
            }
            new_storage = 0.0;
            release = actual_release;
        }

        let mut spill = 0.0;
        match (&self.spillway, &self.area_mode) {
            (Some(spillway_params), AreaMode::Eav(eav)) => {
                let temp_elevation = eav.elevation(new_storage);
                let weir_outputs = spillway_discharge(
                    &WeirInputs {
                        water_elevation_m: temp_elevation,
                    },
                    spillway_params,
                );
                spill = weir_outputs.discharge_m3d;
                new_storage -= spill;
                if new_storage < 0.0 {
                    spill += new_storage;
                    new_storage = 0.0;
                }
            }
            _ => {
                if new_storage > self.max_storage {
                    spill = new_storage - self.max_storage;
                    new_storage = self.max_storage;
                }
            }
        }

        self.storage = new_storage;

        if let AreaMode::Eav(eav) = &self.area_mode {
            self.current_elevation = Some(eav.elevation(self.storage));
            self.current_area = Some(eav.area(self.storage));
        }

        let outflow = release + spill;

        self.outputs.insert("storage".to_string(), self.storage);
        self.outputs.insert("outflow".to_string(), outflow);
        self.outputs.insert("spill".to_string(), spill);
        if let Some(elevation) = self.current_elevation {
            self.outputs.insert("elevation".to_string(), elevation);
        }
        if let Some(area) = self.current_area {
            self.outputs.insert("area".to_string(), area);
        }
        if self.current_area.is_some() {
            self.outputs.insert("evaporation_loss".to_string(), evaporation_loss);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_balance_without_spillway() {
        let mut reservoir = ReservoirComponent::new(
            "simple",
            1_000_000.0,
            5_000_000.0,
            AreaMode::Simple { surface_area_m2: None },
            None,
        )
        .unwrap();
        reservoir.inputs.insert("inflow".to_string(), 10_000.0);
        reservoir.inputs.insert("release".to_string(), 4_000.0);
        reservoir.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(reservoir.outputs["storage"], 1_006_000.0);
        assert_eq!(reservoir.outputs["outflow"], 4_000.0);
        assert_eq!(reservoir.outputs["spill"], 0.0);
    }

    #[test]
    fn simple_overflow_spills_above_max_storage() {
        let mut reservoir = ReservoirComponent::new(
            "simple",
            4_990_000.0,
            5_000_000.0,
            AreaMode::Simple { surface_area_m2: None },
            None,
        )
        .unwrap();
        reservoir.inputs.insert("inflow".to_string(), 50_000.0);
        reservoir.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(reservoir.outputs["storage"], 5_000_000.0);
        assert_eq!(reservoir.outputs["spill"], 40_000.0);
    }

    #[test]
    fn insufficient_water_reduces_release_before_evaporation() {
        let mut reservoir = ReservoirComponent::new(
            "dry",
            100.0,
            5_000_000.0,
            AreaMode::Simple {
                surface_area_m2: Some(1000.0),
            },
            None,
        )
        .unwrap();
        reservoir.inputs.insert("release".to_string(), 500.0);
        let climate = ClimateValues {
            precipitation: 0.0,
            temperature: 0.0,
            et: 1.0,
        };
        reservoir
            .step_with_evaporation(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), climate)
            .unwrap();
        assert_eq!(reservoir.outputs["storage"], 0.0);
        let evap_loss = reservoir.outputs["evaporation_loss"];
        assert_eq!(reservoir.outputs["outflow"], 100.0 - evap_loss);
    }

    #[test]
    fn eav_mode_spillway_activates_above_crest() {
        let eav = EavTable::new(vec![(90.0, 100_000.0, 0.0), (110.0, 200_000.0, 5_000_000.0)]).unwrap();
        let spillway = WeirParams {
            coefficient: 1.7,
            width_m: 15.0,
            crest_elevation_m: 100.0,
        };
        let mut reservoir =
            ReservoirComponent::new("eav", 4_900_000.0, 5_000_000.0, AreaMode::Eav(eav), Some(spillway)).unwrap();
        reservoir.inputs.insert("inflow".to_string(), 200_000.0);
        reservoir.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert!(reservoir.outputs["spill"] > 0.0);
        assert!(reservoir.outputs["storage"] < 5_100_000.0);
    }

    #[test]
    fn spillway_without_eav_table_is_rejected() {
        let spillway = WeirParams {
            coefficient: 1.7,
            width_m: 15.0,
            crest_elevation_m: 100.0,
        };
        let result = ReservoirComponent::new(
            "bad",
            1_000.0,
            5_000_000.0,
            AreaMode::Simple { surface_area_m2: None },
            Some(spillway),
        );
        assert!(result.is_err());
    }
}
