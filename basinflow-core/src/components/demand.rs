use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::drivers::ClimateValues;
use crate::error::Result;

use super::ComponentMeta;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DemandMode {
    Municipal {
        population: f64,
        per_capita_demand_lpd: f64,
        outdoor_area: f64,
        outdoor_coefficient: f64,
    },
    Agricultural {
        irrigated_area: f64,
        crop_coefficient: f64,
    },
}

/// Water extraction with municipal (population + optional outdoor
/// irrigation) or agricultural (area + crop coefficient) demand models.
/// Reads `available_supply` from its `inputs` map and reference ET from
/// the climate registry; supply is capped at demand, never exceeding it.
#[derive(Debug, Clone)]
pub struct DemandComponent {
    pub name: String,
    pub meta: ComponentMeta,
    pub mode: DemandMode,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl DemandComponent {
    pub fn new(name: impl Into<String>, mode: DemandMode) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert("demand".to_string(), 0.0);
        outputs.insert("supplied".to_string(), 0.0);
        outputs.insert("deficit".to_string(), 0.0);
        if matches!(mode, DemandMode::Municipal { .. }) {
            outputs.insert("indoor_demand".to_string(), 0.0);
            outputs.insert("outdoor_demand".to_string(), 0.0);
        }
        Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            mode,
            inputs: HashMap::new(),
            outputs,
        }
    }

    pub fn step(&mut self, _date: NaiveDate, climate: ClimateValues) -> Result<()> {
        let et0 = climate.et;

        let demand = match self.mode {
            DemandMode::Municipal {
                population,
                per_capita_demand_lpd,
                outdoor_area,
                outdoor_coefficient,
            } => {
                let indoor = (population * per_capita_demand_lpd) / 1000.0;
                let outdoor = outdoor_area * outdoor_coefficient * et0 * 10.0;
                self.outputs.insert("indoor_demand".to_string(), indoor);
                self.outputs.insert("outdoor_demand".to_string(), outdoor);
                indoor + outdoor
            }
            DemandMode::Agricultural {
                irrigated_area,
                crop_coefficient,
            } => irrigated_area * crop_coefficient * et0 * 10.0,
        };
        let demand = demand.max(0.0);

        let available_supply = self.inputs.get("available_supply").copied().unwrap_or(0.0).max(0.0);
        let supplied = demand.min(available_supply);
        let deficit = demand - supplied;

        self.outputs.insert("demand".to_string(), demand);
        self.outputs.insert("supplied".to_string(), supplied);
        self.outputs.insert("deficit".to_string(), deficit);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(et: f64) -> ClimateValues {
        ClimateValues {
            precipitation: 0.0,
            temperature: 0.0,
            et,
        }
    }

    #[test]
    fn municipal_demand_combines_indoor_and_outdoor() {
        let mut demand = DemandComponent::new(
            "city",
            DemandMode::Municipal {
                population: 50_000.0,
                per_capita_demand_lpd: 150.0,
                outdoor_area: 25.0,
                outdoor_coefficient: 0.8,
            },
        );
        demand.inputs.insert("available_supply".to_string(), 100_000.0);
        demand.step(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(), climate(5.0)).unwrap();

        let indoor = 50_000.0 * 150.0 / 1000.0;
        let outdoor = 25.0 * 0.8 * 5.0 * 10.0;
        assert_eq!(demand.outputs["indoor_demand"], indoor);
        assert_eq!(demand.outputs["outdoor_demand"], outdoor);
        assert_eq!(demand.outputs["demand"], indoor + outdoor);
        assert_eq!(demand.outputs["supplied"], indoor + outdoor);
        assert_eq!(demand.outputs["deficit"], 0.0);
    }

    #[test]
    fn agricultural_demand_scales_with_et0() {
        let mut demand = DemandComponent::new(
            "farm",
            DemandMode::Agricultural {
                irrigated_area: 500.0,
                crop_coefficient: 0.8,
            },
        );
        demand.inputs.insert("available_supply".to_string(), 10_000.0);
        demand.step(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(), climate(4.0)).unwrap();
        assert_eq!(demand.outputs["demand"], 500.0 * 0.8 * 4.0 * 10.0);
    }

    #[test]
    fn supply_shortfall_produces_deficit() {
        let mut demand = DemandComponent::new(
            "farm",
            DemandMode::Agricultural {
                irrigated_area: 500.0,
                crop_coefficient: 0.8,
            },
        );
        demand.inputs.insert("available_supply".to_string(), 100.0);
        demand.step(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(), climate(4.0)).unwrap();
        assert_eq!(demand.outputs["supplied"], 100.0);
        assert_eq!(demand.outputs["deficit"], demand.outputs["demand"] - 100.0);
    }
}
