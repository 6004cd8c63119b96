use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::Result;

use super::ComponentMeta;

/// Delays a single value by one timestep: emits what it captured last step,
/// then captures today's `source` input for next step's emission.
///
/// Every edge targeting a `LaggedValue` is a feedback edge by construction,
/// so the network's topological order never requires this component's
/// source to have stepped yet on the same tick it reads from it — the
/// emit-before-sample order here is what makes that safe.
#[derive(Debug, Clone)]
pub struct LaggedValueComponent {
    pub name: String,
    pub meta: ComponentMeta,
    stored: f64,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl LaggedValueComponent {
    pub fn new(name: impl Into<String>, initial_value: f64) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert("value".to_string(), initial_value);
        Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            stored: initial_value,
            inputs: HashMap::new(),
            outputs,
        }
    }

    pub fn step(&mut self, _date: NaiveDate) -> Result<()> {
        self.outputs.clear();
        self.outputs.insert("value".to_string(), self.stored);

        let source = *self.inputs.get("source").unwrap_or(&0.0);
        self.stored = source;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_seed_value_before_first_sample() {
        let mut lag = LaggedValueComponent::new("lag", 12.0);
        lag.inputs.insert("source".to_string(), 99.0);
        lag.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(lag.outputs["value"], 12.0);
    }

    #[test]
    fn emits_previous_source_one_step_later() {
        let mut lag = LaggedValueComponent::new("lag", 0.0);
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        lag.inputs.insert("source".to_string(), 5.0);
        lag.step(date).unwrap();
        assert_eq!(lag.outputs["value"], 0.0);

        lag.inputs.insert("source".to_string(), 8.0);
        lag.step(date.succ_opt().unwrap()).unwrap();
        assert_eq!(lag.outputs["value"], 5.0);
    }
}
