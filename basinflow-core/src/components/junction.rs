use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::Result;

use super::ComponentMeta;

/// Stateless confluence: sums every current input into a single `outflow`
/// output. Does not track which upstream component each input came from.
#[derive(Debug, Clone)]
pub struct JunctionComponent {
    pub name: String,
    pub meta: ComponentMeta,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl JunctionComponent {
    pub fn new(name: impl Into<String>) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert("outflow".to_string(), 0.0);
        Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            inputs: HashMap::new(),
            outputs,
        }
    }

    pub fn step(&mut self, _date: NaiveDate) -> Result<()> {
        let total: f64 = self.inputs.values().sum();
        self.outputs.clear();
        self.outputs.insert("outflow".to_string(), total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_all_inputs() {
        let mut junction = JunctionComponent::new("confluence");
        junction.inputs.insert("a".to_string(), 3.0);
        junction.inputs.insert("b".to_string(), 4.5);
        junction.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(junction.outputs["outflow"], 7.5);
    }

    #[test]
    fn no_inputs_gives_zero() {
        let mut junction = JunctionComponent::new("empty");
        junction.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(junction.outputs["outflow"], 0.0);
    }
}
