use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::error::Result;

use super::ComponentMeta;

#[derive(Debug, Clone, Copy)]
pub enum ControlMode {
    Deadband { deadband: f64 },
    Proportional { kp: f64 },
}

#[derive(Debug, Clone)]
pub enum Target {
    Constant(f64),
    /// Sorted (day-of-year, value) pairs, linearly interpolated with
    /// wrap-around across the year boundary.
    Schedule(Vec<(i32, f64)>),
}

/// Feedback control on a monitored process variable (typically a reservoir
/// level), delivered through the generic `inputs["process_variable"]` slot
/// populated by the network's pre-step data transfer — the Rust analogue
/// of looking up a component/output reference directly.
#[derive(Debug, Clone)]
pub struct PumpComponent {
    pub name: String,
    pub meta: ComponentMeta,
    pub capacity: f64,
    pub control_mode: ControlMode,
    pub target: Target,
    pub inputs: HashMap<String, f64>,
    pub outputs: HashMap<String, f64>,
}

impl PumpComponent {
    pub fn new(name: impl Into<String>, capacity: f64, control_mode: ControlMode, target: Target) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert("pumped_flow".to_string(), 0.0);
        outputs.insert("error".to_string(), 0.0);
        outputs.insert("target_value".to_string(), 0.0);
        Self {
            name: name.into(),
            meta: ComponentMeta::default(),
            capacity,
            control_mode,
            target,
            inputs: HashMap::new(),
            outputs,
        }
    }

    fn target_value(&self, date: NaiveDate) -> f64 {
        match &self.target {
            Target::Constant(value) => *value,
            Target::Schedule(points) => {
                if points.len() == 1 {
                    return points[0].1;
                }
                let day = date.ordinal() as i32;
                let first = points[0];
                let last = points[points.len() - 1];

                if day <= first.0 {
                    lerp(day as f64, (last.0 - 366) as f64, last.1, first.0 as f64, first.1)
                } else if day >= last.0 {
                    lerp(day as f64, last.0 as f64, last.1, (first.0 + 366) as f64, first.1)
                } else {
                    let idx = points.partition_point(|(d, _)| *d <= day);
                    let (d0, v0) = points[idx - 1];
                    let (d1, v1) = points[idx];
                    lerp(day as f64, d0 as f64, v0, d1 as f64, v1)
                }
            }
        }
    }

    pub fn step(&mut self, date: NaiveDate) -> Result<()> {
        let current_value = self.inputs.get("process_variable").copied().unwrap_or(0.0);
        let target_value = self.target_value(date);
        let error = target_value - current_value;

        let pumped_flow = match self.control_mode {
            ControlMode::Deadband { deadband } => {
                if error > deadband {
                    self.capacity
                } else {
                    0.0
                }
            }
            ControlMode::Proportional { kp } => (kp * error).clamp(0.0, self.capacity),
        };

        self.outputs.insert("pumped_flow".to_string(), pumped_flow);
        self.outputs.insert("error".to_string(), error);
        self.outputs.insert("target_value".to_string(), target_value);

        Ok(())
    }
}

fn lerp(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadband_pump_turns_on_above_threshold() {
        let mut pump = PumpComponent::new(
            "p1",
            50_000.0,
            ControlMode::Deadband { deadband: 2.0 },
            Target::Constant(100.0),
        );
        pump.inputs.insert("process_variable".to_string(), 95.0);
        pump.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(pump.outputs["pumped_flow"], 50_000.0);
    }

    #[test]
    fn deadband_pump_stays_off_within_threshold() {
        let mut pump = PumpComponent::new(
            "p1",
            50_000.0,
            ControlMode::Deadband { deadband: 2.0 },
            Target::Constant(100.0),
        );
        pump.inputs.insert("process_variable".to_string(), 99.0);
        pump.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(pump.outputs["pumped_flow"], 0.0);
    }

    #[test]
    fn proportional_pump_scales_with_error_and_clamps() {
        let mut pump = PumpComponent::new(
            "p2",
            1_000.0,
            ControlMode::Proportional { kp: 0.1 },
            Target::Constant(1_500_000.0),
        );
        pump.inputs.insert("process_variable".to_string(), 1_000_000.0);
        pump.step(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(pump.outputs["pumped_flow"], 1_000.0);
    }

    #[test]
    fn seasonal_schedule_interpolates_between_points() {
        let schedule = Target::Schedule(vec![(1, 1_000_000.0), (182, 1_500_000.0), (365, 1_000_000.0)]);
        let mut pump = PumpComponent::new("p3", 50_000.0, ControlMode::Proportional { kp: 0.0 }, schedule);
        let midpoint = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(90);
        pump.step(midpoint).unwrap();
        let target = pump.outputs["target_value"];
        assert!(target > 1_000_000.0 && target < 1_500_000.0);
    }

    #[test]
    fn schedule_wraps_across_year_boundary() {
        let schedule = Target::Schedule(vec![(10, 100.0), (300, 200.0)]);
        let mut pump = PumpComponent::new("p4", 1.0, ControlMode::Proportional { kp: 0.0 }, schedule);
        let day5 = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        pump.step(day5).unwrap();
        let target = pump.outputs["target_value"];
        assert!(target > 100.0 && target < 200.0);
    }
}
