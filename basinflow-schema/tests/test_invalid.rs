//! Documents that are syntactically valid YAML but describe an impossible
//! or underspecified model. Each one should fail in `build`, not panic or
//! silently succeed.

use std::path::Path;

fn try_build(yaml: &str) -> basinflow_schema::Result<basinflow_schema::BuiltModel> {
    basinflow_schema::load(yaml, Path::new("."))
}

const BASE_SETTINGS: &str = r#"
name: invalid-model
settings:
  start_date: 2020-01-01
  end_date: 2020-01-05
  climate:
    precipitation: { mode: stochastic, mean: 2.0, std: 0.5, seed: 1 }
    temperature: { mode: stochastic, mean: 15.0, std: 3.0, seed: 2 }
    et: { mode: stochastic, mean: 3.0, std: 0.5, seed: 3 }
"#;

#[test]
fn spillway_without_eav_table_is_rejected() {
    let yaml = format!(
        "{BASE_SETTINGS}components:\n  res:\n    type: Reservoir\n    initial_storage: 1000.0\n    max_storage: 5000.0\n    spillway_elevation: 100.0\nconnections: []\n"
    );
    let err = try_build(&yaml).unwrap_err();
    assert!(matches!(err, basinflow_schema::SchemaError::Core(_)));
}

#[test]
fn connection_to_an_undefined_component_is_rejected() {
    let yaml = format!(
        "{BASE_SETTINGS}components:\n  a:\n    type: Junction\nconnections:\n  - from: a\n    to: nonexistent.outflow\n"
    );
    assert!(try_build(&yaml).is_err());
}

#[test]
fn connection_to_an_unknown_output_is_rejected() {
    let yaml = format!(
        "{BASE_SETTINGS}components:\n  a:\n    type: Junction\n  b:\n    type: Junction\nconnections:\n  - from: a.not_an_output\n    to: b.outflow\n"
    );
    assert!(try_build(&yaml).is_err());
}

#[test]
fn a_strong_cycle_with_no_lagged_value_is_rejected() {
    let yaml = format!(
        "{BASE_SETTINGS}components:\n  a:\n    type: Junction\n  b:\n    type: Junction\nconnections:\n  - from: a\n    to: b.outflow\n  - from: b\n    to: a.outflow\n"
    );
    let err = try_build(&yaml).unwrap_err();
    assert!(matches!(
        err,
        basinflow_schema::SchemaError::Core(basinflow_core::BasinflowError::Cycle { .. })
    ));
}

#[test]
fn an_unsupported_timestep_is_rejected() {
    let yaml = format!(
        "name: invalid-model\nsettings:\n  start_date: 2020-01-01\n  end_date: 2020-01-05\n  timestep: \"7d\"\n  climate:\n    precipitation: {{ mode: stochastic, mean: 2.0, std: 0.5, seed: 1 }}\n    temperature: {{ mode: stochastic, mean: 15.0, std: 3.0, seed: 2 }}\n    et: {{ mode: stochastic, mean: 3.0, std: 0.5, seed: 3 }}\ncomponents:\n  a:\n    type: Junction\nconnections: []\n"
    );
    assert!(try_build(&yaml).is_err());
}
