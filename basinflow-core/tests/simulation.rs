//! Scheduler and engine level scenarios that don't fit naturally inside a
//! single module's unit tests: cycle detection across several components,
//! a reservoir run across several days, and a full `Engine` run wired up
//! the way a built model would be.

use chrono::NaiveDate;

use basinflow_core::components::{
    AreaMode, Component, ControlMode, JunctionComponent, LaggedValueComponent, PumpComponent, ReservoirComponent,
    Target,
};
use basinflow_core::drivers::{ClimateRegistry, StochasticDriver, StochasticParams};
use basinflow_core::graph::RawConnection;
use basinflow_core::{Engine, Network, Timestepper};

fn stochastic(mean: f64, std: f64, seed: u64) -> Box<dyn basinflow_core::drivers::Driver> {
    Box::new(StochasticDriver::new(StochasticParams { mean, std }, seed).unwrap())
}

#[test]
fn a_direct_cycle_with_no_lagged_value_is_rejected() {
    let components = vec![
        ("a".to_string(), Component::Junction(JunctionComponent::new("a"))),
        ("b".to_string(), Component::Junction(JunctionComponent::new("b"))),
        ("c".to_string(), Component::Junction(JunctionComponent::new("c"))),
    ];
    let raw = vec![
        RawConnection { from: "a".to_string(), to: "b.outflow".to_string() },
        RawConnection { from: "b".to_string(), to: "c.outflow".to_string() },
        RawConnection { from: "c".to_string(), to: "a.outflow".to_string() },
    ];

    let err = Network::new(components, raw).unwrap_err();
    match err {
        basinflow_core::BasinflowError::Cycle { cycles } => {
            assert_eq!(cycles.len(), 1);
            assert_eq!(cycles[0].len(), 3);
        }
        other => panic!("expected a Cycle error, got {other:?}"),
    }
}

/// A reservoir feeding a pump feeding a lagged value back into the
/// reservoir's release input is a cycle in the raw connection graph, but
/// the edge into the lagged value is a feedback edge, so it's excluded
/// from the strong-edge subgraph the scheduler orders over.
#[test]
fn a_feedback_edge_through_lagged_value_breaks_an_otherwise_cyclic_loop() {
    let reservoir = ReservoirComponent::new(
        "reservoir",
        1_000_000.0,
        5_000_000.0,
        AreaMode::Simple { surface_area_m2: None },
        None,
    )
    .unwrap();
    let pump = PumpComponent::new("pump", 5_000.0, ControlMode::Proportional { kp: 1.0 }, Target::Constant(0.0));
    let lag = LaggedValueComponent::new("lag", 0.0);

    let components = vec![
        ("reservoir".to_string(), Component::Reservoir(reservoir)),
        ("pump".to_string(), Component::Pump(pump)),
        ("lag".to_string(), Component::LaggedValue(lag)),
    ];
    let raw = vec![
        RawConnection { from: "reservoir.storage".to_string(), to: "pump.process_variable".to_string() },
        RawConnection { from: "pump".to_string(), to: "lag.source".to_string() },
        RawConnection { from: "lag".to_string(), to: "reservoir.release".to_string() },
    ];

    let network = Network::new(components, raw).unwrap();
    // the lagged value must come after the pump (it samples the pump's
    // output) but the reservoir has no strong-edge dependency on the lag.
    let order = network.order();
    let pump_pos = order.iter().position(|n| n == "pump").unwrap();
    let lag_pos = order.iter().position(|n| n == "lag").unwrap();
    assert!(pump_pos < lag_pos);
}

#[test]
fn reservoir_mass_balance_closes_across_several_days() {
    let mut reservoir = ReservoirComponent::new(
        "res",
        1_000_000.0,
        5_000_000.0,
        AreaMode::Simple { surface_area_m2: None },
        None,
    )
    .unwrap();

    let mut expected_storage = 1_000_000.0;
    let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for day in 0..5 {
        let inflow = 20_000.0;
        let release = 5_000.0;
        reservoir.inputs.insert("inflow".to_string(), inflow);
        reservoir.inputs.insert("release".to_string(), release);
        reservoir.step(date + chrono::Duration::days(day)).unwrap();

        expected_storage += inflow - release;
        assert_eq!(reservoir.outputs["storage"], expected_storage);
        assert_eq!(reservoir.outputs["outflow"], release);
        assert_eq!(reservoir.outputs["spill"], 0.0);
    }
}

#[test]
fn engine_runs_a_small_network_end_to_end() {
    let components = vec![
        ("inflow".to_string(), Component::Junction(JunctionComponent::new("inflow"))),
        (
            "reservoir".to_string(),
            Component::Reservoir(
                ReservoirComponent::new(
                    "reservoir",
                    500_000.0,
                    2_000_000.0,
                    AreaMode::Simple { surface_area_m2: None },
                    None,
                )
                .unwrap(),
            ),
        ),
    ];
    let raw = vec![RawConnection { from: "inflow".to_string(), to: "reservoir.inflow".to_string() }];
    let network = Network::new(components, raw).unwrap();

    let climate = ClimateRegistry::new(stochastic(5.0, 1.0, 1), stochastic(15.0, 2.0, 2), stochastic(3.0, 0.5, 3));

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
    let timestepper = Timestepper::new(start, end).unwrap();

    let mut engine = Engine::new(network, climate, timestepper);
    let result = engine.run().unwrap();

    assert_eq!(result.len(), 10);
    assert!(result.columns().contains(&"reservoir.storage".to_string()));
}
