//! Turns a parsed [`ModelSchema`] into the runtime types `basinflow-core`
//! actually simulates with: a [`Network`], a [`ClimateRegistry`], and a
//! [`Timestepper`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use basinflow_core::components::{
    AreaMode, Component, ControlMode, DemandComponent, DemandMode, DiversionComponent, JunctionComponent,
    LaggedValueComponent, OutflowSpec, PumpComponent, ReservoirComponent, SnowConfig, Target,
};
use basinflow_core::drivers::{
    new_wgen_generator, ClimateRegistry, Driver, StochasticDriver, StochasticParams, TimeSeriesDriver, WgenEtDriver,
    WgenPrecipitationDriver, WgenShared, WgenTemperatureDriver,
};
use basinflow_core::eav::EavTable;
use basinflow_core::graph::RawConnection;
use basinflow_core::kernels::awbm::AwbmParams;
use basinflow_core::kernels::et::HargreavesEtParams;
use basinflow_core::kernels::snow17::Snow17Params;
use basinflow_core::kernels::weir::WeirParams;
use basinflow_core::kernels::wgen::WgenParams;
use basinflow_core::{Network, Timestepper};
use chrono::NaiveDate;

use crate::error::{Result, SchemaError};
use crate::model::{
    AwbmSchema, ComponentSchema, ControlModeSchema, DemandModeSchema, DriverSchema, ModelSchema, Snow17ParamsSchema,
    TargetSchema, WgenParamsSchema,
};

pub struct BuiltModel {
    pub network: Network,
    pub climate: ClimateRegistry,
    pub timestepper: Timestepper,
}

pub fn build(model: &ModelSchema, yaml_dir: &Path) -> Result<BuiltModel> {
    let timestepper = Timestepper::new(model.settings.start_date, model.settings.end_date)?;

    if model.settings.timestep != "1d" {
        return Err(SchemaError::Schema(format!(
            "unsupported timestep `{}`: only `1d` is currently supported",
            model.settings.timestep
        )));
    }

    let climate = build_climate(model, yaml_dir, model.settings.start_date)?;
    let components = build_components(model, yaml_dir)?;
    let raw_connections: Vec<RawConnection> = model
        .connections
        .iter()
        .map(|c| RawConnection {
            from: c.from.clone(),
            to: c.to.clone(),
        })
        .collect();

    let network = Network::new(components, raw_connections)?;

    Ok(BuiltModel {
        network,
        climate,
        timestepper,
    })
}

fn resolve_path(yaml_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        yaml_dir.join(candidate)
    }
}

enum Slot {
    Precipitation,
    Temperature,
    Et,
}

fn build_climate(model: &ModelSchema, yaml_dir: &Path, start_date: NaiveDate) -> Result<ClimateRegistry> {
    let mut shared: Option<Rc<RefCell<WgenShared>>> = None;

    let precipitation = build_slot_driver(
        &model.settings.climate.precipitation,
        Slot::Precipitation,
        yaml_dir,
        start_date,
        &mut shared,
    )?;
    let temperature = build_slot_driver(
        &model.settings.climate.temperature,
        Slot::Temperature,
        yaml_dir,
        start_date,
        &mut shared,
    )?;
    let et = build_slot_driver(&model.settings.climate.et, Slot::Et, yaml_dir, start_date, &mut shared)?;

    Ok(ClimateRegistry::new(precipitation, temperature, et))
}

fn build_slot_driver(
    schema: &DriverSchema,
    slot: Slot,
    yaml_dir: &Path,
    start_date: NaiveDate,
    shared: &mut Option<Rc<RefCell<WgenShared>>>,
) -> Result<Box<dyn Driver>> {
    match schema {
        DriverSchema::Stochastic { mean, std, seed } => {
            let driver = StochasticDriver::new(StochasticParams { mean: *mean, std: *std }, *seed)?;
            Ok(Box::new(driver))
        }
        DriverSchema::Timeseries { path, column } => {
            let resolved = resolve_path(yaml_dir, path);
            let driver = TimeSeriesDriver::from_csv(resolved, column, column.clone())?;
            Ok(Box::new(driver))
        }
        DriverSchema::Wgen { seed, params } => {
            if shared.is_none() {
                let seed = seed.ok_or_else(|| {
                    SchemaError::Schema("wgen mode requires `seed` on at least one climate slot".to_string())
                })?;
                let params = params.clone().ok_or_else(|| {
                    SchemaError::Schema("wgen mode requires `params` on at least one climate slot".to_string())
                })?;
                let wgen_params: WgenParams = params.into();
                wgen_params.validate()?;
                *shared = Some(new_wgen_generator(wgen_params, seed, start_date));
            }
            let shared_rc = shared.clone().expect("initialized above");
            Ok(match slot {
                Slot::Precipitation => Box::new(WgenPrecipitationDriver::new(shared_rc)),
                Slot::Temperature => Box::new(WgenTemperatureDriver::new(shared_rc)),
                Slot::Et => Box::new(WgenEtDriver::new(shared_rc, HargreavesEtParams::default())),
            })
        }
    }
}

impl From<WgenParamsSchema> for WgenParams {
    fn from(schema: WgenParamsSchema) -> Self {
        WgenParams {
            pww: schema.pww,
            pwd: schema.pwd,
            alpha: schema.alpha,
            beta: schema.beta,
            txmd: schema.txmd,
            atx: schema.atx,
            txmw: schema.txmw,
            tn: schema.tn,
            atn: schema.atn,
            cvtx: schema.cvtx,
            cvtn: schema.cvtn,
            rmd: schema.rmd,
            ar: schema.ar,
            rmw: schema.rmw,
            latitude: schema.latitude,
        }
    }
}

fn build_awbm_params(schema: &AwbmSchema) -> AwbmParams {
    let defaults = AwbmParams::default();
    AwbmParams::new(
        schema.c_vec.unwrap_or(defaults.c_vec),
        schema.bfi.unwrap_or(defaults.bfi),
        schema.ks.unwrap_or(defaults.ks),
        schema.kb.unwrap_or(defaults.kb),
        schema.a1.unwrap_or(defaults.a1),
        schema.a2.unwrap_or(defaults.a2),
    )
}

fn build_snow17_params(schema: &Snow17ParamsSchema) -> Snow17Params {
    let defaults = Snow17Params::default();
    Snow17Params {
        mfmax: schema.mfmax.unwrap_or(defaults.mfmax),
        mfmin: schema.mfmin.unwrap_or(defaults.mfmin),
        mbase: schema.mbase.unwrap_or(defaults.mbase),
        pxtemp1: schema.pxtemp1.unwrap_or(defaults.pxtemp1),
        pxtemp2: schema.pxtemp2.unwrap_or(defaults.pxtemp2),
        scf: schema.scf.unwrap_or(defaults.scf),
        nmf: schema.nmf.unwrap_or(defaults.nmf),
        plwhc: schema.plwhc.unwrap_or(defaults.plwhc),
        uadj: schema.uadj.unwrap_or(defaults.uadj),
        tipm: schema.tipm.unwrap_or(defaults.tipm),
        lapse_rate: schema.lapse_rate.unwrap_or(defaults.lapse_rate),
    }
}

fn build_components(model: &ModelSchema, yaml_dir: &Path) -> Result<Vec<(String, Component)>> {
    let mut components = Vec::with_capacity(model.components.len());

    for (name, schema) in &model.components {
        let component = match schema {
            ComponentSchema::Catchment { area_km2, snow, awbm } => {
                let snow_config = match snow {
                    Some(snow) => Some(SnowConfig {
                        params: build_snow17_params(&snow.params),
                        elevation_m: snow.elevation_m,
                        ref_elevation_m: snow.ref_elevation_m,
                        latitude: snow.latitude,
                    }),
                    None => None,
                };
                Component::Catchment(basinflow_core::components::CatchmentComponent::new(
                    name.clone(),
                    *area_km2,
                    snow_config,
                    build_awbm_params(awbm),
                ))
            }
            ComponentSchema::Reservoir {
                initial_storage,
                max_storage,
                surface_area,
                spillway_elevation,
                spillway_width,
                spillway_coefficient,
                eav_table,
            } => {
                let area_mode = match eav_table {
                    Some(path) => AreaMode::Eav(EavTable::from_csv(resolve_path(yaml_dir, path))?),
                    None => AreaMode::Simple {
                        surface_area_m2: *surface_area,
                    },
                };
                let spillway = spillway_elevation.map(|crest_elevation_m| WeirParams {
                    coefficient: *spillway_coefficient,
                    width_m: *spillway_width,
                    crest_elevation_m,
                });
                Component::Reservoir(ReservoirComponent::new(
                    name.clone(),
                    *initial_storage,
                    *max_storage,
                    area_mode,
                    spillway,
                )?)
            }
            ComponentSchema::Demand { mode } => {
                let demand_mode = match mode {
                    DemandModeSchema::Municipal {
                        population,
                        per_capita_demand_lpd,
                        outdoor_area,
                        outdoor_coefficient,
                    } => DemandMode::Municipal {
                        population: *population,
                        per_capita_demand_lpd: *per_capita_demand_lpd,
                        outdoor_area: *outdoor_area,
                        outdoor_coefficient: *outdoor_coefficient,
                    },
                    DemandModeSchema::Agricultural {
                        irrigated_area,
                        crop_coefficient,
                    } => DemandMode::Agricultural {
                        irrigated_area: *irrigated_area,
                        crop_coefficient: *crop_coefficient,
                    },
                };
                Component::Demand(DemandComponent::new(name.clone(), demand_mode))
            }
            ComponentSchema::Diversion {
                max_diversion,
                instream_flow,
                outflows,
            } => {
                let outflow_specs = outflows
                    .iter()
                    .map(|o| OutflowSpec {
                        name: o.name.clone(),
                        priority: o.priority,
                        demand: o.demand,
                    })
                    .collect();
                Component::Diversion(DiversionComponent::new(
                    name.clone(),
                    *max_diversion,
                    *instream_flow,
                    outflow_specs,
                ))
            }
            ComponentSchema::Junction {} => Component::Junction(JunctionComponent::new(name.clone())),
            ComponentSchema::Pump {
                control,
                capacity,
                process_variable: _,
                target,
            } => {
                let control_mode = match control {
                    ControlModeSchema::Deadband { deadband } => ControlMode::Deadband { deadband: *deadband },
                    ControlModeSchema::Proportional { kp } => ControlMode::Proportional { kp: *kp },
                };
                let target = match target {
                    TargetSchema::Constant(value) => Target::Constant(*value),
                    TargetSchema::Schedule(map) => {
                        let mut points: Vec<(i32, f64)> = map.iter().map(|(day, value)| (*day, *value)).collect();
                        points.sort_by_key(|(day, _)| *day);
                        Target::Schedule(points)
                    }
                };
                Component::Pump(PumpComponent::new(name.clone(), *capacity, control_mode, target))
            }
            ComponentSchema::LaggedValue { initial_value } => {
                Component::LaggedValue(LaggedValueComponent::new(name.clone(), *initial_value))
            }
        };
        components.push((name.clone(), component));
    }

    Ok(components)
}
