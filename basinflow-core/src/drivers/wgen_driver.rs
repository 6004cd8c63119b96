use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};

use super::Driver;
use crate::error::Result;
use crate::kernels::et::{hargreaves_et, HargreavesEtParams};
use crate::kernels::wgen::{self, WgenOutputs, WgenParams, WgenState};

/// WGEN produces a correlated (precip, tmax, tmin, solar) quadruple per day.
/// When a model's `precipitation`, `temperature` and `et` climate slots all
/// use `mode: wgen`, they must draw from the *same* generator step rather
/// than three independent ones, or the correlation between precipitation
/// occurrence and temperature that WGEN encodes would be lost. This shared
/// cell advances the generator at most once per date and memoizes the
/// result for whichever facade asks first.
#[derive(Debug)]
pub struct WgenShared {
    params: WgenParams,
    state: WgenState,
    cached: Option<(NaiveDate, WgenOutputs)>,
}

impl WgenShared {
    fn outputs_for(&mut self, date: NaiveDate) -> WgenOutputs {
        if let Some((cached_date, outputs)) = &self.cached {
            if *cached_date == date {
                return *outputs;
            }
        }
        // WGEN only knows how to advance one day at a time; the generator's
        // internal date must already equal the requested date, which holds
        // as long as the engine always calls refresh() in date order.
        let (new_state, outputs) = wgen::step(&self.params, &self.state);
        self.state = new_state;
        self.cached = Some((date, outputs));
        outputs
    }
}

pub fn new_wgen_generator(params: WgenParams, seed: u64, start_date: NaiveDate) -> Rc<RefCell<WgenShared>> {
    Rc::new(RefCell::new(WgenShared {
        params,
        state: WgenState::new(seed, start_date),
        cached: None,
    }))
}

#[derive(Debug)]
pub struct WgenPrecipitationDriver {
    shared: Rc<RefCell<WgenShared>>,
}

impl WgenPrecipitationDriver {
    pub fn new(shared: Rc<RefCell<WgenShared>>) -> Self {
        Self { shared }
    }
}

impl Driver for WgenPrecipitationDriver {
    fn value_for(&mut self, date: NaiveDate) -> Result<f64> {
        Ok(self.shared.borrow_mut().outputs_for(date).precip_mm)
    }
}

#[derive(Debug)]
pub struct WgenTemperatureDriver {
    shared: Rc<RefCell<WgenShared>>,
}

impl WgenTemperatureDriver {
    pub fn new(shared: Rc<RefCell<WgenShared>>) -> Self {
        Self { shared }
    }
}

impl Driver for WgenTemperatureDriver {
    fn value_for(&mut self, date: NaiveDate) -> Result<f64> {
        let outputs = self.shared.borrow_mut().outputs_for(date);
        Ok((outputs.tmax_c + outputs.tmin_c) / 2.0)
    }
}

/// Derives reference ET from the WGEN-generated temperature extremes via
/// Hargreaves-Samani, since WGEN itself has no ET output.
#[derive(Debug)]
pub struct WgenEtDriver {
    shared: Rc<RefCell<WgenShared>>,
    params: HargreavesEtParams,
}

impl WgenEtDriver {
    pub fn new(shared: Rc<RefCell<WgenShared>>, params: HargreavesEtParams) -> Self {
        Self { shared, params }
    }
}

impl Driver for WgenEtDriver {
    fn value_for(&mut self, date: NaiveDate) -> Result<f64> {
        let outputs = self.shared.borrow_mut().outputs_for(date);
        let et = hargreaves_et(
            &crate::kernels::et::HargreavesEtInputs {
                tmin_c: outputs.tmin_c,
                tmax_c: outputs.tmax_c,
                day_of_year: date.ordinal(),
            },
            &self.params,
        );
        Ok(et.et0_mm)
    }
}
