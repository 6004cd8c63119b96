use crate::error::BasinflowError;
use chrono::{Duration, NaiveDate};

/// A single simulated day.
///
/// The reference implementation only ever steps by whole days; there is
/// deliberately no `PywrDuration`-style variable cadence here, since
/// sub-daily and multi-day timesteps are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestep {
    pub index: usize,
    pub date: NaiveDate,
}

/// Builds the ordered sequence of `Timestep`s between two dates, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestepper {
    start: NaiveDate,
    end: NaiveDate,
}

impl Timestepper {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BasinflowError> {
        if end < start {
            return Err(BasinflowError::Configuration(format!(
                "end_date ({end}) is before start_date ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn timesteps(&self) -> Vec<Timestep> {
        let mut timesteps = Vec::new();
        let mut date = self.start;
        let mut index = 0;
        while date <= self.end {
            timesteps.push(Timestep { index, date });
            date += Duration::days(1);
            index += 1;
        }
        timesteps
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
