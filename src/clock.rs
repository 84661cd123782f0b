//! Injected clock
//!
//! Due-date and overdue computations never read the wall clock directly;
//! operations take the current date from a [`Clock`] supplied at engine
//! construction, which keeps them deterministic under test.

use std::sync::Mutex;

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock backed implementation used in deployments.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually advanced clock for tests and replay tooling.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.today.lock().unwrap();
        *guard = *guard + chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
