//! Sources of the current instant and the current local date.
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate};

/// Anything that can tell the time.
pub trait Clock: Send + Sync {
    /// The current instant in the local time zone.
    fn now(&self) -> DateTime<Local>;

    /// Today's calendar date in the local time zone.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reads the host wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Renders a date the way the last-reset marker is persisted,
/// e.g. `Mon Oct 19 2026`.
pub fn day_stamp(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}
