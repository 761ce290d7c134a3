//! The daily "heart nudge" counter.
//!
//! The count is only meaningful for the current calendar day: callers run
//! [`CounterState::check_and_reset_if_new_day`] before reading or incrementing
//! it, which zeroes the count once the day has changed.
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{day_stamp, KeyValueStore, Result, HEART_COUNT_KEY, LAST_RESET_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterState {
    /// Hearts sent since the last reset
    pub heart_count: u64,
    /// Day stamp of the last reset, `None` if the counter was never reset
    pub last_reset_date: Option<String>,
}

impl CounterState {
    /// Reads the persisted count and reset marker.
    ///
    /// A missing or unparsable count is treated as zero.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self> {
        let heart_count = match kv.get(HEART_COUNT_KEY)? {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                warn!("Ignoring invalid heart count '{}': {}", raw, e);
                0
            }),
            None => 0,
        };
        let last_reset_date = kv.get(LAST_RESET_KEY)?;

        debug!(
            "Loaded heart counter: {} (last reset {:?})",
            heart_count, last_reset_date
        );
        Ok(Self {
            heart_count,
            last_reset_date,
        })
    }

    /// Zeroes the counter if `today` differs from the last reset day.
    ///
    /// Only writes when a reset happens.
    pub fn check_and_reset_if_new_day(
        self,
        kv: &mut dyn KeyValueStore,
        today: NaiveDate,
    ) -> Result<Self> {
        let stamp = day_stamp(today);
        if self.last_reset_date.as_deref() == Some(stamp.as_str()) {
            return Ok(self);
        }

        // Count before marker: if the marker write fails, the old date is
        // still stored and the next check simply resets again.
        kv.set(HEART_COUNT_KEY, "0")?;
        kv.set(LAST_RESET_KEY, &stamp)?;

        info!("Heart counter reset for {}", stamp);
        Ok(Self {
            heart_count: 0,
            last_reset_date: Some(stamp),
        })
    }

    /// Adds one heart and persists the new count. The reset marker is left
    /// alone.
    pub fn increment(self, kv: &mut dyn KeyValueStore) -> Result<Self> {
        let heart_count = self.heart_count.saturating_add(1);
        kv.set(HEART_COUNT_KEY, &heart_count.to_string())?;

        debug!("Heart count is now {}", heart_count);
        Ok(Self {
            heart_count,
            ..self
        })
    }
}
