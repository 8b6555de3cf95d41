//! Time source for history timestamps, generated ids and daily resets

use std::cell::Cell;

use chrono::{Local, NaiveDate, Utc};

/// Wall clock as seen by the game rules
pub trait Clock {
    /// Unix timestamp in milliseconds
    fn now_ms(&self) -> i64;
    /// Current local calendar date
    fn today(&self) -> NaiveDate;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock for tests and replays
///
/// Every `now_ms` call returns the current value and then advances it by one
/// millisecond, so ids minted back-to-back stay distinct.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Cell<i64>,
    today: Cell<NaiveDate>,
}

impl ManualClock {
    pub fn new(now_ms: i64, today: NaiveDate) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
            today: Cell::new(today),
        }
    }

    /// Move to another calendar day
    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        let now = self.now_ms.get();
        self.now_ms.set(now + 1);
        now
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_ticks() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = ManualClock::new(1_000, day);
        assert_eq!(clock.now_ms(), 1_000);
        assert_eq!(clock.now_ms(), 1_001);
        clock.advance_ms(100);
        assert_eq!(clock.now_ms(), 1_102);

        let next = day.succ_opt().unwrap();
        clock.set_today(next);
        assert_eq!(clock.today(), next);
    }
}
