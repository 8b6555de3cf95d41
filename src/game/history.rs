//! Append-only ledger of XP and coin deltas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    XpGain,
    XpLoss,
    CoinGain,
    CoinSpend,
}

/// One recorded delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local calendar date of the change
    pub date: NaiveDate,
    /// Signed delta; losses and spends are negative
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Unix timestamp (ms)
    pub timestamp: i64,
}

/// Entries in append order. Nothing is ever edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, kind: HistoryKind, value: i64, clock: &dyn Clock) {
        self.entries.push(HistoryEntry {
            date: clock.today(),
            value,
            kind,
            timestamp: clock.now_ms(),
        });
    }

    /// Drop entries appended after a transaction snapshot
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded on a given day
    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.date == date)
    }

    /// Sum of |value| over every entry of one kind
    ///
    /// Accumulates in 128 bits; 2^64 entries of `i64::MIN` would be needed
    /// to overflow.
    fn magnitude_of(&self, kind: HistoryKind) -> i128 {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| i128::from(e.value.unsigned_abs()))
            .sum()
    }

    /// XP gained minus XP lost, as recorded (losses count in full even when
    /// the profile's XP was clamped at zero)
    pub fn total_xp_earned(&self) -> i128 {
        self.magnitude_of(HistoryKind::XpGain) - self.magnitude_of(HistoryKind::XpLoss)
    }

    /// Coins gained minus coins spent
    pub fn total_coins_earned(&self) -> i128 {
        self.magnitude_of(HistoryKind::CoinGain) - self.magnitude_of(HistoryKind::CoinSpend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_total_xp_from_stored_history() {
        let log: HistoryLog = serde_json::from_value(json!([
            { "date": "2024-05-01", "value": 50, "type": "xp_gain", "timestamp": 1 },
            { "date": "2024-05-01", "value": -20, "type": "xp_loss", "timestamp": 2 },
        ]))
        .unwrap();
        assert_eq!(log.total_xp_earned(), 30);
        assert_eq!(log.total_coins_earned(), 0);
    }

    #[test]
    fn test_totals_ignore_sign_of_losses() {
        let clock = ManualClock::new(0, day(1));
        let mut log = HistoryLog::new();
        log.append(HistoryKind::CoinGain, 25, &clock);
        log.append(HistoryKind::CoinSpend, -10, &clock);
        log.append(HistoryKind::CoinGain, 15, &clock);
        assert_eq!(log.total_coins_earned(), 30);
    }

    #[test]
    fn test_totals_survive_extreme_stored_values() {
        let log: HistoryLog = serde_json::from_value(json!([
            { "date": "2024-05-01", "value": i64::MAX, "type": "xp_gain", "timestamp": 1 },
            { "date": "2024-05-01", "value": i64::MAX, "type": "xp_gain", "timestamp": 2 },
            { "date": "2024-05-01", "value": i64::MIN, "type": "xp_loss", "timestamp": 3 },
        ]))
        .unwrap();
        let expected = 2 * i128::from(i64::MAX) - i128::from(i64::MIN).abs();
        assert_eq!(log.total_xp_earned(), expected);
    }

    #[test]
    fn test_append_stamps_date_and_order() {
        let clock = ManualClock::new(1_700_000_000_000, day(1));
        let mut log = HistoryLog::new();
        log.append(HistoryKind::XpGain, 10, &clock);
        clock.set_today(day(2));
        log.append(HistoryKind::XpLoss, -5, &clock);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].date, day(1));
        assert!(log.entries()[0].timestamp < log.entries()[1].timestamp);
        assert_eq!(log.entries_on(day(2)).count(), 1);
        assert_eq!(log.last().map(|e| e.kind), Some(HistoryKind::XpLoss));
    }

    #[test]
    fn test_serialized_shape() {
        let clock = ManualClock::new(42, day(3));
        let mut log = HistoryLog::new();
        log.append(HistoryKind::CoinSpend, -7, &clock);
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!([{ "date": "2024-05-03", "value": -7, "type": "coin_spend", "timestamp": 42 }])
        );
    }
}
