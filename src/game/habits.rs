//! Recurring habits
//!
//! Habits never reset. Triggering one applies its fixed effect to the
//! progression engine every time.

use serde::{Deserialize, Serialize};

use super::progression::ProgressionEngine;
use crate::clock::Clock;

pub type HabitId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// Awards XP
    Positive,
    /// Costs XP
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// XP awarded (positive habits)
    #[serde(rename = "xp")]
    pub xp_reward: u64,
    /// XP lost (negative habits)
    pub penalty: u64,
}

impl Habit {
    pub fn positive(id: HabitId, text: impl Into<String>, xp_reward: u64) -> Self {
        Self {
            id,
            text: text.into(),
            kind: HabitKind::Positive,
            xp_reward,
            penalty: 0,
        }
    }

    pub fn negative(id: HabitId, text: impl Into<String>, penalty: u64) -> Self {
        Self {
            id,
            text: text.into(),
            kind: HabitKind::Negative,
            xp_reward: 0,
            penalty,
        }
    }
}

/// The user's habit catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitLedger {
    habits: Vec<Habit>,
}

impl HabitLedger {
    pub fn new(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    /// Starter habits for a new profile
    pub fn seeded() -> Self {
        Self::new(vec![
            Habit::positive(1, "Beber Água (2L)", 10),
            Habit::positive(2, "Ler 10 min", 15),
            Habit::negative(3, "Comer Fast Food", 20),
        ])
    }

    pub fn get(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Apply a habit's effect. Unknown ids do nothing and return false.
    pub fn trigger_habit(
        &self,
        id: HabitId,
        engine: &mut ProgressionEngine,
        clock: &dyn Clock,
    ) -> bool {
        let Some(habit) = self.get(id) else {
            log::debug!("Habit {} not found", id);
            return false;
        };

        match habit.kind {
            HabitKind::Positive => {
                engine.add_xp(habit.xp_reward, clock);
            }
            HabitKind::Negative => engine.remove_xp(habit.penalty, clock),
        }
        log::debug!("Triggered habit '{}'", habit.text);
        true
    }

    /// Create a habit from a base value
    ///
    /// Negative habits cost `value * penalty_multiplier`. The id is the
    /// current time in ms.
    pub fn add_habit(
        &mut self,
        text: impl Into<String>,
        kind: HabitKind,
        value: u64,
        penalty_multiplier: u64,
        clock: &dyn Clock,
    ) -> HabitId {
        let id = clock.now_ms();
        let habit = match kind {
            HabitKind::Positive => Habit::positive(id, text, value),
            HabitKind::Negative => {
                Habit::negative(id, text, value.saturating_mul(penalty_multiplier))
            }
        };
        log::debug!("Added habit {} '{}'", id, habit.text);
        self.habits.push(habit);
        id
    }

    /// Delete a habit. Returns false if it did not exist.
    pub fn remove_habit(&mut self, id: HabitId) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        self.habits.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::game::{HistoryLog, UserProfile};
    use crate::settings::Settings;
    use chrono::NaiveDate;

    fn setup() -> (ManualClock, ProgressionEngine) {
        let clock = ManualClock::new(5_000, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        let engine = ProgressionEngine::new(
            UserProfile::new("Player", "avatar"),
            HistoryLog::new(),
            Settings::default(),
        );
        (clock, engine)
    }

    #[test]
    fn test_trigger_positive_and_negative() {
        let (clock, mut engine) = setup();
        let ledger = HabitLedger::seeded();

        assert!(ledger.trigger_habit(2, &mut engine, &clock));
        assert_eq!(engine.profile().xp, 15);

        assert!(ledger.trigger_habit(3, &mut engine, &clock));
        assert_eq!(engine.profile().xp, 0);
        assert_eq!(engine.history().last().unwrap().value, -20);
    }

    #[test]
    fn test_trigger_unknown_is_silent() {
        let (clock, mut engine) = setup();
        let before = engine.clone();
        assert!(!HabitLedger::seeded().trigger_habit(99, &mut engine, &clock));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_add_negative_habit_doubles_penalty() {
        let (clock, _) = setup();
        let mut ledger = HabitLedger::new(Vec::new());
        let id = ledger.add_habit("Doomscroll", HabitKind::Negative, 15, 2, &clock);
        assert_eq!(id, 5_000);
        let habit = ledger.get(id).unwrap();
        assert_eq!((habit.xp_reward, habit.penalty), (0, 30));

        let id = ledger.add_habit("Stretch", HabitKind::Positive, 5, 2, &clock);
        let habit = ledger.get(id).unwrap();
        assert_eq!((habit.xp_reward, habit.penalty), (5, 0));
    }

    #[test]
    fn test_remove_habit() {
        let mut ledger = HabitLedger::seeded();
        assert!(ledger.remove_habit(1));
        assert!(!ledger.remove_habit(1));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.get(1).is_none());
    }

    #[test]
    fn test_stored_habit_shape() {
        let ledger: HabitLedger = serde_json::from_value(serde_json::json!([
            { "id": 3, "text": "Comer Fast Food", "type": "negative", "xp": 0, "penalty": 20 }
        ]))
        .unwrap();
        assert_eq!(ledger, HabitLedger::new(vec![Habit::negative(3, "Comer Fast Food", 20)]));
    }
}
