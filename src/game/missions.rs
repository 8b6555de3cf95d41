//! Daily missions
//!
//! Missions are grouped into three categories and reset to pending at most
//! once per calendar day. Completing a mission pays its reward in coins;
//! undoing it tries to take the reward back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::progression::ProgressionEngine;
use crate::clock::Clock;

pub type MissionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionCategory {
    Main,
    Secondary,
    Bonus,
}

impl MissionCategory {
    pub const ALL: [MissionCategory; 3] = [
        MissionCategory::Main,
        MissionCategory::Secondary,
        MissionCategory::Bonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionCategory::Main => "main",
            MissionCategory::Secondary => "secondary",
            MissionCategory::Bonus => "bonus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "main" => Some(MissionCategory::Main),
            "secondary" => Some(MissionCategory::Secondary),
            "bonus" => Some(MissionCategory::Bonus),
            _ => None,
        }
    }

    /// Conventional coin reward for a new mission in this category
    pub fn default_reward(&self) -> u64 {
        match self {
            MissionCategory::Main => 25,
            MissionCategory::Secondary => 15,
            MissionCategory::Bonus => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub text: String,
    /// Coins paid on completion
    pub reward: u64,
    completed: bool,
}

impl Mission {
    pub fn new(id: MissionId, text: impl Into<String>, reward: u64) -> Self {
        Self {
            id,
            text: text.into(),
            reward,
            completed: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// Result of toggling a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionToggle {
    /// Pending → completed, reward paid
    Completed { reward: u64 },
    /// Completed → pending, reward taken back
    Refunded { reward: u64 },
    /// Completed → pending, but the balance could not cover the reward.
    /// The mission stays pending and the coins stay with the player.
    RefundFailed { reward: u64 },
}

/// Missions per category, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dailies {
    pub main: Vec<Mission>,
    pub secondary: Vec<Mission>,
    pub bonus: Vec<Mission>,
}

impl Dailies {
    pub fn list(&self, category: MissionCategory) -> &[Mission] {
        match category {
            MissionCategory::Main => &self.main,
            MissionCategory::Secondary => &self.secondary,
            MissionCategory::Bonus => &self.bonus,
        }
    }

    fn list_mut(&mut self, category: MissionCategory) -> &mut Vec<Mission> {
        match category {
            MissionCategory::Main => &mut self.main,
            MissionCategory::Secondary => &mut self.secondary,
            MissionCategory::Bonus => &mut self.bonus,
        }
    }
}

/// Daily mission lists plus the date they were last reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionBoard {
    last_reset: NaiveDate,
    dailies: Dailies,
}

impl MissionBoard {
    pub fn new(last_reset: NaiveDate, dailies: Dailies) -> Self {
        Self {
            last_reset,
            dailies,
        }
    }

    pub fn last_reset(&self) -> NaiveDate {
        self.last_reset
    }

    pub fn dailies(&self) -> &Dailies {
        &self.dailies
    }

    pub fn missions(&self, category: MissionCategory) -> &[Mission] {
        self.dailies.list(category)
    }

    pub fn get(&self, category: MissionCategory, id: MissionId) -> Option<&Mission> {
        self.missions(category).iter().find(|m| m.id == id)
    }

    /// Every mission with its category
    pub fn iter(&self) -> impl Iterator<Item = (MissionCategory, &Mission)> {
        MissionCategory::ALL
            .into_iter()
            .flat_map(move |cat| self.missions(cat).iter().map(move |m| (cat, m)))
    }

    /// Reset if the calendar day changed since the last reset
    pub fn check_daily_reset(&mut self, today: NaiveDate) -> bool {
        if self.last_reset == today {
            return false;
        }
        log::info!("New day ({} → {}), resetting dailies", self.last_reset, today);
        self.reset_dailies();
        self.last_reset = today;
        true
    }

    /// Mark every mission pending. Coins already paid are kept.
    pub fn reset_dailies(&mut self) {
        for category in MissionCategory::ALL {
            for mission in self.dailies.list_mut(category) {
                mission.completed = false;
            }
        }
    }

    /// Flip a mission's state and settle its reward
    ///
    /// Returns `None` when the mission does not exist.
    pub fn toggle_mission(
        &mut self,
        category: MissionCategory,
        id: MissionId,
        engine: &mut ProgressionEngine,
        clock: &dyn Clock,
    ) -> Option<MissionToggle> {
        let Some(mission) = self
            .dailies
            .list_mut(category)
            .iter_mut()
            .find(|m| m.id == id)
        else {
            log::debug!("Mission {} not found in {}", id, category.as_str());
            return None;
        };

        let reward = mission.reward;
        if !mission.completed {
            mission.completed = true;
            engine.add_coins(reward, clock);
            return Some(MissionToggle::Completed { reward });
        }

        mission.completed = false;
        if engine.remove_coins(reward, clock) {
            Some(MissionToggle::Refunded { reward })
        } else {
            log::warn!(
                "Mission {} undone but {} coins could not be taken back",
                id,
                reward
            );
            Some(MissionToggle::RefundFailed { reward })
        }
    }

    /// Append a pending mission. The id is the current time in ms.
    pub fn add_mission(
        &mut self,
        category: MissionCategory,
        text: impl Into<String>,
        reward: u64,
        clock: &dyn Clock,
    ) -> MissionId {
        let id = clock.now_ms();
        self.dailies
            .list_mut(category)
            .push(Mission::new(id, text, reward));
        id
    }

    pub fn delete_mission(&mut self, category: MissionCategory, id: MissionId) -> bool {
        let list = self.dailies.list_mut(category);
        match list.iter().position(|m| m.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::game::{HistoryLog, UserProfile};
    use crate::settings::Settings;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn setup() -> (ManualClock, ProgressionEngine, MissionBoard) {
        let clock = ManualClock::new(10_000, day(2));
        let engine = ProgressionEngine::new(
            UserProfile::new("Player", "avatar"),
            HistoryLog::new(),
            Settings::default(),
        );
        (clock, engine, MissionBoard::new(day(2), Dailies::default()))
    }

    #[test]
    fn test_toggle_round_trip() {
        let (clock, mut engine, mut board) = setup();
        let id = board.add_mission(MissionCategory::Main, "Ship it", 25, &clock);

        let outcome = board.toggle_mission(MissionCategory::Main, id, &mut engine, &clock);
        assert_eq!(outcome, Some(MissionToggle::Completed { reward: 25 }));
        assert_eq!(engine.profile().coins, 25);
        assert!(board.get(MissionCategory::Main, id).unwrap().is_completed());

        let outcome = board.toggle_mission(MissionCategory::Main, id, &mut engine, &clock);
        assert_eq!(outcome, Some(MissionToggle::Refunded { reward: 25 }));
        assert_eq!(engine.profile().coins, 0);
        assert!(!board.get(MissionCategory::Main, id).unwrap().is_completed());
    }

    #[test]
    fn test_undo_after_spending_reports_failed_refund() {
        let (clock, mut engine, mut board) = setup();
        let id = board.add_mission(MissionCategory::Bonus, "Walk", 10, &clock);
        board.toggle_mission(MissionCategory::Bonus, id, &mut engine, &clock);
        assert!(engine.remove_coins(5, &clock));

        let outcome = board.toggle_mission(MissionCategory::Bonus, id, &mut engine, &clock);
        assert_eq!(outcome, Some(MissionToggle::RefundFailed { reward: 10 }));
        assert_eq!(engine.profile().coins, 5);
        assert!(!board.get(MissionCategory::Bonus, id).unwrap().is_completed());
    }

    #[test]
    fn test_toggle_wrong_category_is_not_found() {
        let (clock, mut engine, mut board) = setup();
        let id = board.add_mission(MissionCategory::Main, "Ship it", 25, &clock);
        let before = board.clone();
        assert_eq!(
            board.toggle_mission(MissionCategory::Secondary, id, &mut engine, &clock),
            None
        );
        assert_eq!(board, before);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_daily_reset_once_per_day() {
        let (clock, mut engine, _) = setup();
        let mut board = MissionBoard::new(day(1), Dailies::default());
        let id = board.add_mission(MissionCategory::Secondary, "Read", 15, &clock);
        board.toggle_mission(MissionCategory::Secondary, id, &mut engine, &clock);

        assert!(board.check_daily_reset(day(2)));
        assert_eq!(board.last_reset(), day(2));
        assert!(!board.get(MissionCategory::Secondary, id).unwrap().is_completed());
        assert_eq!(engine.profile().coins, 15);

        board.toggle_mission(MissionCategory::Secondary, id, &mut engine, &clock);
        assert!(!board.check_daily_reset(day(2)));
        assert!(board.get(MissionCategory::Secondary, id).unwrap().is_completed());
    }

    #[test]
    fn test_delete_mission() {
        let (clock, _, mut board) = setup();
        let a = board.add_mission(MissionCategory::Main, "A", 25, &clock);
        let b = board.add_mission(MissionCategory::Main, "B", 25, &clock);
        assert!(board.delete_mission(MissionCategory::Main, a));
        assert!(!board.delete_mission(MissionCategory::Main, a));
        let ids: Vec<_> = board.iter().map(|(_, m)| m.id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_category_rewards_and_names() {
        assert_eq!(MissionCategory::Main.default_reward(), 25);
        assert_eq!(MissionCategory::Secondary.default_reward(), 15);
        assert_eq!(MissionCategory::Bonus.default_reward(), 10);
        assert_eq!(MissionCategory::from_str("BONUS"), Some(MissionCategory::Bonus));
        assert_eq!(MissionCategory::from_str("side"), None);
    }

    #[test]
    fn test_stored_dailies_shape() {
        let dailies: Dailies = serde_json::from_value(serde_json::json!({
            "main": [{ "id": 1, "text": "Run", "reward": 25, "completed": true }],
            "secondary": [],
            "bonus": []
        }))
        .unwrap();
        assert!(dailies.list(MissionCategory::Main)[0].is_completed());
        assert!(dailies.list(MissionCategory::Bonus).is_empty());
    }
}
