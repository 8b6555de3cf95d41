//! Progression rules and the state they act on
//!
//! - `progression`: XP, coins, levels
//! - `history`: ledger of every XP/coin delta
//! - `habits`: repeatable XP rewards and penalties
//! - `missions`: daily missions paying coins
//! - `onboarding`: tutorial progress

pub mod habits;
pub mod history;
pub mod missions;
pub mod onboarding;
pub mod progression;

pub use habits::{Habit, HabitId, HabitKind, HabitLedger};
pub use history::{HistoryEntry, HistoryKind, HistoryLog};
pub use missions::{Dailies, Mission, MissionBoard, MissionCategory, MissionId, MissionToggle};
pub use onboarding::{Onboarding, View, VisitedViews};
pub use progression::{ProgressionEngine, UserProfile};
