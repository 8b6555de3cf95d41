//! Questlog - habit and daily-mission tracker with XP, coins and levels
//!
//! Core modules:
//! - `game`: Progression rules (XP, coins, levels), habits, daily missions, history
//! - `session`: Per-user context that wraps every mutation in a persist transaction
//! - `persistence`: Key-value stores (memory, JSON files, browser LocalStorage)
//! - `settings`: Data-driven rule tuning
//! - `avatar`: Deterministic identicon avatars
//! - `platform`: Browser/native platform abstraction

pub mod avatar;
pub mod clock;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;

pub use avatar::{AvatarGenerator, IdenticonAvatar};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use game::{
    Habit, HabitId, HabitKind, HabitLedger, HistoryEntry, HistoryKind, HistoryLog, Mission,
    MissionBoard, MissionCategory, MissionId, MissionToggle, Onboarding, ProgressionEngine,
    UserProfile, View,
};
pub use persistence::{FileStore, MemoryStore, Store};
pub use session::Session;
pub use settings::{LevelUpMode, Settings};

/// Game rule constants
pub mod consts {
    /// XP required to leave level 1
    pub const LEVEL_BASE_XP: f64 = 100.0;
    /// Growth exponent of the level curve
    pub const LEVEL_EXPONENT: f64 = 1.5;
    /// Negative habits cost this many times the value they were created with
    pub const NEGATIVE_HABIT_MULTIPLIER: u64 = 2;
    /// Largest single XP or coin amount; history values are signed 64-bit
    pub const MAX_AMOUNT: u64 = i64::MAX as u64;
    /// Most levels a single XP gain can resolve
    pub const MAX_LEVELS_PER_GAIN: u32 = 10_000;
    /// Name given to a fresh profile
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}

/// XP threshold to advance from `level` to `level + 1`
///
/// `base * level^exponent`, so with the default curve level 1 needs 100 XP,
/// level 2 needs ~283 and level 4 needs 800.
#[inline]
pub fn level_threshold(level: u32, base: f64, exponent: f64) -> f64 {
    base * f64::from(level).powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::consts::*;

    #[test]
    fn test_level_threshold_default_curve() {
        assert_eq!(level_threshold(1, LEVEL_BASE_XP, LEVEL_EXPONENT), 100.0);
        assert!((level_threshold(4, LEVEL_BASE_XP, LEVEL_EXPONENT) - 800.0).abs() < 1e-9);
        let l2 = level_threshold(2, LEVEL_BASE_XP, LEVEL_EXPONENT);
        assert!((l2 - 282.842_712).abs() < 1e-3);
    }
}
