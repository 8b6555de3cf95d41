//! XP, coins and levels
//!
//! The engine is the only writer of the profile's counters. Every gain or
//! loss is appended to the history log as it is applied.

use serde::{Deserialize, Serialize};

use super::history::{HistoryKind, HistoryLog};
use crate::avatar::AvatarGenerator;
use crate::clock::Clock;
use crate::consts::{DEFAULT_PLAYER_NAME, MAX_AMOUNT, MAX_LEVELS_PER_GAIN};
use crate::settings::{LevelUpMode, Settings};

/// Avatar formats produced by older versions; regenerated on load
const LEGACY_AVATAR_MARKERS: [&str; 2] = ["ui-avatars.com", "base64"];

/// The player's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// Opaque image reference (data URI)
    #[serde(default)]
    pub avatar: String,
    pub xp: u64,
    pub level: u32,
    pub coins: u64,
}

impl UserProfile {
    /// Fresh level-1 profile
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
            xp: 0,
            level: 1,
            coins: 0,
        }
    }

    /// Default "Player" profile
    pub fn seeded(avatars: &dyn AvatarGenerator) -> Self {
        Self::new(DEFAULT_PLAYER_NAME, avatars.generate(DEFAULT_PLAYER_NAME))
    }
}

/// Cap an amount at what the history can record, returning it with its
/// signed history value
fn recordable(amount: u64) -> (u64, i64) {
    if amount > MAX_AMOUNT {
        log::warn!("Amount {} capped at {}", amount, MAX_AMOUNT);
    }
    let amount = amount.min(MAX_AMOUNT);
    (amount, amount as i64)
}

/// Owns XP, coins and level, and the history of every change to them
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEngine {
    profile: UserProfile,
    history: HistoryLog,
    settings: Settings,
}

impl ProgressionEngine {
    pub fn new(mut profile: UserProfile, history: HistoryLog, mut settings: Settings) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("{}, using default rules", e);
            settings = Settings::default();
        }
        if profile.level == 0 {
            log::warn!("Stored level 0 raised to 1");
            profile.level = 1;
        }
        Self {
            profile,
            history,
            settings,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    pub(crate) fn restore_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Gain XP, then re-check the level. Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u64, clock: &dyn Clock) -> u32 {
        if amount == 0 {
            return 0;
        }
        let (amount, value) = recordable(amount);
        self.profile.xp = self.profile.xp.saturating_add(amount);
        let levels = self.check_level_up();
        self.history.append(HistoryKind::XpGain, value, clock);
        log::debug!("+{} XP (now {})", amount, self.profile.xp);
        levels
    }

    /// Lose XP, never going below zero
    ///
    /// The history records the full requested loss, not the clamped delta.
    pub fn remove_xp(&mut self, amount: u64, clock: &dyn Clock) {
        if amount == 0 {
            return;
        }
        let (amount, value) = recordable(amount);
        self.profile.xp = self.profile.xp.saturating_sub(amount);
        self.history.append(HistoryKind::XpLoss, -value, clock);
        log::debug!("-{} XP (now {})", amount, self.profile.xp);
    }

    pub fn add_coins(&mut self, amount: u64, clock: &dyn Clock) {
        if amount == 0 {
            return;
        }
        let (amount, value) = recordable(amount);
        self.profile.coins = self.profile.coins.saturating_add(amount);
        self.history.append(HistoryKind::CoinGain, value, clock);
        log::debug!("+{} coins (now {})", amount, self.profile.coins);
    }

    /// Spend coins if the balance covers it. Returns false and changes
    /// nothing otherwise.
    pub fn remove_coins(&mut self, amount: u64, clock: &dyn Clock) -> bool {
        if amount == 0 {
            return true;
        }
        if amount > MAX_AMOUNT || self.profile.coins < amount {
            log::debug!("Cannot spend {} coins, balance is {}", amount, self.profile.coins);
            return false;
        }
        self.profile.coins -= amount;
        self.history.append(HistoryKind::CoinSpend, -(amount as i64), clock);
        log::debug!("-{} coins (now {})", amount, self.profile.coins);
        true
    }

    fn check_level_up(&mut self) -> u32 {
        let mut gained = 0;
        while gained < MAX_LEVELS_PER_GAIN && self.profile.xp as f64 >= self.threshold() {
            let Some(next) = self.profile.level.checked_add(1) else {
                break;
            };
            self.profile.level = next;
            gained += 1;
            log::info!("Level up! Now level {}", self.profile.level);
            if self.settings.level_up_mode == LevelUpMode::SingleStep {
                break;
            }
        }
        gained
    }

    /// Rename the player and regenerate the avatar. Empty names are ignored.
    pub fn update_name(&mut self, new_name: &str, avatars: &dyn AvatarGenerator) -> bool {
        if new_name.is_empty() {
            return false;
        }
        self.profile.name = new_name.to_string();
        self.profile.avatar = avatars.generate(new_name);
        log::info!("Renamed player to '{}'", new_name);
        true
    }

    /// Replace a missing or legacy-format avatar
    pub fn migrate_avatar(&mut self, avatars: &dyn AvatarGenerator) -> bool {
        let avatar = &self.profile.avatar;
        let legacy = avatar.is_empty() || LEGACY_AVATAR_MARKERS.iter().any(|m| avatar.contains(m));
        if legacy {
            self.profile.avatar = avatars.generate(&self.profile.name);
            log::info!("Regenerated avatar for '{}'", self.profile.name);
        }
        legacy
    }

    /// XP needed to leave the current level
    pub fn threshold(&self) -> f64 {
        self.settings.threshold(self.profile.level)
    }

    /// Percentage of the current threshold reached; can exceed 100
    pub fn level_progress(&self) -> f64 {
        self.profile.xp as f64 / self.threshold() * 100.0
    }

    /// Whole XP still missing before the next level-up check passes
    pub fn xp_to_next_level(&self) -> u64 {
        let needed = self.threshold().ceil() as u64;
        needed.saturating_sub(self.profile.xp)
    }

    pub fn total_xp_earned(&self) -> i128 {
        self.history.total_xp_earned()
    }

    pub fn total_coins_earned(&self) -> i128 {
        self.history.total_coins_earned()
    }
}
