//! Rule tuning
//!
//! Persisted under its own key, separate from the player's progress.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::persistence::{self, Store, keys};

/// How far a single XP gain may move the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LevelUpMode {
    /// At most one level per gain, even if XP overshoots several thresholds
    #[default]
    SingleStep,
    /// Keep levelling until XP is below the next threshold
    Resolve,
}

impl LevelUpMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelUpMode::SingleStep => "single_step",
            LevelUpMode::Resolve => "resolve",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "single_step" | "single" => Some(LevelUpMode::SingleStep),
            "resolve" | "multi" => Some(LevelUpMode::Resolve),
            _ => None,
        }
    }
}

/// Game rule settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// XP needed to leave level 1
    pub level_base_xp: f64,
    /// Exponent of the level curve (`base * level^exponent`)
    pub level_exponent: f64,
    pub level_up_mode: LevelUpMode,
    /// Penalty of a new negative habit = value * multiplier
    pub negative_habit_multiplier: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_base_xp: LEVEL_BASE_XP,
            level_exponent: LEVEL_EXPONENT,
            level_up_mode: LevelUpMode::SingleStep,
            negative_habit_multiplier: NEGATIVE_HABIT_MULTIPLIER,
        }
    }
}

impl Settings {
    /// XP threshold for leaving `level` under these settings
    pub fn threshold(&self, level: u32) -> f64 {
        crate::level_threshold(level, self.level_base_xp, self.level_exponent)
    }

    /// Check that the level curve is positive, finite and increasing
    pub fn validate(&self) -> Result<()> {
        if !(self.level_base_xp.is_finite() && self.level_base_xp > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "level_base_xp must be positive and finite, got {}",
                self.level_base_xp
            )));
        }
        if !(self.level_exponent.is_finite() && self.level_exponent > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "level_exponent must be positive and finite, got {}",
                self.level_exponent
            )));
        }
        if self.negative_habit_multiplier == 0 {
            return Err(Error::InvalidSettings(
                "negative_habit_multiplier must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from the store, defaulting when absent, unreadable or
    /// invalid
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let mut settings: Self = persistence::load_or_else(store, keys::SETTINGS, Self::default)?;
        if let Err(e) = settings.validate() {
            log::warn!("Stored {}, using defaults", e);
            settings = Self::default();
        }
        log::info!(
            "Settings: curve {}*L^{}, level-up {}",
            settings.level_base_xp,
            settings.level_exponent,
            settings.level_up_mode.as_str()
        );
        Ok(settings)
    }

    /// Validate, then write to the store
    pub fn save<S: Store + ?Sized>(&self, store: &mut S) -> Result<()> {
        self.validate()?;
        persistence::save(store, keys::SETTINGS, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
