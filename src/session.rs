//! Per-user game session
//!
//! A `Session` owns one progression engine, habit ledger, mission board and
//! onboarding record, together with the store they persist to. Every
//! mutating call is a transaction:
//!
//! 1. snapshot the in-memory state
//! 2. apply the mutation
//! 3. write each key whose value changed
//! 4. on a failed write, restore the snapshot, rewrite the keys already
//!    written, and return the error
//!
//! Calls that change nothing write nothing.

use crate::avatar::{AvatarGenerator, IdenticonAvatar};
use crate::clock::{Clock, SystemClock};
use crate::consts::MAX_AMOUNT;
use crate::error::{Error, Result};
use crate::game::{
    Dailies, HabitId, HabitKind, HabitLedger, HistoryLog, MissionBoard, MissionCategory,
    MissionId, MissionToggle, Onboarding, ProgressionEngine, UserProfile, View,
};
use crate::persistence::{self, Store, keys};
use crate::settings::Settings;

/// Keys owned by the session, in write order
const GAME_KEYS: [&str; 6] = [
    keys::USER,
    keys::HISTORY,
    keys::HABITS,
    keys::DAILIES,
    keys::LAST_RESET,
    keys::ONBOARDING,
];

#[derive(Debug, Clone)]
struct GameState {
    engine: ProgressionEngine,
    habits: HabitLedger,
    board: MissionBoard,
    onboarding: Onboarding,
}

impl GameState {
    fn persist_key<S: Store + ?Sized>(&self, store: &mut S, key: &str) -> Result<()> {
        match key {
            keys::USER => persistence::save(store, key, self.engine.profile()),
            keys::HISTORY => persistence::save(store, key, self.engine.history()),
            keys::HABITS => persistence::save(store, key, &self.habits),
            keys::DAILIES => persistence::save(store, key, self.board.dailies()),
            keys::LAST_RESET => persistence::save(store, key, &self.board.last_reset()),
            keys::ONBOARDING => persistence::save(store, key, &self.onboarding),
            other => {
                log::warn!("Ignoring write of unknown key '{}'", other);
                Ok(())
            }
        }
    }
}

/// Pre-mutation copy of the state
///
/// History is append-only, so only its length is kept.
struct Snapshot {
    profile: UserProfile,
    history_len: usize,
    habits: HabitLedger,
    board: MissionBoard,
    onboarding: Onboarding,
}

impl Snapshot {
    fn take(state: &GameState) -> Self {
        Self {
            profile: state.engine.profile().clone(),
            history_len: state.engine.history().len(),
            habits: state.habits.clone(),
            board: state.board.clone(),
            onboarding: state.onboarding.clone(),
        }
    }

    fn changed_keys(&self, state: &GameState) -> Vec<&'static str> {
        GAME_KEYS
            .into_iter()
            .filter(|key| match *key {
                keys::USER => &self.profile != state.engine.profile(),
                keys::HISTORY => self.history_len != state.engine.history().len(),
                keys::HABITS => self.habits != state.habits,
                keys::DAILIES => self.board.dailies() != state.board.dailies(),
                keys::LAST_RESET => self.board.last_reset() != state.board.last_reset(),
                keys::ONBOARDING => self.onboarding != state.onboarding,
                _ => false,
            })
            .collect()
    }

    fn restore(self, state: &mut GameState) {
        state.engine.restore_profile(self.profile);
        state.engine.history_mut().truncate(self.history_len);
        state.habits = self.habits;
        state.board = self.board;
        state.onboarding = self.onboarding;
    }
}

/// Reject amounts the history cannot record
fn check_amount(amount: u64) -> Result<()> {
    if amount > MAX_AMOUNT {
        return Err(Error::AmountOutOfRange {
            amount,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// One user's game, bound to its store
pub struct Session<S: Store, C: Clock = SystemClock> {
    store: S,
    clock: C,
    avatars: Box<dyn AvatarGenerator>,
    state: GameState,
}

impl<S: Store> Session<S, SystemClock> {
    /// Open with the system clock and identicon avatars
    pub fn open_default(store: S) -> Result<Self> {
        Self::open(store, SystemClock)
    }
}

impl<S: Store, C: Clock> Session<S, C> {
    /// Open with identicon avatars
    pub fn open(store: S, clock: C) -> Result<Self> {
        Self::with_avatars(store, clock, Box::new(IdenticonAvatar::default()))
    }

    /// Load every key, seeding the ones never written, and persist the seeds
    pub fn with_avatars(
        mut store: S,
        clock: C,
        avatars: Box<dyn AvatarGenerator>,
    ) -> Result<Self> {
        let settings = Settings::load(&store)?;

        let today = clock.today();
        let profile = persistence::load_or_seed(&store, keys::USER, || {
            UserProfile::seeded(avatars.as_ref())
        })?;
        let history = persistence::load_or_seed(&store, keys::HISTORY, HistoryLog::new)?;
        let habits = persistence::load_or_seed(&store, keys::HABITS, HabitLedger::seeded)?;
        let last_reset = persistence::load_or_seed(&store, keys::LAST_RESET, || today)?;
        let dailies = persistence::load_or_seed(&store, keys::DAILIES, Dailies::default)?;
        let onboarding = persistence::load_or_seed(&store, keys::ONBOARDING, Onboarding::default)?;

        // Absent or unreadable keys are written back so the seed sticks
        let mut engine = ProgressionEngine::new(profile.value, history.value, settings);
        let user_dirty = profile.seeded | engine.migrate_avatar(avatars.as_ref());
        let seeded = [
            user_dirty,
            history.seeded,
            habits.seeded,
            dailies.seeded,
            last_reset.seeded,
            onboarding.seeded,
        ];
        let unwritten: Vec<&str> = GAME_KEYS
            .into_iter()
            .zip(seeded)
            .filter_map(|(key, seeded)| seeded.then_some(key))
            .collect();

        let state = GameState {
            engine,
            habits: habits.value,
            board: MissionBoard::new(last_reset.value, dailies.value),
            onboarding: onboarding.value,
        };
        for key in &unwritten {
            state.persist_key(&mut store, key)?;
        }

        let profile = state.engine.profile();
        log::info!(
            "Session opened for '{}' (level {}, {} XP, {} coins, {} history entries)",
            profile.name,
            profile.level,
            profile.xp,
            profile.coins,
            state.engine.history().len()
        );

        Ok(Self {
            store,
            clock,
            avatars,
            state,
        })
    }

    fn transact<R>(
        &mut self,
        op: &str,
        f: impl FnOnce(&mut GameState, &dyn Clock, &dyn AvatarGenerator) -> R,
    ) -> Result<R> {
        let snapshot = Snapshot::take(&self.state);
        let out = f(&mut self.state, &self.clock, self.avatars.as_ref());

        let changed = snapshot.changed_keys(&self.state);
        if changed.is_empty() {
            return Ok(out);
        }

        for (i, key) in changed.iter().enumerate() {
            if let Err(e) = self.state.persist_key(&mut self.store, key) {
                log::warn!("{}: writing '{}' failed ({}), rolling back", op, key, e);
                snapshot.restore(&mut self.state);
                for written in &changed[..i] {
                    if let Err(e) = self.state.persist_key(&mut self.store, written) {
                        log::error!("{}: could not restore '{}': {}", op, written, e);
                    }
                }
                return Err(e);
            }
        }

        log::debug!("{}: committed {}", op, changed.join(", "));
        Ok(out)
    }

    // === Read access ===

    pub fn progression(&self) -> &ProgressionEngine {
        &self.state.engine
    }

    pub fn profile(&self) -> &UserProfile {
        self.state.engine.profile()
    }

    pub fn history(&self) -> &HistoryLog {
        self.state.engine.history()
    }

    pub fn habits(&self) -> &HabitLedger {
        &self.state.habits
    }

    pub fn missions(&self) -> &MissionBoard {
        &self.state.board
    }

    pub fn onboarding(&self) -> &Onboarding {
        &self.state.onboarding
    }

    pub fn settings(&self) -> &Settings {
        self.state.engine.settings()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Close the session and hand back the store
    pub fn into_store(self) -> S {
        self.store
    }

    // === Missions ===

    /// Reset dailies if the day changed. Call at session start and on
    /// entering the missions view.
    pub fn check_daily_reset(&mut self) -> Result<bool> {
        self.transact("check_daily_reset", |state, clock, _| {
            state.board.check_daily_reset(clock.today())
        })
    }

    pub fn toggle_mission(
        &mut self,
        category: MissionCategory,
        id: MissionId,
    ) -> Result<Option<MissionToggle>> {
        self.transact("toggle_mission", |state, clock, _| {
            state.board.toggle_mission(category, id, &mut state.engine, clock)
        })
    }

    pub fn add_mission(
        &mut self,
        category: MissionCategory,
        text: impl Into<String>,
        reward: u64,
    ) -> Result<MissionId> {
        check_amount(reward)?;
        let text = text.into();
        self.transact("add_mission", |state, clock, _| {
            state.board.add_mission(category, text, reward, clock)
        })
    }

    pub fn delete_mission(&mut self, category: MissionCategory, id: MissionId) -> Result<bool> {
        self.transact("delete_mission", |state, _, _| {
            state.board.delete_mission(category, id)
        })
    }

    // === Habits ===

    pub fn trigger_habit(&mut self, id: HabitId) -> Result<bool> {
        self.transact("trigger_habit", |state, clock, _| {
            state.habits.trigger_habit(id, &mut state.engine, clock)
        })
    }

    pub fn add_habit(
        &mut self,
        text: impl Into<String>,
        kind: HabitKind,
        value: u64,
    ) -> Result<HabitId> {
        let multiplier = self.settings().negative_habit_multiplier;
        match kind {
            HabitKind::Positive => check_amount(value)?,
            HabitKind::Negative => check_amount(value.saturating_mul(multiplier))?,
        }
        let text = text.into();
        self.transact("add_habit", |state, clock, _| {
            state.habits.add_habit(text, kind, value, multiplier, clock)
        })
    }

    pub fn remove_habit(&mut self, id: HabitId) -> Result<bool> {
        self.transact("remove_habit", |state, _, _| state.habits.remove_habit(id))
    }

    // === Profile ===

    /// Rename the player; empty names are ignored
    pub fn rename(&mut self, new_name: &str) -> Result<bool> {
        self.transact("rename", |state, _, avatars| {
            state.engine.update_name(new_name, avatars)
        })
    }

    /// Spend coins (shop purchase). False when the balance is too low.
    pub fn spend_coins(&mut self, amount: u64) -> Result<bool> {
        check_amount(amount)?;
        self.transact("spend_coins", |state, clock, _| {
            state.engine.remove_coins(amount, clock)
        })
    }

    /// Persist new rule settings and apply them to later operations
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        settings.save(&mut self.store)?;
        self.state.engine.set_settings(settings);
        Ok(())
    }

    // === Onboarding ===

    pub fn complete_onboarding(&mut self) -> Result<()> {
        self.transact("complete_onboarding", |state, _, _| {
            state.onboarding.complete()
        })
    }

    pub fn mark_view_visited(&mut self, view: View) -> Result<()> {
        self.transact("mark_view_visited", |state, _, _| {
            state.onboarding.mark_visited(view)
        })
    }

    pub fn skip_all_tutorials(&mut self) -> Result<()> {
        self.transact("skip_all_tutorials", |state, _, _| {
            state.onboarding.skip_all()
        })
    }
}
