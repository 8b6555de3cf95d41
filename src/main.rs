//! Questlog entry point
//!
//! Opens the local profile, runs the daily reset check and prints where the
//! player stands.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    questlog::platform::init_logging();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> questlog::Result<()> {
    use questlog::{MissionCategory, Session};

    let store = questlog::platform::open_store()?;
    let mut session = Session::open_default(store)?;
    if session.check_daily_reset()? {
        println!("A new day - daily missions are ready again.\n");
    }

    let engine = session.progression();
    let profile = engine.profile();
    println!("{} - level {}", profile.name, profile.level);
    println!(
        "  XP      {} ({:.0}% of level, {} to go)",
        profile.xp,
        engine.level_progress(),
        engine.xp_to_next_level()
    );
    println!("  Coins   {}", profile.coins);
    println!(
        "  Earned  {} XP / {} coins over {} entries",
        engine.total_xp_earned(),
        engine.total_coins_earned(),
        engine.history().len()
    );

    println!("\nDaily missions ({})", session.missions().last_reset());
    for category in MissionCategory::ALL {
        let missions = session.missions().missions(category);
        if missions.is_empty() {
            continue;
        }
        println!("  [{}]", category.as_str());
        for mission in missions {
            let mark = if mission.is_completed() { 'x' } else { ' ' };
            println!("    [{}] {} (+{})", mark, mission.text, mission.reward);
        }
    }

    println!("\nHabits");
    for habit in session.habits().iter() {
        let effect = match habit.kind {
            questlog::HabitKind::Positive => format!("+{} XP", habit.xp_reward),
            questlog::HabitKind::Negative => format!("-{} XP", habit.penalty),
        };
        println!("  {} ({})", habit.text, effect);
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive a Session through the library; nothing to run here
    questlog::platform::init_logging();
}
