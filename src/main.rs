//! Sky Raid headless runner
//!
//! Plays one autopilot session against the simulation core and reports the
//! result. Usage: `sky-raid [seed] [seconds] [tuning.json]`

use sky_raid::consts::*;
use sky_raid::sim::{BossPhase, GamePhase, GameState, TickInput};
use sky_raid::{JsonFileStore, Session, Tuning};

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(0x5eed_u64);
    let seconds: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(180);
    let tuning = match args.get(2) {
        Some(path) => Tuning::load(path).unwrap_or_else(|err| {
            log::warn!("{err}; using default tuning");
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let store = JsonFileStore::new(std::env::temp_dir().join("sky_raid_best.json"));
    log::info!("Sky Raid (headless) seed={} best file={}", seed, store.path().display());

    let mut session = Session::new(tuning, seed, Box::new(store));
    session.init();
    session.start();

    let total_ticks = seconds * 1000 / SIM_DT_MS;
    for _ in 0..total_ticks {
        let input = match session.state() {
            Some(state) => autopilot(state),
            None => break,
        };
        session.step(&input);
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    if let Some(state) = session.state() {
        println!(
            "seed {} | {:.1}s played | score {} | level {} | lives {} | weapon {} | {:?}",
            seed,
            state.now() as f64 / 1000.0,
            state.progress.score,
            state.progress.level,
            state.progress.lives,
            state.progress.weapon_level,
            state.phase,
        );
    }
    println!("best score: {}", session.best_score());
    session.destroy();
}

/// Simple pilot: dodge nearby shots, otherwise line up under the lowest target
fn autopilot(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let threat = state
        .bullets
        .enemy
        .iter_active()
        .map(|(_, b)| b.pos)
        .filter(|p| p.y < player.y && player.y - p.y < 90.0 && (p.x - player.x).abs() < 30.0)
        .min_by(|a, b| b.y.total_cmp(&a.y));
    if let Some(shot) = threat {
        let go_left = shot.x >= player.x && player.x > 60.0;
        input.left = go_left;
        input.right = !go_left;
        return input;
    }

    let target_x = match (&state.boss.boss, state.boss.phase) {
        (Some(boss), BossPhase::Combat | BossPhase::Entrance) => Some(boss.pos.x),
        _ => state
            .enemies
            .iter()
            .filter(|e| e.active && e.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x),
    };
    if let Some(x) = target_x {
        input.left = x < player.x - PLAYER_RADIUS / 2.0;
        input.right = x > player.x + PLAYER_RADIUS / 2.0;
    }
    input
}
