//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one logical delta.

use glam::Vec2;

use super::boss;
use super::clock::Action;
use super::collision;
use super::phase::GamePhase;
use super::progression::shot_pattern;
use super::spawn;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Logical input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held
    pub fire: bool,
    /// Pause toggle (edge, not level)
    pub pause: bool,
}

impl TickInput {
    /// Movement direction from the four held directions (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one fixed timestep of `dt_ms` logical milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    state.events.clear();

    // Toggling into pause consumes the tick; toggling out runs it
    if input.pause {
        let was = state.phase;
        state.phase = state.phase.toggle_pause();
        if state.phase != was {
            log::debug!("{:?} -> {:?}", was, state.phase);
        }
    }

    // Nothing advances outside Playing, including the clock
    if !state.phase.runs_simulation() {
        return;
    }

    let now = state.clock.advance(dt_ms);
    let dt = dt_ms as f32 / 1000.0;

    // Timed effects and difficulty ramp
    state.progress.expire_timers(now);
    if state.difficulty.update(now, &mut state.spawner) {
        state.events.push(GameEvent::DifficultyUp {
            spawn_interval_ms: state.spawner.interval_ms,
        });
    }

    // Player
    state.player.steer(input.direction(), dt, &state.tuning);
    if input.fire && state.progress.try_fire(now, state.tuning.fire_interval_ms) {
        fire_player_weapon(state);
    }

    // Spawning (may call in the boss instead)
    if state.spawner.is_due(now) {
        spawn::spawn_tick(state);
    }

    // Deferred actions
    for action in state.schedule.drain_due(now) {
        dispatch(state, action);
    }

    // Movement
    boss::update(state, dt);
    let width = state.tuning.playfield_width;
    let despawn_y = state.tuning.playfield_height + ENEMY_RADIUS * 2.0;
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        enemy.update(now, dt, width);
        if enemy.pos.y > despawn_y {
            enemy.active = false;
        }
    }
    let bounds = state.projectile_bounds();
    state.bullets.player.advance(dt, bounds);
    state.bullets.enemy.advance(dt, bounds);
    let powerup_floor = state.tuning.playfield_height + POWERUP_RADIUS;
    for powerup in state.powerups.iter_mut().filter(|p| p.active) {
        powerup.pos += powerup.vel * dt;
        if powerup.pos.y > powerup_floor {
            powerup.active = false;
        }
    }

    collision::resolve(state);

    state.enemies.retain(|e| e.active);
    state.powerups.retain(|p| p.active);
    state.progress.clamp_invariants();
}

/// Run one deferred action; actions whose subject is gone do nothing
fn dispatch(state: &mut GameState, action: Action) {
    match action {
        Action::EnemyFire { enemy_id } => {
            spawn::enemy_fire(state, enemy_id);
        }
        Action::EnemyFireRepeating { enemy_id, every_ms } => {
            if state.enemy(enemy_id).is_some() {
                spawn::enemy_fire(state, enemy_id);
                let next = state.now() + every_ms;
                state.schedule.at(next, action);
            }
        }
        Action::BossWarningOver { encounter } => boss::begin_entrance(state, encounter),
        Action::BossVolley { encounter } => boss::fire_volley(state, encounter),
        Action::BossExplosionStage { encounter, stage } => {
            boss::explosion_stage(state, encounter, stage)
        }
    }
}

/// Fire the ship's current pattern; shots that find no free slot are dropped
fn fire_player_weapon(state: &mut GameState) {
    let nose = state.player.pos - Vec2::new(0.0, state.player.radius);
    for shot in shot_pattern(state.progress.weapon_level) {
        let _ = state
            .bullets
            .player
            .acquire(nose + shot.offset, shot.dir * PLAYER_BULLET_SPEED);
    }
}

/// Whether the session is frozen
pub fn is_paused(state: &GameState) -> bool {
    state.phase == GamePhase::Paused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::phase::PhaseCommand;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, Tuning::default());
        state.apply(PhaseCommand::Start);
        state
    }

    #[test]
    fn test_menu_does_not_advance() {
        let mut state = GameState::new(12345, Tuning::default());
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.now(), 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.now(), 10);

        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT_MS);
        assert!(is_paused(&state));
        assert_eq!(state.now(), 10);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.now(), 10);

        tick(&mut state, &toggle, SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.now(), 20);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut state = playing_state();
        for _ in 0..199 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert!(state.enemies.is_empty());
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawner.next_spawn_at, 4000);
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut state = playing_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        // 10 ms ticks for 150 ms: shots at t=10 and t=160 only
        for _ in 0..16 {
            tick(&mut state, &fire, SIM_DT_MS);
        }
        assert_eq!(state.bullets.player.active_count(), 2);
    }

    #[test]
    fn test_weapon_three_fires_three() {
        let mut state = playing_state();
        state.progress.weapon_level = 3;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT_MS);
        assert_eq!(state.bullets.player.active_count(), 3);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let mut state = playing_state();
        let input = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.player.pos.x, state.player.radius);
        assert_eq!(state.player.pos.y, 600.0 - state.player.radius);
    }

    #[test]
    fn test_gunship_keeps_firing_until_destroyed() {
        // Tall playfield so the first shot is still in flight at the end
        let tuning = Tuning {
            playfield_height: 2000.0,
            spawn_interval_ms: 1_000_000,
            spawn_interval_floor_ms: 1_000_000,
            ..Default::default()
        };
        let mut state = GameState::new(1, tuning);
        state.apply(PhaseCommand::Start);
        let id = spawn::spawn_enemy(&mut state, EnemyKind::Gunship, 100.0);
        // Park it so it never drifts off screen
        state.enemies[0].vel = Vec2::ZERO;
        state.enemies[0].pos = Vec2::new(100.0, 100.0);

        for _ in 0..330 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        // Shots at 1200 and 3200
        assert_eq!(state.bullets.enemy.active_count(), 2);
        assert_eq!(state.schedule.len(), 1);

        state.enemies[0].active = false;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert!(state.enemy(id).is_none());
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing_state();
        let mut state2 = playing_state();
        let input = TickInput {
            fire: true,
            right: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state1, &input, SIM_DT_MS);
            tick(&mut state2, &input, SIM_DT_MS);
        }
        assert_eq!(state1.progress, state2.progress);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.now(), state2.now());
    }
}
