//! Enemy spawning
//!
//! On each spawn tick the director either calls in the boss (when the wave's
//! kill quota is met) or places one enemy whose type is drawn from
//! level-dependent weights.

use glam::Vec2;
use rand::Rng;

use super::boss;
use super::clock::Action;
use super::state::{Behavior, Enemy, EnemyKind, GameEvent, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Delay before a Scout takes its single aimed shot
pub const SCOUT_SHOT_DELAY_MS: u64 = 1000;
/// First Gunship shot and repeat period
pub const GUNSHIP_FIRST_SHOT_MS: u64 = 1200;
pub const GUNSHIP_FIRE_EVERY_MS: u64 = 2000;
/// Weaver lateral motion
pub const WEAVE_AMPLITUDE: f32 = 70.0;
pub const WEAVE_FREQUENCY: f32 = 3.0;

/// Spawn cadence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnDirector {
    /// Current gap between spawn ticks (shortened by the difficulty ramp)
    pub interval_ms: u64,
    /// Logical time of the next spawn tick
    pub next_spawn_at: u64,
}

impl SpawnDirector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            interval_ms: tuning.spawn_interval_ms,
            next_spawn_at: tuning.spawn_interval_ms,
        }
    }

    pub fn is_due(&self, now: u64) -> bool {
        now >= self.next_spawn_at
    }
}

/// Selection weights for `EnemyKind::ALL` at `level`; tougher types gain weight as levels rise
pub fn enemy_weights(level: u32) -> [u32; 3] {
    let l = level.max(1) - 1;
    [
        70u32.saturating_sub(10 * l).max(20),
        (25 + 5 * l).min(40),
        (5 + 5 * l).min(40),
    ]
}

/// Cumulative-weight scan: the first index whose running total exceeds `r`.
///
/// `r` is expected in `[0, sum(weights))`; anything past the end falls to the
/// last index.
pub fn weighted_index(weights: &[u32], r: u32) -> usize {
    let mut cumulative = 0u32;
    for (i, &w) in weights.iter().enumerate() {
        cumulative = cumulative.saturating_add(w);
        if r < cumulative {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

/// Draw an index with probability proportional to its weight
pub fn pick_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> usize {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return weights.len().saturating_sub(1);
    }
    weighted_index(weights, rng.random_range(0..total))
}

/// Hit points for a fresh enemy: base health plus one per two levels
pub fn enemy_health(kind: EnemyKind, level: u32) -> u32 {
    kind.base_health() + level / 2
}

/// Shared movement speed scale for a level
pub fn speed_multiplier(level: u32) -> f32 {
    1.0 + 0.1 * level as f32
}

/// Run one spawn tick (called when `SpawnDirector::is_due`)
pub fn spawn_tick(state: &mut GameState) {
    let now = state.now();
    state.spawner.next_spawn_at = now + state.spawner.interval_ms;

    if state.progress.boss_due() {
        boss::trigger(state);
        return;
    }
    if !state.boss.is_idle() {
        return;
    }
    if state.active_enemy_count() >= state.tuning.max_enemies {
        return;
    }

    let margin = state.tuning.spawn_margin;
    let x = state
        .rng
        .random_range(margin..=state.tuning.playfield_width - margin);
    let weights = enemy_weights(state.progress.level);
    let kind = EnemyKind::ALL[pick_weighted(&mut state.rng, &weights)];
    spawn_enemy(state, kind, x);
}

/// Place an enemy of `kind` at column `x` just above the playfield and arm
/// its fire timer. Returns the new enemy's id.
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, x: f32) -> u32 {
    let id = state.next_entity_id();
    let now = state.now();
    let level = state.progress.level;
    let speed = kind.base_speed() * speed_multiplier(level);

    let behavior = match kind {
        EnemyKind::Scout => {
            state
                .schedule
                .at(now + SCOUT_SHOT_DELAY_MS, Action::EnemyFire { enemy_id: id });
            Behavior::Dive
        }
        EnemyKind::Weaver => Behavior::Weave {
            origin_x: x,
            amplitude: WEAVE_AMPLITUDE,
            frequency: WEAVE_FREQUENCY * speed_multiplier(level),
        },
        EnemyKind::Gunship => {
            state.schedule.at(
                now + GUNSHIP_FIRST_SHOT_MS,
                Action::EnemyFireRepeating {
                    enemy_id: id,
                    every_ms: GUNSHIP_FIRE_EVERY_MS,
                },
            );
            Behavior::Gunship
        }
    };

    state.enemies.push(Enemy {
        id,
        kind,
        pos: Vec2::new(x, ENEMY_SPAWN_Y),
        vel: Vec2::new(0.0, speed),
        health: enemy_health(kind, level),
        points: kind.points(),
        behavior,
        active: true,
        spawned_at: now,
    });
    state.events.push(GameEvent::EnemySpawned { kind });
    log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
    id
}

/// Fire a shot from enemy `enemy_id`. Scouts aim at the player, everything
/// else fires straight down. Returns false if the enemy is gone or the pool is full.
pub fn enemy_fire(state: &mut GameState, enemy_id: u32) -> bool {
    let Some(enemy) = state.enemy(enemy_id) else {
        return false;
    };
    let origin = enemy.pos + Vec2::new(0.0, ENEMY_RADIUS);
    let dir = match enemy.kind {
        EnemyKind::Scout => {
            let aim = (state.player.pos - origin).normalize_or_zero();
            if aim == Vec2::ZERO { Vec2::Y } else { aim }
        }
        _ => Vec2::Y,
    };
    state
        .bullets
        .enemy
        .acquire(origin, dir * ENEMY_BULLET_SPEED)
        .is_some()
}
