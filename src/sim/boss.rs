//! Boss encounter
//!
//! Idle -> Warning -> Entrance -> Combat -> Defeat -> Idle. Warning, volleys
//! and explosion stages are schedule records tagged with the encounter
//! number, so a record left over from an earlier encounter does nothing.

use glam::Vec2;
use rand::Rng;

use super::clock::Action;
use super::progression::PowerupKind;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Encounter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPhase {
    Idle,
    /// Warning banner; boss not on screen yet
    Warning,
    /// Scripted descent into the playfield
    Entrance,
    /// Patrolling and firing volleys
    Combat,
    /// Explosion sequence, `stage` stages already played
    Defeat { stage: u32 },
}

/// The boss ship
#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub points: u64,
    /// Patrol direction (+1 right, -1 left)
    pub patrol_dir: f32,
    pub visible: bool,
}

/// Encounter state nested inside Playing
#[derive(Debug, Clone, PartialEq)]
pub struct BossEncounter {
    pub phase: BossPhase,
    pub boss: Option<Boss>,
    /// Number of the current (or last) encounter
    encounter: u32,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self::new()
    }
}

impl BossEncounter {
    pub fn new() -> Self {
        Self {
            phase: BossPhase::Idle,
            boss: None,
            encounter: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == BossPhase::Idle
    }

    pub fn encounter(&self) -> u32 {
        self.encounter
    }

    /// Bullets can damage the boss only while it is entering or fighting
    pub fn is_vulnerable(&self) -> bool {
        matches!(self.phase, BossPhase::Entrance | BossPhase::Combat)
            && self.boss.as_ref().is_some_and(|b| b.health > 0)
    }

    /// Remaining health in [0, 1], reported only during Entrance and Combat
    pub fn health_fraction(&self) -> Option<f32> {
        if !matches!(self.phase, BossPhase::Entrance | BossPhase::Combat) {
            return None;
        }
        self.boss
            .as_ref()
            .map(|b| (b.health as f32 / b.max_health.max(1) as f32).clamp(0.0, 1.0))
    }

    fn is_current(&self, encounter: u32, phase: BossPhase) -> bool {
        self.encounter == encounter && self.phase == phase
    }
}

/// Start a new encounter: show the warning and suspend normal spawning
pub fn trigger(state: &mut GameState) {
    if !state.boss.is_idle() {
        return;
    }
    let now = state.now();
    state.boss.encounter += 1;
    state.boss.phase = BossPhase::Warning;
    state.boss.boss = None;
    state.progress.boss_active = true;
    state.progress.enemies_killed_this_wave = 0;

    state.schedule.at(
        now + state.tuning.boss_warning_ms,
        Action::BossWarningOver {
            encounter: state.boss.encounter,
        },
    );
    state.events.push(GameEvent::BossWarning {
        level: state.progress.level,
    });
    log::info!("Boss incoming (level {})", state.progress.level);
}

/// Warning finished: bring the boss in from above
pub fn begin_entrance(state: &mut GameState, encounter: u32) {
    if !state.boss.is_current(encounter, BossPhase::Warning) {
        return;
    }
    let tuning = &state.tuning;
    let max_health =
        tuning.boss_base_health + tuning.boss_health_per_level * (state.progress.level - 1);
    state.boss.boss = Some(Boss {
        pos: Vec2::new(tuning.playfield_width / 2.0, -BOSS_RADIUS),
        health: max_health,
        max_health,
        points: tuning.boss_points,
        patrol_dir: 1.0,
        visible: true,
    });
    state.boss.phase = BossPhase::Entrance;
}

/// Per-tick movement for Entrance and Combat
pub fn update(state: &mut GameState, dt: f32) {
    let now = state.now();
    let phase = state.boss.phase;
    let encounter = state.boss.encounter;
    let width = state.tuning.playfield_width;
    let margin = state.tuning.spawn_margin;
    let Some(boss) = state.boss.boss.as_mut() else {
        return;
    };

    match phase {
        BossPhase::Entrance => {
            boss.pos.y += BOSS_ENTRANCE_SPEED * dt;
            if boss.pos.y >= BOSS_COMBAT_Y {
                boss.pos.y = BOSS_COMBAT_Y;
                state.boss.phase = BossPhase::Combat;
                state.schedule.at(
                    now + state.tuning.boss_volley_interval_ms,
                    Action::BossVolley { encounter },
                );
                state.events.push(GameEvent::BossEntered);
            }
        }
        BossPhase::Combat => {
            let left = margin + BOSS_RADIUS;
            let right = (width - margin - BOSS_RADIUS).max(left);
            boss.pos.x += boss.patrol_dir * BOSS_PATROL_SPEED * dt;
            if boss.pos.x <= left {
                boss.pos.x = left;
                boss.patrol_dir = 1.0;
            } else if boss.pos.x >= right {
                boss.pos.x = right;
                boss.patrol_dir = -1.0;
            }
        }
        _ => {}
    }
}

/// Fire a downward fan and re-arm while still in combat
pub fn fire_volley(state: &mut GameState, encounter: u32) {
    if !state.boss.is_current(encounter, BossPhase::Combat) {
        return;
    }
    let Some(origin) = state.boss.boss.as_ref().map(|b| b.pos + Vec2::new(0.0, BOSS_RADIUS)) else {
        return;
    };
    let steps = BOSS_VOLLEY_SIZE.saturating_sub(1).max(1) as f32;
    for i in 0..BOSS_VOLLEY_SIZE {
        let angle = -BOSS_VOLLEY_FAN / 2.0 + BOSS_VOLLEY_FAN * i as f32 / steps;
        let dir = Vec2::new(angle.sin(), angle.cos());
        // Full pool just thins the volley
        let _ = state.bullets.enemy.acquire(origin, dir * ENEMY_BULLET_SPEED);
    }
    let now = state.now();
    state.schedule.at(
        now + state.tuning.boss_volley_interval_ms,
        Action::BossVolley { encounter },
    );
}

/// Boss health reached zero: start the explosion sequence
pub fn defeat(state: &mut GameState) {
    if !matches!(state.boss.phase, BossPhase::Entrance | BossPhase::Combat) {
        return;
    }
    state.boss.phase = BossPhase::Defeat { stage: 0 };
    if state.tuning.boss_explosion_stages == 0 {
        complete(state);
        return;
    }
    let now = state.now();
    state.schedule.at(
        now + state.tuning.boss_explosion_stage_ms,
        Action::BossExplosionStage {
            encounter: state.boss.encounter,
            stage: 1,
        },
    );
}

/// One step of the explosion sequence; the last one pays out
pub fn explosion_stage(state: &mut GameState, encounter: u32, stage: u32) {
    let Some(played) = stage.checked_sub(1) else {
        return;
    };
    if !state.boss.is_current(encounter, BossPhase::Defeat { stage: played }) {
        return;
    }
    state.events.push(GameEvent::BossExplosion { stage });
    if stage >= state.tuning.boss_explosion_stages {
        complete(state);
        return;
    }
    state.boss.phase = BossPhase::Defeat { stage };
    if let Some(boss) = state.boss.boss.as_mut() {
        boss.visible = stage % 2 == 0;
    }
    let now = state.now();
    state.schedule.at(
        now + state.tuning.boss_explosion_stage_ms,
        Action::BossExplosionStage {
            encounter,
            stage: stage + 1,
        },
    );
}

/// Reward the kill, scatter drops, close the wave and resume normal spawning
fn complete(state: &mut GameState) {
    let Some(boss) = state.boss.boss.take() else {
        state.boss.phase = BossPhase::Idle;
        return;
    };
    let awarded = state.progress.award(boss.points);

    let drops = state.tuning.boss_powerup_drops;
    for i in 0..drops {
        let spread = if drops > 1 {
            -BOSS_DROP_SCATTER + 2.0 * BOSS_DROP_SCATTER * i as f32 / (drops - 1) as f32
        } else {
            0.0
        };
        let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::ALL.len())];
        state.spawn_powerup(kind, boss.pos + Vec2::new(spread, 0.0));
    }

    state.progress.complete_wave(&state.tuning);
    state.boss.phase = BossPhase::Idle;
    let now = state.now();
    state.spawner.next_spawn_at = now + state.spawner.interval_ms;

    state.events.push(GameEvent::BossDefeated { points: awarded });
    state.events.push(GameEvent::LevelUp {
        level: state.progress.level,
    });
    log::info!(
        "Boss defeated for {} points, advancing to level {}",
        awarded,
        state.progress.level
    );
}
