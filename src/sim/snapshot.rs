//! Renderable view of the simulation
//!
//! The core never draws anything; each tick the host pulls a snapshot and
//! hands it to whatever presents the game.

use serde::Serialize;

use super::boss::BossPhase;
use super::phase::GamePhase;
use super::progression::PowerupKind;
use super::state::{EnemyKind, GameState};

/// What an entity is, for the renderer's sprite lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EntityCategory {
    PlayerShip,
    Enemy(EnemyKind),
    Boss,
    PlayerBullet,
    EnemyBullet,
    Powerup(PowerupKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEntity {
    pub category: EntityCategory,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub weapon_level: u8,
    pub multiplier_label: String,
    pub shield_active: bool,
    /// Boss health in [0, 1] while the boss is entering or fighting
    pub boss_health: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    /// Boss warning banner should be shown
    pub boss_warning: bool,
    pub entities: Vec<RenderEntity>,
    pub hud: Hud,
}

/// Capture the current renderable state
pub fn snapshot(state: &GameState) -> RenderSnapshot {
    let mut entities = Vec::new();

    if matches!(
        state.phase,
        GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver
    ) {
        entities.push(RenderEntity {
            category: EntityCategory::PlayerShip,
            x: state.player.pos.x,
            y: state.player.pos.y,
            visible: state.progress.lives > 0,
        });
    }

    entities.extend(state.enemies.iter().filter(|e| e.active).map(|e| RenderEntity {
        category: EntityCategory::Enemy(e.kind),
        x: e.pos.x,
        y: e.pos.y,
        visible: true,
    }));

    if let Some(boss) = &state.boss.boss {
        entities.push(RenderEntity {
            category: EntityCategory::Boss,
            x: boss.pos.x,
            y: boss.pos.y,
            visible: boss.visible,
        });
    }

    for (category, pool) in [
        (EntityCategory::PlayerBullet, &state.bullets.player),
        (EntityCategory::EnemyBullet, &state.bullets.enemy),
    ] {
        entities.extend(pool.iter_active().map(|(_, b)| RenderEntity {
            category,
            x: b.pos.x,
            y: b.pos.y,
            visible: true,
        }));
    }

    entities.extend(state.powerups.iter().filter(|p| p.active).map(|p| RenderEntity {
        category: EntityCategory::Powerup(p.kind),
        x: p.pos.x,
        y: p.pos.y,
        visible: true,
    }));

    RenderSnapshot {
        phase: state.phase,
        boss_warning: state.boss.phase == BossPhase::Warning,
        entities,
        hud: Hud {
            score: state.progress.score,
            lives: state.progress.lives,
            level: state.progress.level,
            weapon_level: state.progress.weapon_level,
            multiplier_label: state.progress.multiplier_label(),
            shield_active: state.progress.shield_active,
            boss_health: state.boss.health_fraction(),
        },
    }
}
