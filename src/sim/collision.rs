//! Collision detection and resolution
//!
//! Every entity is a circle. Five overlap relations are evaluated once per
//! tick against active entities only; anything deactivated earlier in the
//! same pass is skipped, so an enemy can never be destroyed twice.

use glam::Vec2;
use rand::Rng;

use super::boss;
use super::progression::PowerupKind;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Run all overlap relations for this tick. Stops as soon as one of them
/// ends the run; nothing scores or hurts after GameOver.
pub fn resolve(state: &mut GameState) {
    let relations: [fn(&mut GameState); 5] = [
        player_bullets_vs_enemies,
        player_bullets_vs_boss,
        enemy_bullets_vs_player,
        enemies_vs_player,
        powerups_vs_player,
    ];
    for relation in relations {
        if !state.phase.runs_simulation() {
            return;
        }
        relation(state);
    }
}

/// Destroy enemy `index`, pay out and maybe drop a powerup. No-op if already inactive.
pub fn kill_enemy(state: &mut GameState, index: usize) {
    let Some(enemy) = state.enemies.get_mut(index) else {
        return;
    };
    if !enemy.active {
        return;
    }
    enemy.active = false;
    let (kind, pos, points) = (enemy.kind, enemy.pos, enemy.points);

    let awarded = state.progress.register_kill(u64::from(points));
    state.events.push(GameEvent::EnemyDestroyed {
        kind,
        points: awarded,
    });

    if state.rng.random::<f64>() < state.tuning.powerup_drop_chance {
        let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::ALL.len())];
        state.spawn_powerup(kind, pos);
    }
}

/// Apply one unit of damage to the player, ending the run at zero lives
pub fn hurt_player(state: &mut GameState) {
    if state.progress.is_out_of_lives() {
        return;
    }
    let out = state.progress.damage_player();
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.progress.lives,
    });
    if out {
        state.end_run();
    }
}

fn player_bullets_vs_enemies(state: &mut GameState) {
    for slot in 0..state.bullets.player.capacity() {
        if !state.phase.runs_simulation() {
            return;
        }
        let Some(bullet) = state.bullets.player.get(slot).filter(|b| b.active) else {
            continue;
        };
        let pos = bullet.pos;
        let Some(target) = state
            .enemies
            .iter()
            .position(|e| e.active && circles_overlap(pos, BULLET_RADIUS, e.pos, ENEMY_RADIUS))
        else {
            continue;
        };

        state.bullets.player.release(slot);
        let enemy = &mut state.enemies[target];
        enemy.health = enemy.health.saturating_sub(1);
        if enemy.health == 0 {
            kill_enemy(state, target);
        }
    }
}

fn player_bullets_vs_boss(state: &mut GameState) {
    for slot in 0..state.bullets.player.capacity() {
        if !state.phase.runs_simulation() {
            return;
        }
        if !state.boss.is_vulnerable() {
            return;
        }
        let Some(bullet) = state.bullets.player.get(slot).filter(|b| b.active) else {
            continue;
        };
        let pos = bullet.pos;
        let Some(boss) = state.boss.boss.as_mut() else {
            return;
        };
        if !circles_overlap(pos, BULLET_RADIUS, boss.pos, BOSS_RADIUS) {
            continue;
        }

        state.bullets.player.release(slot);
        boss.health = boss.health.saturating_sub(1);
        if boss.health == 0 {
            boss::defeat(state);
        }
    }
}

fn enemy_bullets_vs_player(state: &mut GameState) {
    for slot in 0..state.bullets.enemy.capacity() {
        if !state.phase.runs_simulation() {
            return;
        }
        let Some(bullet) = state.bullets.enemy.get(slot).filter(|b| b.active) else {
            continue;
        };
        if !circles_overlap(bullet.pos, BULLET_RADIUS, state.player.pos, state.player.radius) {
            continue;
        }

        state.bullets.enemy.release(slot);
        if state.progress.shield_active {
            state.events.push(GameEvent::ShieldAbsorbed);
        } else {
            hurt_player(state);
        }
    }
}

fn enemies_vs_player(state: &mut GameState) {
    for index in 0..state.enemies.len() {
        if !state.phase.runs_simulation() {
            return;
        }
        let enemy = &state.enemies[index];
        if !enemy.active
            || !circles_overlap(enemy.pos, ENEMY_RADIUS, state.player.pos, state.player.radius)
        {
            continue;
        }

        kill_enemy(state, index);
        if state.progress.shield_active {
            state.events.push(GameEvent::ShieldAbsorbed);
        } else {
            hurt_player(state);
        }
    }
}

fn powerups_vs_player(state: &mut GameState) {
    let now = state.now();
    for index in 0..state.powerups.len() {
        if !state.phase.runs_simulation() {
            return;
        }
        let powerup = &mut state.powerups[index];
        if !powerup.active
            || !circles_overlap(powerup.pos, POWERUP_RADIUS, state.player.pos, state.player.radius)
        {
            continue;
        }

        powerup.active = false;
        let kind = powerup.kind;
        state.progress.apply_powerup(kind, now, &state.tuning);
        state.events.push(GameEvent::PowerupCollected { kind });
        log::debug!("Collected {:?}", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::BossPhase;
    use crate::sim::phase::{GamePhase, PhaseCommand};
    use crate::sim::spawn::spawn_enemy;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let tuning = Tuning {
            powerup_drop_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(11, tuning);
        state.apply(PhaseCommand::Start);
        state
    }

    fn enemy_at(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> usize {
        let id = spawn_enemy(state, kind, pos.x);
        let index = state.enemies.iter().position(|e| e.id == id).unwrap();
        state.enemies[index].pos = pos;
        index
    }

    #[test]
    fn test_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_bullet_damages_then_kills() {
        let mut state = playing_state();
        let pos = Vec2::new(200.0, 200.0);
        let index = enemy_at(&mut state, EnemyKind::Gunship, pos);

        state.bullets.player.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.enemies[index].health, 2);
        assert!(state.enemies[index].active);
        assert_eq!(state.bullets.player.active_count(), 0);

        state.bullets.player.acquire(pos, Vec2::ZERO);
        state.bullets.player.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert!(!state.enemies[index].active);
        assert_eq!(state.progress.score, 300);
        assert_eq!(state.progress.enemies_killed_this_wave, 1);
    }

    #[test]
    fn test_bullet_and_ram_kill_once() {
        let mut state = playing_state();
        let pos = state.player.pos;
        enemy_at(&mut state, EnemyKind::Scout, pos);
        state.bullets.player.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.progress.enemies_killed_this_wave, 1);
        assert_eq!(state.progress.score, 100);
        // The bullet got there first, so the ram never happened
        assert_eq!(state.progress.lives, 3);
    }

    #[test]
    fn test_enemy_bullet_hurts_unless_shielded() {
        let mut state = playing_state();
        let pos = state.player.pos;
        state.bullets.enemy.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.progress.lives, 2);

        state.progress.shield_active = true;
        state.bullets.enemy.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.progress.lives, 2);
        assert_eq!(state.bullets.enemy.active_count(), 0);
        assert!(state.events.contains(&GameEvent::ShieldAbsorbed));
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = playing_state();
        state.progress.lives = 1;
        let pos = state.player.pos;
        state.bullets.enemy.acquire(pos, Vec2::ZERO);
        state.bullets.enemy.acquire(pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.progress.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_nothing_resolves_after_last_life() {
        let mut state = playing_state();
        state.progress.lives = 1;
        let pos = state.player.pos;
        state.bullets.enemy.acquire(pos, Vec2::ZERO);
        let rammer = enemy_at(&mut state, EnemyKind::Gunship, pos);
        state.spawn_powerup(PowerupKind::Health, pos);
        resolve(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.progress.lives, 0);
        assert_eq!(state.progress.score, 0);
        assert_eq!(state.progress.enemies_killed_this_wave, 0);
        assert!(state.enemies[rammer].active);
        assert!(state.powerups[0].active);
        let hits = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(state.events.last(), Some(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_hurt_player_at_zero_lives_is_noop() {
        let mut state = playing_state();
        state.progress.lives = 0;
        state.events.clear();
        hurt_player(&mut state);
        assert_eq!(state.progress.lives, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_powerup_collected() {
        let mut state = playing_state();
        let pos = state.player.pos;
        state.spawn_powerup(PowerupKind::WeaponUpgrade, pos);
        resolve(&mut state);
        assert_eq!(state.progress.weapon_level, 2);
        assert!(!state.powerups[0].active);
        resolve(&mut state);
        assert_eq!(state.progress.weapon_level, 2);
    }

    #[test]
    fn test_boss_hit_and_defeat() {
        let mut state = playing_state();
        boss::trigger(&mut state);
        let encounter = state.boss.encounter();
        boss::begin_entrance(&mut state, encounter);
        let boss_pos = Vec2::new(400.0, 100.0);
        if let Some(b) = state.boss.boss.as_mut() {
            b.pos = boss_pos;
            b.health = 2;
        }
        state.bullets.player.acquire(boss_pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.boss.boss.as_ref().unwrap().health, 1);

        state.bullets.player.acquire(boss_pos, Vec2::ZERO);
        state.bullets.player.acquire(boss_pos, Vec2::ZERO);
        resolve(&mut state);
        assert_eq!(state.boss.phase, BossPhase::Defeat { stage: 0 });
        // Second bullet passes through once the boss is going down
        assert_eq!(state.bullets.player.active_count(), 1);
    }
}
