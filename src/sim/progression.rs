//! Score, lives, weapon level and timed effects
//!
//! All mutation of the run's progression goes through the methods here so
//! the range invariants (lives in [0, 5], weapon in [1, 3], multiplier in
//! {1, 2}) hold after every call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Powerup effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    WeaponUpgrade,
    Shield,
    ScoreMultiplier,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Health,
        PowerupKind::WeaponUpgrade,
        PowerupKind::Shield,
        PowerupKind::ScoreMultiplier,
    ];
}

/// One projectile of a volley: spawn offset from the ship and travel direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub offset: Vec2,
    pub dir: Vec2,
}

/// Fire pattern for a weapon level (y grows downward, so "forward" is -Y)
pub fn shot_pattern(weapon_level: u8) -> Vec<Shot> {
    let forward = Vec2::new(0.0, -1.0);
    let half = TWIN_SHOT_SPACING / 2.0;
    match weapon_level.clamp(MIN_WEAPON_LEVEL, MAX_WEAPON_LEVEL) {
        1 => vec![Shot { offset: Vec2::ZERO, dir: forward }],
        2 => vec![
            Shot { offset: Vec2::new(-half, 0.0), dir: forward },
            Shot { offset: Vec2::new(half, 0.0), dir: forward },
        ],
        _ => {
            let (s, c) = SPREAD_SHOT_ANGLE.sin_cos();
            vec![
                Shot { offset: Vec2::ZERO, dir: forward },
                Shot { offset: Vec2::new(-half, 0.0), dir: Vec2::new(-s, -c) },
                Shot { offset: Vec2::new(half, 0.0), dir: Vec2::new(s, -c) },
            ]
        }
    }
}

/// Per-run progression state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based), raised by each boss defeat
    pub level: u32,
    pub weapon_level: u8,
    pub score_multiplier: u8,
    pub multiplier_expires_at: Option<u64>,
    pub shield_active: bool,
    pub shield_expires_at: Option<u64>,
    pub enemies_killed_this_wave: u32,
    pub kills_required_for_boss: u32,
    pub boss_active: bool,
    last_shot_at: Option<u64>,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives.min(MAX_LIVES),
            level: 1,
            weapon_level: MIN_WEAPON_LEVEL,
            score_multiplier: 1,
            multiplier_expires_at: None,
            shield_active: false,
            shield_expires_at: None,
            enemies_killed_this_wave: 0,
            kills_required_for_boss: tuning.kills_for_first_boss,
            boss_active: false,
            last_shot_at: None,
        }
    }

    /// Add `base_points` scaled by the current multiplier; returns what was awarded
    pub fn award(&mut self, base_points: u64) -> u64 {
        let awarded = base_points * u64::from(self.score_multiplier);
        self.score = self.score.saturating_add(awarded);
        awarded
    }

    /// Score an enemy kill and count it toward the boss threshold
    pub fn register_kill(&mut self, base_points: u64) -> u64 {
        self.enemies_killed_this_wave += 1;
        self.award(base_points)
    }

    /// Apply one unit of damage. Returns true when this left the player out of lives.
    pub fn damage_player(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Apply a powerup's effect at logical time `now`
    pub fn apply_powerup(&mut self, kind: PowerupKind, now: u64, tuning: &Tuning) {
        match kind {
            PowerupKind::Health => {
                self.lives = (self.lives + 1).min(MAX_LIVES);
            }
            PowerupKind::WeaponUpgrade => {
                self.weapon_level = (self.weapon_level + 1).min(MAX_WEAPON_LEVEL);
            }
            PowerupKind::Shield => {
                self.shield_active = true;
                self.shield_expires_at = Some(now + tuning.shield_duration_ms);
            }
            PowerupKind::ScoreMultiplier => {
                self.score_multiplier = 2;
                self.multiplier_expires_at = Some(now + tuning.multiplier_duration_ms);
            }
        }
    }

    /// Drop timed effects whose window closed at or before `now`
    pub fn expire_timers(&mut self, now: u64) {
        if self.shield_expires_at.is_some_and(|at| now >= at) {
            self.shield_active = false;
            self.shield_expires_at = None;
        }
        if self.multiplier_expires_at.is_some_and(|at| now >= at) {
            self.score_multiplier = 1;
            self.multiplier_expires_at = None;
        }
    }

    /// Whether enough kills have accumulated to call in the boss
    pub fn boss_due(&self) -> bool {
        !self.boss_active && self.enemies_killed_this_wave >= self.kills_required_for_boss
    }

    /// Close out a wave after the boss falls
    pub fn complete_wave(&mut self, tuning: &Tuning) {
        self.enemies_killed_this_wave = 0;
        self.level += 1;
        self.kills_required_for_boss += tuning.boss_kills_increment;
        self.boss_active = false;
    }

    /// Rate-limit the ship's gun. Returns true (and records the shot) when
    /// at least `interval_ms` has elapsed since the previous shot.
    pub fn try_fire(&mut self, now: u64, interval_ms: u64) -> bool {
        let ready = self
            .last_shot_at
            .is_none_or(|last| now.saturating_sub(last) >= interval_ms);
        if ready {
            self.last_shot_at = Some(now);
        }
        ready
    }

    /// HUD label for the current multiplier
    pub fn multiplier_label(&self) -> String {
        format!("x{}", self.score_multiplier)
    }

    /// Pull any out-of-range field back to its nearest legal value
    pub fn clamp_invariants(&mut self) {
        self.lives = self.lives.min(MAX_LIVES);
        self.weapon_level = self.weapon_level.clamp(MIN_WEAPON_LEVEL, MAX_WEAPON_LEVEL);
        self.score_multiplier = self.score_multiplier.clamp(1, 2);
        self.level = self.level.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progression() -> Progression {
        Progression::new(&Tuning::default())
    }

    #[test]
    fn test_health_caps_at_five() {
        let tuning = Tuning::default();
        let mut p = progression();
        for _ in 0..10 {
            p.apply_powerup(PowerupKind::Health, 0, &tuning);
        }
        assert_eq!(p.lives, 5);
    }

    #[test]
    fn test_weapon_caps_at_three() {
        let tuning = Tuning::default();
        let mut p = progression();
        for _ in 0..5 {
            p.apply_powerup(PowerupKind::WeaponUpgrade, 0, &tuning);
        }
        assert_eq!(p.weapon_level, 3);
    }

    #[test]
    fn test_shield_expires_on_time() {
        let tuning = Tuning::default();
        let mut p = progression();
        p.apply_powerup(PowerupKind::Shield, 1000, &tuning);
        p.expire_timers(8999);
        assert!(p.shield_active);
        p.expire_timers(9000);
        assert!(!p.shield_active);
    }

    #[test]
    fn test_multiplier_window() {
        let tuning = Tuning::default();
        let mut p = progression();
        p.apply_powerup(PowerupKind::ScoreMultiplier, 0, &tuning);
        p.expire_timers(9999);
        assert_eq!(p.register_kill(100), 200);
        p.expire_timers(10_001);
        assert_eq!(p.register_kill(100), 100);
        assert_eq!(p.score, 300);
        assert_eq!(p.enemies_killed_this_wave, 2);
    }

    #[test]
    fn test_second_multiplier_extends_window() {
        let tuning = Tuning::default();
        let mut p = progression();
        p.apply_powerup(PowerupKind::ScoreMultiplier, 0, &tuning);
        p.apply_powerup(PowerupKind::ScoreMultiplier, 5000, &tuning);
        p.expire_timers(12_000);
        assert_eq!(p.score_multiplier, 2);
        p.expire_timers(15_000);
        assert_eq!(p.score_multiplier, 1);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut p = progression();
        assert!(!p.damage_player());
        assert!(!p.damage_player());
        assert!(p.damage_player());
        assert!(p.damage_player());
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn test_fire_rate_limit() {
        let mut p = progression();
        assert!(p.try_fire(0, 150));
        assert!(!p.try_fire(100, 150));
        assert!(p.try_fire(150, 150));
        assert!(!p.try_fire(299, 150));
    }

    #[test]
    fn test_shot_patterns() {
        assert_eq!(shot_pattern(1).len(), 1);
        let twin = shot_pattern(2);
        assert_eq!(twin.len(), 2);
        assert_eq!(twin[0].dir, twin[1].dir);
        let spread = shot_pattern(3);
        assert_eq!(spread.len(), 3);
        assert!(spread[1].dir.x < 0.0 && spread[2].dir.x > 0.0);
        assert!(spread.iter().all(|s| s.dir.y < 0.0));
    }

    #[test]
    fn test_clamp_invariants() {
        let mut p = progression();
        p.lives = 9;
        p.weapon_level = 0;
        p.score_multiplier = 7;
        p.clamp_invariants();
        assert_eq!((p.lives, p.weapon_level, p.score_multiplier), (5, 1, 2));
    }

    #[test]
    fn test_complete_wave_raises_threshold() {
        let tuning = Tuning::default();
        let mut p = progression();
        p.enemies_killed_this_wave = 20;
        p.boss_active = true;
        p.complete_wave(&tuning);
        assert_eq!(p.level, 2);
        assert_eq!(p.kills_required_for_boss, 30);
        assert_eq!(p.enemies_killed_this_wave, 0);
        assert!(!p.boss_active);
    }
}
