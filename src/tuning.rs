//! Data-driven game balance
//!
//! Every timing and threshold knob of the simulation lives here so a host can
//! load an alternate balance from JSON without recompiling.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Failure to load a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "invalid tuning json: {err}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Balance parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Horizontal margin kept clear when choosing a spawn column
    pub spawn_margin: f32,

    // === Spawning & difficulty ===
    pub spawn_interval_ms: u64,
    pub spawn_interval_floor_ms: u64,
    pub difficulty_period_ms: u64,
    pub difficulty_step_ms: u64,
    /// Concurrent enemy cap (spawn ticks at the cap do nothing)
    pub max_enemies: usize,

    // === Pools ===
    pub player_bullet_capacity: usize,
    pub enemy_bullet_capacity: usize,

    // === Player ===
    pub starting_lives: u8,
    pub fire_interval_ms: u64,
    pub shield_duration_ms: u64,
    pub multiplier_duration_ms: u64,
    /// Chance (0-1) that a destroyed enemy drops a powerup
    pub powerup_drop_chance: f64,

    // === Boss ===
    pub kills_for_first_boss: u32,
    pub boss_kills_increment: u32,
    pub boss_warning_ms: u64,
    pub boss_volley_interval_ms: u64,
    pub boss_explosion_stages: u32,
    pub boss_explosion_stage_ms: u64,
    pub boss_powerup_drops: u32,
    pub boss_base_health: u32,
    pub boss_health_per_level: u32,
    pub boss_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            spawn_margin: 40.0,

            spawn_interval_ms: 2000,
            spawn_interval_floor_ms: 500,
            difficulty_period_ms: 30_000,
            difficulty_step_ms: 200,
            max_enemies: 24,

            player_bullet_capacity: 50,
            enemy_bullet_capacity: 100,

            starting_lives: 3,
            fire_interval_ms: 150,
            shield_duration_ms: 8000,
            multiplier_duration_ms: 10_000,
            powerup_drop_chance: 0.15,

            kills_for_first_boss: 20,
            boss_kills_increment: 10,
            boss_warning_ms: 2000,
            boss_volley_interval_ms: 1500,
            boss_explosion_stages: 5,
            boss_explosion_stage_ms: 250,
            boss_powerup_drops: 3,
            boss_base_health: 60,
            boss_health_per_level: 20,
            boss_points: 5000,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        self.playfield_width = self.playfield_width.max(4.0 * self.spawn_margin.max(1.0));
        self.playfield_height = self.playfield_height.max(200.0);
        self.spawn_interval_floor_ms = self.spawn_interval_floor_ms.max(1);
        self.spawn_interval_ms = self.spawn_interval_ms.max(self.spawn_interval_floor_ms);
        self.difficulty_period_ms = self.difficulty_period_ms.max(1);
        self.player_bullet_capacity = self.player_bullet_capacity.max(1);
        self.enemy_bullet_capacity = self.enemy_bullet_capacity.max(1);
        self.starting_lives = self.starting_lives.clamp(1, crate::consts::MAX_LIVES);
        self.powerup_drop_chance = self.powerup_drop_chance.clamp(0.0, 1.0);
        self.kills_for_first_boss = self.kills_for_first_boss.max(1);
        self.boss_volley_interval_ms = self.boss_volley_interval_ms.max(1);
        self.boss_base_health = self.boss_base_health.max(1);
        self
    }
}
