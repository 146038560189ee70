//! Sky Raid - combat simulation core for a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, progression, boss)
//! - `session`: Host-facing lifecycle and fixed-timestep driver
//! - `highscores`: Best-score persistence slot
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore, StoreError};
pub use session::Session;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in logical milliseconds (100 Hz)
    pub const SIM_DT_MS: u64 = 10;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host loop will feed in one update
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_SPEED: f32 = 280.0;
    /// Distance of the ship's resting line from the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Projectiles
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const PLAYER_BULLET_SPEED: f32 = 520.0;
    pub const ENEMY_BULLET_SPEED: f32 = 240.0;
    /// Horizontal gap between the twin shots of weapon level 2
    pub const TWIN_SHOT_SPACING: f32 = 12.0;
    /// Angle of the outer shots of weapon level 3 (radians, ~15 degrees)
    pub const SPREAD_SHOT_ANGLE: f32 = 0.2618;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 18.0;
    /// Enemies spawn this far above the visible playfield
    pub const ENEMY_SPAWN_Y: f32 = -30.0;

    /// Boss
    pub const BOSS_RADIUS: f32 = 56.0;
    pub const BOSS_ENTRANCE_SPEED: f32 = 80.0;
    pub const BOSS_COMBAT_Y: f32 = 110.0;
    pub const BOSS_PATROL_SPEED: f32 = 120.0;
    pub const BOSS_VOLLEY_SIZE: usize = 5;
    /// Total angular width of a boss volley fan (radians)
    pub const BOSS_VOLLEY_FAN: f32 = 1.2;
    /// Powerups dropped by a defeated boss scatter this far from its centre
    pub const BOSS_DROP_SCATTER: f32 = 40.0;

    /// Powerups
    pub const POWERUP_RADIUS: f32 = 12.0;
    pub const POWERUP_FALL_SPEED: f32 = 90.0;

    /// Hard limits from the progression rules
    pub const MAX_LIVES: u8 = 5;
    pub const MIN_WEAPON_LEVEL: u8 = 1;
    pub const MAX_WEAPON_LEVEL: u8 = 3;
}
