//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical clock only (advanced by the caller's fixed delta)
//! - Seeded RNG only
//! - Single-threaded; state is owned by one caller
//! - No rendering or platform dependencies

pub mod boss;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod phase;
pub mod pool;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossEncounter, BossPhase};
pub use clock::{Action, LogicalClock, Schedule};
pub use collision::circles_overlap;
pub use difficulty::DifficultyScheduler;
pub use phase::{GamePhase, PhaseCommand, TRANSITIONS};
pub use pool::{Bullet, BulletOwner, BulletPool, BulletPools};
pub use progression::{PowerupKind, Progression, Shot, shot_pattern};
pub use snapshot::{EntityCategory, Hud, RenderEntity, RenderSnapshot, snapshot};
pub use spawn::{SpawnDirector, enemy_health, enemy_weights, pick_weighted, weighted_index};
pub use state::{Behavior, Enemy, EnemyKind, GameEvent, GameState, Player, Powerup};
pub use tick::{TickInput, tick};
