//! Game state and core simulation types
//!
//! Everything a running session mutates lives in [`GameState`]. The struct is
//! owned by the caller; there is no global instance.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossEncounter;
use super::clock::{LogicalClock, Schedule};
use super::difficulty::DifficultyScheduler;
use super::phase::{GamePhase, PhaseCommand};
use super::pool::BulletPools;
use super::progression::{PowerupKind, Progression};
use super::spawn::SpawnDirector;
use crate::consts::*;
use crate::tuning::Tuning;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Straight dive, one aimed shot shortly after spawning
    Scout,
    /// Quick descent with a wide lateral weave, never fires
    Weaver,
    /// Slow and armoured, fires straight down on a repeating timer
    Gunship,
}

impl EnemyKind {
    /// Selection order used by weighted spawning
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Scout, EnemyKind::Weaver, EnemyKind::Gunship];

    pub fn base_health(self) -> u32 {
        match self {
            EnemyKind::Scout => 1,
            EnemyKind::Weaver => 1,
            EnemyKind::Gunship => 3,
        }
    }

    /// Score for destroying one (not scaled by level)
    pub fn points(self) -> u32 {
        match self {
            EnemyKind::Scout => 100,
            EnemyKind::Weaver => 150,
            EnemyKind::Gunship => 300,
        }
    }

    /// Descent speed at multiplier 1.0 (pixels/s)
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Scout => 120.0,
            EnemyKind::Weaver => 150.0,
            EnemyKind::Gunship => 60.0,
        }
    }
}

/// Movement/fire behaviour assigned at spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Straight line along `vel`
    Dive,
    /// Sine weave around `origin_x` while descending
    Weave {
        origin_x: f32,
        amplitude: f32,
        /// Angular frequency (radians/s)
        frequency: f32,
    },
    /// Slow descent; fire timer lives in the schedule
    Gunship,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.playfield_width / 2.0,
                tuning.playfield_height - PLAYER_BOTTOM_OFFSET,
            ),
            radius: PLAYER_RADIUS,
        }
    }

    /// Move along `dir` (not necessarily normalised) and stay inside the playfield
    pub fn steer(&mut self, dir: Vec2, dt: f32, tuning: &Tuning) {
        let step = dir.normalize_or_zero() * PLAYER_SPEED * dt;
        self.pos = (self.pos + step).clamp(
            Vec2::splat(self.radius),
            Vec2::new(
                tuning.playfield_width - self.radius,
                tuning.playfield_height - self.radius,
            ),
        );
    }
}

/// An enemy ship
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u32,
    pub points: u32,
    pub behavior: Behavior,
    pub active: bool,
    /// Logical time of spawn (drives the weave phase)
    pub spawned_at: u64,
}

impl Enemy {
    /// Advance along the assigned behaviour
    pub fn update(&mut self, now: u64, dt: f32, playfield_width: f32) {
        match self.behavior {
            Behavior::Dive | Behavior::Gunship => {
                self.pos += self.vel * dt;
            }
            Behavior::Weave {
                origin_x,
                amplitude,
                frequency,
            } => {
                let t = now.saturating_sub(self.spawned_at) as f32 / 1000.0;
                self.pos.y += self.vel.y * dt;
                self.pos.x = (origin_x + amplitude * (frequency * t).sin())
                    .clamp(ENEMY_RADIUS, playfield_width - ENEMY_RADIUS);
            }
        }
    }
}

/// A falling powerup
#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { kind: EnemyKind },
    EnemyDestroyed { kind: EnemyKind, points: u64 },
    PlayerHit { lives_left: u8 },
    ShieldAbsorbed,
    PowerupSpawned { kind: PowerupKind },
    PowerupCollected { kind: PowerupKind },
    DifficultyUp { spawn_interval_ms: u64 },
    BossWarning { level: u32 },
    BossEntered,
    BossExplosion { stage: u32 },
    BossDefeated { points: u64 },
    LevelUp { level: u32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub clock: LogicalClock,
    pub schedule: Schedule,
    pub progress: Progression,
    pub player: Player,
    /// Live enemies (inactive ones are dropped at the end of each tick)
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub bullets: BulletPools,
    pub spawner: SpawnDirector,
    pub difficulty: DifficultyScheduler,
    pub boss: BossEncounter,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session sitting at the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            clock: LogicalClock::new(),
            schedule: Schedule::new(),
            progress: Progression::new(&tuning),
            player: Player::new(&tuning),
            enemies: Vec::new(),
            powerups: Vec::new(),
            bullets: BulletPools::new(tuning.player_bullet_capacity, tuning.enemy_bullet_capacity),
            spawner: SpawnDirector::new(&tuning),
            difficulty: DifficultyScheduler::new(&tuning),
            boss: BossEncounter::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Apply a phase command; returns false (and changes nothing) if illegal
    pub fn apply(&mut self, command: PhaseCommand) -> bool {
        let Some(next) = self.phase.next(command) else {
            log::debug!("Ignoring {:?} while {:?}", command, self.phase);
            return false;
        };
        if matches!(command, PhaseCommand::Start | PhaseCommand::Restart) {
            self.reset_run();
        }
        self.phase = next;
        true
    }

    /// Wipe the run back to its starting values (the RNG stream continues)
    pub fn reset_run(&mut self) {
        self.clock = LogicalClock::new();
        self.schedule.clear();
        self.progress = Progression::new(&self.tuning);
        self.player = Player::new(&self.tuning);
        self.enemies.clear();
        self.powerups.clear();
        self.bullets.player.release_all();
        self.bullets.enemy.release_all();
        self.spawner = SpawnDirector::new(&self.tuning);
        self.difficulty = DifficultyScheduler::new(&self.tuning);
        self.boss = BossEncounter::new();
        self.events.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Live enemy by id
    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id && e.active)
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    /// Region outside of which projectiles are recycled
    pub fn projectile_bounds(&self) -> (Vec2, Vec2) {
        let pad = BULLET_RADIUS * 2.0;
        (
            Vec2::splat(-pad),
            Vec2::new(self.tuning.playfield_width + pad, self.tuning.playfield_height + pad),
        )
    }

    /// Drop a powerup at `pos`
    pub fn spawn_powerup(&mut self, kind: PowerupKind, pos: Vec2) {
        self.powerups.push(Powerup {
            kind,
            pos,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            active: true,
        });
        self.events.push(GameEvent::PowerupSpawned { kind });
    }

    /// Enter GameOver (no-op unless currently playing)
    pub fn end_run(&mut self) {
        if self.apply(PhaseCommand::LivesDepleted) {
            log::info!(
                "Game over: score {} at level {}",
                self.progress.score,
                self.progress.level
            );
            self.events.push(GameEvent::GameOver {
                score: self.progress.score,
            });
        }
    }
}
