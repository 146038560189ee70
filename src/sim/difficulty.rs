//! Time-driven difficulty ramp
//!
//! Every `difficulty_period_ms` of played time the spawn interval drops by
//! `difficulty_step_ms`, never below the configured floor.

use super::spawn::SpawnDirector;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyScheduler {
    next_step_at: u64,
    period_ms: u64,
    step_ms: u64,
    floor_ms: u64,
}

impl DifficultyScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        let period_ms = tuning.difficulty_period_ms.max(1);
        Self {
            next_step_at: period_ms,
            period_ms,
            step_ms: tuning.difficulty_step_ms,
            floor_ms: tuning.spawn_interval_floor_ms,
        }
    }

    /// Logical time of the next ramp step
    pub fn next_step_at(&self) -> u64 {
        self.next_step_at
    }

    /// Apply every ramp step due at `now`. Returns true if the interval changed.
    pub fn update(&mut self, now: u64, spawner: &mut SpawnDirector) -> bool {
        let mut changed = false;
        while now >= self.next_step_at {
            self.next_step_at += self.period_ms;
            if spawner.interval_ms > self.floor_ms {
                spawner.interval_ms = spawner
                    .interval_ms
                    .saturating_sub(self.step_ms)
                    .max(self.floor_ms);
                changed = true;
                log::debug!("Spawn interval now {} ms", spawner.interval_ms);
            }
        }
        changed
    }
}
