//! Pausable logical clock and deferred-action schedule
//!
//! Every wait in the simulation (enemy fire delays, boss warning, explosion
//! stages) is a record in [`Schedule`] keyed by logical time. The clock only
//! advances while the session is playing, so pausing freezes all of them.
//! Records are never cancelled; the action handler checks that whatever the
//! record refers to is still alive.

/// Logical time in milliseconds since the session started playing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock {
    now_ms: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Advance by one tick's delta
    pub fn advance(&mut self, dt_ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
        self.now_ms
    }
}

/// A deferred action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enemy fires once (inert if the enemy is gone)
    EnemyFire { enemy_id: u32 },
    /// Enemy fires and re-arms itself every `every_ms`
    EnemyFireRepeating { enemy_id: u32, every_ms: u64 },
    /// Boss warning banner has run its course
    BossWarningOver { encounter: u32 },
    /// Boss fires a volley and re-arms while in combat
    BossVolley { encounter: u32 },
    /// Next stage of the boss explosion sequence
    BossExplosionStage { encounter: u32, stage: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    at_ms: u64,
    seq: u64,
    action: Action,
}

/// Pending deferred actions, polled once per tick
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pending: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action to fire once logical time reaches `at_ms`
    pub fn at(&mut self, at_ms: u64, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Entry { at_ms, seq, action });
    }

    /// Remove and return every action due at `now_ms`, earliest first.
    /// Actions due at the same time come out in the order they were queued.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<Action> {
        let mut due: Vec<Entry> = Vec::new();
        self.pending.retain(|entry| {
            if entry.at_ms <= now_ms {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.at_ms, e.seq));
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending fire time, if any
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|e| e.at_ms).min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
