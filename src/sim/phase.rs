//! Session phases and their legal transitions
//!
//! The whole lifecycle is one enum plus a transition table, so every legal
//! move is enumerable and anything not in the table is rejected.

use serde::{Deserialize, Serialize};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Host has not initialised the session yet
    Booting,
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay (the only phase that advances the clock)
    Playing,
    /// Frozen gameplay; ticks are ingested but ignored
    Paused,
    /// Run ended, waiting for restart or menu
    GameOver,
}

/// Request to move between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseCommand {
    Boot,
    Start,
    Pause,
    Resume,
    LivesDepleted,
    Restart,
    ReturnToMenu,
}

/// Every legal (from, command, to) transition
pub const TRANSITIONS: [(GamePhase, PhaseCommand, GamePhase); 8] = [
    (GamePhase::Booting, PhaseCommand::Boot, GamePhase::Menu),
    (GamePhase::Menu, PhaseCommand::Start, GamePhase::Playing),
    (GamePhase::Playing, PhaseCommand::Pause, GamePhase::Paused),
    (GamePhase::Paused, PhaseCommand::Resume, GamePhase::Playing),
    (GamePhase::Playing, PhaseCommand::LivesDepleted, GamePhase::GameOver),
    (GamePhase::GameOver, PhaseCommand::Restart, GamePhase::Playing),
    (GamePhase::GameOver, PhaseCommand::ReturnToMenu, GamePhase::Menu),
    (GamePhase::Paused, PhaseCommand::ReturnToMenu, GamePhase::Menu),
];

impl GamePhase {
    /// Phase reached by applying `command`, or `None` if the move is illegal
    pub fn next(self, command: PhaseCommand) -> Option<GamePhase> {
        TRANSITIONS
            .iter()
            .find(|(from, cmd, _)| *from == self && *cmd == command)
            .map(|(_, _, to)| *to)
    }

    /// Whether spawning, timers, movement and collisions run in this phase
    pub fn runs_simulation(self) -> bool {
        self == GamePhase::Playing
    }

    /// Pause-toggle edge: Playing <-> Paused, ignored elsewhere
    pub fn toggle_pause(self) -> GamePhase {
        let command = match self {
            GamePhase::Playing => PhaseCommand::Pause,
            GamePhase::Paused => PhaseCommand::Resume,
            _ => return self,
        };
        self.next(command).unwrap_or(self)
    }
}
