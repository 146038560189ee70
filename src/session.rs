//! Host-facing session
//!
//! Owns the simulation state, the best-score store and the fixed-timestep
//! accumulator. Hosts call `init` once, feed frame deltas and input through
//! `update`, pull a snapshot to draw, and call `destroy` when tearing down.

use crate::consts::*;
use crate::highscores::{self, HighScoreStore};
use crate::sim::{
    GameEvent, GamePhase, GameState, PhaseCommand, RenderSnapshot, TickInput, snapshot, tick,
};
use crate::tuning::Tuning;

pub struct Session {
    tuning: Tuning,
    seed: u64,
    store: Box<dyn HighScoreStore>,
    state: Option<GameState>,
    accumulator_ms: f64,
    /// Pause edges not yet delivered; each tick consumes at most one
    pending_pauses: u32,
    /// Events from every tick run by the last `update`/`step`
    frame_events: Vec<GameEvent>,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64, store: Box<dyn HighScoreStore>) -> Self {
        Self {
            tuning,
            seed,
            store,
            state: None,
            accumulator_ms: 0.0,
            pending_pauses: 0,
            frame_events: Vec::new(),
        }
    }

    /// Create a fresh game state and move from Booting to Menu.
    /// Calling it again discards the previous state.
    pub fn init(&mut self) {
        let mut state = GameState::new(self.seed, self.tuning.clone());
        state.phase = GamePhase::Booting;
        state.apply(PhaseCommand::Boot);
        self.state = Some(state);
        self.accumulator_ms = 0.0;
        self.pending_pauses = 0;
        self.frame_events.clear();
        log::info!("Session initialised (seed {})", self.seed);
    }

    /// Tear down all simulation state. Safe to call repeatedly or before `init`.
    pub fn destroy(&mut self) {
        if self.state.take().is_some() {
            log::info!("Session destroyed");
        }
        self.accumulator_ms = 0.0;
        self.pending_pauses = 0;
        self.frame_events.clear();
    }

    pub fn phase(&self) -> GamePhase {
        self.state.as_ref().map_or(GamePhase::Booting, |s| s.phase)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> bool {
        self.command(PhaseCommand::Start)
    }

    /// GameOver -> Playing with a fresh run
    pub fn restart(&mut self) -> bool {
        self.command(PhaseCommand::Restart)
    }

    /// GameOver or Paused -> Menu
    pub fn return_to_menu(&mut self) -> bool {
        self.command(PhaseCommand::ReturnToMenu)
    }

    fn command(&mut self, command: PhaseCommand) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let applied = state.apply(command);
        if applied && matches!(command, PhaseCommand::Start | PhaseCommand::Restart) {
            self.accumulator_ms = 0.0;
            log::info!("Run started");
        }
        applied
    }

    /// Feed one host frame. Runs as many fixed ticks as the accumulated time
    /// allows (bounded by `MAX_SUBSTEPS`) and returns how many ran.
    pub fn update(&mut self, frame_ms: f64, input: &TickInput) -> u32 {
        self.frame_events.clear();
        if self.state.is_none() {
            return 0;
        }
        self.pending_pauses += u32::from(input.pause);
        self.accumulator_ms += frame_ms.clamp(0.0, MAX_FRAME_MS);

        let step_ms = SIM_DT_MS as f64;
        let mut substeps = 0;
        while self.accumulator_ms >= step_ms && substeps < MAX_SUBSTEPS {
            let mut tick_input = input.clone();
            // One queued edge per tick, so two presses toggle twice
            tick_input.pause = self.pending_pauses > 0;
            self.pending_pauses = self.pending_pauses.saturating_sub(1);
            self.run_tick(&tick_input);
            self.accumulator_ms -= step_ms;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one fixed tick regardless of the accumulator
    pub fn step(&mut self, input: &TickInput) {
        self.frame_events.clear();
        self.run_tick(input);
    }

    fn run_tick(&mut self, input: &TickInput) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let was = state.phase;
        tick(state, input, SIM_DT_MS);

        if was != GamePhase::GameOver && state.phase == GamePhase::GameOver {
            let score = state.progress.score;
            if highscores::record_if_best(self.store.as_mut(), score) {
                state.events.push(GameEvent::NewHighScore { score });
            }
        }
        self.frame_events.extend(state.events.iter().copied());
    }

    /// Events raised since the last `update`/`step` began
    pub fn events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    /// Renderable state, or `None` before `init`/after `destroy`
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.state.as_ref().map(snapshot)
    }

    pub fn best_score(&self) -> u64 {
        self.store.load_best()
    }
}
