//! Fixed timestep driver and end-of-game handling
//!
//! The window side of the game hands real frame times to [`Session::update`],
//! which runs the simulation at [`SIM_DT`] and asks its [`GameHost`] what to do
//! when a game ends.

use crate::config::{ConfigError, GameConfig};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameOutcome, GameState, TickInput, tick};

/// Longest frame time accepted before clamping (avoids huge catch-up bursts)
const MAX_FRAME_DT: f32 = 0.1;

/// Window-side collaborator shown the end-of-game prompt
pub trait GameHost {
    /// Show the outcome to the player. Return true to play again.
    fn end_game(&mut self, outcome: GameOutcome) -> bool;
}

/// What happened during a session update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Game still in progress
    Running,
    /// A game ended and a fresh one was started
    Restarted,
    /// A game ended and the player chose to quit
    Closed,
}

/// A sequence of games sharing one configuration
pub struct Session<H: GameHost> {
    state: GameState,
    host: H,
    input: TickInput,
    accumulator: f32,
    status: SessionStatus,
    games_played: u32,
}

impl<H: GameHost> Session<H> {
    pub fn new(config: GameConfig, seed: u64, host: H) -> Result<Self, ConfigError> {
        let state = GameState::new(config, seed)?;
        Ok(Self {
            state,
            host,
            input: TickInput::default(),
            accumulator: 0.0,
            status: SessionStatus::Running,
            games_played: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Closed
    }

    /// Games finished so far
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Run simulation ticks for `dt` seconds of real time
    pub fn update(&mut self, dt: f32) -> SessionStatus {
        if self.is_closed() {
            return SessionStatus::Closed;
        }

        self.accumulator += dt.min(MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            if let Some(outcome) = tick(&mut self.state, &self.input, SIM_DT) {
                self.accumulator = 0.0;
                self.status = self.finish(outcome);
                return self.status;
            }
        }

        self.status = SessionStatus::Running;
        self.status
    }

    fn finish(&mut self, outcome: GameOutcome) -> SessionStatus {
        self.games_played += 1;
        log::info!("{} (game {})", outcome.prompt(), self.games_played);

        if !self.host.end_game(outcome) {
            log::info!("Session closed");
            return SessionStatus::Closed;
        }

        let seed = next_seed(self.state.seed);
        match GameState::new(self.state.config.clone(), seed) {
            Ok(state) => {
                log::info!("Game restarted with seed: {}", seed);
                self.state = state;
                SessionStatus::Restarted
            }
            Err(e) => {
                log::error!("Restart failed: {}", e);
                SessionStatus::Closed
            }
        }
    }
}

/// Seed for the next game, derived from the previous one
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}
