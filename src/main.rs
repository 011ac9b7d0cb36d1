//! Bricker entry point
//!
//! Runs a headless idle-mode session: the paddles follow the ball until the
//! game ends or the time limit runs out.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use bricker::consts::SIM_DT;
use bricker::sim::GameOutcome;
use bricker::{ConfigError, GameConfig, GameHost, Session, SessionStatus};
use clap::Parser;

/// Simulated seconds before the demo gives up
const DEMO_SECONDS: f32 = 300.0;

/// Bricker - brick-breaking demo run
#[derive(Parser, Debug)]
#[command(name = "bricker")]
#[command(about = "Brick-breaking game with randomized brick effects", long_about = None)]
struct Args {
    /// Rows of bricks
    #[arg(requires = "cols")]
    rows: Option<u32>,

    /// Columns of bricks
    #[arg(requires = "rows")]
    cols: Option<u32>,

    /// JSON config file (cannot be combined with rows/cols)
    #[arg(long, conflicts_with_all = ["rows", "cols"])]
    config: Option<PathBuf>,

    /// Seed for the first game (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Build and validate the game config these options describe
    fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let config = match (&self.config, self.rows, self.cols) {
            (Some(path), _, _) => return GameConfig::load(path),
            (None, Some(rows), Some(cols)) => GameConfig::with_grid(rows, cols),
            _ => GameConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Host that logs the end-of-game prompt and declines to play again
struct LogHost;

impl GameHost for LogHost {
    fn end_game(&mut self, outcome: GameOutcome) -> bool {
        log::info!("{}", outcome.prompt());
        false
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Bricker starting...");

    let args = Args::parse();
    let config = match args.game_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            eprintln!("bricker: {}", e);
            return ExitCode::from(2);
        }
    };

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Game initialized with seed: {}", seed);

    let mut session = match Session::new(config, seed, LogHost) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not start game: {}", e);
            return ExitCode::from(2);
        }
    };
    session.input_mut().idle_mode = true;

    let mut elapsed = 0.0;
    while elapsed < DEMO_SECONDS {
        if session.update(SIM_DT) == SessionStatus::Closed {
            break;
        }
        elapsed += SIM_DT;
    }

    let state = session.state();
    match state.outcome() {
        Some(outcome) => log::info!("Finished after {} frames: {:?}", state.frame, outcome),
        None => log::info!(
            "Time limit reached with {} bricks left and {} lives",
            state.bricks.live_count(),
            state.power.lives()
        ),
    }
    ExitCode::SUCCESS
}
