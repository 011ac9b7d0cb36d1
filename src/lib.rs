//! Bricker - A brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world, physics, brick effects, game loop)
//! - `config`: Game configuration and startup validation
//! - `session`: Fixed timestep driver and end-of-game handling

pub mod config;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use session::{GameHost, Session, SessionStatus};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 700.0;
    /// Invisible side/top walls
    pub const WALL_WIDTH: f32 = 10.0;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 7;
    pub const BRICK_COLS: u32 = 8;
    pub const BRICK_HEIGHT: f32 = 15.0;
    /// Vertical gap between brick rows
    pub const BRICK_ROW_GAP: f32 = 2.0;
    /// Horizontal gap between neighbouring bricks
    pub const BRICK_COL_GAP: f32 = 0.2;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance of the paddle center above the floor
    pub const PADDLE_Y_OFFSET: f32 = 50.0;
    pub const PADDLE_SPEED: f32 = 300.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_SPEED: f32 = 200.0;
    /// Puck size relative to the main ball
    pub const PUCK_SCALE: f32 = 0.75;
    /// Pucks spawned by one ExtraBall effect
    pub const PUCKS_PER_HIT: u32 = 2;

    /// Dropped heart defaults
    pub const HEART_SIZE: f32 = 25.0;
    pub const HEART_SPEED: f32 = 100.0;

    /// Lives
    pub const INITIAL_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 4;

    /// Impacts the extra paddle absorbs before it disappears
    pub const EXTRA_PADDLE_HITS: u32 = 4;
    /// Main ball collisions before the follow camera turns off
    pub const CAMERA_MODE_COLLISIONS: u32 = 5;
    /// Follow camera view size relative to the window
    pub const CAMERA_ZOOM: f32 = 1.2;

    /// Size of the random draw used when assigning a brick effect
    pub const BRICK_EFFECT_DRAW_RANGE: u32 = 10;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
