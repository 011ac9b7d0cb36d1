//! Game configuration
//!
//! Loaded from JSON or built from command-line options, validated once at startup.
//! Gameplay code assumes a validated config.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Brick grid has no rows or no columns
    #[error("brick grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },

    /// Initial lives outside 1..=max
    #[error("initial lives must be between 1 and {max} (got {initial})")]
    InvalidLives { initial: u32, max: u32 },

    /// A size or speed that must be strictly positive
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    /// Brick grid does not fit between the walls and the paddle
    #[error("{rows} rows of bricks do not fit above the paddle")]
    GridOverflow { rows: u32 },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub window_width: f32,
    pub window_height: f32,
    pub wall_width: f32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_height: f32,
    pub brick_row_gap: f32,
    pub brick_col_gap: f32,
    /// Exclusive upper bound of the effect draw for each brick
    pub brick_draw_range: u32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_y_offset: f32,
    pub paddle_speed: f32,

    // === Balls ===
    pub ball_size: f32,
    pub ball_speed: f32,
    pub puck_scale: f32,
    pub pucks_per_hit: u32,

    // === Hearts ===
    pub heart_size: f32,
    pub heart_speed: f32,
    pub initial_lives: u32,
    pub max_lives: u32,

    // === Timed modes ===
    pub extra_paddle_hits: u32,
    pub camera_collisions: u32,
    pub camera_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            wall_width: WALL_WIDTH,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_height: BRICK_HEIGHT,
            brick_row_gap: BRICK_ROW_GAP,
            brick_col_gap: BRICK_COL_GAP,
            brick_draw_range: BRICK_EFFECT_DRAW_RANGE,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y_offset: PADDLE_Y_OFFSET,
            paddle_speed: PADDLE_SPEED,

            ball_size: BALL_SIZE,
            ball_speed: BALL_SPEED,
            puck_scale: PUCK_SCALE,
            pucks_per_hit: PUCKS_PER_HIT,

            heart_size: HEART_SIZE,
            heart_speed: HEART_SPEED,
            initial_lives: INITIAL_LIVES,
            max_lives: MAX_LIVES,

            extra_paddle_hits: EXTRA_PADDLE_HITS,
            camera_collisions: CAMERA_MODE_COLLISIONS,
            camera_zoom: CAMERA_ZOOM,
        }
    }
}

impl GameConfig {
    /// Default config with a custom brick grid
    pub fn with_grid(rows: u32, cols: u32) -> Self {
        Self {
            brick_rows: rows,
            brick_cols: cols,
            ..Self::default()
        }
    }

    /// Parse a JSON config (missing fields take their defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check the config for caller errors
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.brick_rows,
                cols: self.brick_cols,
            });
        }
        if self.initial_lives == 0 || self.initial_lives > self.max_lives {
            return Err(ConfigError::InvalidLives {
                initial: self.initial_lives,
                max: self.max_lives,
            });
        }

        let positive = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("brick_height", self.brick_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
            ("puck_scale", self.puck_scale),
            ("heart_size", self.heart_size),
            ("heart_speed", self.heart_speed),
            ("camera_zoom", self.camera_zoom),
            ("brick_draw_range", self.brick_draw_range as f32),
            ("extra_paddle_hits", self.extra_paddle_hits as f32),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.brick_width() <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "brick width",
                value: self.brick_width(),
            });
        }
        if self.grid_bottom() >= self.paddle_y() - self.paddle_height / 2.0 {
            return Err(ConfigError::GridOverflow {
                rows: self.brick_rows,
            });
        }

        Ok(())
    }

    /// Window size as a vector
    pub fn window(&self) -> Vec2 {
        Vec2::new(self.window_width, self.window_height)
    }

    /// Arena center (ball and extra paddle spawn point)
    pub fn center(&self) -> Vec2 {
        self.window() * 0.5
    }

    /// Lower bound of the arena; objects below it have fallen out
    pub fn floor(&self) -> f32 {
        self.window_height
    }

    /// Vertical center of the primary paddle
    pub fn paddle_y(&self) -> f32 {
        self.window_height - self.paddle_y_offset
    }

    /// Horizontal slot taken by one brick (including the gap)
    pub fn brick_slot_width(&self) -> f32 {
        (self.window_width - 2.0 * self.wall_width) / self.brick_cols.max(1) as f32
    }

    /// Visible brick width
    pub fn brick_width(&self) -> f32 {
        self.brick_slot_width() - self.brick_col_gap
    }

    /// Bottom edge of the last brick row
    pub fn grid_bottom(&self) -> f32 {
        self.wall_width + self.brick_rows as f32 * (self.brick_height + self.brick_row_gap)
    }

    /// Size of the primary ball
    pub fn ball_dims(&self) -> Vec2 {
        Vec2::splat(self.ball_size)
    }

    /// Size of a spawned puck
    pub fn puck_dims(&self) -> Vec2 {
        Vec2::splat(self.ball_size * self.puck_scale)
    }

    /// Size of both paddles
    pub fn paddle_dims(&self) -> Vec2 {
        Vec2::new(self.paddle_width, self.paddle_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.brick_rows, 7);
        assert_eq!(config.brick_cols, 8);
        assert_eq!(config.max_lives, 4);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = GameConfig::with_grid(0, 5).validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { rows: 0, cols: 5 }));

        let err = GameConfig::with_grid(3, 0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { .. }));
    }

    #[test]
    fn test_lives_validation() {
        let config = GameConfig {
            initial_lives: 5,
            max_lives: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLives { initial: 5, max: 4 })
        ));
    }

    #[test]
    fn test_grid_overflow() {
        let config = GameConfig::with_grid(60, 8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridOverflow { rows: 60 })
        ));
    }

    #[test]
    fn test_zero_paddle_budget_rejected() {
        let config = GameConfig {
            extra_paddle_hits: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "extra_paddle_hits",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "brick_rows": 2, "max_lives": 6 }"#).unwrap();
        assert_eq!(config.brick_rows, 2);
        assert_eq!(config.max_lives, 6);
        assert_eq!(config.brick_cols, BRICK_COLS);

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "ball_speed": 0.0 }"#),
            Err(ConfigError::NonPositive { field: "ball_speed", .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_grid_geometry() {
        let config = GameConfig::default();
        assert!((config.brick_slot_width() - 97.5).abs() < 0.001);
        assert!((config.brick_width() - 97.3).abs() < 0.001);
        assert!((config.paddle_y() - 650.0).abs() < 0.001);
    }
}
