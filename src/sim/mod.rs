//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bricks;
pub mod effect;
pub mod physics;
pub mod power;
pub mod state;
pub mod tick;
pub mod world;

pub use bricks::{Brick, BrickRegistry};
pub use effect::{BrickHit, CompositeEffect, Effect, EffectHost, EffectKind};
pub use physics::{Collision, CollisionResult, box_collision, reflect_velocity};
pub use power::PowerState;
pub use state::{FollowCamera, GameOutcome, GamePhase, GameState};
pub use tick::{TickInput, tick, update};
pub use world::{GameObject, Layer, Tag, World};
