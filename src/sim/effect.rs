//! Brick effects
//!
//! Every brick carries one [`Effect`], chosen at creation time from a random
//! draw. When the brick is first hit the effect runs exactly once: it always
//! destroys the brick first (the basic effect), then applies its special
//! behaviour through an [`EffectHost`].
//!
//! Draw mapping (brick draw range is 10 by default):
//!
//! | draw  | effect                      |
//! |-------|-----------------------------|
//! | 0     | ExtraBall                   |
//! | 1     | ExtraPaddle                 |
//! | 2     | CameraFollow                |
//! | 3     | ExtraLife                   |
//! | 4     | Composite (2-3 sub-effects) |
//! | 5+    | Basic                       |

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::world::Layer;

/// Draw value that selects a composite effect
pub const COMPOSITE_DRAW: u32 = 4;
/// Exclusive bound of the draws made for composite sub-effects (sentinel included)
pub const NESTED_DRAW_RANGE: u32 = COMPOSITE_DRAW + 1;
/// Exclusive bound of the re-roll used when a sub-draw hits the sentinel
pub const SPECIAL_DRAW_RANGE: u32 = COMPOSITE_DRAW;

/// Single (non-composite) effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Destroy the brick, nothing else
    Basic,
    /// Spawn pucks from the brick's center
    ExtraBall,
    /// Place a temporary second paddle in the middle of the arena
    ExtraPaddle,
    /// Make the camera follow the main ball for a few collisions
    CameraFollow,
    /// Drop a heart that grants a life when caught
    ExtraLife,
}

impl EffectKind {
    /// All kinds in catalog order
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Basic,
        EffectKind::ExtraBall,
        EffectKind::ExtraPaddle,
        EffectKind::CameraFollow,
        EffectKind::ExtraLife,
    ];

    /// Map a draw to a single effect. Anything outside 0..=3 is Basic.
    pub fn from_draw(draw: u32) -> Self {
        match draw {
            0 => EffectKind::ExtraBall,
            1 => EffectKind::ExtraPaddle,
            2 => EffectKind::CameraFollow,
            3 => EffectKind::ExtraLife,
            _ => EffectKind::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Basic => "basic",
            EffectKind::ExtraBall => "extra-ball",
            EffectKind::ExtraPaddle => "extra-paddle",
            EffectKind::CameraFollow => "camera-follow",
            EffectKind::ExtraLife => "extra-life",
        }
    }

    /// Run this effect for a hit brick
    pub fn on_collision<H: EffectHost + ?Sized>(self, host: &mut H, hit: &BrickHit) {
        destroy_brick(host, hit);
        match self {
            EffectKind::Basic => {}
            EffectKind::ExtraBall => host.spawn_pucks(hit.center),
            EffectKind::ExtraPaddle => host.activate_extra_paddle(),
            EffectKind::CameraFollow => host.activate_follow_camera(hit.other),
            EffectKind::ExtraLife => host.drop_heart(hit.center),
        }
    }
}

/// Two or three single effects fired in order
///
/// Holds [`EffectKind`]s only, so a composite can never nest another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeEffect {
    parts: Vec<EffectKind>,
}

impl CompositeEffect {
    /// Roll a composite: two sub-draws from 0..=4, plus a third slot when
    /// either of them is the composite sentinel. Sentinel draws and the third
    /// slot are re-rolled from 0..=3.
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let first = rng.random_range(0..NESTED_DRAW_RANGE);
        let second = rng.random_range(0..NESTED_DRAW_RANGE);
        Self::from_draws(first, second, rng)
    }

    /// Build a composite from its first two sub-draws
    pub fn from_draws<R: Rng>(first: u32, second: u32, rng: &mut R) -> Self {
        let count = if first == COMPOSITE_DRAW || second == COMPOSITE_DRAW {
            3
        } else {
            2
        };

        let parts = [Some(first), Some(second), None]
            .into_iter()
            .take(count)
            .map(|draw| {
                let draw = match draw {
                    Some(d) if d != COMPOSITE_DRAW => d,
                    _ => rng.random_range(0..SPECIAL_DRAW_RANGE),
                };
                EffectKind::from_draw(draw)
            })
            .collect();

        Self { parts }
    }

    pub fn parts(&self) -> &[EffectKind] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Fire every part in order. Each part tries to destroy the brick; only
    /// the first attempt succeeds, the specials all fire.
    pub fn on_collision<H: EffectHost + ?Sized>(&self, host: &mut H, hit: &BrickHit) {
        for part in &self.parts {
            part.on_collision(host, hit);
        }
    }
}

/// The effect bound to a brick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Single(EffectKind),
    Composite(CompositeEffect),
}

impl Default for Effect {
    fn default() -> Self {
        Effect::Single(EffectKind::Basic)
    }
}

impl Effect {
    /// Map a brick draw to an effect. The sentinel rolls a composite.
    pub fn from_draw<R: Rng>(draw: u32, rng: &mut R) -> Self {
        if draw == COMPOSITE_DRAW {
            Effect::Composite(CompositeEffect::roll(rng))
        } else {
            Effect::Single(EffectKind::from_draw(draw))
        }
    }

    /// Draw an effect for a new brick from `0..draw_range`
    pub fn random<R: Rng>(rng: &mut R, draw_range: u32) -> Self {
        let draw = rng.random_range(0..draw_range.max(1));
        Self::from_draw(draw, rng)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Effect::Composite(_))
    }

    /// Single effects making up this effect, in firing order
    pub fn kinds(&self) -> Vec<EffectKind> {
        match self {
            Effect::Single(kind) => vec![*kind],
            Effect::Composite(composite) => composite.parts().to_vec(),
        }
    }

    /// Run the effect for a hit brick
    pub fn on_collision<H: EffectHost + ?Sized>(&self, host: &mut H, hit: &BrickHit) {
        match self {
            Effect::Single(kind) => kind.on_collision(host, hit),
            Effect::Composite(composite) => composite.on_collision(host, hit),
        }
    }
}

/// Snapshot of a brick at the moment it was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    pub brick: u32,
    /// Brick center, captured before removal
    pub center: Vec2,
    /// Object that hit the brick
    pub other: u32,
}

/// Side effects an effect may trigger
pub trait EffectHost {
    /// Remove an object from a layer; false if it was already gone
    fn remove_object(&mut self, id: u32, layer: Layer) -> bool;
    /// Record a brick as destroyed (live-brick count goes down)
    fn brick_destroyed(&mut self, brick: u32);
    /// Spawn secondary balls at `center`
    fn spawn_pucks(&mut self, center: Vec2);
    /// Show the extra paddle unless it is already active
    fn activate_extra_paddle(&mut self);
    /// Attach the follow camera unless it is already active. Only the main
    /// ball (`other`) can turn it on.
    fn activate_follow_camera(&mut self, other: u32);
    /// Drop a heart from `center`
    fn drop_heart(&mut self, center: Vec2);
}

/// Basic effect: destroy the brick once
fn destroy_brick<H: EffectHost + ?Sized>(host: &mut H, hit: &BrickHit) {
    if host.remove_object(hit.brick, Layer::StaticObjects) {
        host.brick_destroyed(hit.brick);
    }
}
