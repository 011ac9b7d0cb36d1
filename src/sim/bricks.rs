//! Brick registry and grid layout
//!
//! Owns the effect bound to every brick and the live-brick count. Brick
//! geometry lives in the world like any other object.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;

use super::effect::{Effect, EffectKind};
use super::world::{GameObject, Layer, Tag, World};
use crate::config::GameConfig;

/// A brick and the effect it will fire when first hit
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: u32,
    pub row: u32,
    pub col: u32,
    /// Taken when the effect fires, so it can only run once
    effect: Option<Effect>,
    destroyed: bool,
}

impl Brick {
    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// All bricks of the current game
#[derive(Debug, Clone, Default)]
pub struct BrickRegistry {
    bricks: BTreeMap<u32, Brick>,
    live: u32,
}

impl BrickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out `rows x cols` bricks under the top wall, spawn them on the
    /// static layer and draw an effect for each.
    pub fn build_grid<R: Rng>(config: &GameConfig, world: &mut World, rng: &mut R) -> Self {
        let mut registry = Self::new();
        let slot = config.brick_slot_width();
        let size = Vec2::new(config.brick_width(), config.brick_height);

        for row in 0..config.brick_rows {
            for col in 0..config.brick_cols {
                let effect = Effect::random(rng, config.brick_draw_range);
                let top_left = Vec2::new(
                    config.wall_width + col as f32 * slot,
                    config.wall_width + row as f32 * (config.brick_height + config.brick_row_gap),
                );
                let id = world.next_entity_id();
                world.spawn(
                    GameObject::from_top_left(id, Tag::Brick, top_left, size),
                    Layer::StaticObjects,
                );
                registry.insert(id, row, col, effect);
            }
        }

        log::info!(
            "Brick grid {}x{}: {} bricks, {} special",
            config.brick_rows,
            config.brick_cols,
            registry.len(),
            registry.special_count()
        );
        registry
    }

    /// Register a brick already spawned in the world
    pub fn insert(&mut self, id: u32, row: u32, col: u32, effect: Effect) {
        let brick = Brick {
            id,
            row,
            col,
            effect: Some(effect),
            destroyed: false,
        };
        if self.bricks.insert(id, brick).is_none_or(|old| old.destroyed) {
            self.live += 1;
        }
    }

    /// Number of bricks not yet destroyed
    pub fn live_count(&self) -> u32 {
        self.live
    }

    pub fn all_destroyed(&self) -> bool {
        self.live == 0
    }

    pub fn get(&self, id: u32) -> Option<&Brick> {
        self.bricks.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.values()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Hand out a brick's effect for its one and only firing
    pub fn take_effect(&mut self, id: u32) -> Option<Effect> {
        self.bricks.get_mut(&id).and_then(|b| b.effect.take())
    }

    /// Mark a brick destroyed. Returns false if it was unknown or already gone.
    pub fn mark_destroyed(&mut self, id: u32) -> bool {
        match self.bricks.get_mut(&id) {
            Some(brick) if !brick.destroyed => {
                brick.destroyed = true;
                self.live = self.live.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Bricks carrying something other than a plain basic effect
    pub fn special_count(&self) -> usize {
        self.bricks
            .values()
            .filter(|b| {
                b.effect
                    .as_ref()
                    .is_some_and(|e| e.kinds().iter().any(|k| *k != EffectKind::Basic))
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_grid_layout() {
        let config = GameConfig::with_grid(2, 4);
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let registry = BrickRegistry::build_grid(&config, &mut world, &mut rng);

        assert_eq!(registry.len(), 8);
        assert_eq!(registry.live_count(), 8);
        assert_eq!(world.count_tag(Tag::Brick), 8);

        let slot = config.brick_slot_width();
        for brick in registry.iter() {
            let obj = world.get(brick.id).unwrap();
            assert_eq!(obj.layer, Layer::StaticObjects);
            let expected = Vec2::new(
                config.wall_width + brick.col as f32 * slot,
                config.wall_width + brick.row as f32 * 17.0,
            );
            assert!((obj.top_left() - expected).length() < 0.001);
        }
    }

    #[test]
    fn test_mark_destroyed_once() {
        let mut registry = BrickRegistry::new();
        registry.insert(1, 0, 0, Effect::default());
        registry.insert(2, 0, 1, Effect::default());

        assert!(registry.mark_destroyed(1));
        assert!(!registry.mark_destroyed(1));
        assert!(!registry.mark_destroyed(99));
        assert_eq!(registry.live_count(), 1);

        assert!(registry.mark_destroyed(2));
        assert!(registry.all_destroyed());
    }

    #[test]
    fn test_effect_taken_once() {
        let mut registry = BrickRegistry::new();
        registry.insert(3, 0, 0, Effect::Single(EffectKind::ExtraPaddle));
        assert_eq!(
            registry.take_effect(3),
            Some(Effect::Single(EffectKind::ExtraPaddle))
        );
        assert_eq!(registry.take_effect(3), None);
    }

    #[test]
    fn test_most_bricks_are_basic() {
        let config = GameConfig::with_grid(20, 20);
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(77);
        let config = GameConfig {
            window_height: 2000.0,
            ..config
        };
        let registry = BrickRegistry::build_grid(&config, &mut world, &mut rng);

        let mut tally = std::collections::HashMap::new();
        for brick in registry.iter() {
            for kind in brick.effect().unwrap().kinds() {
                *tally.entry(kind).or_insert(0u32) += 1;
            }
        }
        // Every kind shows up on a grid this size
        for kind in EffectKind::ALL {
            assert!(tally.get(&kind).copied().unwrap_or(0) > 0, "{} missing", kind.as_str());
        }
        assert!(registry.special_count() < registry.len());
    }

    proptest! {
        #[test]
        fn prop_live_count_matches(ids in proptest::collection::vec(0u32..12, 0..40)) {
            let mut registry = BrickRegistry::new();
            for id in 0..12 {
                registry.insert(id, 0, id, Effect::default());
            }
            for id in ids {
                registry.mark_destroyed(id);
                let alive = registry.iter().filter(|b| !b.is_destroyed()).count() as u32;
                prop_assert_eq!(registry.live_count(), alive);
            }
        }
    }
}
