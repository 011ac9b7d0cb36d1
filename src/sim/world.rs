//! World objects and layered collections
//!
//! The world is the "engine" side of the game: it owns every live object,
//! hands out entity IDs, and offers spawn/remove primitives. Gameplay rules
//! live elsewhere and only talk to the world through these primitives.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rendering/collision layer an object lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Walls and bricks
    StaticObjects,
    /// Balls, paddles, hearts
    Default,
}

/// What an object is (decides collision rules and effect dispatch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    MainBall,
    Puck,
    MainPaddle,
    ExtraPaddle,
    Brick,
    /// Dropped heart falling toward the paddle
    Heart,
    Wall,
}

impl Tag {
    /// Balls bounce and count collisions
    pub fn is_ball(self) -> bool {
        matches!(self, Tag::MainBall | Tag::Puck)
    }

    /// Objects whose contacts are tested each physics step
    pub fn is_mover(self) -> bool {
        self.is_ball() || self == Tag::Heart
    }

    /// Whether a mover with this tag can touch an object tagged `other`
    pub fn collides_with(self, other: Tag) -> bool {
        match self {
            Tag::MainBall | Tag::Puck => matches!(
                other,
                Tag::Wall | Tag::Brick | Tag::MainPaddle | Tag::ExtraPaddle
            ),
            // Hearts only care about the primary paddle
            Tag::Heart => other == Tag::MainPaddle,
            _ => false,
        }
    }
}

/// A single world object (axis-aligned box)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    pub id: u32,
    pub tag: Tag,
    pub layer: Layer,
    pub center: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Number of collisions so far (balls only)
    #[serde(default)]
    pub collisions: u32,
    /// Heart touched the primary paddle and waits to be consumed
    #[serde(default)]
    pub caught: bool,
}

impl GameObject {
    pub fn new(id: u32, tag: Tag, center: Vec2, size: Vec2) -> Self {
        Self {
            id,
            tag,
            layer: Layer::Default,
            center,
            size,
            vel: Vec2::ZERO,
            collisions: 0,
            caught: false,
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Build an object from its top-left corner instead of its center
    pub fn from_top_left(id: u32, tag: Tag, top_left: Vec2, size: Vec2) -> Self {
        Self::new(id, tag, top_left + size * 0.5, size)
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    #[inline]
    pub fn bottom_right(&self) -> Vec2 {
        self.center + self.size * 0.5
    }
}

/// All live objects, kept sorted by ID for deterministic iteration
#[derive(Debug, Clone, Default)]
pub struct World {
    objects: Vec<GameObject>,
    next_id: u32,
    /// Pairs (lower id, higher id) touching at the end of the last physics step
    pub(crate) contacts: BTreeSet<(u32, u32)>,
}

impl World {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            contacts: BTreeSet::new(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an object on `layer`; an object with the same ID is replaced
    pub fn spawn(&mut self, mut object: GameObject, layer: Layer) {
        object.layer = layer;
        self.next_id = self.next_id.max(object.id + 1);
        match self.objects.binary_search_by_key(&object.id, |o| o.id) {
            Ok(idx) => self.objects[idx] = object,
            Err(idx) => self.objects.insert(idx, object),
        }
    }

    /// Remove an object from `layer`. Returns whether it was present there.
    pub fn remove(&mut self, id: u32, layer: Layer) -> bool {
        match self.index_of(id) {
            Some(idx) if self.objects[idx].layer == layer => {
                self.objects.remove(idx);
                self.contacts.retain(|&(a, b)| a != id && b != id);
                true
            }
            _ => false,
        }
    }

    /// Remove an object from whatever layer it is on
    pub fn remove_any(&mut self, id: u32) -> bool {
        match self.get(id) {
            Some(object) => {
                let layer = object.layer;
                self.remove(id, layer)
            }
            None => false,
        }
    }

    pub fn get(&self, id: u32) -> Option<&GameObject> {
        self.index_of(id).map(|idx| &self.objects[idx])
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut GameObject> {
        self.index_of(id).map(move |idx| &mut self.objects[idx])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index_of(id).is_some()
    }

    /// Iterate all objects in ID order
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.iter_mut()
    }

    pub fn count_tag(&self, tag: Tag) -> usize {
        self.objects.iter().filter(|o| o.tag == tag).count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.objects.binary_search_by_key(&id, |o| o.id).ok()
    }
}
