//! Collision detection and response for axis-aligned boxes
//!
//! Stands in for the engine's physics pass: moves every object by its
//! velocity, finds overlaps between movers and the things they can touch,
//! bounces balls off the contact normal, and reports each collision episode
//! once (on first contact).

use std::collections::BTreeSet;

use glam::Vec2;

use super::world::{GameObject, World};

/// Result of an overlap test
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the boxes overlap
    pub hit: bool,
    /// Surface normal (pointing from the other object toward the mover)
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// A newly started contact between a mover and another object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// The moving object (ball, puck or heart)
    pub mover: u32,
    /// What it ran into
    pub other: u32,
    /// Surface normal pointing toward the mover
    pub normal: Vec2,
}

/// Overlap test between two boxes given by center and full size
///
/// The normal is taken along the axis of least penetration.
pub fn box_collision(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> CollisionResult {
    let delta = a_center - b_center;
    let overlap = (a_size + b_size) * 0.5 - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    if overlap.x < overlap.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(sign, 0.0),
            penetration: overlap.x,
        }
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, sign),
            penetration: overlap.y,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Move every object by `vel * dt`
pub fn integrate(world: &mut World, dt: f32) {
    for object in world.iter_mut() {
        object.center += object.vel * dt;
    }
}

/// Advance the world by one step and return the collisions that started
///
/// Collisions come out ordered by (mover id, other id).
pub fn step(world: &mut World, dt: f32) -> Vec<Collision> {
    integrate(world, dt);

    let movers: Vec<GameObject> = world.iter().filter(|o| o.tag.is_mover()).cloned().collect();
    let mut touching = BTreeSet::new();
    let mut started = Vec::new();

    for mover in movers {
        let mut center = mover.center;
        let mut vel = mover.vel;

        for other in world.iter() {
            if other.id == mover.id || !mover.tag.collides_with(other.tag) {
                continue;
            }
            let result = box_collision(center, mover.size, other.center, other.size);
            if !result.hit {
                continue;
            }

            let pair = (mover.id.min(other.id), mover.id.max(other.id));
            touching.insert(pair);
            let entered = !world.contacts.contains(&pair);

            if mover.tag.is_ball() {
                // Push out and bounce only when moving into the surface
                center += result.normal * result.penetration;
                if vel.dot(result.normal) < 0.0 {
                    vel = reflect_velocity(vel, result.normal);
                }
            }

            if entered {
                log::trace!("Collision {} -> {} normal {:?}", mover.id, other.id, result.normal);
                started.push(Collision {
                    mover: mover.id,
                    other: other.id,
                    normal: result.normal,
                });
            }
        }

        if let Some(object) = world.get_mut(mover.id) {
            object.center = center;
            object.vel = vel;
        }
    }

    world.contacts = touching;
    started
}
