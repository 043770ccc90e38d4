//! Rigid-body world
//!
//! A small box-only engine: static bodies never move on their own, dynamic
//! bodies fall under gravity. Each step reports the contact pairs that started
//! touching during that step, which is all the game needs from collisions.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Reference to a body in one generation's physics world
///
/// Handles from an older generation resolve to nothing in a newer world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle {
    pub generation: u64,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Immovable collision geometry; moved only by game logic
    Static,
    /// Simulated under gravity
    Dynamic,
}

/// A simulated rectangle
#[derive(Debug, Clone)]
pub struct Body {
    /// Center position
    pub pos: DVec2,
    pub size: DVec2,
    /// Always zero for static bodies
    pub vel: DVec2,
    pub kind: BodyKind,
}

impl Body {
    pub fn new_static(pos: DVec2, size: DVec2) -> Self {
        Self {
            pos,
            size,
            vel: DVec2::ZERO,
            kind: BodyKind::Static,
        }
    }

    pub fn new_dynamic(pos: DVec2, size: DVec2) -> Self {
        Self {
            pos,
            size,
            vel: DVec2::ZERO,
            kind: BodyKind::Dynamic,
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A pair of bodies that began overlapping this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Lower handle of the pair
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub penetration: DVec2,
}

/// Owns all bodies of one generation
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    generation: u64,
    bodies: Vec<Body>,
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Fraction of velocity lost per step
    pub air_friction: f64,
    /// Pairs overlapping at the end of the previous step, sorted
    active_contacts: Vec<(u32, u32)>,
}

impl PhysicsWorld {
    pub fn new(generation: u64, gravity: f64, air_friction: f64) -> Self {
        Self {
            generation,
            bodies: Vec::new(),
            gravity,
            air_friction,
            active_contacts: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn add(&mut self, body: Body) -> BodyHandle {
        let index = self.bodies.len() as u32;
        self.bodies.push(body);
        BodyHandle {
            generation: self.generation,
            index,
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        if handle.generation != self.generation {
            return None;
        }
        self.bodies.get(handle.index as usize)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        if handle.generation != self.generation {
            return None;
        }
        self.bodies.get_mut(handle.index as usize)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate bodies with their handles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        let generation = self.generation;
        self.bodies.iter().enumerate().map(move |(i, body)| {
            (
                BodyHandle {
                    generation,
                    index: i as u32,
                },
                body,
            )
        })
    }

    /// Move a body, keeping its velocity
    pub fn set_position(&mut self, handle: BodyHandle, pos: DVec2) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Overwrite a dynamic body's velocity; static bodies stay at rest
    pub fn set_velocity(&mut self, handle: BodyHandle, vel: DVec2) -> bool {
        match self.body_mut(handle) {
            Some(body) if !body.is_static() => {
                body.vel = vel;
                true
            }
            _ => false,
        }
    }

    /// Advance the simulation by `dt` seconds and return the contacts that started
    pub fn step(&mut self, dt: f64) -> Vec<Contact> {
        let damping = 1.0 - self.air_friction;
        for body in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            body.vel.y += self.gravity * dt;
            body.vel *= damping;
            body.pos += body.vel * dt;
        }
        self.detect_contacts()
    }

    /// Recompute overlapping pairs and report those not touching last step
    fn detect_contacts(&mut self) -> Vec<Contact> {
        let mut current = Vec::new();
        let mut started = Vec::new();

        for (i, a) in self.bodies.iter().enumerate() {
            let a_box = a.aabb();
            for (j, b) in self.bodies.iter().enumerate().skip(i + 1) {
                // Two static bodies never collide
                if a.is_static() && b.is_static() {
                    continue;
                }
                let b_box = b.aabb();
                if !a_box.overlaps(&b_box) {
                    continue;
                }
                let pair = (i as u32, j as u32);
                current.push(pair);
                if self.active_contacts.binary_search(&pair).is_err() {
                    started.push(Contact {
                        a: BodyHandle {
                            generation: self.generation,
                            index: pair.0,
                        },
                        b: BodyHandle {
                            generation: self.generation,
                            index: pair.1,
                        },
                        penetration: a_box.penetration(&b_box),
                    });
                }
            }
        }

        // Nested loops emit pairs in sorted order already
        self.active_contacts = current;
        started
    }
}
