//! World construction and obstacle height generation
//!
//! A [`World`] is one generation: its own physics world, its own registry and
//! its own obstacle pairs. Nothing in it refers to any other generation.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{ConfigError, SimConfig};
use super::entity::{Entity, EntityId, EntityRegistry, SpriteKind};
use super::physics::{Body, BodyHandle, PhysicsWorld};
use crate::consts::{BIRD_SIZE, BOUNDARY_THICKNESS, CEILING_OFFSET, FLOOR_OFFSET};

/// Heights of the two halves of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairHeights {
    /// Half hanging from the top edge
    pub top: f64,
    /// Half rising from the bottom edge
    pub bottom: f64,
}

/// Build pair heights from a drawn top height and a swap roll
///
/// `top + bottom + gap_size == world_height` always holds.
pub fn pair_heights(config: &SimConfig, drawn_top: u32, swap: bool) -> PairHeights {
    let drawn_top = drawn_top as f64;
    let drawn_bottom = config.world_height - drawn_top - config.gap_size;
    if swap {
        PairHeights {
            top: drawn_bottom,
            bottom: drawn_top,
        }
    } else {
        PairHeights {
            top: drawn_top,
            bottom: drawn_bottom,
        }
    }
}

/// Draw a top height uniformly from the configured range, then swap half the time
pub fn roll_pair_heights(config: &SimConfig, rng: &mut impl Rng) -> PairHeights {
    let (min, max) = config.top_height_range();
    let drawn_top = rng.random_range(min..=max);
    let swap = rng.random_bool(0.5);
    pair_heights(config, drawn_top, swap)
}

/// Center and size of the top and bottom bodies of a pair at `x`
pub fn pair_geometry(config: &SimConfig, x: f64, heights: PairHeights) -> [(DVec2, DVec2); 2] {
    let w = config.pipe_width;
    [
        (
            DVec2::new(x, heights.top / 2.0),
            DVec2::new(w, heights.top),
        ),
        (
            DVec2::new(x, config.world_height - heights.bottom / 2.0),
            DVec2::new(w, heights.bottom),
        ),
    ]
}

/// Two static bodies forming one passable obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePair {
    pub top_id: EntityId,
    pub bottom_id: EntityId,
    pub top: BodyHandle,
    pub bottom: BodyHandle,
    pub heights: PairHeights,
}

/// Everything belonging to one generation
#[derive(Debug, Clone)]
pub struct World {
    pub generation: u64,
    pub physics: PhysicsWorld,
    pub registry: EntityRegistry,
    pub bird: BodyHandle,
    pub pairs: Vec<ObstaclePair>,
}

impl World {
    /// Entity id of the controllable body
    pub const BIRD_ID: &'static str = "bird";

    /// Current x of a pair (both halves share it)
    pub fn pair_x(&self, pair: usize) -> Option<f64> {
        let pair = self.pairs.get(pair)?;
        self.physics.body(pair.top).map(|b| b.pos.x)
    }

    pub fn bird_body(&self) -> Option<&Body> {
        self.physics.body(self.bird)
    }

    /// Replace this generation with `next` in one step, returning the old one
    pub fn install(&mut self, next: World) -> World {
        let World {
            generation,
            physics,
            registry,
            bird,
            pairs,
        } = next;
        let old_registry = self.registry.replace_all(registry);
        World {
            generation: std::mem::replace(&mut self.generation, generation),
            physics: std::mem::replace(&mut self.physics, physics),
            registry: old_registry,
            bird: std::mem::replace(&mut self.bird, bird),
            pairs: std::mem::replace(&mut self.pairs, pairs),
        }
    }
}

/// Builds fresh generations from a validated config
#[derive(Debug, Clone)]
pub struct WorldFactory {
    config: SimConfig,
}

impl WorldFactory {
    /// Number of obstacle pairs alive at once
    pub const PAIR_COUNT: usize = 2;

    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Canonical x of the `pair`-th obstacle at spawn
    pub fn spawn_x(&self, pair: usize) -> f64 {
        (pair as f64 + 1.0) * self.config.pitch() - self.config.pipe_width / 2.0
    }

    /// Construct generation `generation`
    pub fn build(&self, generation: u64, rng: &mut impl Rng) -> World {
        let c = &self.config;
        let mut physics = PhysicsWorld::new(generation, c.gravity, c.air_friction);
        let mut registry = EntityRegistry::new(generation);

        let bird_size = DVec2::splat(BIRD_SIZE);
        let bird = physics.add(Body::new_dynamic(
            DVec2::new(c.world_width / 4.0, c.world_height / 2.0),
            bird_size,
        ));
        let bird_id = EntityId::from(World::BIRD_ID);
        registry.set(
            bird_id.clone(),
            Entity::new(bird_id, bird, bird_size, SpriteKind::Controllable, false),
        );

        let boundary_size = DVec2::new(c.world_width, BOUNDARY_THICKNESS);
        for (id, y) in [
            ("floor", c.world_height - FLOOR_OFFSET),
            ("ceiling", CEILING_OFFSET),
        ] {
            let body = physics.add(Body::new_static(
                DVec2::new(c.world_width / 2.0, y),
                boundary_size,
            ));
            let id = EntityId::from(id);
            registry.set(
                id.clone(),
                Entity::new(id, body, boundary_size, SpriteKind::Boundary, true),
            );
        }

        let mut pairs = Vec::with_capacity(Self::PAIR_COUNT);
        for i in 0..Self::PAIR_COUNT {
            let heights = roll_pair_heights(c, rng);
            let [(top_pos, top_size), (bottom_pos, bottom_size)] =
                pair_geometry(c, self.spawn_x(i), heights);

            let top_id = EntityId(format!("pipe{}", 2 * i + 1));
            let bottom_id = EntityId(format!("pipe{}", 2 * i + 2));
            let top = physics.add(Body::new_static(top_pos, top_size));
            let bottom = physics.add(Body::new_static(bottom_pos, bottom_size));
            registry.set(
                top_id.clone(),
                Entity::new(top_id.clone(), top, top_size, SpriteKind::ObstacleTop, true),
            );
            registry.set(
                bottom_id.clone(),
                Entity::new(
                    bottom_id.clone(),
                    bottom,
                    bottom_size,
                    SpriteKind::ObstacleBottom,
                    true,
                ),
            );
            pairs.push(ObstaclePair {
                top_id,
                bottom_id,
                top,
                bottom,
                heights,
            });
        }

        log::info!(
            "Built generation {}: {} bodies, pair heights {:?}",
            generation,
            physics.len(),
            pairs.iter().map(|p| (p.heights.top, p.heights.bottom)).collect::<Vec<_>>()
        );

        World {
            generation,
            physics,
            registry,
            bird,
            pairs,
        }
    }
}
