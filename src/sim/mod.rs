//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order within a generation)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod config;
pub mod controller;
pub mod entity;
pub mod physics;
pub mod state;
pub mod tick;
pub mod world;

pub use clock::FrameClock;
pub use collision::Aabb;
pub use config::{ConfigError, SimConfig};
pub use controller::GameController;
pub use entity::{Entity, EntityId, EntityRegistry, Rgb, SpriteKind};
pub use physics::{Body, BodyHandle, BodyKind, PhysicsWorld};
pub use state::{GamePhase, SimEvent, TickInput};
pub use tick::step;
pub use world::{ObstaclePair, PairHeights, World, WorldFactory, pair_heights, roll_pair_heights};
