//! Flappy Sim - physics and world-generation core for a tap-to-fly avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, world generation, game state)
//! - `render`: Contract between the simulation and whatever draws it

pub mod render;
pub mod sim;

pub use render::{FrameSnapshot, RenderAdapter, RenderItem};
pub use sim::{ConfigError, GameController, GamePhase, SimConfig, SimEvent, TickInput};

/// Default tunables
pub mod consts {
    /// Fixed simulation rate (one tick per displayed frame)
    pub const TICK_RATE: f64 = 60.0;
    /// Maximum ticks run for one host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions (y grows downward)
    pub const WORLD_WIDTH: f64 = 400.0;
    pub const WORLD_HEIGHT: f64 = 800.0;

    /// Vertical opening between the two halves of an obstacle pair
    pub const GAP_SIZE: f64 = 200.0;
    pub const PIPE_WIDTH: f64 = 100.0;
    /// Shortest obstacle half that generation may produce
    pub const MIN_PIPE_HEIGHT: u32 = 100;

    /// Controllable body is a fixed square
    pub const BIRD_SIZE: f64 = 50.0;
    /// Floor and ceiling thickness
    pub const BOUNDARY_THICKNESS: f64 = 50.0;
    /// Floor center sits this far above the bottom edge
    pub const FLOOR_OFFSET: f64 = 35.0;
    /// Ceiling center sits this far below the top edge
    pub const CEILING_OFFSET: f64 = 25.0;

    /// Obstacle scroll speed (units/s)
    pub const SCROLL_SPEED: f64 = 60.0;
    /// Vertical velocity set by a tap (negative is up)
    pub const FLAP_VELOCITY: f64 = -360.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f64 = 1000.0;
    /// Fraction of velocity lost per tick
    pub const AIR_FRICTION: f64 = 0.01;
}
