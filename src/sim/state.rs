//! Game phase, per-frame input and simulation events

use serde::{Deserialize, Serialize};

use super::physics::BodyHandle;
use super::world::PairHeights;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Physics steps every frame, taps are accepted
    Running,
    /// Stepping halted until reset
    GameOver,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (click/tap/space)
    pub tap: bool,
    /// Start a new generation after game over
    pub reset: bool,
}

/// Things that happened during a frame, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Two bodies started touching
    CollisionDetected { a: BodyHandle, b: BodyHandle },
    /// An obstacle pair scrolled off the left edge and was respawned on the right
    PairRecycled {
        pair: usize,
        x: f64,
        heights: PairHeights,
    },
    /// The run ended
    GameOver { generation: u64 },
    /// A fresh generation was installed
    WorldReset { generation: u64 },
}
