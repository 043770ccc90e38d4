//! Render adapter contract
//!
//! The simulation never draws. Each frame it hands the presentation layer one
//! [`RenderItem`] per entity; the adapter maps [`SpriteKind`] to whatever
//! sprite or shape it likes. Entity ids are only unique within a generation,
//! so adapters must not cache anything across a reset.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EntityId, GamePhase, Rgb, SpriteKind, World};

/// One entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: EntityId,
    /// Center position
    pub position: DVec2,
    pub size: DVec2,
    pub sprite: SpriteKind,
    pub color: Rgb,
}

impl RenderItem {
    /// Top-left corner, for screen-space layout
    pub fn top_left(&self) -> DVec2 {
        self.position - self.size / 2.0
    }
}

/// Implemented by the presentation layer
pub trait RenderAdapter {
    fn begin_frame(&mut self, _phase: GamePhase, _generation: u64) {}

    fn draw(&mut self, item: &RenderItem);

    fn end_frame(&mut self) {}
}

/// A whole frame as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub generation: u64,
    pub phase: GamePhase,
    pub items: Vec<RenderItem>,
}

impl FrameSnapshot {
    pub fn capture(world: &World, phase: GamePhase) -> Self {
        Self {
            generation: world.generation,
            phase,
            items: render_items(world).collect(),
        }
    }
}

impl RenderAdapter for FrameSnapshot {
    fn begin_frame(&mut self, phase: GamePhase, generation: u64) {
        self.phase = phase;
        self.generation = generation;
        self.items.clear();
    }

    fn draw(&mut self, item: &RenderItem) {
        self.items.push(item.clone());
    }
}

/// Registry entries joined with their body positions; entries whose body is gone are skipped
fn render_items(world: &World) -> impl Iterator<Item = RenderItem> + '_ {
    world.registry.iter().filter_map(|(_, entity)| {
        let body = world.physics.body(entity.body)?;
        Some(RenderItem {
            id: entity.id.clone(),
            position: body.pos,
            size: entity.size,
            sprite: entity.sprite,
            color: entity.color,
        })
    })
}

/// Walk the registry once, feeding every entity to `adapter`
pub fn draw(world: &World, phase: GamePhase, adapter: &mut impl RenderAdapter) {
    adapter.begin_frame(phase, world.generation);
    for item in render_items(world) {
        adapter.draw(&item);
    }
    adapter.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameController, SimConfig, TickInput};

    #[derive(Default)]
    struct CountingAdapter {
        frames: u32,
        drawn: Vec<(String, SpriteKind)>,
        open: bool,
    }

    impl RenderAdapter for CountingAdapter {
        fn begin_frame(&mut self, _phase: GamePhase, _generation: u64) {
            self.open = true;
            self.drawn.clear();
        }

        fn draw(&mut self, item: &RenderItem) {
            assert!(self.open);
            self.drawn.push((item.id.to_string(), item.sprite));
        }

        fn end_frame(&mut self) {
            self.open = false;
            self.frames += 1;
        }
    }

    #[test]
    fn test_top_left() {
        let item = RenderItem {
            id: "bird".into(),
            position: DVec2::new(100.0, 400.0),
            size: DVec2::new(50.0, 50.0),
            sprite: SpriteKind::Controllable,
            color: Rgb::RED,
        };
        assert_eq!(item.top_left(), DVec2::new(75.0, 375.0));
    }

    #[test]
    fn test_adapter_sees_every_entity() {
        let c = GameController::new(SimConfig::default(), 1).unwrap();
        let mut adapter = CountingAdapter::default();
        c.render(&mut adapter);

        assert_eq!(adapter.frames, 1);
        assert!(!adapter.open);
        assert_eq!(adapter.drawn.len(), 7);
        let kinds = |k: SpriteKind| adapter.drawn.iter().filter(|(_, s)| *s == k).count();
        assert_eq!(kinds(SpriteKind::Controllable), 1);
        assert_eq!(kinds(SpriteKind::Boundary), 2);
        assert_eq!(kinds(SpriteKind::ObstacleTop), 2);
        assert_eq!(kinds(SpriteKind::ObstacleBottom), 2);
    }

    #[test]
    fn test_snapshot_tracks_bodies() {
        let mut c = GameController::new(SimConfig::default(), 1).unwrap();
        c.frame(&TickInput::default());
        let snapshot = c.snapshot();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.phase, GamePhase::Running);

        let pipe1 = snapshot.items.iter().find(|i| i.id.as_str() == "pipe1").unwrap();
        assert_eq!(pipe1.position.x, c.world().pair_x(0).unwrap());
        assert_eq!(pipe1.color, Rgb::GREEN);

        // Snapshot as adapter matches the captured one
        let mut replay = FrameSnapshot {
            generation: 0,
            phase: GamePhase::GameOver,
            items: Vec::new(),
        };
        c.render(&mut replay);
        assert_eq!(replay, snapshot);
    }

    #[test]
    fn test_snapshot_json() {
        let c = GameController::new(SimConfig::default(), 8).unwrap();
        let json = serde_json::to_string(&c.snapshot()).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c.snapshot());
    }
}
