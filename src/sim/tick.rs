//! Fixed timestep simulation tick
//!
//! Steps physics, scrolls obstacles and recycles the ones that left the screen.

use rand::Rng;

use super::config::SimConfig;
use super::entity::Entity;
use super::state::SimEvent;
use super::world::{World, pair_geometry, roll_pair_heights};

/// Advance one generation by one fixed tick
///
/// Collisions are returned as events; deciding what they mean is up to the caller.
pub fn step(world: &mut World, config: &SimConfig, rng: &mut impl Rng) -> Vec<SimEvent> {
    let dt = config.dt();
    let mut events = Vec::new();

    for contact in world.physics.step(dt) {
        log::debug!(
            "Contact {:?} <-> {:?} (depth {:?})",
            contact.a,
            contact.b,
            contact.penetration
        );
        events.push(SimEvent::CollisionDetected {
            a: contact.a,
            b: contact.b,
        });
    }

    scroll_obstacles(world, config.scroll_speed * dt);
    recycle_obstacles(world, config, rng, &mut events);

    events
}

fn scroll_obstacles(world: &mut World, dx: f64) {
    for pair in &world.pairs {
        for handle in [pair.top, pair.bottom] {
            if let Some(body) = world.physics.body_mut(handle) {
                body.pos.x -= dx;
            }
        }
    }
}

/// Respawn pairs that scrolled past the left edge one pitch behind the rightmost pair
fn recycle_obstacles(
    world: &mut World,
    config: &SimConfig,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    let boundary = -config.pipe_width / 2.0;

    for i in 0..world.pairs.len() {
        let Some(x) = world.pair_x(i) else { continue };
        if x >= boundary {
            continue;
        }

        // Rightmost of the current positions, including pairs already recycled this tick
        let max_x = (0..world.pairs.len())
            .filter(|&j| j != i)
            .filter_map(|j| world.pair_x(j))
            .fold(f64::NEG_INFINITY, f64::max);
        let new_x = if max_x.is_finite() {
            max_x + config.pitch()
        } else {
            x + config.pitch() * world.pairs.len() as f64
        };

        let heights = roll_pair_heights(config, rng);
        let [(top_pos, top_size), (bottom_pos, bottom_size)] =
            pair_geometry(config, new_x, heights);

        let pair = &mut world.pairs[i];
        pair.heights = heights;
        for (handle, id, pos, size) in [
            (pair.top, &pair.top_id, top_pos, top_size),
            (pair.bottom, &pair.bottom_id, bottom_pos, bottom_size),
        ] {
            if let Some(body) = world.physics.body_mut(handle) {
                body.pos = pos;
                body.size = size;
            }
            if let Some(entity) = world.registry.get(id) {
                let resized = Entity {
                    size,
                    ..entity.clone()
                };
                world.registry.set(id.clone(), resized);
            }
        }

        log::debug!(
            "Recycled pair {} to x={:.1} heights ({}, {})",
            i,
            new_x,
            heights.top,
            heights.bottom
        );
        events.push(SimEvent::PairRecycled {
            pair: i,
            x: new_x,
            heights,
        });
    }
}
