//! Game controller
//!
//! Owns the Running/GameOver state machine and the current generation. Hosts
//! call [`GameController::frame`] once per displayed frame (or
//! [`GameController::advance`] with elapsed time) and forward taps and resets.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::FrameClock;
use super::config::{ConfigError, SimConfig};
use super::state::{GamePhase, SimEvent, TickInput};
use super::tick;
use super::world::{World, WorldFactory};
use crate::render::{FrameSnapshot, RenderAdapter};

/// Generation id of the world installed at startup
pub const FIRST_GENERATION: u64 = 1;

#[derive(Debug, Clone)]
pub struct GameController {
    factory: WorldFactory,
    world: World,
    phase: GamePhase,
    /// Run seed for reproducibility
    seed: u64,
    /// Shared by every generation so a run replays from its seed alone
    rng: Pcg32,
    /// Ticks simulated in the current generation
    ticks: u64,
    clock: FrameClock,
    /// Events raised by commands, reported with the next frame
    pending: Vec<SimEvent>,
}

impl GameController {
    /// Validate `config` and install the first generation, already running
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        let factory = WorldFactory::new(config)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = factory.build(FIRST_GENERATION, &mut rng);
        let clock = FrameClock::new(factory.config().dt());
        log::info!("Game started with seed {}", seed);

        Ok(Self {
            factory,
            world,
            phase: GamePhase::Running,
            seed,
            rng,
            ticks: 0,
            clock,
            pending: Vec::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn generation(&self) -> u64 {
        self.world.generation
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        self.factory.config()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Flap: overwrite the bird's vertical velocity. Ignored unless running.
    pub fn tap(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            log::debug!("Tap ignored during {:?}", self.phase);
            return false;
        }
        let flap = self.factory.config().flap_velocity;
        let bird = self.world.bird;
        let Some(vx) = self.world.physics.body(bird).map(|b| b.vel.x) else {
            return false;
        };
        self.world.physics.set_velocity(bird, DVec2::new(vx, flap))
    }

    /// Build and install a fresh generation. Ignored unless the game is over.
    pub fn reset(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            log::debug!("Reset ignored during {:?}", self.phase);
            return false;
        }
        let generation = self.world.generation + 1;
        let next = self.factory.build(generation, &mut self.rng);
        let previous = self.world.install(next);
        log::info!(
            "Reset: generation {} replaced by {} after {} ticks",
            previous.generation,
            generation,
            self.ticks
        );

        self.ticks = 0;
        self.clock.reset();
        self.phase = GamePhase::Running;
        self.pending.push(SimEvent::WorldReset { generation });
        true
    }

    fn apply_input(&mut self, input: &TickInput) {
        if input.reset {
            self.reset();
        }
        if input.tap {
            self.tap();
        }
    }

    /// Process input, then run exactly one tick if running
    pub fn frame(&mut self, input: &TickInput) -> Vec<SimEvent> {
        self.apply_input(input);
        let mut events = std::mem::take(&mut self.pending);
        self.run_tick(&mut events);
        events
    }

    /// Process input, then run as many ticks as `elapsed` seconds cover
    pub fn advance(&mut self, elapsed: f64, input: &TickInput) -> Vec<SimEvent> {
        self.apply_input(input);
        let mut events = std::mem::take(&mut self.pending);
        for _ in 0..self.clock.advance(elapsed) {
            self.run_tick(&mut events);
        }
        events
    }

    fn run_tick(&mut self, events: &mut Vec<SimEvent>) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.ticks += 1;

        let config = self.factory.config();
        for event in tick::step(&mut self.world, config, &mut self.rng) {
            let fatal = matches!(event, SimEvent::CollisionDetected { .. })
                && self.phase == GamePhase::Running;
            events.push(event);
            if fatal {
                // Every collision ends the run, whatever was hit
                self.phase = GamePhase::GameOver;
                log::info!(
                    "Game over in generation {} after {} ticks",
                    self.world.generation,
                    self.ticks
                );
                events.push(SimEvent::GameOver {
                    generation: self.world.generation,
                });
            }
        }
    }

    /// Everything a renderer needs for the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.world, self.phase)
    }

    /// Feed the current frame to a render adapter
    pub fn render(&self, adapter: &mut impl RenderAdapter) {
        crate::render::draw(&self.world, self.phase, adapter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::BodyHandle;

    fn controller(seed: u64) -> GameController {
        GameController::new(SimConfig::default(), seed).unwrap()
    }

    fn bird_vel(c: &GameController) -> DVec2 {
        c.world().bird_body().unwrap().vel
    }

    /// Tick until the bird hits something
    fn run_until_game_over(c: &mut GameController) -> Vec<SimEvent> {
        for _ in 0..10_000 {
            let events = c.frame(&TickInput::default());
            if c.phase() == GamePhase::GameOver {
                return events;
            }
        }
        panic!("bird never collided");
    }

    #[test]
    fn test_starts_running() {
        let c = controller(1);
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.generation(), FIRST_GENERATION);
        assert_eq!(c.world().registry.len(), 7);
        assert_eq!(c.ticks(), 0);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimConfig {
            gap_size: 790.0,
            ..Default::default()
        };
        assert!(matches!(
            GameController::new(config, 1),
            Err(ConfigError::GapTooLarge { .. })
        ));
    }

    #[test]
    fn test_tap_overwrites_velocity() {
        let mut c = controller(2);
        let flap = c.config().flap_velocity;
        for _ in 0..20 {
            c.frame(&TickInput::default());
        }
        assert!(bird_vel(&c).y > 0.0);

        assert!(c.tap());
        assert_eq!(bird_vel(&c).y, flap);
        // A second tap does not stack
        assert!(c.tap());
        assert_eq!(bird_vel(&c).y, flap);
        assert_eq!(bird_vel(&c).x, 0.0);
    }

    #[test]
    fn test_collision_ends_run_once() {
        let mut c = controller(3);
        let events = run_until_game_over(&mut c);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, SimEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(events.iter().any(|e| matches!(e, SimEvent::CollisionDetected { .. })));
        assert!(events.contains(&SimEvent::GameOver { generation: 1 }));

        // Frozen: no stepping, no new events
        let ticks = c.ticks();
        let pos = c.world().bird_body().unwrap().pos;
        for _ in 0..10 {
            assert!(c.frame(&TickInput::default()).is_empty());
        }
        assert_eq!(c.ticks(), ticks);
        assert_eq!(c.world().bird_body().unwrap().pos, pos);
        assert_eq!(c.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_commands_respect_phase() {
        let mut c = controller(4);
        assert!(!c.reset());
        assert_eq!(c.generation(), 1);

        run_until_game_over(&mut c);
        let vel = bird_vel(&c);
        assert!(!c.tap());
        assert_eq!(bird_vel(&c), vel);
    }

    #[test]
    fn test_reset_installs_fresh_generation() {
        let mut c = controller(5);
        let old_bird: BodyHandle = c.world().bird;
        run_until_game_over(&mut c);

        assert!(c.reset());
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.generation(), 2);
        assert_eq!(c.ticks(), 0);

        let world = c.world();
        assert!(world.physics.body(old_bird).is_none());
        let bird = world.bird_body().unwrap();
        assert_eq!(bird.pos, DVec2::new(100.0, 400.0));
        assert_eq!(bird.vel, DVec2::ZERO);
        assert_eq!(world.pairs.len(), 2);
        assert_eq!(world.pair_x(0), Some(350.0));
        assert_eq!(world.pair_x(1), Some(750.0));
        for (_, entity) in world.registry.iter() {
            assert_eq!(entity.body.generation, 2);
        }

        let events = c.frame(&TickInput::default());
        assert_eq!(events.first(), Some(&SimEvent::WorldReset { generation: 2 }));
    }

    #[test]
    fn test_reset_and_tap_in_one_frame() {
        let mut c = controller(6);
        run_until_game_over(&mut c);
        c.frame(&TickInput {
            tap: true,
            reset: true,
        });
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.generation(), 2);
        // Tapped, then one tick of gravity and friction
        assert!(bird_vel(&c).y < 0.0);
    }

    #[test]
    fn test_advance_runs_clock_ticks() {
        let mut c = controller(7);
        let dt = c.config().dt();
        c.advance(dt * 3.5, &TickInput::default());
        assert_eq!(c.ticks(), 3);
        c.advance(dt * 0.6, &TickInput::default());
        assert_eq!(c.ticks(), 4);
    }

    #[test]
    fn test_determinism() {
        // Two controllers with the same seed and inputs produce identical frames
        let mut a = controller(99_999);
        let mut b = controller(99_999);
        for i in 0..400 {
            let input = TickInput {
                tap: i % 25 == 0,
                reset: true,
            };
            assert_eq!(a.frame(&input), b.frame(&input));
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.ticks(), b.ticks());
    }
}
