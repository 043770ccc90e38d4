//! Flappy Sim headless runner
//!
//! Drives the simulation without a renderer: a simple autopilot taps whenever
//! the bird sinks below the middle of the next gap. Each run ends on collision
//! and is followed by a reset until the requested number of runs is done.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use flappy_sim::sim::{GameController, GamePhase, SimConfig, SimEvent, TickInput, World};

    /// Hard cap on frames per run so a perfect autopilot still terminates
    const MAX_FRAMES_PER_RUN: u64 = 60 * 60 * 5;

    #[derive(Parser, Debug)]
    #[command(name = "flappy-sim")]
    #[command(about = "Run the simulation headless with an autopilot")]
    pub struct Cli {
        /// JSON config file (missing fields take defaults)
        #[arg(long, short)]
        pub config: Option<PathBuf>,
        /// Run seed
        #[arg(long, short, default_value_t = 0x5eed)]
        pub seed: u64,
        /// Number of runs (generations) to play
        #[arg(long, short, default_value_t = 3)]
        pub runs: u32,
    }

    pub fn run(cli: Cli) -> Result<()> {
        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };
        let mut game =
            GameController::new(config, cli.seed).context("Invalid simulation config")?;
        log::info!(
            "Flappy Sim (headless) starting: seed {}, {} runs",
            cli.seed,
            cli.runs
        );

        for run in 1..=cli.runs {
            let mut frames = 0;
            let mut recycled = 0;
            while game.phase() == GamePhase::Running && frames < MAX_FRAMES_PER_RUN {
                let input = TickInput {
                    tap: autopilot_wants_tap(game.world(), game.config()),
                    reset: false,
                };
                for event in game.frame(&input) {
                    match event {
                        SimEvent::PairRecycled { .. } => recycled += 1,
                        SimEvent::CollisionDetected { a, b } => {
                            log::info!("Run {}: collision between {:?} and {:?}", run, a, b)
                        }
                        _ => {}
                    }
                }
                frames += 1;
            }
            println!(
                "run {}: generation {} survived {} ticks, {} pairs recycled",
                run,
                game.generation(),
                game.ticks(),
                recycled
            );

            if run < cli.runs {
                game.frame(&TickInput {
                    tap: false,
                    reset: true,
                });
            }
        }

        let json = serde_json::to_string_pretty(&game.snapshot())
            .context("Failed to serialize frame snapshot")?;
        println!("{}", json);
        Ok(())
    }

    pub fn load_config(path: &Path) -> Result<SimConfig> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        SimConfig::from_json_str(&json)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Tap when falling below the center of the nearest gap still ahead of the bird
    fn autopilot_wants_tap(world: &World, config: &SimConfig) -> bool {
        let Some(bird) = world.bird_body() else {
            return false;
        };
        let bird_left = bird.pos.x - bird.size.x / 2.0;

        let target = world
            .pairs
            .iter()
            .enumerate()
            .filter_map(|(i, pair)| world.pair_x(i).map(|x| (x, pair)))
            .filter(|(x, _)| x + config.pipe_width / 2.0 >= bird_left)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, pair)| pair.heights.top + config.gap_size / 2.0)
            .unwrap_or(config.world_height / 2.0);

        bird.pos.y > target + 10.0 && bird.vel.y > 0.0
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
