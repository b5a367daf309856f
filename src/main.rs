//! Neon Wars entry point
//!
//! Natively this is a headless runner: the autopilot plays a seeded game at
//! a fixed frame rate and the result is printed. The browser build is driven
//! through the library (`Session`) by the page, so its `main` does nothing.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result, ensure};
    use clap::Parser;
    use serde::Serialize;

    use neon_wars::Session;
    use neon_wars::platform;
    use neon_wars::sim::GamePhase;

    #[derive(Parser, Debug)]
    #[command(name = "neon-wars")]
    #[command(about = "Run a headless Neon Wars game driven by the autopilot")]
    struct Args {
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Longest game to simulate, in seconds of play
        #[arg(long, default_value_t = 300.0)]
        seconds: f32,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        score: u64,
        wave: u32,
        kills: u64,
        lives: u32,
        seconds: f32,
        frames: u64,
        game_over: bool,
        new_high_score: bool,
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let args = Args::parse();
        ensure!(args.fps > 0, "--fps must be positive");
        ensure!(
            args.seconds.is_finite() && args.seconds > 0.0,
            "--seconds must be a positive number"
        );

        let seed = args.seed.unwrap_or_else(platform::random_seed);
        let dt = 1.0 / args.fps as f32;
        let max_frames = (args.seconds * args.fps as f32).ceil() as u64;

        let mut session = Session::headless(seed);
        session.demo = true;
        session.start_game();

        let mut frames = 0;
        while frames < max_frames && session.state.phase == GamePhase::Playing {
            session.frame(dt);
            frames += 1;
        }

        let summary = Summary {
            seed,
            score: session.state.score,
            wave: session.state.wave.current_wave,
            kills: session.state.kills,
            lives: session.state.lives,
            seconds: session.state.time,
            frames,
            game_over: session.state.phase == GamePhase::GameOver,
            new_high_score: session.new_high_score,
        };

        if args.json {
            let encoded = serde_json::to_string_pretty(&summary).context("failed encoding summary")?;
            println!("{encoded}");
        } else {
            println!("Seed:     {:#018x}", summary.seed);
            println!("Score:    {}", summary.score);
            println!("Wave:     {}", summary.wave);
            println!("Kills:    {}", summary.kills);
            println!("Lives:    {}", summary.lives);
            println!(
                "Time:     {:.1}s ({} frames){}",
                summary.seconds,
                summary.frames,
                if summary.game_over { ", game over" } else { "" }
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
