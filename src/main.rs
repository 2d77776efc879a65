//! Contribution Breakout headless runner
//!
//! Loads settings and activity data, then plays a session at a fixed
//! timestep with a simple autopilot standing in for the keyboard. Prints the
//! final HUD snapshot as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use contrib_breakout::Settings;
use contrib_breakout::activity;
use contrib_breakout::sim::{GameEvent, GameState, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "contrib-breakout", about = "Breakout over a year of activity counts")]
struct Args {
    /// Activity JSON: a `{date, count}` array or a contribution-calendar GraphQL response
    #[arg(short, long)]
    activity: Option<PathBuf>,

    /// Settings JSON (missing fields use defaults)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Seed for synthetic activity and particles
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated seconds before stopping
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Contribution Breakout (headless) starting...");

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let records = activity::load_or_synthetic(args.activity.as_deref(), args.seed);
    let mut state = GameState::new(&records, settings, args.seed).context("failed to build session")?;

    let dt = state.settings.frame_dt();
    let max_ticks = (args.max_seconds / dt).ceil() as u64;
    let mut frames = 0u64;

    while !state.is_over() && !state.quit_requested && frames < max_ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, dt);
        for event in &state.events {
            log_event(frames, event);
        }
        frames += 1;
    }

    if !state.is_over() {
        log::info!("Stopped after {frames} frames, {} blocks left", state.blocks_remaining());
    }

    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    Ok(())
}

/// Keep the paddle under the ball and serve immediately
fn autopilot(state: &GameState) -> TickInput {
    let ball_x = state.ball.pos.x;
    let center = state.paddle.center_x();
    let dead_zone = state.paddle.size.x * 0.25;
    TickInput {
        left: ball_x < center - dead_zone,
        right: ball_x > center + dead_zone,
        launch: state.ball.is_attached(),
        ..Default::default()
    }
}

fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::WallBounce | GameEvent::PaddleBounce => log::trace!("[{frame}] {event:?}"),
        GameEvent::LifeLost { remaining } => log::info!("[{frame}] Life lost, {remaining} left"),
        _ => log::debug!("[{frame}] {event:?}"),
    }
}
