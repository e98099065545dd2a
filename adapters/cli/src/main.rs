#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Neon Defence session.

mod config;
mod text;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use neon_defence_simulation::Simulation;
use neon_defence_world::query;

use crate::{
    config::Preset,
    text::{LogReporter, TextRenderer},
};

#[derive(Parser, Debug)]
#[command(name = "neon-defence")]
#[command(about = "Runs a scripted Neon Defence session and prints the board")]
struct Cli {
    /// TOML file with session rules; overrides --preset
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Built-in map to play when no configuration file is given
    #[arg(long, value_enum, default_value_t = Preset::Neon)]
    preset: Preset,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 3_600)]
    frames: u32,

    /// Simulated milliseconds per frame
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Tower placement before the first wave, repeatable
    #[arg(long = "place", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    placements: Vec<(i64, i64)>,

    /// Start the next wave as soon as the previous one clears
    #[arg(long)]
    auto_waves: bool,

    /// Leave the first wave unstarted; by default it starts before frame one
    #[arg(long, conflicts_with = "auto_waves")]
    idle: bool,

    /// Print the board every N frames; 0 prints only the final board
    #[arg(long, value_name = "N", default_value_t = 0)]
    render_every: u32,
}

fn parse_cell(value: &str) -> std::result::Result<(i64, i64), String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but got `{value}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok((column, row))
}

/// Entry point for the Neon Defence command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let rules = config::load(cli.config.as_deref(), cli.preset).context("failed to load rules")?;
    let renderer = TextRenderer::new(io::stdout(), cli.render_every);
    let mut simulation = Simulation::new(rules, renderer, LogReporter::default())
        .context("failed to start session")?;
    info!("{}", query::welcome_banner(simulation.world()));

    for &(column, row) in &cli.placements {
        simulation.request_placement(column, row);
    }

    let dt = Duration::from_millis(cli.frame_ms);
    if !cli.idle {
        simulation.start_wave();
    }
    for _ in 0..cli.frames {
        if cli.auto_waves && !simulation.is_wave_active() {
            simulation.start_wave();
        }
        simulation.step(dt)?;
        if simulation.is_game_over() {
            break;
        }
    }

    let mut stdout = io::stdout().lock();
    text::draw(&mut stdout, &simulation.scene()).context("failed to print final board")?;
    if let Some(status) = simulation.reporter().last() {
        writeln!(
            stdout,
            "finished after {} frames: money {}, lives {}, wave {}",
            simulation.frame(),
            status.money,
            status.lives,
            status.wave
        )
        .context("failed to print summary")?;
    }
    Ok(())
}
