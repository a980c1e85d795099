use anyhow::Context;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minechase_core::{CellCount, Coord, GameConfig, GameError, MapperConfig, Session, WorldPos};
use std::io;

mod command;
mod render;
mod repl;

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
    /// The dense 16x16 chase arena
    Arena,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
            Self::Arena => GameConfig::default(),
        }
    }
}

/// Play the minefield from a terminal, one command per line on stdin.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Board preset, individual dimensions override it
    #[arg(long, value_enum, default_value_t = Preset::Arena)]
    preset: Preset,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Seed for mine placement and start selection, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// World size of a cell along both floor axes
    #[arg(long, default_value_t = 1.0)]
    cell_size: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    origin_x: f64,

    /// Floor height
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    origin_y: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    origin_z: f64,

    /// Start on a fully covered board instead of pre-opening a zero region
    #[arg(long)]
    no_safe_start: bool,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let preset = self.preset.config();
        GameConfig::new(
            (
                self.width.unwrap_or(preset.size.0),
                self.height.unwrap_or(preset.size.1),
            ),
            self.mines.unwrap_or(preset.mines),
        )
    }

    fn mapper_config(&self) -> MapperConfig {
        MapperConfig {
            origin: WorldPos::new(self.origin_x, self.origin_y, self.origin_z),
            cell_size: (self.cell_size, self.cell_size),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {}", seed);

    let config = cli.game_config();
    let mut session = Session::generate(config, cli.mapper_config(), seed)
        .with_context(|| format!("cannot set up a {:?} board with {} mines", config.size, config.mines))?;
    let (min, max) = session.mapper().world_bounds();
    log::info!("Floor spans {:?} to {:?}", min, max);
    session.on_lost(|| println!("BOOM! The whole field lights up."));
    session.on_won(|| println!("Every safe cell is open, you made it out!"));

    if !cli.no_safe_start {
        match session.start() {
            Ok(start) => {
                let spawn = start.spawn;
                println!(
                    "Spawned on cell {:?} at ({:.2}, {:.2}, {:.2})",
                    start.coords, spawn.x, spawn.y, spawn.z
                );
            }
            Err(GameError::NoSafeStart) => {
                log::warn!("Board has no zero cell, starting fully covered");
            }
            Err(err) => return Err(err).context("safe start failed"),
        }
    }

    repl::run(&mut session, io::stdin().lock(), io::stdout().lock())
}
