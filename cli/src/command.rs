use anyhow::{Context, bail};
use core::str::FromStr;
use minechase_core::{Coord, Coord2};

pub const HELP: &str = "\
commands:
  open X Z     open the cell at grid (X, Z)
  flag X Z     toggle the flag on grid (X, Z)
  step WX WZ   the player stands on world position (WX, WZ)
  caught       a chaser reached the player
  show         print the board
  dump         print the session as JSON
  help         print this text
  quit         leave";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Open(Coord2),
    Flag(Coord2),
    Step { x: f64, z: f64 },
    Caught,
    Show,
    Dump,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "open" | "o" => Self::Open(grid_args(&args)?),
            "flag" | "f" => Self::Flag(grid_args(&args)?),
            "step" | "s" => {
                let [x, z] = pair(&args)?;
                Self::Step {
                    x: x.parse().with_context(|| format!("invalid world x `{x}`"))?,
                    z: z.parse().with_context(|| format!("invalid world z `{z}`"))?,
                }
            }
            "caught" => Self::Caught,
            "show" => Self::Show,
            "dump" => Self::Dump,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`, try `help`"),
        };
        Ok(command)
    }
}

fn pair<'a>(args: &[&'a str]) -> anyhow::Result<[&'a str; 2]> {
    match args {
        &[first, second] => Ok([first, second]),
        _ => bail!("expected 2 arguments, got {}", args.len()),
    }
}

fn grid_args(args: &[&str]) -> anyhow::Result<Coord2> {
    let [x, z] = pair(args)?;
    let x: Coord = x.parse().with_context(|| format!("invalid x `{x}`"))?;
    let z: Coord = z.parse().with_context(|| format!("invalid z `{z}`"))?;
    Ok((x, z))
}
