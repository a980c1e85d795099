use std::io::{BufRead, Write};

use anyhow::Context;
use minechase_core::{Board, GameOutcome, Session, WorldPos};
use serde::Serialize;

use crate::command::{Command, HELP};
use crate::render;

#[derive(Serialize)]
struct Snapshot<'a> {
    outcome: GameOutcome,
    mines_left: i64,
    board: &'a Board,
}

/// Reads commands until `quit` or end of input and applies them to `session`.
pub fn run(session: &mut Session, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    write!(output, "{}", render::board(session.board()))?;
    writeln!(output, "{}", render::status(session))?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err:#}")?;
                continue;
            }
        };
        log::debug!("Command {:?}", command);

        let changed = match command {
            Command::Open(coords) => session.open(coords).has_update(),
            Command::Flag(coords) => session.toggle_flag(coords).has_update(),
            Command::Step { x, z } => {
                let floor = session.mapper().config().origin.y;
                session.step_on(WorldPos::new(x, floor, z)).has_update()
            }
            Command::Caught => session.trip().has_update(),
            Command::Show => true,
            Command::Dump => {
                let snapshot = Snapshot {
                    outcome: session.outcome(),
                    mines_left: session.mines_left(),
                    board: session.board(),
                };
                serde_json::to_writer_pretty(&mut output, &snapshot)?;
                writeln!(output)?;
                false
            }
            Command::Help => {
                writeln!(output, "{HELP}")?;
                false
            }
            Command::Quit => break,
        };

        if changed {
            write!(output, "{}", render::board(session.board()))?;
            writeln!(output, "{}", render::status(session))?;
        } else if matches!(command, Command::Open(_) | Command::Flag(_) | Command::Step { .. }) {
            writeln!(output, "nothing happened")?;
        }
    }

    Ok(())
}
