//! The driver exposes the rules engine through a line-oriented text protocol
//! so that it can be played and inspected from a terminal or a script.
//!
//! [`Driver::run`] is the main loop: it reads commands from the input stream
//! and writes responses to the output stream until `quit` or EOF. Invalid
//! input is reported as `info string <error>` and never stops the loop.

use std::io::{BufRead, Write};

use anyhow::bail;
use itertools::Itertools;

use crate::chess::core::{Move, Square};
use crate::chess::movegen::legal_moves;
use crate::chess::position::{perft, Position};
use crate::driver::command::Command;

mod command;

/// Holds the current position and handles the commands, including I/O.
pub struct Driver<'a, R: BufRead, W: Write> {
    position: Position,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Driver<'a, R, W> {
    /// Creates a new instance of the driver with starting position and
    /// provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            position: Position::starting(),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes the commands until
    /// `quit` is sent or the input is exhausted.
    ///
    /// Supported commands:
    ///
    /// - `position startpos [moves <move1> ... <move_i>]`
    /// - `position fen <fen> [moves <move1> ... <move_i>]`
    /// - `moves [<square>]`
    /// - `move <move>`
    /// - `status`
    /// - `d`
    /// - `perft <depth>`
    /// - `quit`
    ///
    /// # Errors
    ///
    /// Only I/O errors are propagated: all command errors are reported to the
    /// output stream.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(command = line.trim(), "received command");
            let result = match Command::parse(&line) {
                Command::SetPosition { fen, moves } => self.handle_position(fen.as_deref(), &moves),
                Command::Moves { square } => self.handle_moves(square.as_deref()),
                Command::Move(next_move) => self.handle_move(&next_move),
                Command::Status => self.handle_status(),
                Command::Display => self.handle_display(),
                Command::Perft { depth } => self.handle_perft(depth),
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                    Ok(())
                },
            };
            if let Err(e) = result {
                writeln!(self.output, "info string {e:#}")?;
            }
        }
        Ok(())
    }

    /// Replaces the position with the one specified in the command. If any of
    /// the moves fail, the position stays unchanged.
    fn handle_position(&mut self, fen: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        let mut position = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::starting(),
        };
        for next_move in moves {
            let _result = position.make_move(&Move::from_uci(next_move)?)?;
        }
        self.position = position;
        Ok(())
    }

    /// Lists legal destinations of the piece on `square`, or all legal moves
    /// of the side to move.
    fn handle_moves(&mut self, square: Option<&str>) -> anyhow::Result<()> {
        let moves = match square {
            Some(square) => {
                let square = Square::try_from(square)?;
                legal_moves(self.position.board(), square)
                    .iter()
                    .map(Square::to_string)
                    .sorted()
                    .collect_vec()
            },
            None => self
                .position
                .legal_moves()
                .iter()
                .map(Move::to_string)
                .sorted()
                .collect_vec(),
        };
        writeln!(self.output, "moves {}", moves.join(" "))?;
        Ok(())
    }

    fn handle_move(&mut self, next_move: &str) -> anyhow::Result<()> {
        let next_move = Move::from_uci(next_move)?;
        let result = self.position.make_move(&next_move)?;
        match result.captured {
            Some(captured) => writeln!(self.output, "played {next_move} captured {captured}")?,
            None => writeln!(self.output, "played {next_move}")?,
        }
        self.handle_status()
    }

    fn handle_status(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "status {}", self.position.state())?;
        Ok(())
    }

    fn handle_display(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{:?}", self.position)?;
        Ok(())
    }

    fn handle_perft(&mut self, depth: u8) -> anyhow::Result<()> {
        const MAX_DEPTH: u8 = 6;
        if depth > MAX_DEPTH {
            bail!("perft depth should be within 0..={MAX_DEPTH}, got {depth}");
        }
        writeln!(self.output, "nodes {}", perft(&self.position, depth))?;
        Ok(())
    }
}
