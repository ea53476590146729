use std::io::{self, Write};

use crate::BoardDisplay;
use crate::board::{Color, Coord};
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::game_logic::{Game, GameResult};

/// Terminal-based board display.
///
/// Renders the position as an 8×8 grid of FEN letters, with ANSI
/// color-coded squares matching the feedback type.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, game: &Game, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        let mut out = io::stdout().lock();
        write!(out, "\x1B[2J\x1B[H")?;
        render_board(&mut out, game, feedback)
    }
}

/// Render board and status to any writer. Extracted for testability.
pub(crate) fn render_board(
    w: &mut impl Write,
    game: &Game,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for row in 0..8 {
        write!(w, " {} ", 8 - row)?;
        for col in 0..8 {
            let Some(at) = Coord::new(row, col) else {
                continue;
            };
            let symbol = game.piece_at(at).map_or('·', |piece| piece.char());
            write!(w, "{}", format_square(symbol, feedback.get(at)))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    writeln!(w)?;
    writeln!(w, "{}", status_line(game))?;
    for color in Color::ALL {
        let captured: String = game.captured(color).iter().map(|piece| piece.char()).collect();
        if !captured.is_empty() {
            writeln!(w, "Captured by {color}: {captured}")?;
        }
    }
    w.flush()?;
    Ok(())
}

fn status_line(game: &Game) -> String {
    match game.result() {
        Some(GameResult::Checkmate) => format!("Checkmate, {} has no moves", game.current_player()),
        Some(GameResult::Stalemate) => "Stalemate".to_string(),
        None if game.in_check() => format!("{} to move (check)", game.current_player()),
        None => format!("{} to move", game.current_player()),
    }
}

/// Wrap a piece symbol in the ANSI background for its feedback.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    match feedback {
        Some(SquareFeedback::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(SquareFeedback::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(SquareFeedback::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        Some(SquareFeedback::Check) => format!("\x1b[45m {symbol} \x1b[0m"),
        Some(SquareFeedback::Checker) => format!("\x1b[43m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}
