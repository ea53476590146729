use std::collections::VecDeque;
use std::convert::Infallible;

use shakmaty::Square;
use thiserror::Error;

use super::Command;
use crate::MoveSource;
use crate::board::Coord;

/// Error when parsing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid move notation: '{0}'")]
pub struct ParseError(String);

/// Queue of moves written in long algebraic form.
///
/// Moves are whitespace separated pairs of squares (`"e2e4 e7e5"`). A trailing
/// period after a move is allowed (`"e2e4. e7e5."`). New script can be
/// appended at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveScript {
    pending: VecDeque<(Coord, Coord)>,
}

impl MoveScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(script: &str) -> Result<Self, ParseError> {
        let mut parsed = Self::new();
        parsed.push_script(script)?;
        Ok(parsed)
    }

    /// Parse and queue additional moves.
    ///
    /// On error nothing is queued.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let moves = parse_script(script)?;
        self.pending.extend(moves);
        Ok(())
    }

    /// Next queued move, if any.
    pub fn next_move(&mut self) -> Option<(Coord, Coord)> {
        self.pending.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl MoveSource for MoveScript {
    type Error = Infallible;

    fn next_command(&mut self) -> Result<Option<Command>, Self::Error> {
        Ok(self.next_move().map(|(from, to)| Command::Move(from, to)))
    }
}

fn parse_script(script: &str) -> Result<Vec<(Coord, Coord)>, ParseError> {
    script
        .split_whitespace()
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .map(parse_move)
        .collect()
}

fn parse_move(token: &str) -> Result<(Coord, Coord), ParseError> {
    let invalid = || ParseError(token.to_string());

    if token.len() != 4 || !token.is_ascii() {
        return Err(invalid());
    }
    let (from, to) = token.split_at(2);
    let from: Square = from.parse().map_err(|_| invalid())?;
    let to: Square = to.parse().map_err(|_| invalid())?;
    Ok((Coord::from_square(from), Coord::from_square(to)))
}
