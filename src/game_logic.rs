use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::{Board, ByColor, Color, Coord, Piece, PieceKind, Position};
use crate::fen::{FenError, position_from_fen};
use crate::rules::{self, terminal_result};

pub use crate::rules::GameResult;

/// One applied move. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: Coord,
    pub to: Coord,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub player: Color,
    pub timestamp: DateTime<Utc>,
}

/// Owned snapshot of a game. Changing it has no effect on the [`Game`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    pub game_over: bool,
    pub game_result: Option<GameResult>,
    pub move_history: Vec<MoveRecord>,
    pub captured_pieces: ByColor<Vec<Piece>>,
    pub in_check: bool,
}

/// Why a move was refused. The `Display` text is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("No piece at source position")]
    EmptySource,
    #[error("Not your piece")]
    WrongTurn,
    #[error("Invalid move")]
    IllegalMove,
    #[error("Game is already over")]
    GameOver,
}

/// What happened after a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue,
    /// Announces `side_to_move`, the side now on turn, as the winner.
    Checkmate { side_to_move: Color },
    Stalemate,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Continue => f.write_str("Move successful"),
            MoveOutcome::Checkmate { side_to_move } => {
                write!(f, "Checkmate! {side_to_move} wins!")
            }
            MoveOutcome::Stalemate => f.write_str("Stalemate! Game is a draw!"),
        }
    }
}

/// Transport-friendly `(success, message)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub message: String,
}

impl From<Result<MoveOutcome, MoveError>> for MoveResponse {
    fn from(result: Result<MoveOutcome, MoveError>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                message: outcome.to_string(),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

/// One game session. Owns its state; independent instances never interact.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    result: Option<GameResult>,
    history: Vec<MoveRecord>,
    captured: ByColor<Vec<Piece>>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    #[inline]
    pub fn new() -> Self {
        Self::from_position(Position::default())
    }

    /// Start from an arbitrary position with empty history.
    ///
    /// A position that is already over is flagged immediately.
    pub fn from_position(position: Position) -> Self {
        Self {
            result: terminal_result(&position),
            position,
            history: Vec::new(),
            captured: ByColor::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        position_from_fen(fen).map(Self::from_position)
    }

    /// Discard everything and return to the starting position.
    pub fn new_game(&mut self) {
        log::info!("starting new game");
        *self = Self::new();
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        self.position.piece_at(at)
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.position.turn
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn in_check(&self) -> bool {
        rules::is_in_check(&self.position, self.position.turn)
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn captured(&self, by: Color) -> &[Piece] {
        self.captured.get(by)
    }

    pub fn state(&self) -> GameState {
        GameState {
            board: self.position.board,
            current_player: self.position.turn,
            game_over: self.is_over(),
            game_result: self.result,
            move_history: self.history.clone(),
            captured_pieces: self.captured.clone(),
            in_check: self.in_check(),
        }
    }

    /// Legal destinations for the piece on `from`.
    pub fn legal_moves(&self, from: Coord) -> Vec<Coord> {
        rules::legal_moves(&self.position, from)
    }

    /// Legal destinations for raw coordinates; empty when off-board.
    pub fn legal_moves_at(&self, row: i32, col: i32) -> Vec<Coord> {
        Coord::new(row, col)
            .map(|from| self.legal_moves(from))
            .unwrap_or_default()
    }

    /// Validate and apply a move given as raw `(row, col)` pairs.
    pub fn make_move(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<MoveOutcome, MoveError> {
        let (Some(from), Some(to)) = (Coord::new(from.0, from.1), Coord::new(to.0, to.1)) else {
            return Err(MoveError::InvalidPosition);
        };
        self.play(from, to)
    }

    /// Validate and apply a move between two board coordinates.
    pub fn play(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let piece = self.position.piece_at(from).ok_or(MoveError::EmptySource)?;
        if piece.color != self.position.turn {
            return Err(MoveError::WrongTurn);
        }
        if !self.legal_moves(from).contains(&to) {
            log::debug!("rejected {piece} {from}{to}");
            return Err(MoveError::IllegalMove);
        }

        if from.col().abs_diff(to.col()) == 2 && piece.kind == PieceKind::King {
            log::debug!("{} castles {from}{to}", piece.color);
        }

        let captured = self.position.relocate(from, to);
        if let Some(victim) = captured {
            self.captured.get_mut(piece.color).push(victim);
        }
        self.position.update_castling_rights(piece, from);

        self.history.push(MoveRecord {
            from,
            to,
            piece,
            captured,
            player: piece.color,
            timestamp: Utc::now(),
        });
        log::debug!("{piece} {from}{to}");

        self.position.turn = self.position.turn.other();

        self.result = terminal_result(&self.position);
        let outcome = match self.result {
            None => MoveOutcome::Continue,
            Some(GameResult::Checkmate) => MoveOutcome::Checkmate {
                side_to_move: self.position.turn,
            },
            Some(GameResult::Stalemate) => MoveOutcome::Stalemate,
        };
        if self.result.is_some() {
            log::info!("game over: {outcome}");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod test_helpers {
    use super::*;

    pub fn at(name: &str) -> Coord {
        Coord::from_square(name.parse().expect("asserted square is invalid"))
    }

    pub fn assert_piece(game: &Game, square: &str, kind: PieceKind, color: Color) {
        let expected = Piece::new(color, kind);
        assert_eq!(
            game.piece_at(at(square)),
            Some(expected),
            "Expected {:?} at {}, found {:?}",
            expected,
            square,
            game.piece_at(at(square))
        );
    }

    pub fn assert_empty(game: &Game, square: &str) {
        assert_eq!(
            game.piece_at(at(square)),
            None,
            "Expected empty at {}, found {:?}",
            square,
            game.piece_at(at(square))
        );
    }

    /// Play a whitespace separated list of long-algebraic moves, panicking on
    /// the first one that is refused.
    pub fn play_all(game: &mut Game, moves: &str) -> MoveOutcome {
        let mut last = MoveOutcome::Continue;
        for mv in moves.split_whitespace() {
            let (from, to) = mv.split_at(2);
            last = game
                .play(at(from), at(to))
                .unwrap_or_else(|err| panic!("{mv} refused: {err}"));
        }
        last
    }
}
