use serde::Serialize;

use crate::board::{Color, Coord, Position};
use crate::movegen::{Castling, piece_moves, pseudo_legal_moves};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Checkmate,
    Stalemate,
}

/// Squares of `color.other()` pieces that attack `color`'s king.
///
/// Castling destinations are never considered attacks.
pub fn checkers(position: &Position, color: Color) -> Vec<Coord> {
    let Some(king) = position.board.find_king(color) else {
        return Vec::new();
    };

    position
        .board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .filter(|(from, piece)| piece_moves(position, *from, *piece, Castling::Exclude).contains(&king))
        .map(|(from, _)| from)
        .collect()
}

/// True iff some opposing piece could move onto `color`'s king.
///
/// A missing king is never in check.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    let Some(king) = position.board.find_king(color) else {
        return false;
    };

    position
        .board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(from, piece)| piece_moves(position, from, piece, Castling::Exclude).contains(&king))
}

/// Pseudo-legal destinations that do not leave the mover's king in check.
///
/// Each candidate is tried on a scratch copy; `position` itself is never touched.
pub fn legal_moves(position: &Position, from: Coord) -> Vec<Coord> {
    let Some(piece) = position.piece_at(from) else {
        return Vec::new();
    };

    pseudo_legal_moves(position, from)
        .into_iter()
        .filter(|&to| {
            let mut scratch = *position;
            scratch.relocate(from, to);
            !is_in_check(&scratch, piece.color)
        })
        .collect()
}

/// Whether the side to move has any legal move anywhere on the board.
pub fn has_legal_move(position: &Position) -> bool {
    position
        .board
        .pieces()
        .filter(|(_, piece)| piece.color == position.turn)
        .any(|(from, _)| !legal_moves(position, from).is_empty())
}

/// `None` while the side to move can still move, otherwise checkmate or
/// stalemate depending on whether its king is attacked.
pub fn terminal_result(position: &Position) -> Option<GameResult> {
    if has_legal_move(position) {
        None
    } else if is_in_check(position, position.turn) {
        Some(GameResult::Checkmate)
    } else {
        Some(GameResult::Stalemate)
    }
}
