use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Position as _, PositionError, Rank, Square};

use crate::board::{ByColor, CastlingRights, Coord, Position};

/// Error when loading a position from FEN.
#[derive(Debug, thiserror::Error)]
pub enum FenError {
    #[error("invalid FEN: {0}")]
    Parse(#[from] ParseFenError),
    #[error("invalid position: {0}")]
    Position(#[from] PositionError<Chess>),
}

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse placement, side to move and castling availability.
///
/// En passant targets and move clocks are accepted but ignored. A castling
/// right absent from the FEN marks that rook as already moved.
pub fn position_from_fen(fen: &str) -> Result<Position, FenError> {
    let chess: Chess = fen
        .parse::<Fen>()?
        .into_position(CastlingMode::Standard)?;
    let setup = chess.to_setup(EnPassantMode::Legal);

    let mut position = Position::empty();
    for (row, rank) in Rank::ALL.iter().rev().enumerate() {
        for (col, file) in File::ALL.iter().enumerate() {
            let square = Square::from_coords(*file, *rank);
            if let (Some(piece), Some(at)) = (
                setup.board.piece_at(square),
                Coord::new(row as i32, col as i32),
            ) {
                position.board.set(at, Some(piece.into()));
            }
        }
    }

    position.turn = setup.turn.into();

    let rights = setup.castling_rights;
    position.castling = ByColor {
        white: CastlingRights {
            king_moved: false,
            kingside_rook_moved: !rights.contains(Square::H1),
            queenside_rook_moved: !rights.contains(Square::A1),
        },
        black: CastlingRights {
            king_moved: false,
            kingside_rook_moved: !rights.contains(Square::H8),
            queenside_rook_moved: !rights.contains(Square::A8),
        },
    };

    log::debug!("loaded position from FEN {fen:?}");
    Ok(position)
}
