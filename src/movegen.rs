use crate::board::{CastlingSide, Color, Coord, KING_START_COL, Piece, PieceKind, Position};
use crate::rules::is_in_check;

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Whether king move generation may append castling destinations.
///
/// Attack scans must use [`Castling::Exclude`]: castling legality itself
/// asks whether the king is attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Castling {
    Include,
    Exclude,
}

/// Destinations for the piece on `from`, ignoring whether the move leaves the
/// mover's king in check.
///
/// Empty when `from` is vacant or holds a piece of the side not to move.
pub fn pseudo_legal_moves(position: &Position, from: Coord) -> Vec<Coord> {
    match position.piece_at(from) {
        Some(piece) if piece.color == position.turn => {
            piece_moves(position, from, piece, Castling::Include)
        }
        _ => Vec::new(),
    }
}

/// Geometry and occupancy rules for `piece` standing on `from`, regardless of
/// whose turn it is.
pub fn piece_moves(position: &Position, from: Coord, piece: Piece, castling: Castling) -> Vec<Coord> {
    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, from, piece.color, &mut moves),
        PieceKind::Rook => slide(position, from, piece.color, &ORTHOGONAL, &mut moves),
        PieceKind::Bishop => slide(position, from, piece.color, &DIAGONAL, &mut moves),
        PieceKind::Queen => {
            slide(position, from, piece.color, &ORTHOGONAL, &mut moves);
            slide(position, from, piece.color, &DIAGONAL, &mut moves);
        }
        PieceKind::Knight => step(position, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => {
            step(position, from, piece.color, &KING_OFFSETS, &mut moves);
            if castling == Castling::Include {
                castling_moves(position, from, piece.color, &mut moves);
            }
        }
    }
    moves
}

fn pawn_moves(position: &Position, from: Coord, color: Color, moves: &mut Vec<Coord>) {
    let dir = color.forward();

    if let Some(one) = from.offset(dir, 0)
        && position.piece_at(one).is_none()
    {
        moves.push(one);

        // Double step only from the starting rank, and only through an empty square
        if from.row() == color.pawn_rank()
            && let Some(two) = from.offset(2 * dir, 0)
            && position.piece_at(two).is_none()
        {
            moves.push(two);
        }
    }

    for dc in [-1, 1] {
        if let Some(target) = from.offset(dir, dc)
            && position.piece_at(target).is_some_and(|p| p.color != color)
        {
            moves.push(target);
        }
    }
}

/// Rays stop at the first occupied square, which is included only when it
/// holds an opposing piece.
fn slide(
    position: &Position,
    from: Coord,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Coord>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match position.piece_at(next) {
                None => moves.push(next),
                Some(other) => {
                    if other.color != color {
                        moves.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

fn step(
    position: &Position,
    from: Coord,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Coord>,
) {
    moves.extend(
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| position.piece_at(to).is_none_or(|p| p.color != color)),
    );
}

fn castling_moves(position: &Position, from: Coord, color: Color, moves: &mut Vec<Coord>) {
    if from.row() != color.back_rank() || from.col() != KING_START_COL {
        return;
    }
    for side in CastlingSide::ALL {
        if can_castle(position, color, side)
            && let Some(to) = from.offset(0, 2 * side.direction())
        {
            moves.push(to);
        }
    }
}

/// Whether `color` may castle toward `side` right now.
///
/// Requires that neither the king nor that rook has ever left its origin, both
/// still stand there, every square between them is empty, the king is not in
/// check, and none of the squares the king crosses or lands on is attacked.
pub fn can_castle(position: &Position, color: Color, side: CastlingSide) -> bool {
    let rights = position.castling.get(color);
    if rights.king_moved || rights.rook_moved(side) {
        return false;
    }

    let row = i32::from(color.back_rank());
    let (Some(king_from), Some(rook_from)) = (
        Coord::new(row, i32::from(KING_START_COL)),
        Coord::new(row, i32::from(side.rook_from())),
    ) else {
        return false;
    };

    if position.piece_at(king_from) != Some(Piece::new(color, PieceKind::King))
        || position.piece_at(rook_from) != Some(Piece::new(color, PieceKind::Rook))
    {
        return false;
    }

    let (low, high) = if side.rook_from() > KING_START_COL {
        (KING_START_COL + 1, side.rook_from())
    } else {
        (side.rook_from() + 1, KING_START_COL)
    };
    let path_clear = (low..high)
        .filter_map(|col| Coord::new(row, i32::from(col)))
        .all(|at| position.piece_at(at).is_none());
    if !path_clear {
        return false;
    }

    if is_in_check(position, color) {
        return false;
    }

    // Walk the king one square at a time on a scratch copy
    (1..=2).all(|steps| {
        let Some(through) = king_from.offset(0, steps * side.direction()) else {
            return false;
        };
        let mut scratch = *position;
        let king = scratch.board.take(king_from);
        scratch.board.set(through, king);
        !is_in_check(&scratch, color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::position_from_fen;
    use test_case::test_case;

    fn at(name: &str) -> Coord {
        Coord::from_square(name.parse().expect("valid square"))
    }

    fn sorted(mut moves: Vec<Coord>) -> Vec<String> {
        moves.sort_by_key(|c| (c.row(), c.col()));
        moves.iter().map(Coord::to_string).collect()
    }

    fn moves_from(fen: &str, square: &str) -> Vec<String> {
        let position = position_from_fen(fen).expect("valid FEN");
        sorted(pseudo_legal_moves(&position, at(square)))
    }

    #[test]
    fn starting_position_has_twenty_destinations() {
        let position = Position::default();

        let total: usize = position
            .board
            .pieces()
            .map(|(from, _)| pseudo_legal_moves(&position, from).len())
            .sum();

        assert_eq!(total, 20);
    }

    #[test]
    fn black_pieces_give_nothing_on_whites_turn() {
        let position = Position::default();
        assert!(pseudo_legal_moves(&position, at("e7")).is_empty());
        assert!(pseudo_legal_moves(&position, at("b8")).is_empty());
    }

    #[test]
    fn empty_square_gives_nothing() {
        assert!(pseudo_legal_moves(&Position::default(), at("e4")).is_empty());
    }

    #[test_case("e2", &["e4", "e3"]; "white double step")]
    #[test_case("g1", &["f3", "h3"]; "knight from start")]
    #[test_case("a1", &[]; "boxed rook")]
    fn starting_moves(square: &str, expected: &[&str]) {
        let position = Position::default();
        assert_eq!(sorted(pseudo_legal_moves(&position, at(square))), expected);
    }

    #[test]
    fn pawn_double_step_blocked_by_piece_in_between() {
        let moves = moves_from("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2");
        assert!(moves.is_empty());
    }

    #[test]
    fn pawn_double_step_blocked_on_landing_square() {
        let moves = moves_from("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(moves, ["e3"]);
    }

    #[test]
    fn pawn_captures_diagonally_only_opponents() {
        let moves = moves_from("4k3/8/8/3p1N2/4P3/8/8/4K3 w - - 0 1", "e4");
        assert_eq!(moves, ["d5", "e5"]);
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let moves = moves_from("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1", "d7");
        assert_eq!(moves, ["d6", "d5"]);
    }

    #[test]
    fn rook_ray_stops_at_first_piece() {
        let moves = moves_from("4k3/8/8/8/R2p4/8/P7/4K3 w - - 0 1", "a4");
        assert_eq!(moves, ["a8", "a7", "a6", "a5", "b4", "c4", "d4", "a3"]);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let moves = moves_from("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1", "a1");
        assert_eq!(moves.len(), 7 + 3 + 7);
    }

    #[test]
    fn knight_skips_own_pieces() {
        let moves = moves_from("4k3/8/8/8/8/2P5/3P4/1N2K3 w - - 0 1", "b1");
        assert_eq!(moves, ["a3"]);
    }

    #[test]
    fn king_offers_both_castles_when_clear() {
        let moves = moves_from("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1");
        assert!(moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_gate_on_cleared_kingside() {
        let mut position = Position::default();
        position.board.set(at("f1"), None);
        position.board.set(at("g1"), None);

        assert!(can_castle(&position, Color::White, CastlingSide::Kingside));
        assert!(!can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn castling_refused_after_rook_moved_flag() {
        let mut position = position_from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        position.castling.white.kingside_rook_moved = true;

        assert!(!can_castle(&position, Color::White, CastlingSide::Kingside));
        assert!(can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn castling_refused_when_path_attacked() {
        // Black rook on f8 covers f1
        let position = position_from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();

        assert!(!can_castle(&position, Color::White, CastlingSide::Kingside));
        assert!(can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn castling_refused_when_landing_square_attacked() {
        // Black rook on c8 covers c1
        let position = position_from_fen("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();

        assert!(!can_castle(&position, Color::White, CastlingSide::Queenside));
        assert!(can_castle(&position, Color::White, CastlingSide::Kingside));
    }

    #[test]
    fn queenside_allowed_when_only_b_file_attacked() {
        // b1 must be empty but the king never crosses it
        let position = position_from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();

        assert!(can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn castling_refused_while_in_check() {
        let position = position_from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();

        assert!(!can_castle(&position, Color::White, CastlingSide::Kingside));
        assert!(!can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn castling_refused_when_blocked() {
        let position = position_from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();

        assert!(!can_castle(&position, Color::White, CastlingSide::Kingside));
        assert!(!can_castle(&position, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn attack_scan_never_reports_castling() {
        let position = position_from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let king = Piece::new(Color::White, PieceKind::King);

        let moves = piece_moves(&position, at("e1"), king, Castling::Exclude);

        assert!(!moves.contains(&at("g1")));
        assert!(!moves.contains(&at("c1")));
        assert_eq!(moves.len(), 5);
    }
}
