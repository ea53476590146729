use std::fmt;

use serde::Serialize;
use shakmaty::{File, Rank, Square};

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step. White moves toward row 0.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this color's king and rooks at the start.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row holding this color's pawns at the start.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Rook => "rook",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        })
    }
}

impl From<shakmaty::Role> for PieceKind {
    fn from(role: shakmaty::Role) -> Self {
        match role {
            shakmaty::Role::Pawn => PieceKind::Pawn,
            shakmaty::Role::Knight => PieceKind::Knight,
            shakmaty::Role::Bishop => PieceKind::Bishop,
            shakmaty::Role::Rook => PieceKind::Rook,
            shakmaty::Role::Queen => PieceKind::Queen,
            shakmaty::Role::King => PieceKind::King,
        }
    }
}

/// A piece is identified by value: there is no "this particular rook".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl From<shakmaty::Piece> for Piece {
    fn from(piece: shakmaty::Piece) -> Self {
        Self::new(piece.color.into(), piece.role.into())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color, self.kind)
    }
}

/// Board coordinate. Row 0 is black's back rank, row 7 is white's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Returns `None` unless both components are in `0..8`.
    pub fn new(row: i32, col: i32) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Step by a (row, col) delta, staying on the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::new(
            i32::from(self.row) + i32::from(dr),
            i32::from(self.col) + i32::from(dc),
        )
    }

    /// All 64 coordinates, row by row from black's back rank.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Coord { row, col }))
    }

    pub fn to_square(self) -> Square {
        Square::from_coords(
            File::ALL[usize::from(self.col)],
            Rank::ALL[7 - usize::from(self.row)],
        )
    }

    pub fn from_square(square: Square) -> Self {
        Self {
            row: 7 - square.rank().to_u32() as u8,
            col: square.file().to_u32() as u8,
        }
    }
}

/// Algebraic notation, e.g. row 6 col 4 is `e2`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_square())
    }
}

/// A value per color, indexed by [`Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ByColor<T> {
    pub white: T,
    pub black: T,
}

impl<T> ByColor<T> {
    #[inline]
    pub fn get(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// Column the rook starts on.
    #[inline]
    pub const fn rook_from(self) -> u8 {
        match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 0,
        }
    }

    /// Column the rook lands on after castling.
    #[inline]
    pub const fn rook_to(self) -> u8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }

    /// Column the king lands on after castling.
    #[inline]
    pub const fn king_to(self) -> u8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }

    /// Column step from king toward rook.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastlingSide::Kingside => 1,
            CastlingSide::Queenside => -1,
        }
    }
}

/// Column of both kings at the start.
pub const KING_START_COL: u8 = 4;

/// Monotonic "has moved" flags for one color. Once set, never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CastlingRights {
    pub king_moved: bool,
    pub kingside_rook_moved: bool,
    pub queenside_rook_moved: bool,
}

impl CastlingRights {
    #[inline]
    pub fn rook_moved(&self, side: CastlingSide) -> bool {
        match side {
            CastlingSide::Kingside => self.kingside_rook_moved,
            CastlingSide::Queenside => self.queenside_rook_moved,
        }
    }

    fn mark_rook_moved(&mut self, side: CastlingSide) {
        match side {
            CastlingSide::Kingside => self.kingside_rook_moved = true,
            CastlingSide::Queenside => self.queenside_rook_moved = true,
        }
    }
}

/// 8×8 grid of pieces. `Copy`, so simulations work on a scratch copy.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Board([[Option<Piece>; 8]; 8]);

impl Board {
    pub const fn empty() -> Self {
        Self([[None; 8]; 8])
    }

    /// The standard starting arrangement.
    pub fn starting() -> Self {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::empty();
        for color in Color::ALL {
            let back = usize::from(color.back_rank());
            let pawns = usize::from(color.pawn_rank());
            for (col, kind) in BACK.into_iter().enumerate() {
                board.0[back][col] = Some(Piece::new(color, kind));
                board.0[pawns][col] = Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        self.0[usize::from(at.row)][usize::from(at.col)]
    }

    #[inline]
    pub fn set(&mut self, at: Coord, piece: Option<Piece>) {
        self.0[usize::from(at.row)][usize::from(at.col)] = piece;
    }

    /// Remove and return whatever stands on `at`.
    #[inline]
    pub fn take(&mut self, at: Coord) -> Option<Piece> {
        self.0[usize::from(at.row)][usize::from(at.col)].take()
    }

    /// Occupied squares with their pieces, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|at| self.piece_at(at).map(|piece| (at, piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Coord> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(at, _)| at)
    }

    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.0
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let line: String = row
                .iter()
                .map(|square| square.map_or('.', Piece::char))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Everything the rules need: placement, side to move, castling flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub turn: Color,
    pub castling: ByColor<CastlingRights>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            board: Board::starting(),
            turn: Color::White,
            castling: ByColor::default(),
        }
    }
}

impl Position {
    /// No pieces, white to move, nothing marked as moved.
    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        self.board.piece_at(at)
    }

    /// Builder used for setting up positions by hand.
    pub fn with_piece(mut self, at: Coord, piece: Piece) -> Self {
        self.board.set(at, Some(piece));
        self
    }

    /// Move a piece without any validation, relocating the rook when a king
    /// travels two columns. Returns the piece standing on `to` beforehand.
    pub(crate) fn relocate(&mut self, from: Coord, to: Coord) -> Option<Piece> {
        let piece = self.board.take(from);

        if let Some(Piece {
            kind: PieceKind::King,
            ..
        }) = piece
            && from.col().abs_diff(to.col()) == 2
        {
            let side = if to.col() > from.col() {
                CastlingSide::Kingside
            } else {
                CastlingSide::Queenside
            };
            if let (Some(rook_from), Some(rook_to)) = (
                Coord::new(i32::from(from.row()), i32::from(side.rook_from())),
                Coord::new(i32::from(from.row()), i32::from(side.rook_to())),
            ) {
                let rook = self.board.take(rook_from);
                self.board.set(rook_to, rook);
            }
        }

        let captured = self.board.take(to);
        self.board.set(to, piece);
        captured
    }

    /// Record departures from the king's and rooks' origin squares.
    pub(crate) fn update_castling_rights(&mut self, piece: Piece, from: Coord) {
        let rights = self.castling.get_mut(piece.color);
        match piece.kind {
            PieceKind::King => rights.king_moved = true,
            PieceKind::Rook if from.row() == piece.color.back_rank() => {
                for side in CastlingSide::ALL {
                    if from.col() == side.rook_from() {
                        rights.mark_rook_moved(side);
                    }
                }
            }
            _ => {}
        }
    }
}
