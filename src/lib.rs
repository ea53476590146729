pub mod board;
pub mod feedback;
pub mod fen;
pub mod game_logic;
pub mod movegen;
pub mod rules;
pub mod terminal;

pub use board::{Color, Coord, Piece, PieceKind, Position};
pub use game_logic::{Game, GameResult, GameState, MoveError, MoveOutcome, MoveRecord, MoveResponse};

/// Trait for reading move requests from the player.
///
/// Abstracts over interactive input and scripted move lists,
/// providing a uniform interface for the input side of a session.
pub trait MoveSource {
    /// Error type for input failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Next request, or `None` once the source is exhausted.
    fn next_command(&mut self) -> Result<Option<terminal::Command>, Self::Error>;
}

/// Trait for showing the current game to the player.
///
/// Abstracts over the ANSI terminal renderer and test doubles,
/// providing a uniform interface for the output side of a session.
/// Mirrors [`MoveSource`] on the input side.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the game together with the given highlights.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants
    /// to their own output (terminal colors, etc.).
    fn show(&mut self, game: &Game, feedback: &feedback::BoardFeedback) -> Result<(), Self::Error>;
}
