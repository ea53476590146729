use crate::board::{Color, Coord, Piece};
use crate::game_logic::Game;
use crate::rules;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination for the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// The selected piece
    Origin,
    /// King of the side to move while in check
    Check,
    /// Opponent piece giving check
    Checker,
}

/// Squares and their highlight, consumed by a [`crate::BoardDisplay`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Coord, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    #[inline]
    pub fn squares(&self) -> &[(Coord, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, at: Coord) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == at)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any earlier entry.
    pub fn set(&mut self, at: Coord, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == at) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((at, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

/// What the feedback computation needs from a game.
pub trait FeedbackSource {
    fn piece_at(&self, at: Coord) -> Option<Piece>;

    fn legal_moves(&self, from: Coord) -> Vec<Coord>;

    fn side_to_move(&self) -> Color;

    /// King square and attackers when the side to move is in check.
    fn check_info(&self) -> Option<CheckInfo>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king: Coord,
    pub checkers: Vec<Coord>,
}

impl FeedbackSource for Game {
    fn piece_at(&self, at: Coord) -> Option<Piece> {
        Game::piece_at(self, at)
    }

    fn legal_moves(&self, from: Coord) -> Vec<Coord> {
        Game::legal_moves(self, from)
    }

    fn side_to_move(&self) -> Color {
        self.current_player()
    }

    fn check_info(&self) -> Option<CheckInfo> {
        let position = self.position();
        let checkers = rules::checkers(position, position.turn);
        if checkers.is_empty() {
            return None;
        }
        Some(CheckInfo {
            king: position.board.find_king(position.turn)?,
            checkers,
        })
    }
}

/// Compute highlights for the current position.
///
/// - Check: the king in check and every piece attacking it
/// - Selected own piece: origin plus its legal destinations and captures
///
/// Selecting an empty square or an opponent piece adds nothing.
pub fn compute_feedback(source: &impl FeedbackSource, selected: Option<Coord>) -> BoardFeedback {
    let mut feedback = BoardFeedback::new();

    if let Some(check) = source.check_info() {
        feedback.set(check.king, SquareFeedback::Check);
        for checker in check.checkers {
            feedback.set(checker, SquareFeedback::Checker);
        }
    }

    if let Some(from) = selected
        && source
            .piece_at(from)
            .is_some_and(|piece| piece.color == source.side_to_move())
    {
        feedback.set(from, SquareFeedback::Origin);
        for to in source.legal_moves(from) {
            feedback.set(to, classify_move(source, to));
        }
    }

    feedback
}

/// Classify a destination as either a capture or a quiet move
fn classify_move(source: &impl FeedbackSource, to: Coord) -> SquareFeedback {
    if source.piece_at(to).is_some() {
        SquareFeedback::Capture
    } else {
        SquareFeedback::Destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(name: &str) -> Coord {
        Coord::from_square(name.parse().expect("valid square"))
    }

    #[test]
    fn test_no_feedback_when_nothing_happening() {
        let game = Game::new();

        let feedback = compute_feedback(&game, None);

        assert!(feedback.is_empty());
    }

    #[test]
    fn test_show_destinations_when_piece_selected() {
        let game = Game::new();

        let feedback = compute_feedback(&game, Some(at("e2")));

        assert_eq!(feedback.get(at("e2")), Some(SquareFeedback::Origin));
        assert_eq!(feedback.get(at("e3")), Some(SquareFeedback::Destination));
        assert_eq!(feedback.get(at("e4")), Some(SquareFeedback::Destination));
        assert_eq!(feedback.get(at("d2")), None);
        assert_eq!(feedback.squares().len(), 3);
    }

    #[test]
    fn test_opponent_piece_selection_ignored() {
        let game = Game::new();

        let feedback = compute_feedback(&game, Some(at("e7")));

        assert!(feedback.is_empty());
    }

    #[test]
    fn test_distinguish_captures() {
        let game = Game::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1")
            .expect("valid FEN");

        let feedback = compute_feedback(&game, Some(at("e4")));

        assert_eq!(feedback.get(at("e4")), Some(SquareFeedback::Origin));
        assert_eq!(feedback.get(at("e5")), Some(SquareFeedback::Destination));
        assert_eq!(feedback.get(at("d5")), Some(SquareFeedback::Capture));
    }

    #[test]
    fn test_check_highlights_king_and_checker() {
        let game = Game::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1")
            .expect("valid FEN");

        let feedback = compute_feedback(&game, None);

        assert_eq!(feedback.get(at("e1")), Some(SquareFeedback::Check));
        assert_eq!(feedback.get(at("h4")), Some(SquareFeedback::Checker));
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let mut feedback = BoardFeedback::new();
        feedback.set(at("a1"), SquareFeedback::Destination);
        feedback.set(at("a1"), SquareFeedback::Capture);

        assert_eq!(feedback.squares(), [(at("a1"), SquareFeedback::Capture)]);
    }
}
