use std::convert::Infallible;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use shakmaty::Square;
use thiserror::Error;

use super::display::{DisplayError, TerminalDisplay};
use super::script::{MoveScript, ParseError};
use crate::{BoardDisplay, MoveSource};
use crate::board::Coord;
use crate::feedback::compute_feedback;
use crate::fen::STARTING_FEN;
use crate::game_logic::{Game, MoveResponse};

/// A single line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Coord, Coord),
    Select(Coord),
    Play(MoveScript),
    Load(String),
    NewGame,
    Json,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid square: '{0}'")]
    BadSquare(String),
    #[error(transparent)]
    Script(#[from] ParseError),
}

fn parse_square(token: &str) -> Result<Coord, CommandError> {
    token
        .parse::<Square>()
        .map(Coord::from_square)
        .map_err(|_| CommandError::BadSquare(token.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (head, rest) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(head, rest)| (head, rest.trim()));

        match head {
            "" => Err(CommandError::Empty),
            "q" => Ok(Command::Quit),
            "p" => Ok(Command::Refresh),
            "n" => Ok(Command::NewGame),
            "j" => Ok(Command::Json),
            "s" if rest.is_empty() => Err(CommandError::Usage("s <square>")),
            "s" => parse_square(rest).map(Command::Select),
            "m" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
                [from, to] => Ok(Command::Move(parse_square(from)?, parse_square(to)?)),
                _ => Err(CommandError::Usage("m <from> <to>")),
            },
            "play" => Ok(Command::Play(MoveScript::parse(rest)?)),
            "load" if rest.is_empty() => Err(CommandError::Usage("load <fen> | load startpos")),
            "load" if rest == "startpos" => Ok(Command::Load(STARTING_FEN.to_string())),
            "load" => Ok(Command::Load(rest.to_string())),
            token if token.len() == 4 && rest.is_empty() => {
                let mut script = MoveScript::parse(token)?;
                match script.next_move() {
                    Some((from, to)) => Ok(Command::Move(from, to)),
                    None => Err(CommandError::Unknown(token.to_string())),
                }
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Interactive session: one game, one display, an optional selected square.
#[derive(Debug)]
pub struct Session<D> {
    game: Game,
    display: D,
    selected: Option<Coord>,
}

impl<D: BoardDisplay> Session<D> {
    pub fn new(game: Game, display: D) -> Self {
        Self {
            game,
            display,
            selected: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn redraw(&mut self) -> Result<(), D::Error> {
        let feedback = compute_feedback(&self.game, self.selected);
        self.display.show(&self.game, &feedback)
    }

    /// Apply a command and return the message to show the user.
    ///
    /// [`Command::Quit`] is left to the caller's loop.
    pub fn execute(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Move(from, to) => {
                self.selected = None;
                let response = MoveResponse::from(self.game.play(from, to));
                Some(response.message)
            }
            Command::Select(at) => {
                self.selected = Some(at);
                let moves = self.game.legal_moves(at);
                Some(format!("{at}: {} legal moves", moves.len()))
            }
            Command::Play(mut script) => {
                let Ok(message) = self.play_from(&mut script);
                message
            }
            Command::Load(fen) => match Game::from_fen(&fen) {
                Ok(game) => {
                    self.game = game;
                    self.selected = None;
                    log::info!("loaded position {fen:?}");
                    Some("Position loaded from FEN".to_string())
                }
                Err(err) => Some(err.to_string()),
            },
            Command::NewGame => {
                self.game.new_game();
                self.selected = None;
                Some("New game started".to_string())
            }
            Command::Json => match serde_json::to_string_pretty(&self.game.state()) {
                Ok(json) => Some(json),
                Err(err) => Some(format!("failed to serialize state: {err}")),
            },
            Command::Refresh | Command::Quit => None,
        }
    }

    /// Apply moves from `source` until it runs dry or a move is refused.
    ///
    /// Returns the message for the last move handled. Requests other than
    /// moves are executed as usual; [`Command::Quit`] stops early.
    pub fn play_from<S: MoveSource>(&mut self, source: &mut S) -> Result<Option<String>, S::Error> {
        self.selected = None;
        let mut message = None;
        while let Some(command) = source.next_command()? {
            match command {
                Command::Move(from, to) => match self.game.play(from, to) {
                    Ok(outcome) => message = Some(outcome.to_string()),
                    Err(err) => return Ok(Some(format!("{from}{to}: {err}"))),
                },
                Command::Quit => break,
                other => message = self.execute(other),
            }
        }
        Ok(message)
    }
}

/// Commands typed line by line, with a prompt before each read.
///
/// Blank lines are skipped and unparsable lines are reported on the
/// prompt writer before reading on.
#[derive(Debug)]
pub struct LineSource<R, W> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> LineSource<R, W> {
    pub fn new(input: R, prompt: W) -> Self {
        Self { input, prompt }
    }
}

impl<R: BufRead, W: Write> MoveSource for LineSource<R, W> {
    type Error = io::Error;

    fn next_command(&mut self) -> Result<Option<Command>, Self::Error> {
        loop {
            write!(self.prompt, "> ")?;
            self.prompt.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match line.parse::<Command>() {
                Ok(command) => return Ok(Some(command)),
                Err(CommandError::Empty) => {}
                Err(err) => writeln!(self.prompt, "{err}")?,
            }
        }
    }
}

/// Error that ends the interactive loop.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
}

impl From<Infallible> for TerminalError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Runs an interactive terminal game until `q` or end of input.
pub fn run_interactive_terminal(game: Game) -> Result<(), TerminalError> {
    let mut session = Session::new(game, TerminalDisplay::new());
    let mut source = LineSource::new(io::stdin().lock(), io::stdout());
    run_loop(&mut session, &mut source, io::stdout())
}

fn run_loop<S, D>(session: &mut Session<D>, source: &mut S, mut out: impl Write) -> Result<(), TerminalError>
where
    TerminalError: From<S::Error> + From<D::Error>,
    S: MoveSource,
    D: BoardDisplay,
{
    session.redraw()?;
    print_help(&mut out)?;

    while let Some(command) = source.next_command()? {
        if command == Command::Quit {
            break;
        }

        let message = session.execute(command);
        session.redraw()?;
        print_help(&mut out)?;
        if let Some(message) = message {
            writeln!(out, "{message}")?;
        }
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Commands: <from><to> | m <from> <to> | s <square> | play <moves> | load <fen> | n (new) | j (json) | p (refresh) | q (quit)"
    )
}
