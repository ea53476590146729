mod display;
mod script;
mod session;

pub use display::{DisplayError, TerminalDisplay};
pub use script::{MoveScript, ParseError};
pub use session::{Command, CommandError, LineSource, Session, TerminalError, run_interactive_terminal};
