//! Command-line surface: arguments, localized messages, the interactive
//! loop and the animated reveal of the result.

pub mod args;
pub mod messages;
pub mod repl;
pub mod reveal;
pub mod wiring;

pub use args::{Cli, Command};
pub use messages::Messages;
pub use repl::{parse_command, submit, Repl, ReplCommand};
pub use reveal::Reveal;
pub use wiring::{build_handler, AppError};
