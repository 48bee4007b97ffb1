//! Interactive loop and result presentation.

use chrono::Utc;
use std::io::{self, BufRead, IsTerminal, Lines, StdinLock, Write};

use super::messages::Messages;
use super::reveal::Reveal;
use crate::application::{
    PipelineError, PredictFinishTimeCommand, PredictFinishTimeHandler, Session,
};

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Submit(String),
    Clear,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> ReplCommand {
    match line.trim() {
        "" => ReplCommand::Empty,
        ":clear" | ":c" => ReplCommand::Clear,
        ":quit" | ":q" | ":exit" => ReplCommand::Quit,
        text => ReplCommand::Submit(text.to_string()),
    }
}

/// Runs one submission and prints its outcome.
///
/// Returns `true` when a prediction was shown.
pub async fn submit<W: Write>(
    handler: &PredictFinishTimeHandler,
    session: &mut Session,
    messages: &Messages,
    reveal: &Reveal,
    text: &str,
    out: &mut W,
) -> io::Result<bool> {
    let result = handler
        .handle(PredictFinishTimeCommand {
            text: text.to_string(),
            session_id: session.id(),
        })
        .await;

    match result {
        Ok(prediction) => {
            session.record_submission(text, Some(prediction.record));
            reveal
                .show(out, messages.result_title(), &prediction.outcome.formatted)
                .await?;
            Ok(true)
        }
        Err(err) => {
            let record = match err {
                PipelineError::Incomplete { ref record, .. } => Some(record.clone()),
                _ => None,
            };
            session.record_submission(text, record);
            writeln!(out, "{}", messages.pipeline_error(&err))?;
            Ok(false)
        }
    }
}

/// The interactive session.
pub struct Repl {
    handler: PredictFinishTimeHandler,
    session: Session,
    messages: Messages,
    reveal: Reveal,
}

impl Repl {
    pub fn new(
        handler: PredictFinishTimeHandler,
        session: Session,
        messages: Messages,
        reveal: Reveal,
    ) -> Self {
        Self {
            handler,
            session,
            messages,
            reveal,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handler(&self) -> &PredictFinishTimeHandler {
        &self.handler
    }

    /// Text the next prompt starts with: the last submission, until cleared.
    pub fn prefill(&self) -> Option<&str> {
        self.session.last_text()
    }

    /// Handles one input line. Returns `false` once the user quits.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        match parse_command(line) {
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Empty => writeln!(out, "{}", self.messages.empty_input())?,
            ReplCommand::Clear => {
                self.session.reset();
                writeln!(out, "{}", self.messages.cleared())?;
            }
            ReplCommand::Submit(text) => {
                submit(
                    &self.handler,
                    &mut self.session,
                    &self.messages,
                    &self.reveal,
                    &text,
                    out,
                )
                .await?;
            }
        }
        writeln!(out)?;
        Ok(true)
    }

    /// Reads lines until `:quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        let mut reader = LineReader::stdin();
        let mut stdout = io::stdout();

        writeln!(stdout, "{}", self.messages.banner())?;
        writeln!(stdout, "{}", self.messages.commands_hint())?;
        writeln!(stdout)?;

        loop {
            writeln!(stdout, "{}", self.messages.input_prompt())?;
            let Some(line) = reader.read_line(self.prefill())? else {
                break;
            };
            if !self.handle_line(&line, &mut stdout).await? {
                break;
            }
        }

        tracing::debug!(
            session_id = %self.session.id(),
            duration_secs = (Utc::now() - self.session.started_at()).num_seconds(),
            last_record = ?self.session.last_record(),
            "session ended"
        );
        Ok(())
    }
}

/// Line input: an editable prompt on a terminal, plain lines otherwise.
enum LineReader {
    Terminal,
    Piped(Lines<StdinLock<'static>>),
}

impl LineReader {
    fn stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            LineReader::Terminal
        } else {
            LineReader::Piped(stdin.lock().lines())
        }
    }

    /// `initial` pre-fills the editable prompt; piped input ignores it.
    fn read_line(&mut self, initial: Option<&str>) -> io::Result<Option<String>> {
        match self {
            LineReader::Terminal => {
                let mut input = dialoguer::Input::<String>::new()
                    .with_prompt(">")
                    .allow_empty(true);
                if let Some(text) = initial {
                    input = input.with_initial_text(text);
                }
                input
                    .interact_text()
                    .map(Some)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
            }
            LineReader::Piped(lines) => lines.next().transpose(),
        }
    }
}
