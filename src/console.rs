//! Console channel — the terminal stand-in for the browser chat panel.
//!
//! [`ConsoleView`] implements [`ChatView`] on top of a [`console::Term`]:
//! turns are printed as they are appended, and the "Thinking..." line is
//! redrawn in place when the answer arrives (plain append when stdout is not
//! a terminal).
//!
//! [`run_console`] reads lines from stdin until EOF, `/quit`, or the
//! `shutdown` token is cancelled (Ctrl-C).
//!
//! ```text
//! /1 … /N        send suggestion N
//! /suggestions   list suggestions again
//! /quit          leave
//! ```

use std::io::IsTerminal;
use std::sync::{Arc, Mutex, MutexGuard};

use console::{Term, measure_text_width, style};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chat::ChatSession;
use crate::error::AppError;
use crate::render::RichText;
use crate::transcript::{Author, ChatTurn, ChatView, Transcript, TurnId, ViewError};

// ── ConsoleView ───────────────────────────────────────────────────────────────

pub struct ConsoleView {
    term: Term,
    assistant_name: String,
    transcript: Mutex<Transcript>,
    input: Mutex<String>,
    /// Last turn printed and how many screen rows it took.
    last_printed: Mutex<Option<(TurnId, usize)>>,
}

impl ConsoleView {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            term: Term::stdout(),
            assistant_name: assistant_name.into(),
            transcript: Mutex::new(Transcript::new()),
            input: Mutex::new(String::new()),
            last_printed: Mutex::new(None),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    fn format_turn(&self, turn: &ChatTurn) -> String {
        match turn.author {
            Author::User => format!("{} {}", style("you ›").cyan(), turn.body.to_plain()),
            Author::Assistant => format!(
                "{} {}",
                style(format!("{} ›", self.assistant_name)).green().bold(),
                turn.body.to_terminal()
            ),
        }
    }

    /// Screen rows `text` occupies, accounting for wrapping.
    fn rows(&self, text: &str) -> usize {
        let width = usize::from(self.term.size().1).max(1);
        text.lines()
            .map(|line| measure_text_width(line).max(1).div_ceil(width))
            .sum::<usize>()
            .max(1)
    }

    fn print(&self, id: TurnId, text: &str) -> std::io::Result<()> {
        self.term.write_line(text)?;
        *lock(&self.last_printed) = Some((id, self.rows(text)));
        Ok(())
    }

    /// Erase the terminal's echo of the line just typed.
    fn clear_echo(&self) {
        if let Err(e) = self.term.clear_last_lines(1) {
            debug!(error = %e, "failed to clear echoed input");
        }
    }

    fn write_raw(&self, text: &str) -> Result<(), AppError> {
        self.term.write_line(text)?;
        Ok(())
    }
}

impl ChatView for ConsoleView {
    fn append_turn(&self, turn: ChatTurn) -> TurnId {
        let line = self.format_turn(&turn);
        let id = lock(&self.transcript).push(turn);
        if let Err(e) = self.print(id, &line) {
            warn!(turn = id.index(), error = %e, "console write failed");
        }
        id
    }

    fn replace_turn(&self, id: TurnId, body: RichText) -> Result<(), ViewError> {
        let line = {
            let mut transcript = lock(&self.transcript);
            transcript.replace(id, body)?;
            let turn = transcript.get(id).ok_or(ViewError::UnknownTurn(id.index()))?;
            self.format_turn(turn)
        };

        let redraw = match *lock(&self.last_printed) {
            Some((last, rows)) if last == id && self.term.is_term() => Some(rows),
            _ => None,
        };
        if let Some(rows) = redraw {
            self.term
                .clear_last_lines(rows)
                .map_err(|e| ViewError::Display(e.to_string()))?;
        }
        self.print(id, &line).map_err(|e| ViewError::Display(e.to_string()))
    }

    fn read_input(&self) -> String {
        lock(&self.input).clone()
    }

    fn set_input(&self, text: &str) {
        *lock(&self.input) = text.to_string();
    }

    fn clear_input(&self) {
        lock(&self.input).clear();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    ListSuggestions,
    /// Zero-based suggestion index.
    Suggestion(usize),
    Message(String),
    Empty,
}

fn parse_line(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "/quit" | "/exit" => Command::Quit,
        "/suggestions" | "/help" => Command::ListSuggestions,
        _ => match line.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n >= 1 => Command::Suggestion(n - 1),
            _ => Command::Message(line.to_string()),
        },
    }
}

// ── run_console ───────────────────────────────────────────────────────────────

pub async fn run_console(
    session: ChatSession,
    view: Arc<ConsoleView>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!(
        backend = session.dispatcher().backend().name(),
        "console started — type a message and press Enter. Ctrl-C to quit."
    );
    view.write_raw("─────────────────────────────────")?;
    view.write_raw(" Portfolio chat  (/quit to leave)")?;
    view.write_raw("─────────────────────────────────")?;
    print_suggestions(&session, &view)?;

    let echo_typed = view.is_interactive() && std::io::stdin().is_terminal();
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        if view.is_interactive() {
            print!("> ");
            use std::io::Write as _;
            let _ = std::io::stdout().flush();
        }

        let line = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => match line {
                Err(e) => {
                    warn!("console read error: {e}");
                    break;
                }
                Ok(None) => {
                    info!("console stdin closed");
                    break;
                }
                Ok(Some(line)) => line,
            },
        };

        // The echoed "> text" line is redrawn as a "you ›" turn.
        if echo_typed {
            view.clear_echo();
        }

        let pick = match parse_line(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::ListSuggestions => {
                print_suggestions(&session, &view)?;
                continue;
            }
            Command::Suggestion(index) => {
                if index >= session.suggestions().len() {
                    view.write_raw(&format!("no suggestion /{}", index + 1))?;
                    continue;
                }
                debug!(index, "suggestion chosen");
                Some(index)
            }
            Command::Message(text) => {
                view.set_input(&text);
                None
            }
        };

        let exchange = async {
            match pick {
                Some(index) => session.choose_suggestion(index).await,
                None => session.submit().await,
            }
        };

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("console shutting down mid-exchange");
                break;
            }

            _ = exchange => {}
        }
    }

    Ok(())
}

fn print_suggestions(session: &ChatSession, view: &ConsoleView) -> Result<(), AppError> {
    for (i, s) in session.suggestions().iter().enumerate() {
        view.write_raw(&format!("  {} {s}", style(format!("/{}", i + 1)).dim()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert_eq!(parse_line("   "), Command::Empty);
        assert_eq!(parse_line("/quit"), Command::Quit);
        assert_eq!(parse_line("/exit"), Command::Quit);
        assert_eq!(parse_line("/suggestions"), Command::ListSuggestions);
        assert_eq!(parse_line("/2"), Command::Suggestion(1));
        assert_eq!(parse_line(" hello there "), Command::Message("hello there".into()));
    }

    #[test]
    fn slash_zero_and_unknown_commands_are_messages() {
        assert_eq!(parse_line("/0"), Command::Message("/0".into()));
        assert_eq!(parse_line("/shrug"), Command::Message("/shrug".into()));
    }

    #[test]
    fn replace_records_into_transcript() {
        let view = ConsoleView::new("bot");
        view.append_turn(ChatTurn::user("hi"));
        let slot = view.append_turn(ChatTurn::assistant(RichText::plain("Thinking...")));
        view.replace_turn(slot, RichText::plain("hello")).unwrap();
        let transcript = lock(&view.transcript);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[1].body.to_plain(), "hello");
    }

    #[test]
    fn clear_echo_leaves_transcript_alone() {
        let view = ConsoleView::new("bot");
        view.append_turn(ChatTurn::user("hi"));
        view.clear_echo();
        assert_eq!(lock(&view.transcript).len(), 1);
    }

    #[test]
    fn replace_unknown_turn_errors() {
        let view = ConsoleView::new("bot");
        let slot = {
            let mut other = Transcript::new();
            other.push(ChatTurn::user("a"));
            other.push(ChatTurn::user("b"))
        };
        assert!(matches!(
            view.replace_turn(slot, RichText::plain("x")),
            Err(ViewError::UnknownTurn(1))
        ));
    }
}
