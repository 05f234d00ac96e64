//! Chat turns, the append-only transcript, and the UI port.
//!
//! The chat session never touches a concrete UI. It is handed an
//! `Arc<dyn ChatView>` at construction and is restricted to the methods
//! below: append a turn, replace a turn in its slot, and read/write the
//! input box.
//!
//! Turns are only ever appended. The single in-place edit is resolving the
//! "Thinking..." placeholder with the final answer; nothing is removed or
//! reordered.

use std::sync::Mutex;

use thiserror::Error;

use crate::render::RichText;

// ── Turns ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub author: Author,
    pub body: RichText,
}

impl ChatTurn {
    /// Visitor text — always literal.
    pub fn user(text: &str) -> Self {
        Self { author: Author::User, body: RichText::plain(text) }
    }

    pub fn assistant(body: RichText) -> Self {
        Self { author: Author::Assistant, body }
    }
}

/// Position of a turn in its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(usize);

impl TurnId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("no turn at position {0}")]
    UnknownTurn(usize),
    #[error("display failed: {0}")]
    Display(String),
}

// ── Transcript ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) -> TurnId {
        self.turns.push(turn);
        TurnId(self.turns.len() - 1)
    }

    /// Swap the body of an existing turn. Author and position are kept.
    pub fn replace(&mut self, id: TurnId, body: RichText) -> Result<(), ViewError> {
        let turn = self.turns.get_mut(id.0).ok_or(ViewError::UnknownTurn(id.0))?;
        turn.body = body;
        Ok(())
    }

    pub fn get(&self, id: TurnId) -> Option<&ChatTurn> {
        self.turns.get(id.0)
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

// ── UI port ───────────────────────────────────────────────────────────────────

/// Capabilities the chat session needs from its host UI.
pub trait ChatView: Send + Sync {
    /// Show a new turn at the end of the message list.
    fn append_turn(&self, turn: ChatTurn) -> TurnId;

    /// Replace the body of a turn already shown.
    fn replace_turn(&self, id: TurnId, body: RichText) -> Result<(), ViewError>;

    /// Current contents of the input box.
    fn read_input(&self) -> String;

    fn set_input(&self, text: &str);

    fn clear_input(&self);
}

// ── MemoryView ────────────────────────────────────────────────────────────────

/// In-memory host: keeps the transcript and input box in process. Used by
/// tests and by embedders that draw the transcript themselves.
#[derive(Debug, Default)]
pub struct MemoryView {
    transcript: Mutex<Transcript>,
    input: Mutex<String>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the turns shown so far.
    pub fn turns(&self) -> Vec<ChatTurn> {
        lock(&self.transcript).turns().to_vec()
    }

    pub fn len(&self) -> usize {
        lock(&self.transcript).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.transcript).is_empty()
    }
}

impl ChatView for MemoryView {
    fn append_turn(&self, turn: ChatTurn) -> TurnId {
        lock(&self.transcript).push(turn)
    }

    fn replace_turn(&self, id: TurnId, body: RichText) -> Result<(), ViewError> {
        lock(&self.transcript).replace(id, body)
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

/// A panic while holding the lock cannot leave a half-written turn, so a
/// poisoned lock is still safe to use.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
