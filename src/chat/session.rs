//! Chat session — drives one exchange through the UI port.
//!
//! For each submitted message:
//!   1. trim; empty input is a no-op (no turns, no network)
//!   2. append the visitor's turn (literal text)
//!   3. append a "Thinking..." placeholder
//!   4. await the dispatcher
//!   5. render the answer and replace the placeholder in its slot
//!
//! If the view rejects the rendered answer, the placeholder gets the fixed
//! apology instead.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::render::{self, RichText};
use crate::transcript::{ChatTurn, ChatView};

use super::dispatcher::{Dispatcher, Reply};

pub const THINKING: &str = "Thinking...";
pub const APOLOGY: &str = "Sorry, something went wrong.";

/// Cheap to clone — concurrent exchanges share the dispatcher and view.
#[derive(Clone)]
pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    view: Arc<dyn ChatView>,
}

impl ChatSession {
    pub fn new(dispatcher: Arc<Dispatcher>, view: Arc<dyn ChatView>) -> Self {
        Self { dispatcher, view }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn suggestions(&self) -> &[String] {
        self.dispatcher.knowledge().suggestions()
    }

    /// Submit whatever is in the input box. The box is cleared only when it
    /// held a real message.
    pub async fn submit(&self) -> Option<Reply> {
        let raw = self.view.read_input();
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        self.view.clear_input();
        self.exchange(message).await
    }

    /// Send `text` without going through the input box.
    pub async fn send(&self, text: &str) -> Option<Reply> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        self.exchange(message).await
    }

    /// Suggestion chip: copy its text into the input box, then submit.
    /// Out-of-range indices are ignored.
    pub async fn choose_suggestion(&self, index: usize) -> Option<Reply> {
        let text = self.suggestions().get(index)?.clone();
        self.view.set_input(&text);
        self.submit().await
    }

    async fn exchange(&self, message: &str) -> Option<Reply> {
        self.view.append_turn(ChatTurn::user(message));
        let slot = self.view.append_turn(ChatTurn::assistant(RichText::plain(THINKING)));
        debug!(slot = slot.index(), "placeholder shown");

        let reply = self.dispatcher.respond(message).await?;

        let body = render::render_answer(&reply.text);
        if let Err(e) = self.view.replace_turn(slot, body) {
            warn!(slot = slot.index(), error = %e, "failed to display answer");
            if let Err(e) = self.view.replace_turn(slot, RichText::plain(APOLOGY)) {
                warn!(slot = slot.index(), error = %e, "failed to display apology");
            }
        }

        Some(reply)
    }
}
