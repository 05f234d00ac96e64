//! Chat layer.
//!
//! [`Dispatcher`] turns a message into a [`Reply`] (remote first, knowledge
//! base on failure). [`ChatSession`] wraps it with the UI side of an
//! exchange: turns, placeholder, rendering.

mod dispatcher;
mod session;

pub use dispatcher::{Dispatcher, Reply, ReplySource};
pub use session::{APOLOGY, ChatSession, THINKING};
