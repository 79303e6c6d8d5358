//! Conversation module - message types and the append-only message log
//!
//! A [`Conversation`] is the ordered history of one orchestration run:
//! user input, assistant turns, and tool results. It is created per chat
//! request from the caller-supplied history, grows only by appending, and
//! is discarded once the final reply has been extracted. Nothing here is
//! shared between concurrent requests.
//!
//! # Example
//!
//! ```
//! use flydesk::conversation::{Conversation, Message};
//!
//! let mut conversation = Conversation::new();
//! conversation.push(Message::user("What are your services?"));
//! conversation.push(Message::assistant("We offer AI and web development."));
//!
//! assert_eq!(conversation.len(), 2);
//! assert_eq!(conversation.last().unwrap().content, "We offer AI and web development.");
//! ```

pub mod types;

pub use types::{Message, Role, ToolCall};

/// Append-only, ordered log of messages for one orchestration run.
///
/// Prior entries are never mutated or reordered; the only write
/// operations are [`push`](Conversation::push) and
/// [`extend`](Conversation::extend). The agent loop bases every routing
/// decision on [`last`](Conversation::last).
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation from caller-supplied history.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a single message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a batch of messages, preserving their order.
    ///
    /// This is the merge rule for newly produced messages: tool results
    /// from one batch land together, after the assistant turn that
    /// requested them.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
