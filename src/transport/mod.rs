//! The seam between the bot and a messaging platform: identifiers, inbound
//! updates, inline keyboards and the [`ChatTransport`] trait.

mod console;
mod memory;

use std::fmt;

use serde::Serialize;

use crate::error::TransportError;
use crate::game::COLS;

pub use console::{parse_update, ConsoleTransport};
pub use memory::{MemoryTransport, TransportCall};

/// Identity of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChatId(pub i64);

/// Identity of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The person behind an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub first_name: String,
    pub username: Option<String>,
}

impl User {
    pub fn new(first_name: impl Into<String>, username: Option<String>) -> Self {
        User {
            first_name: first_name.into(),
            username,
        }
    }

    /// `First (@handle)`, or just `First` without a handle
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => format!("{} (@{})", self.first_name, username),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

/// Buttons attached under a message, row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// One row with a button per column, labelled 1..=7 and carrying the
    /// zero-based column index as callback data.
    pub fn columns() -> Self {
        let row = (0..COLS)
            .map(|col| InlineButton {
                label: (col + 1).to_string(),
                callback_data: col.to_string(),
            })
            .collect();
        InlineKeyboard { rows: vec![row] }
    }
}

/// Something that happened in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A `/command` message. `text` is the full message text.
    Command {
        chat: ChatId,
        user: User,
        text: String,
    },
    /// An inline button press on `message`.
    Callback {
        chat: ChatId,
        user: User,
        message: Option<MessageId>,
        data: String,
    },
}

impl Update {
    pub fn chat(&self) -> ChatId {
        match self {
            Update::Command { chat, .. } | Update::Callback { chat, .. } => *chat,
        }
    }
}

/// Outbound operations the bot needs from a messaging platform.
pub trait ChatTransport {
    /// Post a new message, optionally with an inline keyboard.
    fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageId, TransportError>;

    /// Replace the text of an existing message, dropping its keyboard.
    fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError>;

    fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError>;

    /// Acknowledge a button press so the client stops its spinner.
    fn answer_callback(
        &self,
        _chat: ChatId,
        _message: Option<MessageId>,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}
