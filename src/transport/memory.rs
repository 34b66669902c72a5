use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{ChatId, ChatTransport, InlineKeyboard, MessageId};
use crate::error::TransportError;

/// One outbound call recorded by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Send {
        chat: ChatId,
        message: MessageId,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Edit {
        chat: ChatId,
        message: MessageId,
        text: String,
    },
    Delete {
        chat: ChatId,
        message: MessageId,
    },
    Answer {
        chat: ChatId,
        message: Option<MessageId>,
    },
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    live: HashMap<(ChatId, MessageId), String>,
    calls: Vec<TransportCall>,
}

/// In-process transport that keeps every message in memory.
///
/// Useful for embedding the bot in tests or another process; deletes can be
/// made to fail to exercise the bot's recovery path.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inner: Mutex<Inner>,
    fail_deletes: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<TransportCall> {
        self.lock().calls.clone()
    }

    /// Messages currently visible in `chat`, ordered by id
    pub fn live_messages(&self, chat: ChatId) -> Vec<(MessageId, String)> {
        let inner = self.lock();
        let mut messages: Vec<_> = inner
            .live
            .iter()
            .filter(|((c, _), _)| *c == chat)
            .map(|((_, id), text)| (*id, text.clone()))
            .collect();
        messages.sort_by_key(|(id, _)| *id);
        messages
    }

    /// The most recent message sent to `chat`, with its keyboard
    pub fn last_sent(&self, chat: ChatId) -> Option<(MessageId, String, Option<InlineKeyboard>)> {
        self.lock().calls.iter().rev().find_map(|call| match call {
            TransportCall::Send {
                chat: c,
                message,
                text,
                keyboard,
            } if *c == chat => Some((*message, text.clone(), keyboard.clone())),
            _ => None,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatTransport for MemoryTransport {
    fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageId, TransportError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let message = MessageId(inner.next_id);
        inner.live.insert((chat, message), text.to_string());
        inner.calls.push(TransportCall::Send {
            chat,
            message,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(message)
    }

    fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        let mut inner = self.lock();
        let slot = inner
            .live
            .get_mut(&(chat, message))
            .ok_or(TransportError::MessageNotFound {
                chat: chat.0,
                message: message.0,
            })?;
        *slot = text.to_string();
        inner.calls.push(TransportCall::Edit {
            chat,
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("message can't be deleted".into()));
        }
        let mut inner = self.lock();
        if inner.live.remove(&(chat, message)).is_none() {
            return Err(TransportError::MessageNotFound {
                chat: chat.0,
                message: message.0,
            });
        }
        inner.calls.push(TransportCall::Delete { chat, message });
        Ok(())
    }

    fn answer_callback(
        &self,
        chat: ChatId,
        message: Option<MessageId>,
    ) -> Result<(), TransportError> {
        self.lock().calls.push(TransportCall::Answer { chat, message });
        Ok(())
    }
}
