use std::collections::HashSet;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use super::{ChatId, ChatTransport, InlineKeyboard, MessageId, Update, User};
use crate::error::{TransportError, UpdateParseError};

/// Outbound event as written in JSON mode, one object per line.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ConsoleEvent<'a> {
    Send {
        chat: ChatId,
        message: MessageId,
        text: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        keyboard: Option<&'a InlineKeyboard>,
    },
    Edit {
        chat: ChatId,
        message: MessageId,
        text: &'a str,
    },
    Delete {
        chat: ChatId,
        message: MessageId,
    },
}

struct Inner<W> {
    out: W,
    next_id: i64,
    live: HashSet<(ChatId, MessageId)>,
}

/// Line-oriented transport for driving the bot from a terminal or a pipe.
///
/// Outbound messages are written to `out`, either as readable text blocks
/// or as JSON lines. Inbound lines are turned into updates by
/// [`parse_update`].
pub struct ConsoleTransport<W> {
    inner: Mutex<Inner<W>>,
    json: bool,
}

impl<W: Write> ConsoleTransport<W> {
    pub fn new(out: W, json: bool) -> Self {
        ConsoleTransport {
            inner: Mutex::new(Inner {
                out,
                next_id: 0,
                live: HashSet::new(),
            }),
            json,
        }
    }

    /// Give back the writer, e.g. to inspect a buffer
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn emit(&self, out: &mut W, event: &ConsoleEvent<'_>) -> Result<(), TransportError> {
        if self.json {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
        } else {
            match event {
                ConsoleEvent::Send {
                    chat,
                    message,
                    text,
                    keyboard,
                } => {
                    writeln!(out, "[chat {chat}] #{message}")?;
                    writeln!(out, "{text}")?;
                    if let Some(keyboard) = keyboard {
                        for row in &keyboard.rows {
                            let labels: Vec<String> =
                                row.iter().map(|b| format!("[{}]", b.label)).collect();
                            writeln!(out, "{}", labels.join(" "))?;
                        }
                    }
                }
                ConsoleEvent::Edit {
                    chat,
                    message,
                    text,
                } => {
                    writeln!(out, "[chat {chat}] #{message} edited")?;
                    writeln!(out, "{text}")?;
                }
                ConsoleEvent::Delete { chat, message } => {
                    writeln!(out, "[chat {chat}] #{message} deleted")?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> ChatTransport for ConsoleTransport<W> {
    fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageId, TransportError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let message = MessageId(inner.next_id);
        self.emit(
            &mut inner.out,
            &ConsoleEvent::Send {
                chat,
                message,
                text,
                keyboard,
            },
        )?;
        inner.live.insert((chat, message));
        Ok(message)
    }

    fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if !inner.live.contains(&(chat, message)) {
            return Err(TransportError::MessageNotFound {
                chat: chat.0,
                message: message.0,
            });
        }
        self.emit(
            &mut inner.out,
            &ConsoleEvent::Edit {
                chat,
                message,
                text,
            },
        )
    }

    fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if !inner.live.remove(&(chat, message)) {
            return Err(TransportError::MessageNotFound {
                chat: chat.0,
                message: message.0,
            });
        }
        self.emit(&mut inner.out, &ConsoleEvent::Delete { chat, message })
    }
}

/// Parse one console line into an update.
///
/// The format is `<chat> <name>[@username] <text>`, where `<text>` is a
/// `/command` or `press <data> [#<message>]`. Blank lines and lines starting
/// with `#` yield `Ok(None)`.
pub fn parse_update(line: &str) -> Result<Option<Update>, UpdateParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.splitn(3, char::is_whitespace);
    let (Some(chat), Some(name), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(UpdateParseError::Malformed(line.to_string()));
    };
    let chat = chat
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| UpdateParseError::ChatId(chat.to_string()))?;
    let user = match name.split_once('@') {
        Some((first, username)) if !username.is_empty() => {
            User::new(first, Some(username.to_string()))
        }
        _ => User::new(name.trim_end_matches('@'), None),
    };
    let text = text.trim();

    if text.starts_with('/') {
        return Ok(Some(Update::Command {
            chat,
            user,
            text: text.to_string(),
        }));
    }

    let mut words = text.split_whitespace();
    match (words.next(), words.next(), words.next(), words.next()) {
        (Some("press"), Some(data), message, None) => {
            let message = message
                .map(|m| {
                    m.strip_prefix('#')
                        .and_then(|id| id.parse::<i64>().ok())
                        .map(MessageId)
                        .ok_or_else(|| UpdateParseError::MessageId(m.to_string()))
                })
                .transpose()?;
            Ok(Some(Update::Callback {
                chat,
                user,
                message,
                data: data.to_string(),
            }))
        }
        _ => Err(UpdateParseError::UnknownText(text.to_string())),
    }
}
