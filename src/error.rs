use std::path::PathBuf;

/// Reasons a drop is rejected. The game state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range")]
    InvalidColumn { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("the game is already over")]
    GameOver,
}

/// Errors raised by a chat transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message {message} not found in chat {chat}")]
    MessageNotFound { chat: i64, message: i64 },

    #[error("transport rejected request: {0}")]
    Rejected(String),
}

/// Errors raised while parsing an inbound console line into an update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateParseError {
    #[error("expected '<chat> <name> <text>', got {0:?}")]
    Malformed(String),

    #[error("invalid chat id {0:?}")]
    ChatId(String),

    #[error("invalid message id {0:?}")]
    MessageId(String),

    #[error("unrecognised input {0:?} (expected a /command or 'press <data>')")]
    UnknownText(String),
}

/// Errors surfaced by the bot's update handlers.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("rejected move: {0}")]
    Move(#[from] MoveError),

    #[error("callback data {0:?} is not a column")]
    BadCallback(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
