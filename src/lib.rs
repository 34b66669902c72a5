//! # Chat Connect Four
//!
//! Connect Four played inside a chat conversation. Players press one of
//! seven inline buttons to drop a piece; the bot answers with the rendered
//! board (or a hidden-board status line) after every move.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, game state with win detection
//! - [`render`] — Chat text rendering of a game
//! - [`store`] — Per-conversation game registry with per-chat locking
//! - [`transport`] — Messaging seam: updates, keyboards, console transport
//! - [`bot`] — `/start`, `/show` and button handlers
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod bot;
pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod store;
pub mod transport;
