//! Core Connect Four game logic: board, players, and the mutable game state
//! that a chat conversation plays against.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState, Rules};
