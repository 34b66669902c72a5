//! Per-conversation game registry.
//!
//! The store is an explicit object handed to the bot rather than global
//! state. Each conversation gets its own lock so that updates for one chat
//! are applied one at a time while other chats proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::game::{GameState, Rules};
use crate::transport::{ChatId, MessageId};

/// Everything the bot remembers about one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    /// Current game, if `/start` has been used
    pub game: Option<GameState>,
    /// Last board message the bot posted, removed before the next one
    pub last_message: Option<MessageId>,
}

impl Conversation {
    /// Replace any running game with a fresh one
    pub fn start_game(&mut self, rules: Rules) -> &mut GameState {
        self.game.insert(GameState::with_rules(rules))
    }
}

#[derive(Debug, Default)]
pub struct GameStore {
    conversations: Mutex<HashMap<ChatId, Arc<Mutex<Conversation>>>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the conversation, creating an empty
    /// entry on first use. The conversation stays locked for the whole call.
    pub fn with_conversation<R>(&self, chat: ChatId, f: impl FnOnce(&mut Conversation) -> R) -> R {
        let entry = self.entry(chat);
        let mut conversation = lock(&entry);
        f(&mut conversation)
    }

    /// Like [`GameStore::with_conversation`], but only for conversations that
    /// already exist. Returns `None` without creating an entry otherwise.
    pub fn try_with_conversation<R>(
        &self,
        chat: ChatId,
        f: impl FnOnce(&mut Conversation) -> R,
    ) -> Option<R> {
        let entry = lock(&self.conversations).get(&chat).cloned()?;
        let mut conversation = lock(&entry);
        Some(f(&mut conversation))
    }

    /// Start a new game in `chat`, discarding the previous one
    pub fn start_game(&self, chat: ChatId, rules: Rules) -> GameState {
        self.with_conversation(chat, |conversation| {
            let replaced = conversation.game.is_some();
            let game = *conversation.start_game(rules);
            info!(%chat, replaced, "started new game");
            game
        })
    }

    /// Snapshot of the game in `chat`
    pub fn game(&self, chat: ChatId) -> Option<GameState> {
        let entry = lock(&self.conversations).get(&chat).cloned()?;
        let conversation = lock(&entry);
        conversation.game
    }

    /// Forget a conversation entirely
    pub fn remove(&self, chat: ChatId) -> Option<Conversation> {
        let entry = lock(&self.conversations).remove(&chat)?;
        let conversation = lock(&entry).clone();
        Some(conversation)
    }

    /// Number of conversations seen so far
    pub fn len(&self) -> usize {
        lock(&self.conversations).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, chat: ChatId) -> Arc<Mutex<Conversation>> {
        let mut conversations = lock(&self.conversations);
        Arc::clone(conversations.entry(chat).or_insert_with(|| {
            debug!(%chat, "new conversation");
            Arc::default()
        }))
    }
}

/// A poisoned lock still holds a consistent value: game moves either apply
/// fully or not at all.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Player, COLS, ROWS};
    use std::thread;

    #[test]
    fn test_missing_conversation_has_no_game() {
        let store = GameStore::new();
        assert_eq!(store.game(ChatId(1)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookup_does_not_create_entries() {
        let store = GameStore::new();
        assert_eq!(store.try_with_conversation(ChatId(4), |_| ()), None);
        assert!(store.is_empty());

        store.start_game(ChatId(4), Rules::default());
        let started = store.try_with_conversation(ChatId(4), |c| c.game.is_some());
        assert_eq!(started, Some(true));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_start_replaces_previous_game() {
        let store = GameStore::new();
        let chat = ChatId(1);
        store.start_game(chat, Rules::default());
        store.with_conversation(chat, |c| {
            c.game.as_mut().unwrap().drop_piece(0).unwrap();
        });
        assert_eq!(store.game(chat).unwrap().current_player(), Player::Blue);

        let fresh = store.start_game(chat, Rules::default());
        assert_eq!(fresh, GameState::new());
        assert_eq!(store.game(chat), Some(GameState::new()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_conversations_are_independent() {
        let store = GameStore::new();
        store.start_game(ChatId(1), Rules::default());
        store.start_game(ChatId(2), Rules::default());
        store.with_conversation(ChatId(1), |c| {
            c.game.as_mut().unwrap().drop_piece(3).unwrap();
        });

        assert_eq!(store.game(ChatId(2)), Some(GameState::new()));
        assert_eq!(store.remove(ChatId(1)).unwrap().game.unwrap().last_move_column(), Some(3));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_moves_are_serialized() {
        let store = GameStore::new();
        let chat = ChatId(9);
        store.start_game(chat, Rules::default());

        // Three pieces per column in non-adjacent columns can never win
        thread::scope(|s| {
            for col in [0, 2, 4, 6] {
                let store = &store;
                s.spawn(move || {
                    for _ in 0..3 {
                        store.with_conversation(chat, |c| {
                            let _ = c.game.as_mut().unwrap().drop_piece(col);
                        });
                    }
                });
            }
        });

        let game = store.game(chat).unwrap();
        let pieces: usize = (0..COLS).map(|col| game.board().column_height(col)).sum();
        assert_eq!(pieces, 12);

        // No lost or interleaved updates: colours still alternate
        let red = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| (row, col)))
            .filter(|&(row, col)| game.board().get(row, col) == Cell::Red)
            .count();
        assert_eq!(red, 6);
        assert_eq!(game.current_player(), Player::Red);
    }
}
