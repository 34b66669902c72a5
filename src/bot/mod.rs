//! Update handlers: `/start`, `/show` and column button presses.

mod command;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

pub use command::Command;

use crate::config::BotConfig;
use crate::error::{BotError, MoveError};
use crate::game::{GameOutcome, Rules, COLS};
use crate::render::render;
use crate::store::{Conversation, GameStore};
use crate::transport::{ChatId, ChatTransport, InlineKeyboard, MessageId, Update, User};

const NOT_STARTED: &str = "Game not started. Use /start to begin a game.";
const ALREADY_OVER: &str = "Game over. Use /start to play again.";
const START_HINT: &str = "Start a new game with /start.";

/// Connect Four bot over any [`ChatTransport`].
///
/// Every update for a conversation runs while holding that conversation's
/// lock, so presses arriving together are applied one after the other.
pub struct Bot<T> {
    transport: T,
    store: Arc<GameStore>,
    rules: Rules,
    settings: BotConfig,
    keyboard: InlineKeyboard,
}

impl<T: ChatTransport> Bot<T> {
    pub fn new(transport: T, store: Arc<GameStore>, rules: Rules, settings: BotConfig) -> Self {
        Bot {
            transport,
            store,
            rules,
            settings,
            keyboard: InlineKeyboard::columns(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Route one update to its handler.
    pub fn handle(&self, update: &Update) -> Result<(), BotError> {
        match update {
            Update::Command { chat, text, .. } => {
                match Command::parse(text, self.settings.bot_name.as_deref()) {
                    Some(Command::Start) => self.start(*chat),
                    Some(Command::Show) => self.show(*chat),
                    Some(Command::Unknown(name)) => {
                        debug!(%chat, command = %name, "ignoring unknown command");
                        Ok(())
                    }
                    None => Ok(()),
                }
            }
            Update::Callback {
                chat,
                user,
                message,
                data,
            } => self.press(*chat, user, *message, data),
        }
    }

    #[instrument(skip(self))]
    fn start(&self, chat: ChatId) -> Result<(), BotError> {
        self.store.with_conversation(chat, |conversation| -> Result<(), BotError> {
            let game = *conversation.start_game(self.rules);
            info!("game started");
            let id = self
                .transport
                .send_message(chat, &render(&game), Some(&self.keyboard))?;
            conversation.last_message = Some(id);
            Ok(())
        })
    }

    #[instrument(skip(self))]
    fn show(&self, chat: ChatId) -> Result<(), BotError> {
        let shown = self
            .store
            .try_with_conversation(chat, |conversation| -> Result<bool, BotError> {
                if conversation.game.is_none() {
                    return Ok(false);
                }

                self.clear_previous(chat, conversation);
                let Some(game) = conversation.game.as_mut() else {
                    return Ok(false);
                };
                game.toggle_board_visible();
                debug!(visible = game.board_visible(), "toggled board");

                let id = self
                    .transport
                    .send_message(chat, &render(game), Some(&self.keyboard))?;
                conversation.last_message = Some(id);
                Ok(true)
            })
            .transpose()?
            .unwrap_or(false);

        if !shown {
            self.transport.send_message(chat, START_HINT, None)?;
        }
        Ok(())
    }

    #[instrument(skip(self, user), fields(user = %user.display_name()))]
    fn press(
        &self,
        chat: ChatId,
        user: &User,
        message: Option<MessageId>,
        data: &str,
    ) -> Result<(), BotError> {
        self.transport.answer_callback(chat, message)?;

        let handled = self
            .store
            .try_with_conversation(chat, |conversation| {
                self.play(conversation, chat, user, message, data)
            })
            .transpose()?
            .unwrap_or(false);

        if !handled {
            self.notify(chat, message, NOT_STARTED)?;
        }
        Ok(())
    }

    /// Apply a press to a conversation. `Ok(false)` means there is no game.
    fn play(
        &self,
        conversation: &mut Conversation,
        chat: ChatId,
        user: &User,
        message: Option<MessageId>,
        data: &str,
    ) -> Result<bool, BotError> {
        let Some(game) = conversation.game else {
            return Ok(false);
        };
        if game.is_over() {
            self.notify(chat, message, ALREADY_OVER)?;
            return Ok(true);
        }

        let column: usize = data
            .parse()
            .map_err(|_| BotError::BadCallback(data.to_string()))?;
        if column >= COLS {
            warn!(column, "button outside the board");
            return Err(MoveError::InvalidColumn { column }.into());
        }

        self.clear_previous(chat, conversation);
        let Some(game) = conversation.game.as_mut() else {
            return Ok(false);
        };
        game.set_board_visible(false);
        let player = game.current_player();
        let announcement = format!(
            "{} played {} in column {}.\n\n",
            user.display_name(),
            player.glyph(),
            column + 1
        );

        let (text, keyboard) = match game.drop_piece(column) {
            Ok(()) => match game.outcome() {
                None => {
                    debug!(column, player = player.name(), "piece dropped");
                    (announcement + &render(game), Some(&self.keyboard))
                }
                Some(outcome) => {
                    game.set_board_visible(true);
                    let verdict = match outcome {
                        GameOutcome::Winner(winner) => {
                            format!("{} {} wins!", winner.glyph(), user.display_name())
                        }
                        GameOutcome::Draw => "It's a draw!".to_string(),
                    };
                    info!(column, ?outcome, "game over");
                    (
                        format!(
                            "{announcement}{}\nGame over. {verdict}\n{START_HINT}",
                            render(game)
                        ),
                        None,
                    )
                }
            },
            Err(MoveError::ColumnFull { .. }) => {
                debug!(column, "column full");
                (
                    format!(
                        "Column full. Try a different one.\n{announcement}{}",
                        render(game)
                    ),
                    Some(&self.keyboard),
                )
            }
            Err(err) => return Err(err.into()),
        };

        let id = self.transport.send_message(chat, &text, keyboard)?;
        conversation.last_message = Some(id);
        Ok(true)
    }

    /// Best-effort removal of the previous board message.
    fn clear_previous(&self, chat: ChatId, conversation: &mut Conversation) {
        if !self.settings.delete_previous_message {
            return;
        }
        if let Some(previous) = conversation.last_message.take() {
            if let Err(err) = self.transport.delete_message(chat, previous) {
                warn!(message = %previous, error = %err, "failed to delete message");
            }
        }
    }

    /// Replace the pressed message's text, or post a new one when the press
    /// didn't say which message it came from.
    fn notify(&self, chat: ChatId, message: Option<MessageId>, text: &str) -> Result<(), BotError> {
        match message {
            Some(message) => self.transport.edit_message_text(chat, message, text)?,
            None => {
                self.transport.send_message(chat, text, None)?;
            }
        }
        Ok(())
    }
}
