use super::board::COLS;
use super::{Board, Player};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Rule switches that vary between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Rules {
    /// End the game as a draw once the board fills up without a winner.
    /// When off, a full board simply rejects every further move.
    pub detect_draws: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    last_move_column: Option<usize>,
    board_visible: bool,
    rules: Rules,
}

impl GameState {
    /// Create initial game state: empty board, Red to move, board hidden
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::Red, // Red starts
            outcome: None,
            last_move_column: None,
            board_visible: false,
            rules,
        }
    }

    /// Get current player. After a winning move this is the winner.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    pub fn last_move_column(&self) -> Option<usize> {
        self.last_move_column
    }

    pub fn board_visible(&self) -> bool {
        self.board_visible
    }

    /// Flip board visibility. Allowed after the game has ended too.
    pub fn toggle_board_visible(&mut self) {
        self.board_visible = !self.board_visible;
    }

    pub fn set_board_visible(&mut self, visible: bool) {
        self.board_visible = visible;
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's piece into `column`.
    ///
    /// On error the state is left untouched. On success the caller still
    /// has to check [`GameState::is_over`].
    pub fn drop_piece(&mut self, column: usize) -> Result<(), MoveError> {
        if column >= COLS {
            return Err(MoveError::InvalidColumn { column });
        }
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let row = self
            .board
            .drop_piece(column, self.current_player.to_cell())?;
        self.last_move_column = Some(column);

        // Winner keeps the turn
        if self.board.check_win(row, column) {
            self.outcome = Some(GameOutcome::Winner(self.current_player));
        } else if self.rules.detect_draws && self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        } else {
            self.current_player = self.current_player.other();
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
