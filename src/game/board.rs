use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Run length that wins the game.
const CONNECT: usize = 4;

/// Axis directions as (row, col) steps: horizontal, vertical, `\` and `/`.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Blue,
}

impl Cell {
    /// Glyph used when the board is shown in chat
    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Empty => "\u{26aa}\u{fe0f}",
            Cell::Red => "\u{1f534}",
            Cell::Blue => "\u{1f535}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; COLS]> {
        self.cells.iter()
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Number of pieces stacked in a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| self.cells[row][col] != Cell::Empty)
            .count()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }

        // Scan from the bottom row upward for the first free slot
        for row in (0..ROWS).rev() {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = cell;
                return Ok(row);
            }
        }

        Err(MoveError::ColumnFull { column: col })
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Check if the piece at (row, col) completes a line of four.
    ///
    /// Only lines through that cell are examined, so this must run right
    /// after every placement: a new line can only be completed by the most
    /// recent move.
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        AXES.iter().any(|&(dr, dc)| {
            let mut count = 1;
            for sense in [1, -1] {
                let mut r = row as isize;
                let mut c = col as isize;
                loop {
                    r += sense * dr;
                    c += sense * dc;
                    if !self.holds(r, c, cell) {
                        break;
                    }
                    count += 1;
                    if count >= CONNECT {
                        return true;
                    }
                }
            }
            false
        })
    }

    fn holds(&self, row: isize, col: isize, cell: Cell) -> bool {
        (0..ROWS as isize).contains(&row)
            && (0..COLS as isize).contains(&col)
            && self.cells[row as usize][col as usize] == cell
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let row = board.drop_piece(3, Cell::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);

        let row = board.drop_piece(3, Cell::Blue).unwrap();
        assert_eq!(row, 4);
        assert_eq!(board.get(4, 3), Cell::Blue);
        assert_eq!(board.column_height(3), 2);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();

        for _ in 0..ROWS {
            board.drop_piece(0, Cell::Red).unwrap();
        }

        assert!(board.is_column_full(0));
        assert_eq!(
            board.drop_piece(0, Cell::Blue),
            Err(MoveError::ColumnFull { column: 0 })
        );
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7, Cell::Red),
            Err(MoveError::InvalidColumn { column: 7 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_horizontal_win_from_middle() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::Red).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();
        // Filling the gap joins both halves of the run
        let row = board.drop_piece(2, Cell::Red).unwrap();
        assert!(board.check_win(row, 2));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Cell::Blue).unwrap();
        }
        assert!(board.check_win(2, 3));
    }

    #[test]
    fn test_diagonal_up_win_from_middle() {
        let mut board = Board::new();
        // Red on (5,0), (3,2), (2,3); the gap at (4,1) is filled last
        for (col, cell) in [
            (0, Cell::Red),
            (1, Cell::Blue),
            (2, Cell::Blue),
            (2, Cell::Blue),
            (2, Cell::Red),
            (3, Cell::Blue),
            (3, Cell::Blue),
            (3, Cell::Blue),
            (3, Cell::Red),
        ] {
            let row = board.drop_piece(col, cell).unwrap();
            assert!(!board.check_win(row, col));
        }

        let row = board.drop_piece(1, Cell::Red).unwrap();
        assert_eq!(row, 4);
        assert!(board.check_win(row, 1));
    }

    #[test]
    fn test_diagonal_down_win_from_middle() {
        let mut board = Board::new();
        // Red on (2,3), (4,5), (5,6); the gap at (3,4) is filled last
        for (col, cell) in [
            (6, Cell::Red),
            (5, Cell::Blue),
            (5, Cell::Red),
            (4, Cell::Blue),
            (4, Cell::Blue),
            (3, Cell::Blue),
            (3, Cell::Blue),
            (3, Cell::Blue),
            (3, Cell::Red),
        ] {
            let row = board.drop_piece(col, cell).unwrap();
            assert!(!board.check_win(row, col));
        }

        let row = board.drop_piece(4, Cell::Red).unwrap();
        assert_eq!(row, 3);
        assert!(board.check_win(row, 4));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(!board.check_win(5, 1));
        assert!(!board.check_win(5, 2));
    }

    #[test]
    fn test_run_broken_by_opponent_is_not_a_win() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::Red).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();
        board.drop_piece(2, Cell::Blue).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();
        let row = board.drop_piece(4, Cell::Red).unwrap();
        assert!(!board.check_win(row, 4));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let board = Board::new();
        assert!(!board.check_win(5, 0));
    }
}
