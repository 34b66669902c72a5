//! Chat text rendering of a game.

use crate::game::{GameState, COLS};

/// Render the game as chat text.
///
/// A hidden board only announces whose turn it is. A shown board prints a
/// column header and one line per row, followed by the turn line while the
/// game is still running.
pub fn render(state: &GameState) -> String {
    let player = state.current_player().glyph();

    if !state.board_visible() {
        return format!(
            "It's Player {player}'s turn!\nBoard is hidden. Use /show to toggle visibility."
        );
    }

    let rows: Vec<String> = state
        .board()
        .rows()
        .map(|row| {
            let cells: Vec<&str> = row.iter().map(|cell| cell.glyph()).collect();
            format!("|{}|\n", cells.join(" "))
        })
        .collect();
    let mut text = format!("|{}|\n{}", column_header(), rows.concat());

    if !state.is_over() {
        text.push_str(&format!(
            "\nIt's Player {player}'s turn!\nBoard is shown. Use /show to toggle visibility."
        ));
    }

    text
}

/// Keycap digits 1..=7, one per column.
fn column_header() -> String {
    (1..=COLS)
        .map(|n| format!("{n}\u{fe0f}\u{20e3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ROWS;

    const RED: &str = "\u{1f534}";
    const BLUE: &str = "\u{1f535}";
    const EMPTY: &str = "\u{26aa}\u{fe0f}";

    #[test]
    fn test_hidden_board() {
        let state = GameState::new();
        assert_eq!(
            render(&state),
            format!("It's Player {RED}'s turn!\nBoard is hidden. Use /show to toggle visibility.")
        );
    }

    #[test]
    fn test_shown_board_layout() {
        let mut state = GameState::new();
        state.drop_piece(0).unwrap();
        state.drop_piece(6).unwrap();
        state.set_board_visible(true);

        let text = render(&state);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "|1\u{fe0f}\u{20e3} 2\u{fe0f}\u{20e3} 3\u{fe0f}\u{20e3} 4\u{fe0f}\u{20e3} \
             5\u{fe0f}\u{20e3} 6\u{fe0f}\u{20e3} 7\u{fe0f}\u{20e3}|"
        );
        let empty_row = format!("|{}|", [EMPTY; COLS].join(" "));
        for line in &lines[1..ROWS] {
            assert_eq!(*line, empty_row);
        }
        assert_eq!(
            lines[ROWS],
            format!("|{RED} {EMPTY} {EMPTY} {EMPTY} {EMPTY} {EMPTY} {BLUE}|")
        );
        assert_eq!(lines[ROWS + 1], "");
        assert_eq!(lines[ROWS + 2], format!("It's Player {RED}'s turn!"));
        assert_eq!(
            lines[ROWS + 3],
            "Board is shown. Use /show to toggle visibility."
        );
    }

    #[test]
    fn test_finished_game_has_no_turn_line() {
        let mut state = GameState::new();
        for col in [3, 4, 3, 4, 3, 4, 3] {
            state.drop_piece(col).unwrap();
        }
        state.set_board_visible(true);

        let text = render(&state);
        assert_eq!(text.lines().count(), ROWS + 1);
        assert!(text.ends_with("|\n"));
        assert!(!text.contains("turn"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut state = GameState::new();
        state.drop_piece(2).unwrap();
        state.toggle_board_visible();
        let before = state;

        assert_eq!(render(&state), render(&state));
        assert_eq!(state, before);
    }
}
