//! Tic-tac-toe on a 3x3 board.

use super::{BoardGame, Outcome, Piece, TurnGame};
use crate::emoji;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Piece for Mark {
    const FIRST: Self = Self::X;

    fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::O => "o",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::X => "\u{274C}",
            Self::O => "\u{2B55}",
        }
    }
}

/// The cells of every row, column and diagonal.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The board, indexed row by row from the top left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Mark>; 9],
}

impl TicTacToe {
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl TurnGame for TicTacToe {
    type Piece = Mark;
    type Move = usize;

    fn place(&mut self, piece: Mark, index: usize) -> bool {
        match self.cells.get_mut(index) {
            Some(cell @ None) => {
                *cell = Some(piece);
                true
            },
            _ => false,
        }
    }

    fn determine_outcome(&self) -> Outcome<Mark> {
        for [a, b, c] in LINES {
            if let Some(mark) = self.cells[a]
                && self.cells[b] == Some(mark)
                && self.cells[c] == Some(mark)
            {
                return Outcome::Win(mark);
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }
}

impl BoardGame for TicTacToe {
    const MOVE_EMOJIS: &'static [&'static str] = &emoji::DIGITS;

    fn parse_move(text: &str) -> Option<usize> {
        emoji::position(Self::MOVE_EMOJIS, text)
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(128);
        for (index, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(mark) => out.push_str(mark.icon()),
                None => out.push_str(emoji::DIGITS[index]),
            }

            if index % 3 == 2 {
                out.push('\n');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a board from `0` (empty), `1` (X) and `2` (O).
    fn board(values: [u8; 9]) -> TicTacToe {
        TicTacToe {
            cells: values.map(|v| match v {
                1 => Some(Mark::X),
                2 => Some(Mark::O),
                _ => None,
            }),
        }
    }

    #[test]
    fn top_row_wins() {
        let b = board([1, 1, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(b.determine_outcome(), Outcome::Win(Mark::X));
        assert_eq!(b.determine_outcome(), b.determine_outcome(), "must be idempotent");
    }

    #[test]
    fn every_line_wins() {
        for line in LINES {
            let mut values = [0; 9];
            for cell in line {
                values[cell] = 2;
            }

            assert_eq!(
                board(values).determine_outcome(),
                Outcome::Win(Mark::O),
                "line {line:?} must win"
            );
        }
    }

    #[test]
    fn full_board_with_line_is_win() {
        let b = board([1, 1, 1, 2, 2, 1, 2, 1, 2]);
        assert_eq!(b.determine_outcome(), Outcome::Win(Mark::X));
    }

    #[test]
    fn full_board_draw() {
        let b = board([1, 2, 1, 1, 2, 2, 2, 1, 1]);
        assert_eq!(b.determine_outcome(), Outcome::Draw);
    }

    #[test]
    fn partial_board_in_progress() {
        let b = board([1, 2, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(b.determine_outcome(), Outcome::InProgress);
    }

    #[test]
    fn place_rejects_occupied_and_out_of_range() {
        let mut b = TicTacToe::default();
        assert!(b.place(Mark::X, 4));
        assert!(!b.place(Mark::O, 4));
        assert!(!b.place(Mark::O, 9));
        assert_eq!(b.cell(4), Some(Mark::X));
    }

    #[test]
    fn render_shows_marks_and_free_cells() {
        let b = board([1, 0, 0, 0, 2, 0, 0, 0, 0]);
        let text = b.render();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with(Mark::X.icon()));
        assert!(text.contains(Mark::O.icon()));
        assert!(text.contains(emoji::DIGITS[8]));
    }
}
