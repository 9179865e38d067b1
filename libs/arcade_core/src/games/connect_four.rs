//! Connect four on a 6x7 grid with gravity.

use super::{BoardGame, Outcome, Piece, TurnGame};
use crate::emoji;

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;

/// Pieces in a row needed to win.
const RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disc {
    Red,
    Yellow,
}

impl Piece for Disc {
    const FIRST: Self = Self::Red;

    fn other(self) -> Self {
        match self {
            Self::Red => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Red => "\u{1F534}",
            Self::Yellow => "\u{1F7E1}",
        }
    }
}

const EMPTY_ICON: &str = "\u{26AB}";

/// The grid. Row 0 is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectFour {
    grid: [[Option<Disc>; COLUMNS]; ROWS],
    last: Option<(usize, usize)>,
}

impl ConnectFour {
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<Disc> {
        self.grid.get(row)?.get(column).copied().flatten()
    }

    /// The row a disc dropped into `column` would land in.
    #[must_use]
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= COLUMNS {
            return None;
        }

        (0..ROWS).rev().find(|&row| self.grid[row][column].is_none())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.grid[0].iter().all(Option::is_some)
    }

    /// Counts matching discs from `(row, column)` in one direction, excluding
    /// the start.
    fn run_length(&self, disc: Disc, (row, column): (usize, usize), (dr, dc): (isize, isize)) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row, column);
        loop {
            let (Some(next_r), Some(next_c)) = (r.checked_add_signed(dr), c.checked_add_signed(dc)) else {
                break;
            };

            if self.cell(next_r, next_c) != Some(disc) {
                break;
            }

            count += 1;
            (r, c) = (next_r, next_c);
        }

        count
    }

    /// Whether the disc at `pos` is part of four in a row.
    fn wins_at(&self, pos: (usize, usize)) -> Option<Disc> {
        const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        let disc = self.cell(pos.0, pos.1)?;
        AXES.into_iter()
            .any(|(dr, dc)| {
                1 + self.run_length(disc, pos, (dr, dc)) + self.run_length(disc, pos, (-dr, -dc)) >= RUN
            })
            .then_some(disc)
    }
}

impl TurnGame for ConnectFour {
    type Piece = Disc;
    type Move = usize;

    fn place(&mut self, disc: Disc, column: usize) -> bool {
        let Some(row) = self.landing_row(column) else {
            return false;
        };

        self.grid[row][column] = Some(disc);
        self.last = Some((row, column));
        true
    }

    fn determine_outcome(&self) -> Outcome<Disc> {
        // only the latest disc can have completed a line
        if let Some(disc) = self.last.and_then(|pos| self.wins_at(pos)) {
            return Outcome::Win(disc);
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }
}

impl BoardGame for ConnectFour {
    const MOVE_EMOJIS: &'static [&'static str] = &[
        emoji::DIGITS[0],
        emoji::DIGITS[1],
        emoji::DIGITS[2],
        emoji::DIGITS[3],
        emoji::DIGITS[4],
        emoji::DIGITS[5],
        emoji::DIGITS[6],
    ];

    fn parse_move(text: &str) -> Option<usize> {
        emoji::position(Self::MOVE_EMOJIS, text)
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(256);
        for row in &self.grid {
            for cell in row {
                out.push_str(cell.map_or(EMPTY_ICON, Disc::icon));
            }

            out.push('\n');
        }

        for digit in Self::MOVE_EMOJIS {
            out.push_str(digit);
        }

        out
    }
}
