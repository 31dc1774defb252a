use crate::model::Mark;
use serde::Serialize;

/// One board cell. Empty cells encode as `""` on the wire, occupied cells as
/// the owning symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The mark occupying this cell, if any.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// The eight winning lines in scan order (rows before columns before
/// diagonals). The first completed line decides the reported winner when a
/// move completes more than one.
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

/// 3x3 grid in row-major order: indices 0..=2 are the top row, 6..=8 the
/// bottom row. Serializes as a flat array of nine cell strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board([Cell; 9]);

impl Board {
    /// Cell at `index`, or `None` when the index is off the board.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    /// Place `mark` at `index`. Callers validate the index first.
    pub(crate) fn set(&mut self, index: usize, mark: Mark) {
        self.0[index] = mark.into();
    }

    /// Mark owning the first completed line, if any.
    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Some(mark) = self.0[a].mark() {
                if self.0[b] == self.0[a] && self.0[c] == self.0[a] {
                    return Some(mark);
                }
            }
        }
        None
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|cell| !cell.is_empty())
    }
}
