//! Core domain types for tic-tac-toe.

/// Mark owned by one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// X moves first.
    X,
    /// O moves second.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Nobody has played here yet.
    Empty,
    /// Cell claimed by a mark; never changes afterwards.
    Occupied(Mark),
}

/// 3x3 board in row-major order, indices 0..=8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Returns the cell at `idx`, or `None` out of bounds.
    pub fn get(&self, idx: usize) -> Option<Cell> {
        self.cells.get(idx).copied()
    }

    /// Checks whether the cell at `idx` is empty.
    pub fn is_empty(&self, idx: usize) -> bool {
        matches!(self.get(idx), Some(Cell::Empty))
    }

    /// Checks whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Places a mark. Caller validates bounds and occupancy.
    pub(super) fn set(&mut self, idx: usize, mark: Mark) {
        self.cells[idx] = Cell::Occupied(mark);
    }

    /// Returns the mark holding a full line, if any.
    ///
    /// The eight triples are evaluated rows, then columns, then
    /// diagonals, so the scan order is deterministic.
    pub fn winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8], // rows
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8], // columns
            [0, 4, 8],
            [2, 4, 6], // diagonals
        ];

        for [a, b, c] in LINES {
            if let Cell::Occupied(mark) = self.cells[a]
                && self.cells[b] == Cell::Occupied(mark)
                && self.cells[c] == Cell::Occupied(mark)
            {
                return Some(mark);
            }
        }

        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of a match.
///
/// `WonBy`, `Draw`, and `Abandoned` are sinks: once reached, no
/// further mutation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Moves are being accepted.
    InProgress,
    /// A mark completed a line.
    WonBy(Mark),
    /// All nine cells filled with no winner.
    Draw,
    /// A participant forfeited, disconnected, or timed out.
    Abandoned,
}

impl MatchStatus {
    /// Checks whether the status is a terminal sink.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchStatus::InProgress)
    }
}
