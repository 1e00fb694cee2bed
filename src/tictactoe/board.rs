//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;
use crate::{Error, Result};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A mark a player places on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opposing mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A (row, column) coordinate identifying a cell to mark.
///
/// Constructed through [`Action::new`] or [`Action::from_index`], so a value
/// of this type always lies inside the 3×3 grid. Deserialization goes
/// through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub struct Action {
    row: usize,
    col: usize,
}

/// Unchecked wire form of [`Action`].
#[derive(Serialize, Deserialize)]
struct RawAction {
    row: usize,
    col: usize,
}

impl TryFrom<RawAction> for Action {
    type Error = Error;

    fn try_from(raw: RawAction) -> Result<Self> {
        Action::new(raw.row, raw.col)
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        RawAction {
            row: action.row,
            col: action.col,
        }
    }
}

impl Action {
    /// All nine actions in row-major enumeration order.
    pub const ALL: [Action; CELL_COUNT] = [
        Action { row: 0, col: 0 },
        Action { row: 0, col: 1 },
        Action { row: 0, col: 2 },
        Action { row: 1, col: 0 },
        Action { row: 1, col: 1 },
        Action { row: 1, col: 2 },
        Action { row: 2, col: 0 },
        Action { row: 2, col: 1 },
        Action { row: 2, col: 2 },
    ];

    /// Create an action, rejecting coordinates outside `[0,3)×[0,3)`.
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= 3 || col >= 3 {
            return Err(Error::IllegalMove {
                row,
                col,
                reason: "coordinates out of range (must be 0-2)".to_string(),
            });
        }
        Ok(Action { row, col })
    }

    /// Create an action from a row-major cell index (0-8).
    pub fn from_index(index: usize) -> Result<Self> {
        Self::new(index / 3, index % 3)
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major cell index (0-8)
    pub fn index(self) -> usize {
        self.row * 3 + self.col
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Terminal result of a game from one mark's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Reward value: win = +1, draw = 0, loss = -1.
    pub fn value(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.0,
            Outcome::Loss => -1.0,
        }
    }

    /// The same result seen from the other side of the board.
    pub fn negate(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

/// Immutable board snapshot.
///
/// This type implements `Copy` (9 bytes) and `Hash`, so it is used directly
/// as the key of every value and policy table. It serializes as its
/// 9-character key (e.g. `"XX-OO----"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BoardState {
    cells: [Cell; CELL_COUNT],
}

impl BoardState {
    /// Create an empty board
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Build a board from raw cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        BoardState { cells }
    }

    /// Parse a board from its key.
    ///
    /// Whitespace is ignored, `-` and `.` denote empty cells and marks are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 cells are given or any character is not
    /// a valid cell.
    pub fn parse(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength {
                expected: CELL_COUNT,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(BoardState { cells })
    }

    /// Get the canonical 9-character key for this state
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Get cell at an action's coordinates
    pub fn get(&self, action: Action) -> Cell {
        self.cells[action.index()]
    }

    /// Get cell by (row, col); callers pass in-range coordinates.
    pub fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * 3 + col]
    }

    /// Check if the cell targeted by an action is empty
    pub fn is_empty(&self, action: Action) -> bool {
        self.get(action) == Cell::Empty
    }

    /// All empty cells, in row-major order
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.is_empty(action))
            .collect()
    }

    /// Number of empty cells remaining
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    /// Count cells holding the given mark
    pub fn count(&self, mark: Mark) -> usize {
        let target = mark.to_cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// Place `mark` on the cell targeted by `action`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the cell is already occupied.
    #[must_use = "apply returns a new board state; self is unchanged"]
    pub fn apply(&self, action: Action, mark: Mark) -> Result<BoardState> {
        if !self.is_empty(action) {
            return Err(Error::IllegalMove {
                row: action.row(),
                col: action.col(),
                reason: format!("cell is already occupied in '{}'", self.encode()),
            });
        }

        let mut next = *self;
        next.cells[action.index()] = mark.to_cell();
        Ok(next)
    }

    /// Place `mark` at raw (row, col) coordinates, validating the range.
    #[must_use = "apply_at returns a new board state; self is unchanged"]
    pub fn apply_at(&self, row: usize, col: usize, mark: Mark) -> Result<BoardState> {
        self.apply(Action::new(row, col)?, mark)
    }

    /// True iff any of the 8 lines is fully `mark`
    pub fn check_win(&self, mark: Mark) -> bool {
        LineAnalyzer::has_won(&self.cells, mark)
    }

    /// True iff no empty cell remains and no mark has won
    pub fn check_draw(&self) -> bool {
        self.empty_count() == 0 && !self.check_win(Mark::X) && !self.check_win(Mark::O)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.check_win(Mark::X) || self.check_win(Mark::O) || self.empty_count() == 0
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Mark> {
        if self.check_win(Mark::X) {
            Some(Mark::X)
        } else if self.check_win(Mark::O) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Terminal result from `perspective`'s point of view; `None` while the
    /// game is still running.
    pub fn terminal_reward(&self, perspective: Mark) -> Option<Outcome> {
        match self.winner() {
            Some(winner) if winner == perspective => Some(Outcome::Win),
            Some(_) => Some(Outcome::Loss),
            None if self.empty_count() == 0 => Some(Outcome::Draw),
            None => None,
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BoardState> for String {
    fn from(state: BoardState) -> Self {
        state.encode()
    }
}

impl TryFrom<String> for BoardState {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        BoardState::parse(&value)
    }
}

impl std::str::FromStr for BoardState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BoardState::parse(s)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    0   1   2")?;
        for row in 0..3 {
            write!(f, "{row}  ")?;
            for col in 0..3 {
                write!(f, " {}  ", self.at(row, col).to_char())?;
            }
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
