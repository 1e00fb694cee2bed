//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Mark};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Order in which the heuristic opponent scans lines for threats:
/// row i then column i for each i, then the main diagonal, then the
/// anti-diagonal. The first line with a threat wins.
pub const THREAT_SCAN_ORDER: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 3, 6],
    [3, 4, 5],
    [1, 4, 7],
    [6, 7, 8],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a mark holds three in a row
    pub fn has_won(cells: &[Cell; 9], mark: Mark) -> bool {
        let target = mark.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// First completing cell found in [`THREAT_SCAN_ORDER`] for `mark`
    pub fn first_completing_cell(cells: &[Cell; 9], mark: Mark) -> Option<usize> {
        THREAT_SCAN_ORDER
            .iter()
            .find_map(|line| Self::completing_cell_in_line(cells, mark, line))
    }

    /// Find the cell that completes a line holding two of `mark` and one empty cell
    pub fn completing_cell_in_line(
        cells: &[Cell; 9],
        mark: Mark,
        line: &[usize; 3],
    ) -> Option<usize> {
        let target = mark.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None, // opponent mark in line
            }
        }

        if count == 2 { empty_pos } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_won_horizontal() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[1] = Cell::X;
        cells[2] = Cell::X;

        assert!(LineAnalyzer::has_won(&cells, Mark::X));
        assert!(!LineAnalyzer::has_won(&cells, Mark::O));
    }

    #[test]
    fn test_has_won_vertical() {
        let mut cells = [Cell::Empty; 9];
        cells[1] = Cell::O;
        cells[4] = Cell::O;
        cells[7] = Cell::O;

        assert!(LineAnalyzer::has_won(&cells, Mark::O));
    }

    #[test]
    fn test_completing_cell() {
        // X-X
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[2] = Cell::X;

        assert_eq!(LineAnalyzer::first_completing_cell(&cells, Mark::X), Some(1));
        assert_eq!(LineAnalyzer::first_completing_cell(&cells, Mark::O), None);
    }

    #[test]
    fn test_blocked_line_has_no_completing_cell() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[1] = Cell::X;
        cells[2] = Cell::O;

        assert_eq!(
            LineAnalyzer::completing_cell_in_line(&cells, Mark::X, &[0, 1, 2]),
            None
        );
    }

    #[test]
    fn test_threat_found_in_column() {
        // X--
        // XOO
        // ---
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[3] = Cell::X;
        cells[4] = Cell::O;
        cells[5] = Cell::O;
        assert_eq!(LineAnalyzer::first_completing_cell(&cells, Mark::X), Some(6));
        assert_eq!(LineAnalyzer::first_completing_cell(&cells, Mark::O), None);
    }
}
