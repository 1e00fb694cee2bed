//! Human player reading moves from a terminal

use std::io::{self, BufRead, Write};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{Action, BoardState},
};

/// A [`Policy`] that asks a person for each move.
///
/// Input is `row col` (or `row,col`), zero-based. Malformed input and
/// occupied cells are re-prompted.
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
}

impl HumanPlayer<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(Error::Io {
                operation: "read move from input".to_string(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            });
        }
        Ok(line)
    }

    /// Print `text` to the player's terminal.
    pub fn write(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Ask a yes/no question on the player's terminal.
    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        ask_yes_no(&mut self.input, &mut self.output, question)
    }
}

/// Parse `"r c"` or `"r,c"` into an in-range action.
pub fn parse_move(text: &str) -> Option<Action> {
    let mut parts = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Action::new(row, col).ok()
}

impl<R: BufRead, W: Write> Policy for HumanPlayer<R, W> {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        if state.legal_actions().is_empty() {
            return Err(Error::NoLegalActions {
                state: state.encode(),
            });
        }
        self.write(&format!("\n{state}\n"))?;
        loop {
            self.write("Your move (row col): ")?;
            let line = self.read_line()?;
            match parse_move(&line) {
                Some(action) if state.is_empty(action) => return Ok(action),
                Some(action) => self.write(&format!("Cell {action} is already taken.\n"))?,
                None => self.write("Please enter a row and a column between 0 and 2.\n")?,
            }
        }
    }

    fn name(&self) -> &str {
        "Human"
    }

    fn retries_illegal_moves(&self) -> bool {
        true
    }
}

/// Ask a yes/no question until the answer is one of y, yes, n, no.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    loop {
        write!(output, "{question} [y/n]: ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Invalid input. Please choose 'y' or 'n'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_move_formats() {
        assert_eq!(parse_move("1 2\n"), Some(Action::new(1, 2).unwrap()));
        assert_eq!(parse_move("0,0"), Some(Action::new(0, 0).unwrap()));
        assert_eq!(parse_move(" 2 , 1 "), Some(Action::new(2, 1).unwrap()));
        assert_eq!(parse_move("3 0"), None);
        assert_eq!(parse_move("a b"), None);
        assert_eq!(parse_move("1"), None);
        assert_eq!(parse_move("1 1 1"), None);
    }

    #[test]
    fn test_human_reprompts_until_valid() {
        let board = BoardState::parse("X--------").unwrap();
        let input = Cursor::new("nonsense\n0 0\n1 1\n");
        let mut output = Vec::new();
        let action = HumanPlayer::new(input, &mut output)
            .select_action(&board)
            .unwrap();

        assert_eq!(action, Action::new(1, 1).unwrap());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("between 0 and 2"));
        assert!(text.contains("already taken"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut human = HumanPlayer::new(Cursor::new(""), Vec::new());
        assert!(human.select_action(&BoardState::new()).is_err());
    }

    #[test]
    fn test_ask_yes_no() {
        let mut input = Cursor::new("maybe\nYES\n");
        let mut output = Vec::new();
        assert!(ask_yes_no(&mut input, &mut output, "Again?").unwrap());
        assert!(String::from_utf8(output).unwrap().contains("Invalid input"));
    }
}
