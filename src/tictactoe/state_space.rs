//! State space enumeration for the offline planners

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::{BoardState, Mark};

/// Which boards the planners enumerate.
///
/// Both variants start from the empty board and never expand terminal
/// states, so no generated board has two winning marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSpace {
    /// Fill every empty cell with either mark, ignoring turn order.
    ///
    /// Produces a superset of the reachable states, including boards that
    /// alternating play can never produce (e.g. four X and no O).
    #[default]
    Exhaustive,
    /// Only boards whose mark counts differ by at most one, i.e. the boards
    /// reachable by alternating play when either side may open.
    TurnConsistent,
}

impl StateSpace {
    /// Enumerate the states in breadth-first order (by number of marks).
    ///
    /// The order is deterministic so that sweeps and tie-breaking in the
    /// planners are reproducible.
    pub fn generate(self) -> Vec<BoardState> {
        let root = BoardState::new();
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut states = Vec::new();

        while let Some(state) = queue.pop_front() {
            states.push(state);
            if state.is_terminal() {
                continue;
            }

            for action in state.legal_actions() {
                for mark in [Mark::X, Mark::O] {
                    // legal_actions only yields empty cells
                    let Ok(next) = state.apply(action, mark) else {
                        continue;
                    };
                    if self.admits(&next) && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        states
    }

    fn admits(self, state: &BoardState) -> bool {
        match self {
            StateSpace::Exhaustive => true,
            StateSpace::TurnConsistent => state.count(Mark::X).abs_diff(state.count(Mark::O)) <= 1,
        }
    }
}

impl std::str::FromStr for StateSpace {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" | "all" => Ok(StateSpace::Exhaustive),
            "turn-consistent" | "turn_consistent" | "reachable" => Ok(StateSpace::TurnConsistent),
            other => Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "unknown state space '{other}' (expected 'exhaustive' or 'turn-consistent')"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive_starts_with_empty_board_and_has_no_double_winners() {
        let states = StateSpace::Exhaustive.generate();
        assert_eq!(states[0], BoardState::new());
        assert!(
            states
                .iter()
                .all(|s| !(s.check_win(Mark::X) && s.check_win(Mark::O)))
        );
        // both one-mark boards for every cell
        assert_eq!(states.iter().filter(|s| s.empty_count() == 8).count(), 18);
    }

    #[test]
    fn test_exhaustive_contains_turn_inconsistent_boards() {
        let states: HashSet<_> = StateSpace::Exhaustive.generate().into_iter().collect();
        let four_x = BoardState::parse("XX-XX----").unwrap();
        assert!(states.contains(&four_x));
    }

    #[test]
    fn test_turn_consistent_is_a_subset() {
        let exhaustive: HashSet<_> = StateSpace::Exhaustive.generate().into_iter().collect();
        let consistent = StateSpace::TurnConsistent.generate();
        assert!(consistent.len() < exhaustive.len());
        assert!(consistent.iter().all(|s| exhaustive.contains(s)));
        assert!(
            consistent
                .iter()
                .all(|s| s.count(Mark::X).abs_diff(s.count(Mark::O)) <= 1)
        );
    }

    #[test]
    fn test_terminal_states_are_not_expanded() {
        let states = StateSpace::TurnConsistent.generate();
        let won = BoardState::parse("XXXOO----").unwrap();
        assert!(states.contains(&won));
        let extended = BoardState::parse("XXXOOO---").unwrap();
        assert!(!states.contains(&extended));
    }

    #[test]
    fn test_parse_state_space() {
        assert_eq!("all".parse::<StateSpace>().unwrap(), StateSpace::Exhaustive);
        assert_eq!(
            "turn-consistent".parse::<StateSpace>().unwrap(),
            StateSpace::TurnConsistent
        );
        assert!("bogus".parse::<StateSpace>().is_err());
    }
}
