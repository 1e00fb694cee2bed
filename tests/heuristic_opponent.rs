//! Decision-list behaviour of the heuristic opponent at full ability.

use tictactoe_rl::{
    heuristic::{HeuristicOpponent, HeuristicRule},
    tictactoe::{Action, BoardState, Mark},
};

fn perfect(mark: Mark) -> HeuristicOpponent {
    HeuristicOpponent::new(mark, 1.0).with_seed(11)
}

#[test]
fn test_reply_to_center_opening_is_a_corner() {
    let board = BoardState::new().apply_at(1, 1, Mark::X).unwrap();
    let (action, rule) = perfect(Mark::O).decide(&board).unwrap();

    assert_eq!(action, Action::new(0, 0).unwrap());
    assert_eq!(rule, Some(HeuristicRule::Corner));
}

#[test]
fn test_completes_own_row() {
    let board = BoardState::parse("XX-OO----").unwrap();
    let (action, rule) = perfect(Mark::X).decide(&board).unwrap();

    assert_eq!(action, Action::new(0, 2).unwrap());
    assert_eq!(rule, Some(HeuristicRule::Win));
}

#[test]
fn test_winning_beats_blocking() {
    // O can win on (1, 2) even though X threatens (0, 2)
    let board = BoardState::parse("XX-OO----").unwrap();
    assert_eq!(
        perfect(Mark::O).choose_move(&board).unwrap(),
        Action::new(1, 2).unwrap()
    );
}

#[test]
fn test_blocks_opponent_line() {
    let board = BoardState::parse("XX--O----").unwrap();
    let (action, rule) = perfect(Mark::O).decide(&board).unwrap();

    assert_eq!(action, Action::new(0, 2).unwrap());
    assert_eq!(rule, Some(HeuristicRule::BlockWin));
}

#[test]
fn test_zero_ability_still_plays_legal_moves() {
    let board = BoardState::parse("XOX-O-X--").unwrap();
    let mut opponent = HeuristicOpponent::new(Mark::O, 0.0).with_seed(3);
    for _ in 0..50 {
        let (action, rule) = opponent.decide(&board).unwrap();
        assert!(board.is_empty(action));
        assert_eq!(rule, None);
    }
}

#[test]
fn test_full_board_has_no_move() {
    let board = BoardState::parse("XOXOXOOXO").unwrap();
    assert!(perfect(Mark::X).choose_move(&board).is_err());
}
