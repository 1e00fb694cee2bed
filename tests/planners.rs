//! Value Iteration and Policy Iteration agree wherever the optimum is unique.

use tictactoe_rl::{
    planning::{PlannerConfig, PolicyIterationAgent, ValueIterationAgent},
    ports::{Planner, Policy},
    tictactoe::{Action, BoardState, Mark, StateSpace},
};

/// Near-ties closer than this are treated as ties.
const MARGIN: f64 = 1e-3;

fn config() -> PlannerConfig {
    config_over(StateSpace::TurnConsistent)
}

fn config_over(state_space: StateSpace) -> PlannerConfig {
    PlannerConfig {
        state_space,
        ..PlannerConfig::default()
    }
}

/// One-step lookahead under the planners' model, read from a trained VI agent.
fn action_value(agent: &ValueIterationAgent, state: &BoardState, action: Action) -> f64 {
    let config = agent.config();
    let next = state.apply(action, config.mark).unwrap();
    let reward = next
        .terminal_reward(config.mark)
        .map(|outcome| outcome.value())
        .unwrap_or(config.step_penalty);
    reward + config.discount * agent.value(&next).unwrap_or(0.0)
}

/// The maximizing action when it beats every other action by at least [`MARGIN`].
fn unique_maximizer(agent: &ValueIterationAgent, state: &BoardState) -> Option<Action> {
    let mut scored: Vec<(Action, f64)> = state
        .legal_actions()
        .into_iter()
        .map(|action| (action, action_value(agent, state, action)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    match scored.as_slice() {
        [(best, _)] => Some(*best),
        [(best, first), (_, second), ..] if first - second >= MARGIN => Some(*best),
        _ => None,
    }
}

fn assert_policies_agree(state_space: StateSpace, min_compared: usize) {
    let mut vi = ValueIterationAgent::new(config_over(state_space)).with_seed(1);
    let mut pi = PolicyIterationAgent::new(config_over(state_space)).with_seed(2);
    vi.train().unwrap();
    pi.train().unwrap();

    let mut compared = 0;
    for state in state_space.generate() {
        if state.is_terminal() {
            continue;
        }
        let Some(best) = unique_maximizer(&vi, &state) else {
            continue;
        };
        assert_eq!(vi.policy_action(&state), Some(best), "VI on {}", state.encode());
        assert_eq!(pi.policy_action(&state), Some(best), "PI on {}", state.encode());
        compared += 1;
    }
    assert!(
        compared > min_compared,
        "only {compared} states had a unique maximizer in {state_space:?}"
    );
}

#[test]
fn test_policy_equivalence_on_unique_maximizers() {
    assert_policies_agree(StateSpace::TurnConsistent, 100);
}

#[test]
fn test_policy_equivalence_on_exhaustive_space() {
    assert_policies_agree(StateSpace::Exhaustive, 1000);
}

#[test]
fn test_values_agree_within_tolerance() {
    let mut vi = ValueIterationAgent::new(config());
    let mut pi = PolicyIterationAgent::new(config()).with_seed(3);
    vi.train().unwrap();
    pi.train().unwrap();

    for state in StateSpace::TurnConsistent.generate() {
        if let (Some(v), Some(p)) = (vi.value(&state), pi.value(&state)) {
            assert!((v - p).abs() < 1e-3, "{}: {v} vs {p}", state.encode());
        }
    }
}

#[test]
fn test_planners_take_immediate_win_as_x() {
    let config = PlannerConfig {
        mark: Mark::X,
        ..config()
    };
    let mut vi = ValueIterationAgent::new(config);
    let mut pi = PolicyIterationAgent::new(config).with_seed(5);
    vi.train().unwrap();
    pi.train().unwrap();

    let state = BoardState::parse("XX-OO----").unwrap();
    let win = Action::new(0, 2).unwrap();
    assert_eq!(vi.select_action(&state).unwrap(), win);
    assert_eq!(pi.select_action(&state).unwrap(), win);
}

#[test]
fn test_untrained_planner_reports_untrained() {
    let vi = ValueIterationAgent::new(config());
    assert!(!vi.is_trained());
    assert_eq!(vi.policy_action(&BoardState::new()), None);
}
