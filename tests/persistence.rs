//! Saving and restoring agents through the MessagePack repository.

use tempfile::TempDir;
use tictactoe_rl::{
    adapters::MsgPackRepository,
    app::{AgentConfig, AgentKind, App},
    persistence::TrainedAgent,
    pipeline::{TrainingConfig, TrainingPipeline},
    ports::{Learner, Planner, Policy},
    tictactoe::{BoardState, Mark, StateSpace},
};

fn app() -> App {
    App::for_testing()
        .with_repository(MsgPackRepository::new())
        .build()
}

/// Positions with O to move where the trained agent has exactly one greedy action.
fn probe_states(agent: &TrainedAgent) -> Vec<BoardState> {
    let TrainedAgent::QLearning(agent) = agent else {
        panic!("expected a Q-learning agent");
    };
    StateSpace::TurnConsistent
        .generate()
        .into_iter()
        .filter(|state| !state.is_terminal())
        .filter(|state| state.count(Mark::X) == state.count(Mark::O) + 1)
        .filter(|state| agent.greedy_actions(state).len() == 1)
        .collect()
}

#[test]
fn test_q_learning_round_trip_preserves_greedy_actions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q_agent.msgpack");
    let app = app();

    let mut agent = app
        .create_agent(AgentKind::QLearning, AgentConfig::new().with_seed(21))
        .unwrap();
    TrainingPipeline::new(TrainingConfig {
        episodes: 2000,
        seed: Some(21),
        ..TrainingConfig::default()
    })
    .teach(&mut agent, 0.9)
    .unwrap();
    app.save_agent(&agent, &path).unwrap();

    let mut restored = app.load_agent(&path).unwrap();
    assert_eq!(restored.kind(), AgentKind::QLearning);
    assert_eq!(restored.reward_trace(), agent.reward_trace());
    assert_eq!(restored.exploration_rate(), agent.exploration_rate());

    agent.set_exploration_rate(0.0);
    restored.set_exploration_rate(0.0);
    let probes = probe_states(&agent);
    assert!(!probes.is_empty());
    for state in &probes {
        assert_eq!(
            agent.select_action(state).unwrap(),
            restored.select_action(state).unwrap(),
            "diverged on {}",
            state.encode()
        );
    }
}

#[test]
fn test_sarsa_round_trip_keeps_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sarsa_agent.msgpack");
    let app = app();

    let mut agent = app
        .create_agent(AgentKind::Sarsa, AgentConfig::new().with_seed(4))
        .unwrap();
    TrainingPipeline::new(TrainingConfig {
        episodes: 300,
        seed: Some(4),
        ..TrainingConfig::default()
    })
    .teach(&mut agent, 0.9)
    .unwrap();
    app.save_agent(&agent, &path).unwrap();

    let restored = app.load_agent(&path).unwrap();
    match (&agent, &restored) {
        (TrainedAgent::Sarsa(before), TrainedAgent::Sarsa(after)) => {
            assert_eq!(before.export_state(), after.export_state());
        }
        _ => panic!("expected two SARSA agents"),
    }
}

#[test]
fn test_planner_round_trip_keeps_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v_agent.msgpack");
    let app = app();

    let config = AgentConfig::new()
        .with_state_space(StateSpace::TurnConsistent)
        .with_seed(8);
    let mut agent = app.create_agent(AgentKind::ValueIteration, config).unwrap();
    app.save_agent(&agent, &path).unwrap();
    let mut restored = app.load_agent(&path).unwrap();

    let probe = BoardState::parse("XX-OO----").unwrap();
    assert_eq!(
        agent.select_action(&probe).unwrap(),
        restored.select_action(&probe).unwrap()
    );
    assert!(restored.as_planner_mut().is_some_and(|planner| planner.is_trained()));
}

#[test]
fn test_load_with_wrong_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agent.msgpack");
    let app = app();

    let agent = app
        .create_agent(AgentKind::QLearning, AgentConfig::new())
        .unwrap();
    app.save_agent(&agent, &path).unwrap();

    let err = app
        .load_or_create(AgentKind::Sarsa, &path, true, AgentConfig::new())
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_missing_file_is_a_persistence_error() {
    let dir = TempDir::new().unwrap();
    let err = app()
        .load_agent(&dir.path().join("absent.msgpack"))
        .unwrap_err();
    assert!(err.is_persistence());
}
