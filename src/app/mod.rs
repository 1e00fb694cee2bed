//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for agents.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  app: App (container), AgentConfig       │
//! │        │ owns                            │
//! │        ▼                                 │
//! │  adapters: MsgPackRepository,            │
//! │            InMemoryRepository (testing)  │
//! │        │ implements                      │
//! │        ▼                                 │
//! │  ports: AgentRepository, Learner, ...    │
//! │        │ used by                         │
//! │        ▼                                 │
//! │  domain: learners, planners, board       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use tictactoe_rl::app::{AgentConfig, AgentKind, App};
//! use std::path::Path;
//!
//! let app = App::new();
//! let agent = app.load_or_create(
//!     AgentKind::Sarsa,
//!     Path::new("sarsa_agent.msgpack"),
//!     false,
//!     AgentConfig::new().with_seed(42),
//! )?;
//! app.save_agent(&agent, Path::new("sarsa_agent.msgpack"))?;
//! # Ok::<(), tictactoe_rl::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, AgentKind};
pub use container::{App, AppBuilder};
