//! Error types for the tictactoe-rl crate

use thiserror::Error;

/// Main error type for the tictactoe-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move at ({row}, {col}): {reason}")]
    IllegalMove {
        row: usize,
        col: usize,
        reason: String,
    },

    #[error("no legal actions available in state '{state}'")]
    NoLegalActions { state: String },

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unknown agent kind '{input}'. Expected one of: {expected}")]
    UnknownAgentKind { input: String, expected: String },

    #[error("incomplete transition: {message}")]
    IncompleteTransition { message: String },

    #[error("episode has already been played")]
    EpisodeAlreadyPlayed,

    #[error("failed to {operation}: {message}")]
    Persistence { operation: String, message: String },

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Whether this error came from restoring or storing persisted agent state.
    ///
    /// Callers use this to decide whether to fall back to a freshly
    /// constructed agent.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Persistence { .. } | Error::UnsupportedVersion { .. } | Error::Io { .. }
        )
    }

    /// Whether this error reports a rejected configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfiguration { .. } | Error::UnknownAgentKind { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
