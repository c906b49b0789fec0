//! Transformation error types.
//!
//! Every variant is a generation-time fault: the run stops and no output
//! class is produced.

use surfacegen_ast::AstError;
use thiserror::Error;

/// Errors that can occur while deriving a surface.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input class failed structural verification.
    #[error("Invalid input tree: {0}")]
    InvalidInput(AstError),

    /// An override rule could not pattern-match the method it targets.
    #[error("Override rule for '{method}' cannot match: {reason}")]
    UnmatchedOverride { method: String, reason: String },

    /// The assembled output class failed structural verification.
    #[error("Invalid output tree: {0}")]
    InvalidOutput(AstError),

    /// Policy configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The shutdown simulator met a construct it cannot execute.
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;
