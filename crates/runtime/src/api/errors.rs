//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the rules, repositories, result sinks and
//! configuration so clients can bubble them up with consistent context.
use rules_core::{CharacterId, CombatError, ErrorSeverity, RulesError};
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::repository::RepositoryError;

use super::sink::SinkError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("result sink rejected the record")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("dice roller lock was poisoned")]
    RollerPoisoned,

    #[error("runtime requires a {0} to be configured before building")]
    MissingComponent(&'static str),
}

impl RuntimeError {
    /// Severity of the underlying failure.
    ///
    /// Combat rejections keep their own classification; everything else is
    /// either a bad reference or an internal fault.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Combat(err) => err.severity(),
            RuntimeError::CharacterNotFound(_) | RuntimeError::Config(_) => {
                ErrorSeverity::Validation
            }
            RuntimeError::Repository(RepositoryError::NotFound(_))
            | RuntimeError::Repository(RepositoryError::Patch { .. }) => ErrorSeverity::Validation,
            RuntimeError::Repository(_)
            | RuntimeError::Sink(_)
            | RuntimeError::RollerPoisoned
            | RuntimeError::MissingComponent(_) => ErrorSeverity::Internal,
        }
    }
}
