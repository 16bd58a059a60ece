//! Error types raised by repository implementations.

use rules_core::CharacterId;
use thiserror::Error;

use super::patch::PatchError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("character repository lock was poisoned")]
    LockPoisoned,

    #[error("character {0} not found")]
    NotFound(CharacterId),

    #[error("failed to patch character {id}")]
    Patch {
        id: CharacterId,
        #[source]
        source: PatchError,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
