//! Corruption operation errors.

use crate::infrastructure::ports::{RepoError, RollError};
use syb5e_domain::{ActorId, ItemId};

/// A cast that produced no update. Nothing was written.
#[derive(Debug, thiserror::Error)]
pub enum CastingFailure {
    #[error("Could not roll '{formula}': {source}")]
    Roll {
        formula: String,
        #[source]
        source: RollError,
    },

    #[error("Roll of '{formula}' gave {total}, not a corruption amount")]
    InvalidTotal { formula: String, total: i64 },

    #[error("Spell {0} has no owning actor")]
    NoOwner(ItemId),
}

/// Errors that can occur during corruption operations.
#[derive(Debug, thiserror::Error)]
pub enum CorruptionError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Casting failed: {0}")]
    Casting(#[from] CastingFailure),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
