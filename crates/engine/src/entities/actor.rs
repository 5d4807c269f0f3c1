//! Actor capability adapter.

use std::sync::Arc;

use async_trait::async_trait;
use syb5e_domain::{Actor, ActorFlags, CorruptionPatch, CorruptionState};

use super::flags::ModuleFlags;
use crate::infrastructure::ports::RepoError;

/// An actor that carries corruption.
#[async_trait]
pub trait CorruptionCapable: Send + Sync {
    fn actor(&self) -> &Actor;

    /// Whole decoded flag region.
    async fn module_flags(&self) -> Result<ActorFlags, RepoError>;

    /// Stored corruption, zero when never initialized.
    async fn corruption(&self) -> Result<CorruptionState, RepoError> {
        Ok(self.module_flags().await?.corruption)
    }

    async fn set_corruption(&self, patch: &CorruptionPatch) -> Result<(), RepoError>;

    async fn shadow(&self) -> Result<String, RepoError> {
        Ok(self.module_flags().await?.shadow)
    }

    /// `None` unless the actor's sheet carries a manner field.
    async fn manner(&self) -> Result<Option<String>, RepoError> {
        if !self.actor().kind.has_manner() {
            return Ok(None);
        }
        Ok(Some(self.module_flags().await?.manner))
    }
}

/// Host actor wrapped with flag access.
pub struct CorruptionActor {
    actor: Actor,
    flags: Arc<ModuleFlags>,
}

impl CorruptionActor {
    pub fn new(actor: Actor, flags: Arc<ModuleFlags>) -> Self {
        Self { actor, flags }
    }

    pub fn into_inner(self) -> Actor {
        self.actor
    }
}

#[async_trait]
impl CorruptionCapable for CorruptionActor {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    async fn module_flags(&self) -> Result<ActorFlags, RepoError> {
        self.flags.actor_flags(self.actor.id).await
    }

    async fn set_corruption(&self, patch: &CorruptionPatch) -> Result<(), RepoError> {
        self.flags.set_corruption(self.actor.id, patch).await
    }
}
