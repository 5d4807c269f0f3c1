//! Corruption state reads and direct edits.

use std::sync::Arc;

use syb5e_domain::{ActorId, CorruptionPatch, CorruptionState, DomainEvent};

use super::{bind_actor, CorruptionError};
use crate::entities::{CorruptionCapable, ModuleFlags};
use crate::infrastructure::ports::{ActorRepo, EventBusPort, RepoError};

pub struct CorruptionStateOps {
    actors: Arc<dyn ActorRepo>,
    flags: Arc<ModuleFlags>,
    events: Arc<dyn EventBusPort>,
}

impl CorruptionStateOps {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        flags: Arc<ModuleFlags>,
        events: Arc<dyn EventBusPort>,
    ) -> Self {
        Self {
            actors,
            flags,
            events,
        }
    }

    /// Stored corruption. Missing data reads as `{0, 0, 0}`.
    pub async fn read(&self, actor: &dyn CorruptionCapable) -> Result<CorruptionState, RepoError> {
        actor.corruption().await
    }

    /// Merge the given fields into stored corruption; omitted fields keep
    /// their stored value. Returns the resulting state.
    pub async fn write(
        &self,
        actor: &dyn CorruptionCapable,
        patch: CorruptionPatch,
    ) -> Result<CorruptionState, RepoError> {
        let current = actor.corruption().await?;
        if patch.is_empty() {
            return Ok(current);
        }
        actor.set_corruption(&patch).await?;

        let updated = current.apply(&patch);
        let actor_id = actor.actor().id;
        tracing::debug!(
            actor_id = %actor_id,
            temp = updated.temp,
            permanent = updated.permanent,
            max = updated.max,
            "Corruption updated"
        );
        self.events.publish(DomainEvent::CorruptionChanged {
            actor_id,
            corruption: updated,
        });
        Ok(updated)
    }

    pub async fn read_by_id(&self, actor_id: ActorId) -> Result<CorruptionState, CorruptionError> {
        let actor = bind_actor(self.actors.as_ref(), &self.flags, actor_id).await?;
        Ok(self.read(&actor).await?)
    }

    pub async fn write_by_id(
        &self,
        actor_id: ActorId,
        patch: CorruptionPatch,
    ) -> Result<CorruptionState, CorruptionError> {
        let actor = bind_actor(self.actors.as_ref(), &self.flags, actor_id).await?;
        Ok(self.write(&actor, patch).await?)
    }
}
