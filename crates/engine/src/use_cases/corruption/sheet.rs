//! Sheet view composition. Read-only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use syb5e_domain::{ActorId, CorruptionView, FlagPaths};

use super::{bind_actor, CorruptionError};
use crate::entities::{CorruptionCapable, ModuleFlags};
use crate::infrastructure::ports::{ActorRepo, RepoError};

/// Data this module adds to an actor sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub corruption: CorruptionView,
    pub shadow: String,
    /// NPC sheets only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manner: Option<String>,
}

pub struct SheetDataComposer {
    actors: Arc<dyn ActorRepo>,
    flags: Arc<ModuleFlags>,
}

impl SheetDataComposer {
    pub fn new(actors: Arc<dyn ActorRepo>, flags: Arc<ModuleFlags>) -> Self {
        Self { actors, flags }
    }

    /// Project the actor's stored data. Issues exactly one read.
    pub async fn compose(&self, actor: &dyn CorruptionCapable) -> Result<SheetView, RepoError> {
        let flags = actor.module_flags().await?;
        let manner = actor.actor().kind.has_manner().then_some(flags.manner);
        Ok(SheetView {
            corruption: flags.corruption.view(),
            shadow: flags.shadow,
            manner,
        })
    }

    pub async fn compose_by_id(&self, actor_id: ActorId) -> Result<SheetView, CorruptionError> {
        let actor = bind_actor(self.actors.as_ref(), &self.flags, actor_id).await?;
        Ok(self.compose(&actor).await?)
    }

    /// Persisted locations for form field binding.
    pub fn flag_paths(&self) -> &FlagPaths {
        self.flags.paths()
    }
}
