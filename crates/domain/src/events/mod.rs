//! Domain Events
//!
//! Coarse-grained events representing significant changes to an actor's
//! corruption data. Published best-effort by the engine after the change has
//! been handed to the host store.

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, ItemId};
use crate::value_objects::CorruptionState;

/// Domain event for significant state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    /// Defaults were installed (or forcibly reinstalled) on an actor.
    #[serde(rename_all = "camelCase")]
    ActorInitialized {
        actor_id: ActorId,
        overwrite: bool,
        max_corruption: u32,
    },
    /// Corruption fields were edited directly.
    #[serde(rename_all = "camelCase")]
    CorruptionChanged {
        actor_id: ActorId,
        corruption: CorruptionState,
    },
    /// A spell cast added temporary corruption.
    #[serde(rename_all = "camelCase")]
    CorruptionGained {
        actor_id: ActorId,
        item_id: ItemId,
        formula: String,
        gained: u32,
        temp: u32,
    },
}

impl DomainEvent {
    /// Stable event name, used as the envelope kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ActorInitialized { .. } => "corruption.actor_initialized",
            Self::CorruptionChanged { .. } => "corruption.changed",
            Self::CorruptionGained { .. } => "corruption.gained",
        }
    }

    pub fn actor_id(&self) -> ActorId {
        match self {
            Self::ActorInitialized { actor_id, .. }
            | Self::CorruptionChanged { actor_id, .. }
            | Self::CorruptionGained { actor_id, .. } => *actor_id,
        }
    }
}
