//! Casting resolution.
//!
//! `resolve_cast` reads the owner's corruption and returns the update for the
//! host to persist. Two concurrent casts on one actor can both read the same
//! `temp` and the later write wins, losing one increment. `cast_and_apply`
//! closes that window by holding a per-actor lock across read, roll and
//! write.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use syb5e_domain::{ActorId, CastingCost, CorruptionCost, DocumentRef, DomainEvent, ItemId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{bind_actor, CastingFailure, CorruptionError};
use crate::entities::{CorruptionCapable, ModuleFlags, SpellCostCapable, SpellItem};
use crate::infrastructure::ports::{
    ActorRepo, AttributeUpdates, EventBusPort, FormulaRoller, ItemRepo,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastOptions {
    pub consume_corruption: bool,
}

/// Updates produced by one cast, shaped like the host's own usage updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageUpdates {
    pub actor_updates: AttributeUpdates,
    pub item_updates: AttributeUpdates,
    pub resource_updates: AttributeUpdates,
}

impl UsageUpdates {
    pub fn is_empty(&self) -> bool {
        self.actor_updates.is_empty()
            && self.item_updates.is_empty()
            && self.resource_updates.is_empty()
    }
}

/// What a resolved cast did, for logging and events.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedCast {
    actor_id: ActorId,
    cost: CastingCost,
    temp: u32,
}

/// One async mutex per actor. An entry lives only while some caller holds
/// or waits on it.
#[derive(Default)]
pub struct ActorLocks {
    locks: DashMap<ActorId, Arc<Mutex<()>>>,
}

impl ActorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, actor_id: ActorId) -> ActorGuard<'_> {
        let lock = self
            .locks
            .entry(actor_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        ActorGuard {
            guard: Some(lock.lock_owned().await),
            locks: self,
            actor_id,
        }
    }
}

/// Held lock for one actor. Dropping it removes the actor's entry when no
/// other caller references it.
pub struct ActorGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a ActorLocks,
    actor_id: ActorId,
}

impl Drop for ActorGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.actor_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub struct CastingResolver {
    actors: Arc<dyn ActorRepo>,
    items: Arc<dyn ItemRepo>,
    flags: Arc<ModuleFlags>,
    roller: Arc<dyn FormulaRoller>,
    events: Arc<dyn EventBusPort>,
    locks: ActorLocks,
}

impl CastingResolver {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        items: Arc<dyn ItemRepo>,
        flags: Arc<ModuleFlags>,
        roller: Arc<dyn FormulaRoller>,
        events: Arc<dyn EventBusPort>,
    ) -> Self {
        Self {
            actors,
            items,
            flags,
            roller,
            events,
            locks: ActorLocks::new(),
        }
    }

    /// Load an item with its favored flag.
    pub async fn load_item(&self, item_id: ItemId) -> Result<SpellItem, CorruptionError> {
        let item = self
            .items
            .get(item_id)
            .await?
            .ok_or(CorruptionError::ItemNotFound(item_id))?;
        Ok(SpellItem::load(item, &self.flags).await?)
    }

    /// Cost formula for an item, `None` for non-spells.
    pub async fn cost(
        &self,
        item_id: ItemId,
        level_override: Option<u32>,
    ) -> Result<Option<CorruptionCost>, CorruptionError> {
        Ok(self.load_item(item_id).await?.corruption_cost(level_override))
    }

    /// Roll the cast's cost and return the temp-corruption update for the
    /// host to persist. Nothing is written here.
    pub async fn resolve_cast(
        &self,
        item: &SpellItem,
        options: CastOptions,
    ) -> Result<UsageUpdates, CorruptionError> {
        Ok(self.resolve(item, options).await?.0)
    }

    /// Resolve and persist under the owner's lock. The returned updates have
    /// already been written.
    pub async fn cast_and_apply(
        &self,
        item: &SpellItem,
        options: CastOptions,
    ) -> Result<UsageUpdates, CorruptionError> {
        if !options.consume_corruption {
            return Ok(UsageUpdates::default());
        }
        let owner = item
            .item()
            .owner
            .ok_or(CastingFailure::NoOwner(item.item().id))?;

        let _guard = self.locks.lock(owner).await;
        let (updates, resolved) = self.resolve(item, options).await?;
        let Some(resolved) = resolved else {
            return Ok(updates);
        };

        self.flags
            .store()
            .set_attributes(DocumentRef::Actor(resolved.actor_id), updates.actor_updates.clone())
            .await?;
        self.events.publish(DomainEvent::CorruptionGained {
            actor_id: resolved.actor_id,
            item_id: item.item().id,
            formula: resolved.cost.formula.clone(),
            gained: resolved.cost.amount,
            temp: resolved.temp,
        });
        Ok(updates)
    }

    async fn resolve(
        &self,
        item: &SpellItem,
        options: CastOptions,
    ) -> Result<(UsageUpdates, Option<ResolvedCast>), CorruptionError> {
        let item_id = item.item().id;
        if !options.consume_corruption {
            tracing::debug!(item_id = %item_id, "Cast without corruption");
            return Ok((UsageUpdates::default(), None));
        }
        let Some(cost) = item.corruption_cost(None) else {
            tracing::debug!(item_id = %item_id, kind = ?item.item().kind, "Not a spell, no corruption");
            return Ok((UsageUpdates::default(), None));
        };
        let owner = item.item().owner.ok_or(CastingFailure::NoOwner(item_id))?;

        let formula = cost.formula();
        let gained = self.roll(&formula).await?;

        let actor = bind_actor(self.actors.as_ref(), &self.flags, owner).await?;
        let current = actor.corruption().await?;
        let temp = current.temp.saturating_add(gained);

        let mut actor_updates = BTreeMap::new();
        actor_updates.insert(self.flags.paths().corruption.temp.clone(), Value::from(temp));

        tracing::info!(
            actor_id = %owner,
            item_id = %item_id,
            formula = %formula,
            gained,
            temp,
            "Resolved spell corruption"
        );
        Ok((
            UsageUpdates {
                actor_updates,
                ..UsageUpdates::default()
            },
            Some(ResolvedCast {
                actor_id: owner,
                cost: CastingCost {
                    formula,
                    amount: gained,
                },
                temp,
            }),
        ))
    }

    async fn roll(&self, formula: &str) -> Result<u32, CastingFailure> {
        let total = self
            .roller
            .roll(formula)
            .await
            .map_err(|source| CastingFailure::Roll {
                formula: formula.to_string(),
                source,
            })?;
        u32::try_from(total).map_err(|_| CastingFailure::InvalidTotal {
            formula: formula.to_string(),
            total,
        })
    }
}
