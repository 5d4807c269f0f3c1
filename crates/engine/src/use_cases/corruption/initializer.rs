//! Actor initialization.
//!
//! An actor moves from uninitialized to initialized exactly once, when this
//! module's sheet is first assigned to it. `reinitialize` can force fresh
//! defaults afterwards.
//!
//! Defaults never overwrite data: values already in a pending update win over
//! values stored on the actor, which win over computed defaults. The
//! `initialized` marker itself is always set.
//!
//! The check in [`Initializer::initialize_if_needed`] is not atomic with the
//! host's later write. Two near-simultaneous first bindings can both merge
//! defaults; both merges are identical.

use std::sync::Arc;

use serde_json::{json, Value};
use syb5e_domain::common::{fill_defaults, get_path, remove_path, set_path};
use syb5e_domain::{keys, Actor, ActorFlags, ActorId, DocumentRef, DomainEvent};

use super::{bind_actor, CorruptionError};
use crate::entities::{CorruptionCapable, ModuleFlags};
use crate::infrastructure::ports::{ActorRepo, EventBusPort, RepoError};

pub struct Initializer {
    actors: Arc<dyn ActorRepo>,
    flags: Arc<ModuleFlags>,
    events: Arc<dyn EventBusPort>,
}

impl Initializer {
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

    /// Corruption threshold: `max(cha + prof * 2, 2)`.
    pub fn compute_max_corruption(actor: &Actor) -> u32 {
        actor.corruption_threshold()
    }

    pub fn compute_defaults(actor: &Actor) -> ActorFlags {
        ActorFlags::defaults(Self::compute_max_corruption(actor))
    }

    /// True iff the `initialized` marker is absent or false.
    pub async fn needs_initialization(
        &self,
        actor: &dyn CorruptionCapable,
    ) -> Result<bool, RepoError> {
        Ok(!actor.module_flags().await?.initialized)
    }

    /// Merge defaults into `pending_update` (a nested host update record) if
    /// the actor has never been initialized. Returns whether anything was
    /// merged.
    pub async fn initialize_if_needed(
        &self,
        actor: &dyn CorruptionCapable,
        pending_update: &mut Value,
    ) -> Result<bool, RepoError> {
        let actor_id = actor.actor().id;
        let stored = self.flags.region(DocumentRef::Actor(actor_id)).await?;
        let root = &self.flags.paths().root;

        let initialized = ActorFlags::decode(stored.as_ref(), root).value.initialized;
        tracing::debug!(actor_id = %actor_id, needs_init = !initialized, "Checked initialization");
        if initialized {
            return Ok(false);
        }

        let defaults = Self::compute_defaults(actor.actor());
        let base = self.merged_region(actor_id, stored.as_ref(), &defaults);

        if !pending_update.is_object() {
            *pending_update = json!({});
        }
        let mut region = remove_path(pending_update, root).unwrap_or(Value::Null);
        fill_defaults(&mut region, &base);
        set_path(pending_update, root, region);

        tracing::info!(
            actor_id = %actor_id,
            actor_name = %actor.actor().name,
            max_corruption = defaults.corruption.max,
            "Merged corruption defaults into pending update"
        );
        self.events.publish(DomainEvent::ActorInitialized {
            actor_id,
            overwrite: false,
            max_corruption: defaults.corruption.max,
        });
        Ok(true)
    }

    /// Rewrite the actor's whole region.
    ///
    /// With `overwrite`, the region becomes fresh defaults. Without it,
    /// stored values are kept and defaults fill the gaps. Either way the
    /// result is written with one `replace_namespace` call, which is atomic
    /// on stores that support it.
    pub async fn reinitialize(
        &self,
        actor: &dyn CorruptionCapable,
        overwrite: bool,
    ) -> Result<ActorFlags, RepoError> {
        let actor_id = actor.actor().id;
        let doc = DocumentRef::Actor(actor_id);
        let root = self.flags.paths().root.clone();
        let defaults = Self::compute_defaults(actor.actor());

        let region = if overwrite {
            defaults.to_value()
        } else {
            let stored = self.flags.region(doc).await?;
            self.merged_region(actor_id, stored.as_ref(), &defaults)
        };

        self.flags
            .store()
            .replace_namespace(doc, &root, region.clone())
            .await?;

        let result = ActorFlags::decode(Some(&region), &root).value;
        tracing::info!(
            actor_id = %actor_id,
            overwrite,
            temp = result.corruption.temp,
            permanent = result.corruption.permanent,
            max = result.corruption.max,
            "Reinitialized actor"
        );
        self.events.publish(DomainEvent::ActorInitialized {
            actor_id,
            overwrite,
            max_corruption: result.corruption.max,
        });
        Ok(result)
    }

    pub async fn reinitialize_by_id(
        &self,
        actor_id: ActorId,
        overwrite: bool,
    ) -> Result<ActorFlags, CorruptionError> {
        let actor = bind_actor(self.actors.as_ref(), &self.flags, actor_id).await?;
        Ok(self.reinitialize(&actor, overwrite).await?)
    }

    /// Stored region (malformed fields dropped) with defaults filled in and
    /// the marker set.
    fn merged_region(&self, actor_id: ActorId, stored: Option<&Value>, defaults: &ActorFlags) -> Value {
        let sanitized = ActorFlags::sanitized_region(stored, &self.flags.paths().root);
        for issue in &sanitized.issues {
            tracing::warn!(actor_id = %actor_id, error = %issue, "Replacing malformed flag data with default");
        }
        let mut region = sanitized.value;
        fill_defaults(&mut region, &defaults.to_value());
        set_path(&mut region, keys::INITIALIZED, Value::Bool(true));
        if get_path(&region, keys::SCHEMA_VERSION).and_then(Value::as_u64).unwrap_or(0) == 0 {
            set_path(&mut region, keys::SCHEMA_VERSION, json!(defaults.schema_version));
        }
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CorruptionActor;
    use crate::infrastructure::ports::{MockActorRepo, MockEventBusPort, MockFlagStore};
    use syb5e_domain::{ActorKind, CorruptionState, FlagScope};

    const ROOT: &str = "flags.symbaroum5ecore";

    fn test_actor() -> Actor {
        // cha +3, prof +2: threshold 7
        Actor::new("Ylva", ActorKind::Character).with_abilities(3, 2)
    }

    fn setup(store: MockFlagStore, events: MockEventBusPort) -> (Initializer, Arc<ModuleFlags>) {
        let flags = Arc::new(ModuleFlags::new(Arc::new(store), FlagScope::default()));
        let init = Initializer::new(Arc::new(MockActorRepo::new()), flags.clone(), Arc::new(events));
        (init, flags)
    }

    fn store_returning(region: Option<Value>) -> MockFlagStore {
        let mut store = MockFlagStore::new();
        store
            .expect_get_attribute()
            .withf(|_, path| path == ROOT)
            .returning(move |_, _| Ok(region.clone()));
        store
    }

    fn quiet_events() -> MockEventBusPort {
        let mut events = MockEventBusPort::new();
        events.expect_publish().return_const(());
        events
    }

    #[test]
    fn max_corruption_has_floor_of_two() {
        let weak = Actor::new("Weak", ActorKind::Npc).with_abilities(-5, 0);
        assert_eq!(Initializer::compute_max_corruption(&weak), 2);
        assert_eq!(Initializer::compute_max_corruption(&test_actor()), 7);
    }

    #[test]
    fn max_corruption_is_monotonic() {
        for cha in -5..=5 {
            for prof in 0..=6 {
                let here = Initializer::compute_max_corruption(
                    &Actor::new("A", ActorKind::Character).with_abilities(cha, prof),
                );
                let more_cha = Initializer::compute_max_corruption(
                    &Actor::new("A", ActorKind::Character).with_abilities(cha + 1, prof),
                );
                let more_prof = Initializer::compute_max_corruption(
                    &Actor::new("A", ActorKind::Character).with_abilities(cha, prof + 1),
                );
                assert!(here >= 2);
                assert!(more_cha >= here);
                assert!(more_prof >= here);
            }
        }
    }

    #[test]
    fn defaults_shape() {
        let defaults = Initializer::compute_defaults(&test_actor());
        assert!(defaults.initialized);
        assert_eq!(defaults.corruption, CorruptionState::new(0, 0, 7));
        assert_eq!(defaults.manner, "");
        assert_eq!(defaults.shadow, "");
    }

    #[tokio::test]
    async fn needs_initialization_tracks_marker() {
        let (init, flags) = setup(store_returning(None), MockEventBusPort::new());
        let actor = CorruptionActor::new(test_actor(), flags);
        assert!(init.needs_initialization(&actor).await.unwrap());

        let (init, flags) = setup(
            store_returning(Some(json!({"initialized": false}))),
            MockEventBusPort::new(),
        );
        let actor = CorruptionActor::new(test_actor(), flags);
        assert!(init.needs_initialization(&actor).await.unwrap());

        let (init, flags) = setup(
            store_returning(Some(json!({"initialized": true}))),
            MockEventBusPort::new(),
        );
        let actor = CorruptionActor::new(test_actor(), flags);
        assert!(!init.needs_initialization(&actor).await.unwrap());
    }

    #[tokio::test]
    async fn pending_values_win_over_defaults() {
        let (init, flags) = setup(store_returning(None), quiet_events());
        let actor = CorruptionActor::new(test_actor(), flags);

        let mut pending = json!({
            "flags": {
                "core": {"sheetClass": "dnd5e.Syb5eActorSheetCharacter"},
                "symbaroum5ecore": {"shadow": "silver", "corruption": {"temp": 4}}
            }
        });
        assert!(init.initialize_if_needed(&actor, &mut pending).await.unwrap());

        let region = &pending["flags"]["symbaroum5ecore"];
        assert_eq!(region["initialized"], json!(true));
        assert_eq!(region["shadow"], json!("silver"));
        assert_eq!(region["manner"], json!(""));
        assert_eq!(region["corruption"], json!({"temp": 4, "permanent": 0, "max": 7}));
        assert_eq!(
            pending["flags"]["core"]["sheetClass"],
            json!("dnd5e.Syb5eActorSheetCharacter")
        );
    }

    #[tokio::test]
    async fn stored_values_win_over_defaults() {
        let (init, flags) = setup(
            store_returning(Some(json!({"shadow": "ash", "corruption": {"permanent": 3}}))),
            quiet_events(),
        );
        let actor = CorruptionActor::new(test_actor(), flags);

        let mut pending = json!({"flags": {"core": {"sheetClass": "x"}}});
        init.initialize_if_needed(&actor, &mut pending).await.unwrap();

        let region = &pending["flags"]["symbaroum5ecore"];
        assert_eq!(region["shadow"], json!("ash"));
        assert_eq!(region["corruption"]["permanent"], json!(3));
        assert_eq!(region["corruption"]["max"], json!(7));
        assert_eq!(region["schemaVersion"], json!(1));
    }

    #[tokio::test]
    async fn initialized_actor_is_left_alone() {
        let mut events = MockEventBusPort::new();
        events.expect_publish().never();
        let (init, flags) = setup(
            store_returning(Some(json!({"initialized": true, "corruption": {"temp": 9}}))),
            events,
        );
        let actor = CorruptionActor::new(test_actor(), flags);

        let mut pending = json!({"flags": {"core": {"sheetClass": "x"}}});
        let before = pending.clone();
        assert!(!init.initialize_if_needed(&actor, &mut pending).await.unwrap());
        assert_eq!(pending, before);
    }

    #[tokio::test]
    async fn reinitialize_without_overwrite_keeps_values() {
        let mut store = store_returning(Some(json!({
            "initialized": true,
            "corruption": {"temp": 5, "permanent": 2, "max": 3},
            "shadow": "dusk"
        })));
        store
            .expect_replace_namespace()
            .withf(|_, root, value| {
                root == ROOT
                    && value["corruption"] == json!({"temp": 5, "permanent": 2, "max": 3})
                    && value["shadow"] == json!("dusk")
                    && value["manner"] == json!("")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let (init, flags) = setup(store, quiet_events());
        let actor = CorruptionActor::new(test_actor(), flags);

        let result = init.reinitialize(&actor, false).await.unwrap();
        assert_eq!(result.corruption, CorruptionState::new(5, 2, 3));
        assert_eq!(result.shadow, "dusk");
    }

    #[tokio::test]
    async fn reinitialize_with_overwrite_resets_in_one_write() {
        let mut store = MockFlagStore::new();
        store.expect_get_attribute().never();
        store.expect_clear_namespace().never();
        store.expect_set_attributes().never();
        store
            .expect_replace_namespace()
            .withf(|_, root, value| {
                root == ROOT && *value == ActorFlags::defaults(7).to_value()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut events = MockEventBusPort::new();
        events
            .expect_publish()
            .withf(|e| {
                matches!(
                    e,
                    DomainEvent::ActorInitialized { overwrite: true, max_corruption: 7, .. }
                )
            })
            .times(1)
            .return_const(());

        let (init, flags) = setup(store, events);
        let actor = CorruptionActor::new(test_actor(), flags);

        let result = init.reinitialize(&actor, true).await.unwrap();
        assert_eq!(result, ActorFlags::defaults(7));
    }

    #[tokio::test]
    async fn reinitialize_surfaces_store_failure() {
        let mut store = MockFlagStore::new();
        store
            .expect_replace_namespace()
            .returning(|_, _, _| Err(RepoError::store("replace_namespace", "offline")));
        let mut events = MockEventBusPort::new();
        events.expect_publish().never();
        let (init, flags) = setup(store, events);
        let actor = CorruptionActor::new(test_actor(), flags);

        assert!(init.reinitialize(&actor, true).await.is_err());
    }
}
