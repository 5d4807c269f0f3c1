//! Module flags entity.
//!
//! Reads and writes this module's namespaced region of host documents. All
//! decoding goes through the typed schema; malformed fields fall back to
//! defaults and are logged.

use std::sync::Arc;

use serde_json::Value;
use syb5e_domain::{
    ActorFlags, ActorId, CorruptionPatch, CorruptionState, Decoded, DocumentRef, FlagPaths,
    FlagScope, ItemFlags, ItemId, ACTOR_FLAGS_VERSION,
};

use crate::infrastructure::ports::{AttributeUpdates, FlagStore, RepoError};

/// Flag region access for actors and items.
pub struct ModuleFlags {
    store: Arc<dyn FlagStore>,
    paths: FlagPaths,
}

impl ModuleFlags {
    pub fn new(store: Arc<dyn FlagStore>, scope: FlagScope) -> Self {
        let paths = FlagPaths::for_scope(&scope);
        Self { store, paths }
    }

    pub fn paths(&self) -> &FlagPaths {
        &self.paths
    }

    pub fn store(&self) -> &Arc<dyn FlagStore> {
        &self.store
    }

    /// The raw namespaced region, if any.
    pub async fn region(&self, doc: DocumentRef) -> Result<Option<Value>, RepoError> {
        self.store.get_attribute(doc, &self.paths.root).await
    }

    /// Decoded actor region. Absent data decodes to zero defaults.
    pub async fn actor_flags(&self, actor_id: ActorId) -> Result<ActorFlags, RepoError> {
        let region = self.region(DocumentRef::Actor(actor_id)).await?;
        let decoded = ActorFlags::decode(region.as_ref(), &self.paths.root);
        let flags = self.report(DocumentRef::Actor(actor_id), decoded);
        if flags.is_from_newer_schema() {
            tracing::warn!(
                actor_id = %actor_id,
                stored = flags.schema_version,
                supported = ACTOR_FLAGS_VERSION,
                "Flag region written by a newer schema, reading known fields only"
            );
        }
        Ok(flags)
    }

    pub async fn corruption(&self, actor_id: ActorId) -> Result<CorruptionState, RepoError> {
        Ok(self.actor_flags(actor_id).await?.corruption)
    }

    /// Write only the fields present in `patch`. An empty patch is a no-op.
    pub async fn set_corruption(
        &self,
        actor_id: ActorId,
        patch: &CorruptionPatch,
    ) -> Result<(), RepoError> {
        let paths = &self.paths.corruption;
        let updates: AttributeUpdates = [
            (&paths.temp, patch.temp),
            (&paths.permanent, patch.permanent),
            (&paths.max, patch.max),
        ]
        .into_iter()
        .filter_map(|(path, value)| value.map(|v| (path.clone(), Value::from(v))))
        .collect();

        if updates.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            actor_id = %actor_id,
            fields = updates.len(),
            "Writing corruption fields"
        );
        self.store
            .set_attributes(DocumentRef::Actor(actor_id), updates)
            .await
    }

    pub async fn item_flags(&self, item_id: ItemId) -> Result<ItemFlags, RepoError> {
        let region = self.region(DocumentRef::Item(item_id)).await?;
        let decoded = ItemFlags::decode(region.as_ref(), &self.paths.root);
        Ok(self.report(DocumentRef::Item(item_id), decoded))
    }

    fn report<T>(&self, doc: DocumentRef, decoded: Decoded<T>) -> T {
        for issue in &decoded.issues {
            tracing::warn!(
                document = %doc,
                error = %issue,
                "Malformed flag data, using default"
            );
        }
        decoded.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockFlagStore;
    use serde_json::json;

    const ROOT: &str = "flags.symbaroum5ecore";

    fn flags_with(store: MockFlagStore) -> ModuleFlags {
        ModuleFlags::new(Arc::new(store), FlagScope::default())
    }

    #[tokio::test]
    async fn absent_region_reads_as_zero() {
        let mut store = MockFlagStore::new();
        store
            .expect_get_attribute()
            .withf(|_, path| path == ROOT)
            .returning(|_, _| Ok(None));

        let corruption = flags_with(store).corruption(ActorId::new()).await.unwrap();
        assert_eq!(corruption, CorruptionState::default());
        assert_eq!(corruption.value(), 0);
    }

    #[tokio::test]
    async fn malformed_fields_fall_back_per_field() {
        let mut store = MockFlagStore::new();
        store.expect_get_attribute().returning(|_, _| {
            Ok(Some(json!({
                "corruption": {"temp": "lots", "permanent": 2, "max": 6},
                "shadow": "pale"
            })))
        });

        let flags = flags_with(store).actor_flags(ActorId::new()).await.unwrap();
        assert_eq!(flags.corruption, CorruptionState::new(0, 2, 6));
        assert_eq!(flags.shadow, "pale");
    }

    #[tokio::test]
    async fn newer_schema_region_still_reads_known_fields() {
        let mut store = MockFlagStore::new();
        store.expect_get_attribute().returning(|_, _| {
            Ok(Some(json!({
                "schemaVersion": ACTOR_FLAGS_VERSION + 1,
                "initialized": true,
                "corruption": {"temp": 1, "permanent": 2, "max": 6},
                "taint": {"source": "abomination"}
            })))
        });

        let flags = flags_with(store).actor_flags(ActorId::new()).await.unwrap();
        assert!(flags.is_from_newer_schema());
        assert_eq!(flags.schema_version, ACTOR_FLAGS_VERSION + 1);
        assert_eq!(flags.corruption, CorruptionState::new(1, 2, 6));
    }

    #[tokio::test]
    async fn partial_write_only_touches_given_paths() {
        let actor_id = ActorId::new();
        let mut store = MockFlagStore::new();
        store
            .expect_set_attributes()
            .withf(move |doc, updates| {
                *doc == DocumentRef::Actor(actor_id)
                    && updates.len() == 1
                    && updates.get("flags.symbaroum5ecore.corruption.permanent") == Some(&json!(3))
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let patch = CorruptionPatch {
            permanent: Some(3),
            ..CorruptionPatch::default()
        };
        flags_with(store)
            .set_corruption(actor_id, &patch)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_patch_writes_nothing() {
        let mut store = MockFlagStore::new();
        store.expect_set_attributes().never();

        flags_with(store)
            .set_corruption(ActorId::new(), &CorruptionPatch::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn item_favored_defaults_false() {
        let mut store = MockFlagStore::new();
        store.expect_get_attribute().returning(|_, _| Ok(Some(json!({}))));

        let flags = flags_with(store).item_flags(ItemId::new()).await.unwrap();
        assert!(!flags.favored);
    }

    #[tokio::test]
    async fn store_failure_surfaces() {
        let mut store = MockFlagStore::new();
        store
            .expect_get_attribute()
            .returning(|_, _| Err(RepoError::store("get_attribute", "offline")));

        let err = flags_with(store).corruption(ActorId::new()).await.unwrap_err();
        assert!(matches!(err, RepoError::Store { .. }));
    }
}
