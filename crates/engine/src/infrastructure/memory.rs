//! In-memory host document store.
//!
//! Plays the host's part outside the host: owns actors, items and their
//! persisted attribute records, and answers the document ports. Used by the
//! sandbox binary and the end-to-end tests.

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use syb5e_domain::common::{get_path, merge_values, remove_path, set_path};
use syb5e_domain::{Actor, ActorId, DocumentRef, Item, ItemId};

use crate::infrastructure::ports::{ActorRepo, AttributeUpdates, FlagStore, ItemRepo, RepoError};

/// Actors, items and one attribute record per document.
///
/// Each attribute record is a JSON object; flag regions live under its
/// `flags` key. A single record is only ever mutated while its map entry is
/// held, so every store call is atomic per document.
#[derive(Default)]
pub struct InMemoryHost {
    actors: DashMap<ActorId, Actor>,
    items: DashMap<ItemId, Item>,
    records: DashMap<DocumentRef, Value>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a host pre-populated from a fixture.
    pub fn from_fixture(fixture: HostFixture) -> Self {
        let host = Self::new();
        for entry in fixture.actors {
            host.insert_actor_with_flags(entry.actor, entry.flags);
        }
        for entry in fixture.items {
            host.insert_item_with_flags(entry.item, entry.flags);
        }
        host
    }

    pub fn insert_actor(&self, actor: Actor) {
        self.insert_actor_with_flags(actor, Value::Null);
    }

    pub fn insert_actor_with_flags(&self, actor: Actor, flags: Value) {
        self.records
            .insert(DocumentRef::Actor(actor.id), record_with_flags(flags));
        self.actors.insert(actor.id, actor);
    }

    pub fn insert_item(&self, item: Item) {
        self.insert_item_with_flags(item, Value::Null);
    }

    pub fn insert_item_with_flags(&self, item: Item, flags: Value) {
        self.records
            .insert(DocumentRef::Item(item.id), record_with_flags(flags));
        self.items.insert(item.id, item);
    }

    /// Snapshot of a document's whole attribute record.
    pub fn record(&self, doc: DocumentRef) -> Option<Value> {
        self.records.get(&doc).map(|r| r.value().clone())
    }

    /// Apply a nested update record the way the host commits a pending
    /// document update (recursive merge, update wins).
    pub fn commit_update(&self, doc: DocumentRef, update: &Value) -> Result<(), RepoError> {
        let mut record = self
            .records
            .get_mut(&doc)
            .ok_or_else(|| RepoError::not_found(doc_kind(doc), doc))?;
        merge_values(record.value_mut(), update);
        Ok(())
    }
}

fn record_with_flags(flags: Value) -> Value {
    let mut record = Map::new();
    let flags = match flags {
        Value::Object(_) => flags,
        _ => Value::Object(Map::new()),
    };
    record.insert("flags".to_string(), flags);
    Value::Object(record)
}

fn doc_kind(doc: DocumentRef) -> &'static str {
    match doc {
        DocumentRef::Actor(_) => "Actor",
        DocumentRef::Item(_) => "Item",
    }
}

#[async_trait]
impl ActorRepo for InMemoryHost {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        Ok(self.actors.get(&id).map(|a| a.value().clone()))
    }
}

#[async_trait]
impl ItemRepo for InMemoryHost {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.items.get(&id).map(|i| i.value().clone()))
    }

    async fn list_owned_by(&self, actor_id: ActorId) -> Result<Vec<Item>, RepoError> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|i| i.owner == Some(actor_id))
            .map(|i| i.value().clone())
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

#[async_trait]
impl FlagStore for InMemoryHost {
    async fn get_attribute(
        &self,
        doc: DocumentRef,
        path: &str,
    ) -> Result<Option<Value>, RepoError> {
        let record = self
            .records
            .get(&doc)
            .ok_or_else(|| RepoError::not_found(doc_kind(doc), doc))?;
        Ok(get_path(record.value(), path).cloned())
    }

    async fn set_attributes(
        &self,
        doc: DocumentRef,
        updates: AttributeUpdates,
    ) -> Result<(), RepoError> {
        let mut record = self
            .records
            .get_mut(&doc)
            .ok_or_else(|| RepoError::not_found(doc_kind(doc), doc))?;
        for (path, value) in updates {
            set_path(record.value_mut(), &path, value);
        }
        Ok(())
    }

    async fn clear_namespace(&self, doc: DocumentRef, root: &str) -> Result<(), RepoError> {
        let mut record = self
            .records
            .get_mut(&doc)
            .ok_or_else(|| RepoError::not_found(doc_kind(doc), doc))?;
        remove_path(record.value_mut(), root);
        Ok(())
    }

    /// Clear and rewrite under one entry guard; no reader sees the gap.
    async fn replace_namespace(
        &self,
        doc: DocumentRef,
        root: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        let mut record = self
            .records
            .get_mut(&doc)
            .ok_or_else(|| RepoError::not_found(doc_kind(doc), doc))?;
        remove_path(record.value_mut(), root);
        set_path(record.value_mut(), root, value);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// JSON fixture describing a host world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostFixture {
    #[serde(default)]
    pub actors: Vec<FixtureActor>,
    #[serde(default)]
    pub items: Vec<FixtureItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureActor {
    #[serde(flatten)]
    pub actor: Actor,
    /// Initial `flags` record.
    #[serde(default)]
    pub flags: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureItem {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default)]
    pub flags: Value,
}

impl HostFixture {
    pub fn from_json(json: &str) -> Result<Self, RepoError> {
        serde_json::from_str(json).map_err(RepoError::serialization)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RepoError::store("load_fixture", format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
