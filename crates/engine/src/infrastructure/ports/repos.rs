//! Host document ports.
//!
//! The host owns actors, items, and their persisted attributes. This module
//! reads host documents and reads/writes only its own namespaced flag region.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use syb5e_domain::{Actor, ActorId, DocumentRef, Item, ItemId};

use super::error::RepoError;

/// Dotted attribute path → new value. Each value replaces whatever is stored
/// at its path; sibling paths are untouched.
pub type AttributeUpdates = BTreeMap<String, Value>;

// =============================================================================
// Host Documents (read-only)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError>;

    /// Items whose owner is `actor_id`.
    async fn list_owned_by(&self, actor_id: ActorId) -> Result<Vec<Item>, RepoError>;
}

// =============================================================================
// Persisted Attributes
// =============================================================================

/// Async key/value access to a document's persisted attributes.
///
/// Every call is a separate round trip; there are no transactions across
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Value at a dotted path, or `None` if any segment is absent.
    async fn get_attribute(&self, doc: DocumentRef, path: &str)
        -> Result<Option<Value>, RepoError>;

    /// Apply all updates in one write.
    async fn set_attributes(
        &self,
        doc: DocumentRef,
        updates: AttributeUpdates,
    ) -> Result<(), RepoError>;

    /// Delete everything under `root`.
    async fn clear_namespace(&self, doc: DocumentRef, root: &str) -> Result<(), RepoError>;

    /// Replace everything under `root` with `value`.
    ///
    /// Stores that can do this in one write must override it. The fallback
    /// is two calls, so a concurrent reader can observe the namespace empty
    /// between them.
    async fn replace_namespace(
        &self,
        doc: DocumentRef,
        root: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        self.clear_namespace(doc, root).await?;
        let mut updates = AttributeUpdates::new();
        updates.insert(root.to_string(), value);
        self.set_attributes(doc, updates).await
    }
}
