//! Object store module
//!
//! Shared in-memory mapping from identifier to JSON document. Every read
//! takes the read lock and every write the write lock, so concurrent
//! handlers never observe a half-written document.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A stored document: an arbitrary JSON object
pub type Document = Map<String, Value>;

/// Keys checked, in order, when deriving an identifier from a document
pub const ID_KEYS: [&str; 3] = ["id", "Id", "ID"];

/// Cloneable handle to the shared object map
///
/// Clones share the same map, so whoever builds the server can seed it
/// before start and inspect it afterwards.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: Arc<RwLock<HashMap<String, Document>>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with `objects`
    pub fn with_objects(objects: HashMap<String, Document>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(objects)),
        }
    }

    /// Every stored document, in no particular order
    pub async fn list(&self) -> Vec<Document> {
        self.objects.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Document> {
        self.objects.read().await.get(id).cloned()
    }

    /// Insert or replace the document for `id`, returning the previous one
    pub async fn put(&self, id: impl Into<String>, document: Document) -> Option<Document> {
        self.objects.write().await.insert(id.into(), document)
    }

    /// Remove `id` if present; absence is not an error
    pub async fn remove(&self, id: &str) -> Option<Document> {
        self.objects.write().await.remove(id)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.objects.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Point-in-time copy of the whole map
    pub async fn snapshot(&self) -> HashMap<String, Document> {
        self.objects.read().await.clone()
    }
}

/// Derive the identifier of a document from its `id`, `Id` or `ID` key
///
/// Strings are used verbatim; any other value uses its compact JSON text.
pub fn identifier_of(document: &Document) -> Option<String> {
    ID_KEYS
        .iter()
        .find_map(|key| document.get(*key))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}
