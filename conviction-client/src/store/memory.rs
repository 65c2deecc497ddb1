//! In-memory document network for tests and local development.

use async_trait::async_trait;
use conviction_types::{AccountId, StreamId};
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::traits::*;

#[derive(Default)]
struct Network {
    documents: DashMap<StreamId, Document>,
    /// Lower-cased CAIP-10 account → linked identity
    links: DashMap<String, String>,
    /// (definition, did) → record address
    index: DashMap<(String, String), StreamId>,
    /// Schema id → fields that must be present
    schemas: DashMap<String, Vec<String>>,
    /// Documents whose `load` fails as if their node were unreachable
    unreachable: DashSet<StreamId>,
    available: AtomicBool,
    reject_index_writes: AtomicBool,
    creates: AtomicU32,
}

/// In-memory document network.
///
/// Every handle returned by [`MemoryDocumentStore::session`] shares the same
/// network, so one handle can seed the global state as the service identity
/// while another acts as the user. Updates are restricted to the document's
/// controller and content is checked against registered schemas, so the
/// rejection paths of real networks can be exercised.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    network: Arc<Network>,
    did: Option<String>,
}

impl MemoryDocumentStore {
    /// Create an empty network with an anonymous session.
    pub fn new() -> Self {
        let network = Network::default();
        network.available.store(true, Ordering::SeqCst);
        Self {
            network: Arc::new(network),
            did: None,
        }
    }

    /// Another session on the same network, authenticated as `did`.
    pub fn session(&self, did: impl Into<String>) -> Self {
        Self {
            network: Arc::clone(&self.network),
            did: Some(did.into()),
        }
    }

    /// Another anonymous session on the same network.
    pub fn anonymous(&self) -> Self {
        Self {
            network: Arc::clone(&self.network),
            did: None,
        }
    }

    /// Link a chain account to an identity.
    pub fn link_account(&self, account: &AccountId, did: impl Into<String>) {
        self.network
            .links
            .insert(account.as_str().to_lowercase(), did.into());
    }

    /// Require `fields` on every document written with `schema`.
    pub fn register_schema(&self, schema: impl Into<String>, fields: &[&str]) {
        self.network
            .schemas
            .insert(schema.into(), fields.iter().map(|f| f.to_string()).collect());
    }

    /// Store a document directly, bypassing session checks.
    pub fn seed_document(&self, controller: &str, content: Value) -> Result<StreamId, StoreError> {
        self.insert(controller, None, content)
    }

    /// Store an index record for `did` directly, bypassing session checks.
    pub fn seed_index(
        &self,
        definition: &str,
        did: &str,
        content: Value,
    ) -> Result<StreamId, StoreError> {
        let id = self.insert(did, None, content)?;
        self.network
            .index
            .insert((definition.to_string(), did.to_string()), id.clone());
        Ok(id)
    }

    /// Simulate the network going offline.
    pub fn set_available(&self, available: bool) {
        self.network.available.store(available, Ordering::SeqCst);
    }

    /// Make `load` of one document fail while the rest of the network stays up.
    pub fn set_unreachable(&self, id: &StreamId, unreachable: bool) {
        if unreachable {
            self.network.unreachable.insert(id.clone());
        } else {
            self.network.unreachable.remove(id);
        }
    }

    /// Make every `index_set` fail, as if the index stream were locked.
    pub fn reject_index_writes(&self, reject: bool) {
        self.network
            .reject_index_writes
            .store(reject, Ordering::SeqCst);
    }

    /// Number of documents created through `create`.
    pub fn create_count(&self) -> u32 {
        self.network.creates.load(Ordering::SeqCst)
    }

    /// Number of documents on the network.
    pub fn document_count(&self) -> usize {
        self.network.documents.len()
    }

    /// Read a document without going through a session.
    pub fn peek(&self, id: &StreamId) -> Option<Value> {
        self.network.documents.get(id).map(|d| d.content.clone())
    }

    fn insert(
        &self,
        controller: &str,
        schema: Option<&str>,
        content: Value,
    ) -> Result<StreamId, StoreError> {
        let mut hasher = Sha256::new();
        hasher.update(controller.as_bytes());
        hasher.update(schema.unwrap_or_default().as_bytes());
        hasher.update(content.to_string().as_bytes());
        hasher.update(uuid::Uuid::new_v4().as_bytes());
        let genesis = hex::encode(hasher.finalize());

        let id = StreamId::parse(&format!("kjzl{}", &genesis[..44]))
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        self.network.documents.insert(
            id.clone(),
            Document {
                id: id.clone(),
                controller: controller.to_string(),
                schema: schema.map(String::from),
                content,
            },
        );
        Ok(id)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.network.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory network offline".to_string()))
        }
    }

    fn require_did(&self) -> Result<&str, StoreError> {
        self.did
            .as_deref()
            .ok_or_else(|| StoreError::Unauthorized("session has no identity".to_string()))
    }

    fn validate(&self, schema: Option<&str>, content: &Value) -> Result<(), StoreError> {
        let Some(schema) = schema else {
            return Ok(());
        };
        let object = content
            .as_object()
            .ok_or_else(|| StoreError::SchemaMismatch(format!("{} expects an object", schema)))?;

        if let Some(required) = self.network.schemas.get(schema) {
            let missing: Vec<&str> = required
                .iter()
                .filter(|f| !object.contains_key(f.as_str()))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(StoreError::SchemaMismatch(format!(
                    "{} requires {}",
                    schema,
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn did(&self) -> Option<&str> {
        self.did.as_deref()
    }

    async fn create(&self, content: Value, schema: Option<&str>) -> Result<StreamId, StoreError> {
        self.ensure_available()?;
        let did = self.require_did()?;
        self.validate(schema, &content)?;

        self.network.creates.fetch_add(1, Ordering::SeqCst);
        self.insert(did, schema, content)
    }

    async fn load(&self, id: &StreamId) -> Result<Option<Document>, StoreError> {
        self.ensure_available()?;
        if self.network.unreachable.contains(id) {
            return Err(StoreError::Unavailable(format!("{} unreachable", id)));
        }
        Ok(self.network.documents.get(id).map(|d| d.value().clone()))
    }

    async fn update(&self, id: &StreamId, content: Value) -> Result<(), StoreError> {
        self.ensure_available()?;
        let did = self.require_did()?;

        let mut doc = self
            .network
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if doc.controller != did {
            return Err(StoreError::Unauthorized(format!(
                "{} is controlled by {}",
                id, doc.controller
            )));
        }
        self.validate(doc.schema.as_deref(), &content)?;

        doc.content = content;
        Ok(())
    }

    async fn resolve_account(&self, account: &AccountId) -> Result<Option<String>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .network
            .links
            .get(account.as_str())
            .map(|did| did.value().clone()))
    }

    async fn index_get(&self, definition: &str, did: &str) -> Result<Option<Value>, StoreError> {
        self.ensure_available()?;
        let key = (definition.to_string(), did.to_string());
        let Some(id) = self.network.index.get(&key).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.network.documents.get(&id).map(|d| d.content.clone()))
    }

    async fn index_set(&self, definition: &str, content: Value) -> Result<StreamId, StoreError> {
        self.ensure_available()?;
        let did = self.require_did()?.to_string();

        if self.network.reject_index_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "index write for {} rejected",
                definition
            )));
        }

        let key = (definition.to_string(), did.clone());
        let existing = self.network.index.get(&key).map(|id| id.value().clone());
        match existing {
            Some(id) => {
                self.update(&id, content).await?;
                Ok(id)
            }
            None => {
                let id = self.insert(&did, None, content)?;
                self.network.index.insert(key, id.clone());
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_load() {
        let store = MemoryDocumentStore::new().session("did:key:alice");

        let id = store.create(json!({"title": "Hello"}), None).await.unwrap();
        let doc = store.load(&id).await.unwrap().unwrap();

        assert_eq!(doc.controller, "did:key:alice");
        assert_eq!(doc.content, json!({"title": "Hello"}));
        assert_eq!(store.create_count(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create() {
        let store = MemoryDocumentStore::new();
        let result = store.create(json!({}), None).await;
        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_update_requires_controller() {
        let network = MemoryDocumentStore::new();
        let alice = network.session("did:key:alice");
        let bob = network.session("did:key:bob");

        let id = alice.create(json!({"title": "A"}), None).await.unwrap();
        let result = bob.update(&id, json!({"title": "B"})).await;

        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
        assert_eq!(network.peek(&id), Some(json!({"title": "A"})));
    }

    #[tokio::test]
    async fn test_schema_enforced_on_create_and_update() {
        let network = MemoryDocumentStore::new();
        network.register_schema("schema:proposal", &["title"]);
        let alice = network.session("did:key:alice");

        let bad = alice.create(json!({"body": "x"}), Some("schema:proposal")).await;
        assert!(matches!(bad, Err(StoreError::SchemaMismatch(_))));

        let id = alice
            .create(json!({"title": "ok"}), Some("schema:proposal"))
            .await
            .unwrap();
        let bad_update = alice.update(&id, json!({"body": "x"})).await;
        assert!(matches!(bad_update, Err(StoreError::SchemaMismatch(_))));
    }

    #[tokio::test]
    async fn test_index_set_upserts() {
        let network = MemoryDocumentStore::new();
        let alice = network.session("did:key:alice");

        let first = alice.index_set("def", json!({"n": 1})).await.unwrap();
        let second = alice.index_set("def", json!({"n": 2})).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            alice.index_get("def", "did:key:alice").await.unwrap(),
            Some(json!({"n": 2}))
        );
        assert_eq!(alice.index_get("def", "did:key:bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreachable_document() {
        let network = MemoryDocumentStore::new();
        let alice = network.session("did:key:alice");
        let id = alice.create(json!({"title": "A"}), None).await.unwrap();
        let other = alice.create(json!({"title": "B"}), None).await.unwrap();

        network.set_unreachable(&id, true);
        assert!(matches!(alice.load(&id).await, Err(StoreError::Unavailable(_))));
        assert!(alice.load(&other).await.unwrap().is_some());

        network.set_unreachable(&id, false);
        assert!(alice.load(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_offline_network() {
        let store = MemoryDocumentStore::new().session("did:key:alice");
        store.set_available(false);

        let result = store.index_get("def", "did:key:alice").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
