//! Core trait for document network sessions.
//!
//! This module defines `DocumentStore`, the seam between conviction logic
//! and whatever client talks to the document network.

use async_trait::async_trait;
use conviction_types::{AccountId, StreamId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Error types for document network operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Session is not allowed to perform the write
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Content was rejected by the document's schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Target document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Stored content could not be interpreted
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Network unreachable or node error
    #[error("Document network unavailable: {0}")]
    Unavailable(String),
}

/// A loaded document with its network metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T = Value> {
    pub id: StreamId,
    /// Identity allowed to update the document
    pub controller: String,
    /// Schema the content was validated against, if any
    pub schema: Option<String>,
    pub content: T,
}

impl Document<Value> {
    /// Decode the JSON content into a typed document.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Document<T>, serde_json::Error> {
        Ok(Document {
            content: serde_json::from_value(self.content)?,
            id: self.id,
            controller: self.controller,
            schema: self.schema,
        })
    }
}

/// An authenticated (or anonymous) session on the document network.
///
/// Implementations own transport, signing and anchoring. Every call is a
/// single attempt; retries and timeouts belong to the implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Decentralized identity bound to this session, if authenticated.
    fn did(&self) -> Option<&str>;

    /// Create a document controlled by the session identity.
    async fn create(&self, content: Value, schema: Option<&str>) -> Result<StreamId, StoreError>;

    /// Load the latest version of a document.
    async fn load(&self, id: &StreamId) -> Result<Option<Document>, StoreError>;

    /// Replace a document's content with a new version.
    async fn update(&self, id: &StreamId, content: Value) -> Result<(), StoreError>;

    /// Identity that has claimed a chain-qualified account, if any.
    async fn resolve_account(&self, account: &AccountId) -> Result<Option<String>, StoreError>;

    /// Content behind `definition` in `did`'s identity index.
    async fn index_get(&self, definition: &str, did: &str) -> Result<Option<Value>, StoreError>;

    /// Upsert the session identity's record for `definition`.
    ///
    /// Creates the record on first write and updates it afterwards; returns
    /// the record's address either way.
    async fn index_set(&self, definition: &str, content: Value) -> Result<StreamId, StoreError>;
}
