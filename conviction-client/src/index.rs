//! Alias resolution against identity indexes.
//!
//! Per-identity documents are not addressed directly. Each identity keeps an
//! index mapping definition ids to record addresses, and the public config
//! maps the friendly alias names used here to those definition ids.

use conviction_types::{PublicConfig, StreamId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ConvictionError, Result};
use crate::store::DocumentStore;

/// Alias of the global state record, owned by the service identity
pub const STATE_ALIAS: &str = "convictionstate";

/// Alias of each identity's own convictions record
pub const CONVICTIONS_ALIAS: &str = "convictions";

/// Resolves alias names to records for a given identity.
#[derive(Clone)]
pub struct IndexResolver {
    store: Arc<dyn DocumentStore>,
    config: Arc<PublicConfig>,
}

impl IndexResolver {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<PublicConfig>) -> Self {
        Self { store, config }
    }

    /// Load the record behind `alias` in `did`'s index.
    pub async fn get<T: DeserializeOwned>(&self, alias: &str, did: &str) -> Result<Option<T>> {
        let definition = self.definition(alias)?;
        debug!(alias, definition, did, "Resolving alias");

        match self.store.index_get(definition, did).await? {
            Some(content) => Ok(Some(serde_json::from_value(content)?)),
            None => Ok(None),
        }
    }

    /// Load the record behind `alias` in the session identity's index.
    pub async fn get_own<T: DeserializeOwned>(&self, alias: &str) -> Result<Option<T>> {
        let did = self.store.did().ok_or(ConvictionError::NotAuthenticated)?;
        self.get(alias, did).await
    }

    /// Create or replace the session identity's record for `alias`.
    pub async fn set<T: Serialize>(&self, alias: &str, content: &T) -> Result<StreamId> {
        if self.store.did().is_none() {
            return Err(ConvictionError::NotAuthenticated);
        }
        let definition = self.definition(alias)?;
        let content = serde_json::to_value(content)?;
        Ok(self.store.index_set(definition, content).await?)
    }

    fn definition(&self, alias: &str) -> Result<&str> {
        self.config
            .definition(alias)
            .ok_or_else(|| ConvictionError::UnknownAlias(alias.to_string()))
    }
}
