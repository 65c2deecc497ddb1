//! Public configuration served by the conviction service.
//!
//! Fetched once at bootstrap and treated as immutable afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// `GET {serviceURI}` response body.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicConfig {
    pub ceramic: DocumentNetworkConfig,
    pub environment: EnvironmentConfig,
}

impl PublicConfig {
    /// Definition id registered for an alias name
    pub fn definition(&self, alias: &str) -> Option<&str> {
        self.ceramic.definitions.get(alias).map(String::as_str)
    }
}

/// Document network settings.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNetworkConfig {
    /// Identity that owns the global state document
    pub did: String,
    pub schemas: SchemaConfig,
    /// Alias name → definition id
    #[serde(default)]
    pub definitions: HashMap<String, String>,
}

#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(rename = "Proposal")]
    pub proposal: String,
}

#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(rename = "chainId", deserialize_with = "chain_id_from_number_or_string")]
    #[cfg_attr(feature = "typescript", ts(type = "number"))]
    pub chain_id: u64,
}

// The service has published chainId both as a JSON number and as a string.
fn chain_id_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
