//! Document and account identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URL scheme used when a stream id is stored inside another document.
pub const STREAM_URL_PREFIX: &str = "ceramic://";

/// Identifier parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("Empty stream id")]
    Empty,

    #[error("Invalid stream id: {0}")]
    InvalidStreamId(String),
}

/// Address of a document on the network.
///
/// Accepts both the bare form (`kjzl6...`) and the URL form
/// (`ceramic://kjzl6...`). Internally only the bare form is kept, so two ids
/// compare equal regardless of which form they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StreamId(String);

impl StreamId {
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix(STREAM_URL_PREFIX).unwrap_or(trimmed);

        if bare.is_empty() {
            return Err(IdError::Empty);
        }
        if bare.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(IdError::InvalidStreamId(input.to_string()));
        }

        Ok(Self(bare.to_string()))
    }

    /// Bare id, without the URL scheme
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL form, as stored in [`crate::Convictions::proposals`]
    pub fn to_url(&self) -> String {
        format!("{}{}", STREAM_URL_PREFIX, self.0)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StreamId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StreamId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StreamId> for String {
    fn from(id: StreamId) -> Self {
        id.0
    }
}

/// Lower-case and trim a blockchain address.
///
/// Hex addresses are case-insensitive; mixed case only carries a checksum.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// CAIP-10 chain-qualified account, e.g. `0xabc...@eip155:1`.
///
/// Always lower-cased so that checksummed and plain addresses resolve to the
/// same identity link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(address: &str, chain_id: u64) -> Self {
        Self(format!("{}@eip155:{}", address.trim(), chain_id).to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address part, before the `@`
    pub fn address(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_forms_are_equal() {
        let bare = StreamId::parse("kjzl6abc").unwrap();
        let url = StreamId::parse("ceramic://kjzl6abc").unwrap();

        assert_eq!(bare, url);
        assert_eq!(url.as_str(), "kjzl6abc");
        assert_eq!(bare.to_url(), "ceramic://kjzl6abc");
    }

    #[test]
    fn test_stream_id_rejects_garbage() {
        assert_eq!(StreamId::parse(""), Err(IdError::Empty));
        assert_eq!(StreamId::parse("ceramic://"), Err(IdError::Empty));
        assert!(matches!(
            StreamId::parse("not an id"),
            Err(IdError::InvalidStreamId(_))
        ));
        assert!(StreamId::parse("a/b").is_err());
    }

    #[test]
    fn test_stream_id_serde_accepts_url_form() {
        let id: StreamId = serde_json::from_str("\"ceramic://kjzl6xyz\"").unwrap();
        assert_eq!(id.as_str(), "kjzl6xyz");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"kjzl6xyz\"");
    }

    #[test]
    fn test_account_id_is_lowercased() {
        let checksummed = AccountId::new("0xAbCdEF0123", 4);
        let plain = AccountId::new("0xabcdef0123", 4);

        assert_eq!(checksummed, plain);
        assert_eq!(checksummed.as_str(), "0xabcdef0123@eip155:4");
        assert_eq!(checksummed.address(), "0xabcdef0123");
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  0xABC "), "0xabc");
    }
}
