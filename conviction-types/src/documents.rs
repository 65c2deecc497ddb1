//! Documents stored on the network, plus the derived [`FullProposal`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::ids::{normalize_address, StreamId};

/// Global conviction state, published by the service under its own identity.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvictionState {
    /// Opaque provenance tag, copied into every participant's record
    pub context: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    #[cfg_attr(
        feature = "typescript",
        ts(type = "Array<{ proposal: string, [key: string]: unknown }>")
    )]
    pub proposals: Vec<ProposalConviction>,
}

impl ConvictionState {
    /// Look up a participant by account, ignoring address case.
    pub fn participant(&self, account: &str) -> Option<&Participant> {
        let wanted = normalize_address(account);
        self.participants
            .iter()
            .find(|p| normalize_address(&p.account) == wanted)
    }
}

/// A known voter.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Blockchain address
    pub account: String,
    /// Address of the participant's [`Convictions`] document, once they have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convictions: Option<String>,
    /// Token balance backing the participant's conviction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

/// Proposal content.
///
/// The payload is opaque to this crate; the network validates it against
/// the proposal schema advertised in [`crate::PublicConfig`].
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proposal(
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, unknown>"))] Map<String, Value>,
);

impl Proposal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Proposal {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Per-proposal conviction metadata kept inside [`ConvictionState`].
///
/// Keyed by the proposal's address. Everything besides `proposal` is
/// service-defined (`totalConviction`, `triggered`, ...) and kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalConviction {
    pub proposal: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ProposalConviction {
    pub fn new(proposal: impl Into<String>) -> Self {
        Self {
            proposal: proposal.into(),
            metadata: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A proposal's content merged with its conviction metadata.
///
/// Never stored; rebuilt on every read by [`FullProposal::merge`].
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullProposal(
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, unknown>"))] Map<String, Value>,
);

impl FullProposal {
    /// Merge proposal content with its conviction entry.
    ///
    /// Content fields are written first and conviction fields second, so on
    /// a name clash the conviction value wins. `proposal` always ends up as
    /// the conviction entry's address.
    pub fn merge(content: &Proposal, conviction: &ProposalConviction) -> Self {
        let mut fields = content.fields().clone();
        fields.insert(
            "proposal".to_string(),
            Value::String(conviction.proposal.clone()),
        );
        for (key, value) in &conviction.metadata {
            fields.insert(key.clone(), value.clone());
        }
        Self(fields)
    }

    /// Address of the underlying proposal document
    pub fn proposal(&self) -> Option<&str> {
        self.0.get("proposal").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// One conviction allocation toward a proposal.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conviction {
    pub proposal: String,
    pub allocation: f64,
}

/// A participant's conviction record.
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Convictions {
    pub context: String,
    #[serde(default)]
    pub convictions: Vec<Conviction>,
    /// Proposal addresses (URL form) authored or tracked by this identity
    #[serde(default)]
    pub proposals: Vec<String>,
}

impl Convictions {
    /// Zero record used when an identity has no document yet.
    pub fn empty(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            convictions: Vec::new(),
            proposals: Vec::new(),
        }
    }

    /// Whether `id` is already listed, in either address form.
    pub fn tracks(&self, id: &StreamId) -> bool {
        self.proposals
            .iter()
            .filter_map(|p| StreamId::parse(p).ok())
            .any(|p| &p == id)
    }

    /// Sum of allocations across all proposals
    pub fn total_allocation(&self) -> f64 {
        self.convictions.iter().map(|c| c.allocation).sum()
    }
}
