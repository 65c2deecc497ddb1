//! Error types for conviction operations

use conviction_types::StreamId;
use std::fmt;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for conviction operations
pub type Result<T> = std::result::Result<T, ConvictionError>;

/// Step of proposal submission that failed after the proposal document
/// already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// Appending the proposal to the author's convictions record
    IndexUpdate,
    /// Asking the gate service to admit the proposal
    GateNotification,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexUpdate => f.write_str("index update"),
            Self::GateNotification => f.write_str("gate notification"),
        }
    }
}

/// Conviction error types
#[derive(Error, Debug)]
pub enum ConvictionError {
    /// Session carries no decentralized identity
    #[error("No document network authentication")]
    NotAuthenticated,

    /// Public configuration could not be fetched or decoded
    #[error("Failed to fetch public config from {uri}: {reason}")]
    ConfigFetch { uri: String, reason: String },

    /// Global state alias did not resolve
    #[error("No state document found for {did}; is the service config correct?")]
    StateNotFound { did: String },

    /// No document at the given address
    #[error("No proposal document matching {0}")]
    ProposalNotFound(String),

    /// Claimed account has no linked identity
    #[error("Address {address} is not linked to any identity")]
    AddressNotLinked { address: String },

    /// Claimed account is linked to someone else
    #[error("Address {address} is linked to {linked}, not to {authenticated}")]
    AddressIdentityMismatch {
        address: String,
        linked: String,
        authenticated: String,
    },

    /// Alias missing from the public config's definitions
    #[error("No definition registered for alias {0}")]
    UnknownAlias(String),

    /// Document network failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Gate service transport failure
    #[error(transparent)]
    Gate(#[from] reqwest::Error),

    /// Document content did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Proposal was created but a later submission step failed
    #[error("Proposal {proposal} created but {stage} failed: {source}")]
    PartialSubmission {
        proposal: StreamId,
        stage: SubmissionStage,
        #[source]
        source: Box<ConvictionError>,
    },
}

impl ConvictionError {
    /// Whether this is a refusal to act on behalf of the claimed account,
    /// as opposed to a transport or storage failure.
    pub fn is_authorization_denial(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::AddressNotLinked { .. }
                | Self::AddressIdentityMismatch { .. }
        )
    }

    /// Address of a proposal left behind by a partially failed submission.
    pub fn orphaned_proposal(&self) -> Option<&StreamId> {
        match self {
            Self::PartialSubmission { proposal, .. } => Some(proposal),
            _ => None,
        }
    }
}
