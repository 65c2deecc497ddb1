//! Conviction voting document types
//!
//! Serde model for the documents that make up a conviction voting
//! application on a mutable document network:
//!
//! - [`ConvictionState`]: the global aggregate published by the service
//! - [`Proposal`]: user-authored proposal content
//! - [`Convictions`]: one participant's allocations and tracked proposals
//! - [`FullProposal`]: derived merge of a proposal with its conviction metadata
//! - [`PublicConfig`]: bootstrap configuration served by the gate service
//!
//! Documents are addressed by [`StreamId`]; blockchain accounts are
//! addressed by chain-qualified [`AccountId`]s.
//!
//! With the `typescript` feature enabled, the document and configuration
//! types derive ts-rs bindings for web clients.

pub mod config;
pub mod documents;
pub mod ids;

pub use config::{DocumentNetworkConfig, EnvironmentConfig, PublicConfig, SchemaConfig};
pub use documents::{
    Conviction, ConvictionState, Convictions, FullProposal, Participant, Proposal,
    ProposalConviction,
};
pub use ids::{normalize_address, AccountId, IdError, StreamId, STREAM_URL_PREFIX};
