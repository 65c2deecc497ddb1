//! Conviction Client - conviction voting over a mutable document network
//!
//! Keeps a web of independently addressed documents coherent:
//! - Resolves the global conviction state and the proposals it references
//! - Reads and writes each identity's conviction record through its index
//! - Submits proposals after checking the claimed account belongs to the
//!   authenticated identity, then notifies the allow-list gate
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ConvictionApi               │
//! │   (auth checks, proposal submission)    │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌──────────────────┐  ┌─────────────┐
//! │ConvictionStorage │  │ AccessGate  │
//! │ + IndexResolver  │  │ (HTTP)      │
//! └────────┬─────────┘  └─────────────┘
//!          ▼
//! ┌──────────────────┐
//! │  DocumentStore   │
//! │ (network session)│
//! └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use conviction_client::{ConvictionApi, MemoryDocumentStore};
//! use std::sync::Arc;
//!
//! let session = Arc::new(MemoryDocumentStore::new().session("did:key:alice"));
//! let api = ConvictionApi::connect(session, "https://conviction.example.com").await?;
//!
//! for proposal in api.proposals().await? {
//!     println!("{:?}", proposal.title());
//! }
//! ```

pub mod api;
pub mod error;
pub mod gate;
pub mod identity;
pub mod index;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use api::{ConvictionApi, ProposalSubmission};
pub use error::{ConvictionError, Result, SubmissionStage};
pub use gate::{AccessGate, GateConfig, GateStatus};
pub use index::{IndexResolver, CONVICTIONS_ALIAS, STATE_ALIAS};
pub use storage::{ConvictionStorage, ProposalDocument};
pub use store::{Document, DocumentStore, MemoryDocumentStore, StoreError};

pub use conviction_types::*;
