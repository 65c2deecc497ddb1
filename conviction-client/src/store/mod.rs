//! Document network abstraction layer.
//!
//! Provides the `DocumentStore` trait that conviction logic is written
//! against, plus an in-memory network for tests and local development.

pub mod memory;
pub mod traits;

pub use memory::MemoryDocumentStore;
pub use traits::{Document, DocumentStore, StoreError};
