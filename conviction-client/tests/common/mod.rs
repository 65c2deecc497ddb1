//! Shared fixtures for integration tests
#![allow(dead_code)]

use conviction_client::{ConvictionStorage, MemoryDocumentStore, PublicConfig, StreamId};
use serde_json::{json, Value};
use std::sync::Arc;

pub const SERVICE_DID: &str = "did:key:z6Mkservice";
pub const ALICE: &str = "did:key:z6Mkalice";
pub const BOB: &str = "did:key:z6Mkbob";

pub const ALICE_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const BOB_ADDRESS: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

pub const STATE_DEFINITION: &str = "kjzl6state";
pub const CONVICTIONS_DEFINITION: &str = "kjzl6convictions";
pub const PROPOSAL_SCHEMA: &str = "ceramic://k3y52proposal";
pub const CHAIN_ID: u64 = 4;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config_json() -> Value {
    json!({
        "ceramic": {
            "did": SERVICE_DID,
            "schemas": {"Proposal": PROPOSAL_SCHEMA},
            "definitions": {
                "convictionstate": STATE_DEFINITION,
                "convictions": CONVICTIONS_DEFINITION
            }
        },
        "environment": {"chainId": CHAIN_ID}
    })
}

pub fn public_config() -> PublicConfig {
    serde_json::from_value(config_json()).expect("valid config")
}

/// A shared in-memory network with the proposal schema registered.
pub struct Fixture {
    pub network: MemoryDocumentStore,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let network = MemoryDocumentStore::new();
        network.register_schema(PROPOSAL_SCHEMA, &["title"]);
        Self { network }
    }

    /// Publish the global state under the service identity.
    pub fn publish_state(&self, state: Value) -> StreamId {
        self.network
            .seed_index(STATE_DEFINITION, SERVICE_DID, state)
            .expect("seed state")
    }

    /// Store a proposal authored by `did`.
    pub fn seed_proposal(&self, did: &str, content: Value) -> StreamId {
        self.network.seed_document(did, content).expect("seed proposal")
    }

    /// Store a convictions record for `did` and return its address.
    pub fn seed_convictions(&self, did: &str, content: Value) -> StreamId {
        self.network
            .seed_index(CONVICTIONS_DEFINITION, did, content)
            .expect("seed convictions")
    }

    pub fn session(&self, did: &str) -> Arc<MemoryDocumentStore> {
        Arc::new(self.network.session(did))
    }

    pub fn storage(&self, did: Option<&str>) -> ConvictionStorage {
        let session = match did {
            Some(did) => self.network.session(did),
            None => self.network.anonymous(),
        };
        ConvictionStorage::new(Arc::new(session), Arc::new(public_config()))
    }
}
