//! ConvictionApi - caller-facing entry point.
//!
//! Bootstraps the public configuration from the conviction service and
//! exposes storage operations behind an authentication check, plus the
//! multi-step proposal submission.

use conviction_types::{
    ConvictionState, Convictions, FullProposal, Proposal, PublicConfig, StreamId,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ConvictionError, Result, SubmissionStage};
use crate::gate::{AccessGate, GateConfig, GateStatus};
use crate::identity::{check_auth, verify_account_link};
use crate::storage::{ConvictionStorage, ProposalDocument};
use crate::store::DocumentStore;

/// Result of a fully executed proposal submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalSubmission {
    /// Address of the new proposal document
    pub proposal: StreamId,
    /// Address of the author's convictions record now listing it
    pub convictions: StreamId,
    /// What the gate said about admitting the proposal to the global state
    pub gate: GateStatus,
}

/// Main entry point for conviction voting clients.
///
/// Holds an immutable configuration and the caller's session; nothing is
/// mutated after construction.
pub struct ConvictionApi {
    storage: ConvictionStorage,
    gate: AccessGate,
}

impl ConvictionApi {
    /// Fetch the public configuration from `service_uri` and bind to `store`.
    pub async fn connect(
        store: Arc<dyn DocumentStore>,
        service_uri: impl Into<String>,
    ) -> Result<Self> {
        Self::connect_with(store, GateConfig::new(service_uri)).await
    }

    /// Like [`ConvictionApi::connect`] with explicit gate settings.
    pub async fn connect_with(
        store: Arc<dyn DocumentStore>,
        gate_config: GateConfig,
    ) -> Result<Self> {
        let gate = AccessGate::new(gate_config)?;
        let config = gate.fetch_config().await?;
        info!(
            service = gate.service_uri(),
            chain_id = config.environment.chain_id,
            "Connected to conviction service"
        );
        Ok(Self::new(store, gate, config))
    }

    /// Build from an already fetched configuration.
    pub fn new(store: Arc<dyn DocumentStore>, gate: AccessGate, config: PublicConfig) -> Self {
        Self {
            storage: ConvictionStorage::new(store, Arc::new(config)),
            gate,
        }
    }

    pub fn config(&self) -> &PublicConfig {
        self.storage.config()
    }

    pub fn storage(&self) -> &ConvictionStorage {
        &self.storage
    }

    /// Identity bound to the session, if any
    pub fn authenticated_did(&self) -> Option<&str> {
        self.storage.store().did()
    }

    // Global state getters

    /// Get the global state document
    pub async fn state_document(&self) -> Result<ConvictionState> {
        self.check_auth()?;
        self.storage.state_document().await
    }

    /// Get the proposals listed on the state document, merged with their convictions
    pub async fn proposals(&self) -> Result<Vec<FullProposal>> {
        self.check_auth()?;
        self.storage.proposals().await
    }

    /// Fetch any proposal document by address.
    ///
    /// Useful for proposals not shown globally, which may or may not be
    /// modifiable by the authenticated identity.
    pub async fn fetch_proposal(&self, address: &str) -> Result<ProposalDocument> {
        self.check_auth()?;
        self.storage.fetch_proposal(address).await
    }

    /// Convictions record of a participant in the global state
    pub async fn query_participant_conviction(
        &self,
        address: &str,
    ) -> Result<Option<Convictions>> {
        self.check_auth()?;
        self.storage.query_participant_conviction(address).await
    }

    // Actions for the authenticated identity

    /// Get the authenticated identity's convictions
    pub async fn get_convictions(&self) -> Result<Convictions> {
        self.check_auth()?;
        self.storage.get_convictions().await
    }

    /// Set the authenticated identity's convictions
    pub async fn set_convictions(&self, convictions: &Convictions) -> Result<StreamId> {
        self.check_auth()?;
        self.storage.set_convictions(convictions).await
    }

    /// Update an existing proposal document
    pub async fn update_proposal(
        &self,
        doc: &mut ProposalDocument,
        next: Proposal,
    ) -> Result<StreamId> {
        self.check_auth()?;
        self.storage.set_proposal(doc, next).await
    }

    /// Create a proposal and submit it for inclusion in the global state.
    ///
    /// `address` must be linked to the authenticated identity on the
    /// configured chain; otherwise nothing is written. Once the proposal
    /// document exists it is never rolled back: a failure while indexing it
    /// or notifying the gate comes back as
    /// [`ConvictionError::PartialSubmission`] carrying its address, and
    /// [`ConvictionApi::link_proposal`] / [`ConvictionApi::notify_gate`] can
    /// finish the job. A gate that answers but refuses (e.g. 401 for an
    /// address outside the allow-list) is reported in
    /// [`ProposalSubmission::gate`], not as an error.
    pub async fn add_proposal(
        &self,
        proposal: &Proposal,
        address: &str,
    ) -> Result<ProposalSubmission> {
        let chain_id = self.config().environment.chain_id;
        verify_account_link(self.storage.store().as_ref(), address, chain_id).await?;

        let proposal_id = self.storage.create_proposal(proposal).await?;

        let convictions = self
            .storage
            .link_proposal(&proposal_id)
            .await
            .map_err(|e| partial(&proposal_id, SubmissionStage::IndexUpdate, e))?;

        let gate = self
            .gate
            .notify_proposal(address)
            .await
            .map_err(|e| partial(&proposal_id, SubmissionStage::GateNotification, e))?;

        info!(proposal = %proposal_id, accepted = gate.is_accepted(), "Submitted proposal");
        Ok(ProposalSubmission {
            proposal: proposal_id,
            convictions,
            gate,
        })
    }

    /// List an existing proposal in the authenticated identity's convictions.
    pub async fn link_proposal(&self, proposal: &StreamId) -> Result<StreamId> {
        self.check_auth()?;
        self.storage.link_proposal(proposal).await
    }

    /// Ask the gate to admit the proposals submitted for `address`.
    pub async fn notify_gate(&self, address: &str) -> Result<GateStatus> {
        self.check_auth()?;
        self.gate.notify_proposal(address).await
    }

    fn check_auth(&self) -> Result<&str> {
        check_auth(self.storage.store().as_ref())
    }
}

fn partial(
    proposal: &StreamId,
    stage: SubmissionStage,
    source: ConvictionError,
) -> ConvictionError {
    warn!(%proposal, %stage, error = %source, "Proposal submission incomplete");
    ConvictionError::PartialSubmission {
        proposal: proposal.clone(),
        stage,
        source: Box::new(source),
    }
}
