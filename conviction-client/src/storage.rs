//! Conviction storage over a document network session.
//!
//! Translates between the conviction domain model and individual document
//! operations. Nothing is cached: every call re-reads from the network.

use conviction_types::{
    ConvictionState, Convictions, FullProposal, Proposal, PublicConfig, StreamId,
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ConvictionError, Result};
use crate::index::{IndexResolver, CONVICTIONS_ALIAS, STATE_ALIAS};
use crate::store::{Document, DocumentStore};

/// A loaded proposal document that can be updated in place.
pub type ProposalDocument = Document<Proposal>;

/// Conviction state access bound to one document network session.
#[derive(Clone)]
pub struct ConvictionStorage {
    store: Arc<dyn DocumentStore>,
    config: Arc<PublicConfig>,
    index: IndexResolver,
}

impl ConvictionStorage {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<PublicConfig>) -> Self {
        let index = IndexResolver::new(Arc::clone(&store), Arc::clone(&config));
        Self {
            store,
            config,
            index,
        }
    }

    /// The session this storage is bound to
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn config(&self) -> &PublicConfig {
        &self.config
    }

    /// Load the global state published by the service identity.
    pub async fn state_document(&self) -> Result<ConvictionState> {
        let did = &self.config.ceramic.did;
        self.index
            .get::<ConvictionState>(STATE_ALIAS, did)
            .await?
            .ok_or_else(|| ConvictionError::StateNotFound { did: did.clone() })
    }

    /// Load every proposal listed in the global state, merged with its
    /// conviction metadata.
    ///
    /// Loads run concurrently; the first failure fails the whole call.
    /// Output order follows `state.proposals`.
    pub async fn proposals(&self) -> Result<Vec<FullProposal>> {
        let state = self.state_document().await?;
        debug!(count = state.proposals.len(), "Loading listed proposals");

        let documents = try_join_all(
            state
                .proposals
                .iter()
                .map(|conviction| self.fetch_proposal(&conviction.proposal)),
        )
        .await?;

        Ok(documents
            .iter()
            .zip(&state.proposals)
            .map(|(doc, conviction)| FullProposal::merge(&doc.content, conviction))
            .collect())
    }

    /// Convictions record of the participant with the given account.
    ///
    /// `None` when the account is not a participant, has no record yet, or
    /// the record's address no longer resolves.
    pub async fn query_participant_conviction(
        &self,
        address: &str,
    ) -> Result<Option<Convictions>> {
        let state = self.state_document().await?;
        let Some(reference) = state
            .participant(address)
            .and_then(|p| p.convictions.as_deref())
        else {
            return Ok(None);
        };

        let Ok(id) = StreamId::parse(reference) else {
            warn!(%address, convictions = reference, "Malformed participant convictions address");
            return Ok(None);
        };
        match self.store.load(&id).await? {
            Some(doc) => Ok(Some(doc.decode::<Convictions>()?.content)),
            None => {
                warn!(%address, convictions = %id, "Participant convictions document missing");
                Ok(None)
            }
        }
    }

    /// The session identity's convictions, or an empty record if it has none.
    ///
    /// The empty record is not written back.
    pub async fn get_convictions(&self) -> Result<Convictions> {
        let state = self.state_document().await?;
        let stored = self.index.get_own::<Convictions>(CONVICTIONS_ALIAS).await?;
        Ok(stored.unwrap_or_else(|| Convictions::empty(state.context)))
    }

    /// Create or replace the session identity's convictions record.
    pub async fn set_convictions(&self, convictions: &Convictions) -> Result<StreamId> {
        let id = self.index.set(CONVICTIONS_ALIAS, convictions).await?;
        debug!(convictions = %id, "Stored convictions");
        Ok(id)
    }

    /// Replace the content of an existing proposal document.
    ///
    /// `doc` reflects the new content once the network accepts the update.
    pub async fn set_proposal(
        &self,
        doc: &mut ProposalDocument,
        next: Proposal,
    ) -> Result<StreamId> {
        self.store
            .update(&doc.id, serde_json::to_value(&next)?)
            .await?;
        doc.content = next;
        info!(proposal = %doc.id, "Updated proposal");
        Ok(doc.id.clone())
    }

    /// Load a proposal by address, listed in the global state or not.
    pub async fn fetch_proposal(&self, address: &str) -> Result<ProposalDocument> {
        let id = StreamId::parse(address)
            .map_err(|_| ConvictionError::ProposalNotFound(address.to_string()))?;
        let doc = self
            .store
            .load(&id)
            .await?
            .ok_or_else(|| ConvictionError::ProposalNotFound(address.to_string()))?;
        Ok(doc.decode()?)
    }

    /// Create a proposal document under the configured proposal schema.
    pub async fn create_proposal(&self, proposal: &Proposal) -> Result<StreamId> {
        let content = serde_json::to_value(proposal)?;
        let id = self
            .store
            .create(content, Some(self.config.ceramic.schemas.proposal.as_str()))
            .await?;
        info!(proposal = %id, "Created proposal document");
        Ok(id)
    }

    /// Add a proposal to the session identity's convictions record.
    ///
    /// Already-listed proposals are left alone, so this is safe to repeat
    /// when reconciling an interrupted submission.
    pub async fn link_proposal(&self, proposal: &StreamId) -> Result<StreamId> {
        let mut convictions = self.get_convictions().await?;
        if !convictions.tracks(proposal) {
            convictions.proposals.push(proposal.to_url());
        }
        self.set_convictions(&convictions).await
    }
}
