//! Trait abstraction for the governance API to enable mocking in tests

use anyhow::Result;
use async_trait::async_trait;

use super::types::{NewGovernanceProposal, NewPollProposal, Proposal};

/// Remote operations the submission forms depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GovernanceApi: Send + Sync {
    /// Create a governance proposal
    async fn create_proposal_governance(
        &self,
        proposal: &NewGovernanceProposal,
    ) -> Result<Proposal>;

    /// Create a poll proposal
    async fn create_proposal_poll(&self, proposal: &NewPollProposal) -> Result<Proposal>;

    /// Fetch a proposal by id; `None` if it does not exist
    async fn get_proposal(&self, id: &str) -> Result<Option<Proposal>>;

    /// Voting power of `address` within `space`
    async fn get_voting_power(&self, address: &str, space: &str) -> Result<f64>;
}
