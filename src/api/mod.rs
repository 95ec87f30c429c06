//! Governance API client module

mod client;
mod traits;
mod types;

pub use client::{ApiError, GovernanceClient, DEFAULT_ADDRESS};
pub use traits::GovernanceApi;
pub use types::{ApiResponse, NewGovernanceProposal, NewPollProposal, Proposal};

#[cfg(test)]
pub use traits::MockGovernanceApi;
