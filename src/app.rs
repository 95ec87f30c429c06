//! Submission orchestration
//!
//! [`App`] ties an editor to the governance API: it sends a draft exactly
//! once per transition into `Validated`, caches what the server created and
//! tells the caller where to navigate. It also resolves the voting-power gate
//! and the linked-proposal prefill.
//!
//! Editors are borrowed mutably for the whole of a submission, so a dropped
//! submission future never writes into an editor. Results fetched
//! independently of an editor borrow are applied through an
//! [`EditorTicket`] and ignored once that session is gone.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::api::{ApiError, GovernanceApi, NewGovernanceProposal, NewPollProposal, Proposal};
use crate::state::{
    Editor, EditorTicket, ErrorSet, FormDraft, GovernanceDraft, GovernanceEdit, Navigation,
    PollDraft, VotingPowerGate,
};

/// Creation request for either proposal type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProposal {
    Governance(NewGovernanceProposal),
    Poll(NewPollProposal),
}

/// A draft that can be sent to the creation endpoint
pub trait Submittable: FormDraft {
    fn payload(&self) -> NewProposal;
}

impl Submittable for GovernanceDraft {
    fn payload(&self) -> NewProposal {
        NewProposal::Governance(NewGovernanceProposal::from(self))
    }
}

impl Submittable for PollDraft {
    fn payload(&self) -> NewProposal {
        NewProposal::Poll(NewPollProposal::from(self))
    }
}

/// Result of a submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The voting-power gate is pending or not met; nothing was validated
    Blocked,
    /// The draft has field errors
    Invalid,
    /// This draft was already sent for the current validation
    AlreadySubmitted,
    /// The proposal was created
    Created(Navigation),
    /// The server rejected the request; the message is in the form slot
    Rejected(String),
}

/// Message shown for a failed remote call: the server's own message if it
/// sent one, otherwise the error text
pub fn error_message(err: &anyhow::Error) -> String {
    err.downcast_ref::<ApiError>()
        .and_then(ApiError::server_message)
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

/// Outcome of fetching a linked proposal for prefill
#[derive(Debug)]
pub enum LinkedFetch {
    Found(GovernanceEdit),
    Missing,
    Failed(String),
}

/// Apply a prefill fetched for `ticket`. Returns false if the editor
/// session has moved on or there was nothing to apply.
pub fn apply_linked(
    editor: &mut Editor<GovernanceDraft>,
    ticket: EditorTicket,
    fetched: LinkedFetch,
) -> bool {
    match fetched {
        LinkedFetch::Found(edit) => editor.set_if_current(ticket, edit),
        LinkedFetch::Missing => false,
        LinkedFetch::Failed(message) => {
            editor.error_if_current(ticket, ErrorSet::form_message(message))
        }
    }
}

/// Submission core bound to one governance API
pub struct App<A: GovernanceApi> {
    api: A,
    space: String,
    /// Proposals created in this session, by id
    proposals: HashMap<String, Proposal>,
}

impl<A: GovernanceApi> App<A> {
    pub fn new(api: A, space: impl Into<String>) -> Self {
        Self {
            api,
            space: space.into(),
            proposals: HashMap::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn space(&self) -> &str {
        &self.space
    }

    /// A proposal created earlier in this session
    pub fn cached(&self, id: &str) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// Fetch voting power for `address` and resolve the gate with it
    pub async fn load_voting_power(&self, gate: &mut VotingPowerGate, address: &str) {
        gate.reload();
        let power = self.api.get_voting_power(address, &self.space).await;
        gate.resolve(power);
    }

    /// Fetch a linked proposal and turn it into a prefill edit
    pub async fn fetch_linked(&self, id: &str) -> LinkedFetch {
        match self.api.get_proposal(id).await {
            Ok(Some(proposal)) => LinkedFetch::Found(GovernanceEdit::Link {
                prefill: proposal.linked_prefill(),
                id: proposal.id,
            }),
            Ok(None) => LinkedFetch::Missing,
            Err(err) => {
                warn!(id, "Failed to fetch linked proposal: {err:#}");
                LinkedFetch::Failed(error_message(&err))
            }
        }
    }

    /// Validate the draft and, on the transition into `Validated`, create it.
    ///
    /// The creation endpoint is called at most once per validation pass:
    /// calling this again without an edit in between returns
    /// [`SubmitOutcome::AlreadySubmitted`]. A rejection writes the message
    /// into the form slot and clears `validated`, so the user can retry.
    pub async fn submit<D: Submittable>(
        &mut self,
        editor: &mut Editor<D>,
        gate: &VotingPowerGate,
    ) -> SubmitOutcome {
        if !gate.allows_submit() {
            info!(
                form = D::KIND.as_str(),
                loading = gate.is_loading(),
                "Submission blocked by voting power"
            );
            return SubmitOutcome::Blocked;
        }

        if !editor.validate() {
            return if editor.is_validated() {
                SubmitOutcome::AlreadySubmitted
            } else {
                SubmitOutcome::Invalid
            };
        }

        let result = match editor.value().payload() {
            NewProposal::Governance(proposal) => {
                self.api.create_proposal_governance(&proposal).await
            }
            NewProposal::Poll(proposal) => self.api.create_proposal_poll(&proposal).await,
        };

        match result {
            Ok(proposal) => {
                info!(form = D::KIND.as_str(), id = %proposal.id, title = %proposal.title, "Proposal created");
                let navigation = Navigation::created(proposal.id.clone());
                self.proposals.insert(proposal.id.clone(), proposal);
                SubmitOutcome::Created(navigation)
            }
            Err(err) => {
                warn!(form = D::KIND.as_str(), "Proposal creation failed: {err:#}");
                let message = error_message(&err);
                editor.error(ErrorSet::form_message(message.clone()));
                SubmitOutcome::Rejected(message)
            }
        }
    }
}
