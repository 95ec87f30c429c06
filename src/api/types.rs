//! Wire types for the governance API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GovernanceDraft, LinkedPrefill, PollDraft};

/// Envelope wrapping every governance API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Proposal as returned by the governance API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub status: String,
    /// Type-specific body; for governance and poll proposals this holds the
    /// submitted sections
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Sections a follow-up governance proposal copies from this one.
    /// Missing or malformed sections come back empty.
    pub fn linked_prefill(&self) -> LinkedPrefill {
        serde_json::from_value(self.configuration.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGovernanceProposal {
    pub linked_proposal_id: String,
    pub title: String,
    pub summary: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    pub motivation: String,
    pub specification: String,
    pub impacts: String,
    pub implementation_pathways: String,
    pub conclusion: String,
}

impl From<&GovernanceDraft> for NewGovernanceProposal {
    fn from(draft: &GovernanceDraft) -> Self {
        Self {
            linked_proposal_id: draft.linked_proposal_id.clone().unwrap_or_default(),
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            abstract_: draft.abstract_.clone(),
            motivation: draft.motivation.clone(),
            specification: draft.specification.clone(),
            impacts: draft.impacts.clone(),
            implementation_pathways: draft.implementation_pathways.clone(),
            conclusion: draft.conclusion.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPollProposal {
    pub title: String,
    pub description: String,
    pub choices: Vec<String>,
}

impl From<&PollDraft> for NewPollProposal {
    fn from(draft: &PollDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            choices: draft.choices.ordered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Choices;

    #[test]
    fn test_proposal_deserializes_with_missing_optionals() {
        let json = r#"{"id": "p1", "title": "Hello", "type": "poll"}"#;
        let proposal: Proposal = serde_json::from_str(json).unwrap();
        assert_eq!(proposal.kind, "poll");
        assert!(proposal.created_at.is_none());
        assert!(proposal.configuration.is_null());
    }

    #[test]
    fn test_linked_prefill_from_configuration() {
        let json = r#"{
            "id": "p1",
            "title": "Earlier poll",
            "configuration": {"summary": "S", "abstract": "A", "choices": ["x"]}
        }"#;
        let proposal: Proposal = serde_json::from_str(json).unwrap();
        let prefill = proposal.linked_prefill();
        assert_eq!(prefill.summary, "S");
        assert_eq!(prefill.abstract_, "A");
        assert_eq!(prefill.motivation, "");
    }

    #[test]
    fn test_linked_prefill_tolerates_null_configuration() {
        let json = r#"{"id": "p1", "title": "t"}"#;
        let proposal: Proposal = serde_json::from_str(json).unwrap();
        assert_eq!(proposal.linked_prefill(), LinkedPrefill::default());
    }

    #[test]
    fn test_governance_payload_uses_abstract_key() {
        let draft = GovernanceDraft {
            linked_proposal_id: Some("p1".to_string()),
            abstract_: "A".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(NewGovernanceProposal::from(&draft)).unwrap();
        assert_eq!(json["abstract"], "A");
        assert_eq!(json["linked_proposal_id"], "p1");
    }

    #[test]
    fn test_poll_payload_orders_choices() {
        let draft = PollDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            choices: Choices::from_texts(["B", "", "A"]),
        };
        let payload = NewPollProposal::from(&draft);
        assert_eq!(payload.choices, vec!["B", "A"]);
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"ok": false, "error": "Title already taken"}"#;
        let body: ApiResponse<Proposal> = serde_json::from_str(json).unwrap();
        assert!(!body.ok);
        assert!(body.data.is_none());
        assert_eq!(body.error.as_deref(), Some("Title already taken"));
    }
}
