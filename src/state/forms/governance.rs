//! Governance proposal draft

use serde::{Deserialize, Serialize};

use super::editor::FormDraft;
use super::errors::{ErrorSet, FieldName, FormKind};
use super::schema::{GovernanceSchema, LengthRule};
use super::validator::{check_length, check_max, check_required, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GovernanceField {
    LinkedProposal,
    Title,
    Summary,
    Abstract,
    Motivation,
    Specification,
    Impacts,
    ImplementationPathways,
    Conclusion,
}

impl GovernanceField {
    /// Free-text sections in form order
    pub const TEXT: [GovernanceField; 8] = [
        Self::Title,
        Self::Summary,
        Self::Abstract,
        Self::Motivation,
        Self::Specification,
        Self::Impacts,
        Self::ImplementationPathways,
        Self::Conclusion,
    ];

    fn rule(self, schema: &GovernanceSchema) -> Option<&LengthRule> {
        match self {
            Self::LinkedProposal => None,
            Self::Title => Some(&schema.title),
            Self::Summary => Some(&schema.summary),
            Self::Abstract => Some(&schema.abstract_),
            Self::Motivation => Some(&schema.motivation),
            Self::Specification => Some(&schema.specification),
            Self::Impacts => Some(&schema.impacts),
            Self::ImplementationPathways => Some(&schema.implementation_pathways),
            Self::Conclusion => Some(&schema.conclusion),
        }
    }
}

impl FieldName for GovernanceField {
    fn name(self) -> &'static str {
        match self {
            Self::LinkedProposal => "linked_proposal_id",
            Self::Title => "title",
            Self::Summary => "summary",
            Self::Abstract => "abstract",
            Self::Motivation => "motivation",
            Self::Specification => "specification",
            Self::Impacts => "impacts",
            Self::ImplementationPathways => "implementation_pathways",
            Self::Conclusion => "conclusion",
        }
    }

    fn message_stem(self) -> &'static str {
        match self {
            Self::LinkedProposal => "linked_proposal",
            other => other.name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceDraft {
    pub linked_proposal_id: Option<String>,
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

/// Sections copied from an earlier proposal this one follows up on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedPrefill {
    pub summary: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    pub motivation: String,
    pub specification: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovernanceEdit {
    /// Replace the value of one field
    Set(GovernanceField, String),
    /// Link an earlier proposal and copy its sections
    Link { id: String, prefill: LinkedPrefill },
}

impl GovernanceDraft {
    fn slot(&mut self, field: GovernanceField) -> Option<&mut String> {
        match field {
            GovernanceField::LinkedProposal => None,
            GovernanceField::Title => Some(&mut self.title),
            GovernanceField::Summary => Some(&mut self.summary),
            GovernanceField::Abstract => Some(&mut self.abstract_),
            GovernanceField::Motivation => Some(&mut self.motivation),
            GovernanceField::Specification => Some(&mut self.specification),
            GovernanceField::Impacts => Some(&mut self.impacts),
            GovernanceField::ImplementationPathways => Some(&mut self.implementation_pathways),
            GovernanceField::Conclusion => Some(&mut self.conclusion),
        }
    }
}

impl Validate for GovernanceDraft {
    type Field = GovernanceField;
    type Schema = GovernanceSchema;

    fn live_errors(&self, schema: &GovernanceSchema) -> ErrorSet<GovernanceField> {
        let mut errors = ErrorSet::new();
        for field in GovernanceField::TEXT {
            if let (Some(value), Some(rule)) = (self.text(field), field.rule(schema)) {
                errors.record(field, check_max(value, rule));
            }
        }
        errors
    }

    fn full_errors(&self, schema: &GovernanceSchema) -> ErrorSet<GovernanceField> {
        let mut errors = ErrorSet::new().with(
            GovernanceField::LinkedProposal,
            check_required(self.linked_proposal_id.as_deref()),
        );
        for field in GovernanceField::TEXT {
            if let (Some(value), Some(rule)) = (self.text(field), field.rule(schema)) {
                errors.record(field, check_length(value, rule));
            }
        }
        errors
    }
}

impl FormDraft for GovernanceDraft {
    type Edit = GovernanceEdit;

    const KIND: FormKind = FormKind::Governance;

    fn reduce(mut self, edit: GovernanceEdit) -> Self {
        match edit {
            GovernanceEdit::Set(GovernanceField::LinkedProposal, id) => {
                self.linked_proposal_id = Some(id).filter(|id| !id.is_empty());
            }
            GovernanceEdit::Set(field, value) => {
                if let Some(slot) = self.slot(field) {
                    *slot = value;
                }
            }
            GovernanceEdit::Link { id, prefill } => {
                self.linked_proposal_id = Some(id);
                self.summary = prefill.summary;
                self.abstract_ = prefill.abstract_;
                self.motivation = prefill.motivation;
                self.specification = prefill.specification;
                self.conclusion = prefill.conclusion;
            }
        }
        self
    }

    fn trim(mut self, field: GovernanceField) -> Self {
        if let Some(slot) = self.slot(field) {
            let trimmed = slot.trim();
            if trimmed.len() != slot.len() {
                *slot = trimmed.to_string();
            }
        }
        self
    }

    fn text(&self, field: GovernanceField) -> Option<&str> {
        match field {
            GovernanceField::LinkedProposal => None,
            GovernanceField::Title => Some(&self.title),
            GovernanceField::Summary => Some(&self.summary),
            GovernanceField::Abstract => Some(&self.abstract_),
            GovernanceField::Motivation => Some(&self.motivation),
            GovernanceField::Specification => Some(&self.specification),
            GovernanceField::Impacts => Some(&self.impacts),
            GovernanceField::ImplementationPathways => Some(&self.implementation_pathways),
            GovernanceField::Conclusion => Some(&self.conclusion),
        }
    }

    fn max_length(schema: &GovernanceSchema, field: GovernanceField) -> Option<usize> {
        field.rule(schema).map(|rule| rule.max_length)
    }
}
