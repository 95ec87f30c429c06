//! Poll draft: title, description and a keyed list of choices

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::editor::FormDraft;
use super::errors::{ErrorSet, FieldName, FormKind};
use super::schema::PollSchema;
use super::validator::{check_choices, check_length, check_max, Validate};

/// Read-only option appended to every poll; never validated, removed or sent
pub const MANDATORY_OPTION: &str = "Invalid question/options";

/// Fewest choice rows the form keeps on screen
const MIN_CHOICE_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PollField {
    Title,
    Description,
    Choices,
}

impl FieldName for PollField {
    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Choices => "choices",
        }
    }
}

/// Stable key of a choice row; ordering of keys is submission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChoiceKey(u64);

/// Choice rows keyed by a counter owned by the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    entries: BTreeMap<ChoiceKey, String>,
    next_key: u64,
}

impl Default for Choices {
    fn default() -> Self {
        let mut choices = Self {
            entries: BTreeMap::new(),
            next_key: 0,
        };
        for _ in 0..MIN_CHOICE_ROWS {
            choices.push(String::new());
        }
        choices
    }
}

impl Choices {
    /// Build rows from texts, in the given order
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut choices = Self {
            entries: BTreeMap::new(),
            next_key: 0,
        };
        for text in texts {
            choices.push(text.into());
        }
        while choices.entries.len() < MIN_CHOICE_ROWS {
            choices.push(String::new());
        }
        choices
    }

    fn push(&mut self, text: String) -> ChoiceKey {
        let key = ChoiceKey(self.next_key);
        self.next_key += 1;
        self.entries.insert(key, text);
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: ChoiceKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = ChoiceKey> + '_ {
        self.entries.keys().copied()
    }

    /// Rows in key order
    pub fn iter(&self) -> impl Iterator<Item = (ChoiceKey, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.values().map(String::as_str)
    }

    /// Rows as rendered: editable entries, then the mandatory option with no key
    pub fn display_rows(&self) -> impl Iterator<Item = (Option<ChoiceKey>, &str)> + '_ {
        self.iter()
            .map(|(k, v)| (Some(k), v))
            .chain(std::iter::once((None, MANDATORY_OPTION)))
    }

    /// Texts to submit: key order, blank rows dropped
    pub fn ordered(&self) -> Vec<String> {
        self.texts()
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn add(mut self) -> Self {
        self.push(String::new());
        self
    }

    fn edit(mut self, key: ChoiceKey, value: String) -> Self {
        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = value;
        }
        self
    }

    fn remove(mut self, key: ChoiceKey) -> Self {
        self.entries.remove(&key);
        if self.entries.len() < MIN_CHOICE_ROWS {
            self.push(String::new());
        }
        self
    }

    fn trimmed(mut self) -> Self {
        for entry in self.entries.values_mut() {
            let trimmed = entry.trim();
            if trimmed.len() != entry.len() {
                *entry = trimmed.to_string();
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollDraft {
    pub title: String,
    pub description: String,
    pub choices: Choices,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEdit {
    Title(String),
    Description(String),
    AddChoice,
    EditChoice { key: ChoiceKey, value: String },
    RemoveChoice(ChoiceKey),
}

impl Validate for PollDraft {
    type Field = PollField;
    type Schema = PollSchema;

    fn live_errors(&self, schema: &PollSchema) -> ErrorSet<PollField> {
        ErrorSet::new()
            .with(PollField::Title, check_max(&self.title, &schema.title))
            .with(
                PollField::Description,
                check_max(&self.description, &schema.description),
            )
    }

    fn full_errors(&self, schema: &PollSchema) -> ErrorSet<PollField> {
        ErrorSet::new()
            .with(PollField::Title, check_length(&self.title, &schema.title))
            .with(
                PollField::Description,
                check_length(&self.description, &schema.description),
            )
            .with(
                PollField::Choices,
                check_choices(self.choices.texts(), &schema.choices),
            )
    }
}

impl FormDraft for PollDraft {
    type Edit = PollEdit;

    const KIND: FormKind = FormKind::Poll;

    fn reduce(self, edit: PollEdit) -> Self {
        match edit {
            PollEdit::Title(title) => Self { title, ..self },
            PollEdit::Description(description) => Self {
                description,
                ..self
            },
            PollEdit::AddChoice => Self {
                choices: self.choices.add(),
                ..self
            },
            PollEdit::EditChoice { key, value } => Self {
                choices: self.choices.edit(key, value),
                ..self
            },
            PollEdit::RemoveChoice(key) => Self {
                choices: self.choices.remove(key),
                ..self
            },
        }
    }

    fn trim(self, field: PollField) -> Self {
        match field {
            PollField::Title => Self {
                title: self.title.trim().to_string(),
                ..self
            },
            PollField::Description => Self {
                description: self.description.trim().to_string(),
                ..self
            },
            PollField::Choices => Self {
                choices: self.choices.trimmed(),
                ..self
            },
        }
    }

    fn text(&self, field: PollField) -> Option<&str> {
        match field {
            PollField::Title => Some(&self.title),
            PollField::Description => Some(&self.description),
            PollField::Choices => None,
        }
    }

    fn max_length(schema: &PollSchema, field: PollField) -> Option<usize> {
        match field {
            PollField::Title => Some(schema.title.max_length),
            PollField::Description => Some(schema.description.max_length),
            PollField::Choices => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::errors::ErrorCode;
    use crate::state::forms::schema::{ChoicesRule, LengthRule};
    use pretty_assertions::assert_eq;

    fn schema(min_items: usize) -> PollSchema {
        PollSchema {
            title: LengthRule::new(5, 80),
            description: LengthRule::new(20, 7000),
            choices: ChoicesRule {
                min_items,
                item_min_length: 1,
            },
        }
    }

    fn valid_draft() -> PollDraft {
        PollDraft {
            title: "Paint the plaza".to_string(),
            description: "Should the central plaza be repainted blue?".to_string(),
            choices: Choices::from_texts(["Yes", "No"]),
        }
    }

    #[test]
    fn test_default_has_two_empty_rows() {
        let draft = PollDraft::default();
        assert_eq!(draft.choices.len(), 2);
        assert!(draft.choices.texts().all(str::is_empty));
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(valid_draft().full_errors(&schema(2)).is_empty());
    }

    #[test]
    fn test_full_errors_are_deterministic() {
        let draft = PollDraft::default();
        assert_eq!(
            draft.full_errors(&schema(2)),
            draft.full_errors(&schema(2))
        );
    }

    #[test]
    fn test_empty_title_reports_empty() {
        let draft = PollDraft {
            title: String::new(),
            ..valid_draft()
        };
        assert_eq!(
            draft.full_errors(&schema(2)).get(PollField::Title),
            Some(ErrorCode::Empty)
        );
    }

    #[test]
    fn test_one_filled_choice_against_min_items() {
        let draft = PollDraft {
            choices: Choices::from_texts(["Yes", ""]),
            ..valid_draft()
        };
        assert_eq!(draft.full_errors(&schema(1)).get(PollField::Choices), None);
        assert_eq!(
            draft.full_errors(&schema(2)).get(PollField::Choices),
            Some(ErrorCode::Insufficient)
        );
    }

    #[test]
    fn test_live_errors_ignore_lower_bounds() {
        let errors = PollDraft::default().live_errors(&schema(2));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_live_errors_flag_long_title() {
        let draft = PollDraft {
            title: "x".repeat(81),
            ..valid_draft()
        };
        assert_eq!(
            draft.live_errors(&schema(2)).get(PollField::Title),
            Some(ErrorCode::TooLarge)
        );
    }

    #[test]
    fn test_keys_are_unique_after_remove_and_add() {
        let draft = valid_draft();
        let first = draft.choices.keys().next().unwrap();
        let draft = draft
            .reduce(PollEdit::RemoveChoice(first))
            .reduce(PollEdit::AddChoice)
            .reduce(PollEdit::AddChoice);
        let keys: Vec<ChoiceKey> = draft.choices.keys().collect();
        let mut deduped = keys.clone();
        deduped.dedup();
        assert_eq!(keys, deduped);
        assert_eq!(keys.len(), 4);
        assert!(!keys.contains(&first));
    }

    #[test]
    fn test_remove_keeps_two_rows() {
        let draft = valid_draft();
        let first = draft.choices.keys().next().unwrap();
        let draft = draft.reduce(PollEdit::RemoveChoice(first));
        assert_eq!(draft.choices.len(), 2);
        assert_eq!(draft.choices.texts().collect::<Vec<_>>(), vec!["No", ""]);
    }

    #[test]
    fn test_edit_unknown_key_is_noop() {
        let draft = valid_draft();
        let edited = draft.clone().reduce(PollEdit::EditChoice {
            key: ChoiceKey(99),
            value: "Maybe".to_string(),
        });
        assert_eq!(edited, draft);
    }

    #[test]
    fn test_ordered_follows_keys_and_drops_blanks() {
        let draft = PollDraft::default().reduce(PollEdit::AddChoice);
        let keys: Vec<ChoiceKey> = draft.choices.keys().collect();
        let draft = draft
            .reduce(PollEdit::EditChoice {
                key: keys[2],
                value: "C".to_string(),
            })
            .reduce(PollEdit::EditChoice {
                key: keys[0],
                value: "A".to_string(),
            });
        assert_eq!(draft.choices.ordered(), vec!["A", "C"]);
    }

    #[test]
    fn test_display_rows_end_with_mandatory_option() {
        let draft = valid_draft();
        let rows: Vec<_> = draft.choices.display_rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.last(), Some(&(None, MANDATORY_OPTION)));
        assert!(!draft.choices.ordered().contains(&MANDATORY_OPTION.to_string()));
    }

    #[test]
    fn test_trim_choices() {
        let draft = PollDraft {
            choices: Choices::from_texts(["  Yes ", "   "]),
            ..valid_draft()
        };
        let draft = draft.trim(PollField::Choices);
        assert_eq!(draft.choices.texts().collect::<Vec<_>>(), vec!["Yes", ""]);
    }
}
