//! Per-field error codes and the error set produced by validation

use std::collections::BTreeMap;
use std::fmt;

/// Which form an error belongs to, used to build message keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Governance,
    Poll,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Governance => "governance",
            Self::Poll => "poll",
        }
    }

    /// Message key shown when the voting-power gate blocks submission
    pub fn submission_vp_not_met_key(self) -> String {
        format!("error.{}.submission_vp_not_met", self.as_str())
    }
}

/// A named field of a form
pub trait FieldName: Copy + Ord + fmt::Debug {
    /// Wire name of the field
    fn name(self) -> &'static str;

    /// Prefix used when building message keys; usually the wire name
    fn message_stem(self) -> &'static str {
        self.name()
    }
}

/// Rule violation for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Empty,
    TooShort,
    TooLarge,
    /// Not enough non-empty entries in a list field
    Insufficient,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLarge => "too_large",
            Self::Insufficient => "insufficient",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current error per field plus a whole-form slot.
///
/// Validation passes always build a fresh set; only [`ErrorSet::merge`]
/// combines two sets, and that is reserved for externally sourced errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSet<F: Ord> {
    fields: BTreeMap<F, ErrorCode>,
    form: Option<String>,
}

impl<F: Ord> Default for ErrorSet<F> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            form: None,
        }
    }
}

impl<F: FieldName> ErrorSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error set carrying only a whole-form message
    pub fn form_message(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            form: Some(message.into()),
        }
    }

    /// Record the outcome of a rule chain; `None` leaves the field clean
    pub fn record(&mut self, field: F, code: Option<ErrorCode>) {
        match code {
            Some(code) => {
                self.fields.insert(field, code);
            }
            None => {
                self.fields.remove(&field);
            }
        }
    }

    pub fn with(mut self, field: F, code: Option<ErrorCode>) -> Self {
        self.record(field, code);
        self
    }

    pub fn get(&self, field: F) -> Option<ErrorCode> {
        self.fields.get(&field).copied()
    }

    pub fn has_error(&self, field: F) -> bool {
        self.fields.contains_key(&field)
    }

    /// The whole-form message, if any
    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_none()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.form.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, ErrorCode)> + '_ {
        self.fields.iter().map(|(field, code)| (*field, *code))
    }

    /// Overlay `other` on top of this set
    pub fn merge(&mut self, other: ErrorSet<F>) {
        self.fields.extend(other.fields);
        if other.form.is_some() {
            self.form = other.form;
        }
    }

    /// Message key for a field error, e.g. `error.poll.title_empty`
    pub fn message_key(&self, kind: FormKind, field: F) -> Option<String> {
        self.get(field).map(|code| {
            format!(
                "error.{}.{}_{}",
                kind.as_str(),
                field.message_stem(),
                code.as_str()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Field {
        Title,
        Linked,
    }

    impl FieldName for Field {
        fn name(self) -> &'static str {
            match self {
                Field::Title => "title",
                Field::Linked => "linked_proposal_id",
            }
        }

        fn message_stem(self) -> &'static str {
            match self {
                Field::Linked => "linked_proposal",
                other => other.name(),
            }
        }
    }

    #[test]
    fn test_new_set_is_empty() {
        let set: ErrorSet<Field> = ErrorSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_record_none_clears_field() {
        let mut set = ErrorSet::new().with(Field::Title, Some(ErrorCode::Empty));
        assert!(set.has_error(Field::Title));
        set.record(Field::Title, None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_form_message_counts_as_error() {
        let set: ErrorSet<Field> = ErrorSet::form_message("boom");
        assert!(!set.is_empty());
        assert_eq!(set.form(), Some("boom"));
    }

    #[test]
    fn test_merge_overlays_fields_and_form() {
        let mut set = ErrorSet::new().with(Field::Title, Some(ErrorCode::TooShort));
        set.merge(
            ErrorSet::form_message("rejected").with(Field::Title, Some(ErrorCode::TooLarge)),
        );
        assert_eq!(set.get(Field::Title), Some(ErrorCode::TooLarge));
        assert_eq!(set.form(), Some("rejected"));
    }

    #[test]
    fn test_merge_keeps_form_when_other_has_none() {
        let mut set: ErrorSet<Field> = ErrorSet::form_message("first");
        set.merge(ErrorSet::new());
        assert_eq!(set.form(), Some("first"));
    }

    #[test]
    fn test_message_key_uses_stem() {
        let set = ErrorSet::new()
            .with(Field::Title, Some(ErrorCode::Empty))
            .with(Field::Linked, Some(ErrorCode::Empty));
        assert_eq!(
            set.message_key(FormKind::Poll, Field::Title).as_deref(),
            Some("error.poll.title_empty")
        );
        assert_eq!(
            set.message_key(FormKind::Governance, Field::Linked).as_deref(),
            Some("error.governance.linked_proposal_empty")
        );
    }

    #[test]
    fn test_vp_not_met_key() {
        assert_eq!(
            FormKind::Poll.submission_vp_not_met_key(),
            "error.poll.submission_vp_not_met"
        );
    }
}
