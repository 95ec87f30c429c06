//! Field validation rules
//!
//! Every rule chain is "first failure wins": the checks for a field run in a
//! fixed order and the first failing one is the field's error. Validation is
//! pure and never fails; violations come back as an [`ErrorSet`].

use super::errors::{ErrorCode, ErrorSet, FieldName};
use super::schema::{ChoicesRule, LengthRule};

/// A draft that can be checked against its schema
pub trait Validate {
    type Field: FieldName;
    type Schema;

    /// Cheap upper-bound checks run on every edit
    fn live_errors(&self, schema: &Self::Schema) -> ErrorSet<Self::Field>;

    /// Complete checks run on an explicit validate request
    fn full_errors(&self, schema: &Self::Schema) -> ErrorSet<Self::Field>;
}

/// Length in characters, as shown by the character counter
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Live rule: only the upper bound
pub fn check_max(value: &str, rule: &LengthRule) -> Option<ErrorCode> {
    (char_len(value) > rule.max_length).then_some(ErrorCode::TooLarge)
}

/// Full rule chain for a text field: empty, then too short, then too large
pub fn check_length(value: &str, rule: &LengthRule) -> Option<ErrorCode> {
    let len = char_len(value);
    if len == 0 {
        Some(ErrorCode::Empty)
    } else if len < rule.min_length {
        Some(ErrorCode::TooShort)
    } else if len > rule.max_length {
        Some(ErrorCode::TooLarge)
    } else {
        None
    }
}

/// Required reference field such as a linked proposal id
pub fn check_required(value: Option<&str>) -> Option<ErrorCode> {
    match value {
        Some(v) if !v.is_empty() => None,
        _ => Some(ErrorCode::Empty),
    }
}

/// Full rule chain for a choice list: enough filled entries, then at least
/// one filled entry, then at least one entry long enough
pub fn check_choices<'a, I>(choices: I, rule: &ChoicesRule) -> Option<ErrorCode>
where
    I: IntoIterator<Item = &'a str>,
{
    let filled: Vec<&str> = choices.into_iter().filter(|c| !c.is_empty()).collect();
    if filled.len() < rule.min_items {
        Some(ErrorCode::Insufficient)
    } else if filled.is_empty() {
        Some(ErrorCode::Empty)
    } else if !filled.iter().any(|c| char_len(c) >= rule.item_min_length) {
        Some(ErrorCode::TooShort)
    } else {
        None
    }
}
