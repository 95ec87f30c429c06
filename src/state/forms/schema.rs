//! Declarative field constraints for the submission forms

use serde::{Deserialize, Serialize};

/// Length bounds for a single text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRule {
    pub min_length: usize,
    pub max_length: usize,
}

impl LengthRule {
    pub const fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }
}

/// Constraints for a multi-choice list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicesRule {
    /// Minimum number of non-empty entries
    pub min_items: usize,
    /// At least one entry must reach this length
    pub item_min_length: usize,
}

/// Constraints for the governance proposal form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceSchema {
    pub title: LengthRule,
    pub summary: LengthRule,
    #[serde(rename = "abstract")]
    pub abstract_: LengthRule,
    pub motivation: LengthRule,
    pub specification: LengthRule,
    pub impacts: LengthRule,
    pub implementation_pathways: LengthRule,
    pub conclusion: LengthRule,
}

impl Default for GovernanceSchema {
    fn default() -> Self {
        Self {
            title: LengthRule::new(1, 80),
            summary: LengthRule::new(20, 500),
            abstract_: LengthRule::new(20, 1500),
            motivation: LengthRule::new(20, 7000),
            specification: LengthRule::new(20, 3500),
            impacts: LengthRule::new(20, 3500),
            implementation_pathways: LengthRule::new(20, 3500),
            conclusion: LengthRule::new(20, 3500),
        }
    }
}

/// Constraints for the poll form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSchema {
    pub title: LengthRule,
    pub description: LengthRule,
    pub choices: ChoicesRule,
}

impl Default for PollSchema {
    fn default() -> Self {
        Self {
            title: LengthRule::new(5, 80),
            description: LengthRule::new(20, 7000),
            choices: ChoicesRule {
                min_items: 2,
                item_min_length: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_schema_partial_override() {
        let json = r#"{"title": {"min_length": 3, "max_length": 40}}"#;
        let schema: GovernanceSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.title, LengthRule::new(3, 40));
        assert_eq!(schema.summary, GovernanceSchema::default().summary);
    }

    #[test]
    fn test_abstract_uses_plain_key() {
        let json = serde_json::to_value(GovernanceSchema::default()).unwrap();
        assert!(json.get("abstract").is_some());
        assert!(json.get("abstract_").is_none());
    }

    #[test]
    fn test_poll_defaults_require_two_choices() {
        let schema = PollSchema::default();
        assert_eq!(schema.choices.min_items, 2);
        assert!(schema.title.min_length <= schema.title.max_length);
    }
}
