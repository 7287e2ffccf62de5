//! Typed values passed between dialogs within a turn.
//!
//! A `DialogValue` is what a step hands to the next step, what a prompt
//! resolves to, and what a finished dialog returns to its parent.

use serde::{Deserialize, Serialize};

/// A choice picked from a `ChoiceSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundChoice {
    /// Display label of the matched choice
    pub value: String,
    /// Position of the matched choice in its set
    pub index: usize,
}

/// Value threaded through waterfall steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum DialogValue {
    #[default]
    None,
    Bool(bool),
    Integer(i64),
    Text(String),
    Choice(FoundChoice),
}

impl DialogValue {
    pub fn is_none(&self) -> bool {
        matches!(self, DialogValue::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DialogValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DialogValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DialogValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&FoundChoice> {
        match self {
            DialogValue::Choice(c) => Some(c),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DialogValue::None => "none",
            DialogValue::Bool(_) => "bool",
            DialogValue::Integer(_) => "integer",
            DialogValue::Text(_) => "text",
            DialogValue::Choice(_) => "choice",
        }
    }
}

impl From<bool> for DialogValue {
    fn from(value: bool) -> Self {
        DialogValue::Bool(value)
    }
}

impl From<i64> for DialogValue {
    fn from(value: i64) -> Self {
        DialogValue::Integer(value)
    }
}

impl From<&str> for DialogValue {
    fn from(value: &str) -> Self {
        DialogValue::Text(value.to_string())
    }
}

impl From<String> for DialogValue {
    fn from(value: String) -> Self {
        DialogValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(DialogValue::Bool(true).as_bool(), Some(true));
        assert_eq!(DialogValue::Integer(45).as_integer(), Some(45));
        assert_eq!(DialogValue::from("hi").as_text(), Some("hi"));
        assert_eq!(DialogValue::Integer(45).as_bool(), None);
        assert!(DialogValue::default().is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DialogValue::None.kind(), "none");
        let choice = DialogValue::Choice(FoundChoice {
            value: "Female".to_string(),
            index: 2,
        });
        assert_eq!(choice.kind(), "choice");
        assert_eq!(choice.as_choice().map(|c| c.index), Some(2));
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(DialogValue::Integer(7)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "value": 7}));
    }
}
