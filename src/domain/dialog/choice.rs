//! Enumerated choices with synonym matching.
//!
//! Input matches a choice when it equals the choice's label or one of its
//! synonyms, ignoring case and surrounding whitespace. Matching is exact:
//! there is no partial or fuzzy matching. When synonyms overlap across
//! choices the first choice in the set wins; `ChoiceSet::find_overlap`
//! lets registration reject such sets up front.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::FoundChoice;

/// One selectable option of a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            synonyms: Vec::new(),
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// True when `input` is this choice's label or one of its synonyms.
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        self.terms().any(|term| term.trim().to_lowercase() == input)
    }

    fn terms(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.label).chain(self.synonyms.iter())
    }
}

/// Ordered set of choices offered by one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    /// Builds a set of plain labels without synonyms.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels.into_iter().map(Choice::new).collect())
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn labels(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.label.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Finds the first choice matching `input`.
    pub fn recognize(&self, input: &str) -> Option<FoundChoice> {
        self.choices
            .iter()
            .position(|choice| choice.matches(input))
            .map(|index| FoundChoice {
                value: self.choices[index].label.clone(),
                index,
            })
    }

    /// Returns a term (label or synonym) claimed by more than one choice.
    pub fn find_overlap(&self) -> Option<String> {
        let mut owners: HashMap<String, usize> = HashMap::new();
        for (index, choice) in self.choices.iter().enumerate() {
            for term in choice.terms() {
                let normalized = term.trim().to_lowercase();
                match owners.get(&normalized) {
                    Some(owner) if *owner != index => return Some(term.trim().to_string()),
                    _ => {
                        owners.insert(normalized, index);
                    }
                }
            }
        }
        None
    }
}
