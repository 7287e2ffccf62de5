//! Display labels, synonyms and the coded values the scoring model expects.

use once_cell::sync::Lazy;

use crate::domain::dialog::{Choice, ChoiceSet};

/// A selectable answer and the code stored for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodedChoice {
    pub label: &'static str,
    pub code: &'static str,
    pub synonyms: &'static [&'static str],
}

/// Candidate treatments by procedure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Treatment {
    pub code: &'static str,
    pub name: &'static str,
}

pub const TREATMENTS: &[Treatment] = &[
    Treatment { code: "22554", name: "Anterior Interbody Fusion" },
    Treatment { code: "22524", name: "Percutaneous Vertebral Augmentation" },
    Treatment { code: "97111", name: "Physical Therapy" },
    Treatment { code: "97110", name: "OTC Rx" },
    Treatment { code: "76910", name: "Epidural" },
    Treatment { code: "76911", name: "Physiatry" },
    Treatment { code: "63030", name: "Posterior Lamina Removal with Decomp" },
];

pub const BIOLOGICAL_SEXES: &[CodedChoice] = &[
    CodedChoice { label: "Unspecified", code: "unspecified", synonyms: &[] },
    CodedChoice { label: "Intersex", code: "intersex", synonyms: &[] },
    CodedChoice { label: "Female", code: "female", synonyms: &["Woman", "Girl"] },
    CodedChoice { label: "Male", code: "male", synonyms: &["Man", "Boy"] },
];

pub const RACES: &[CodedChoice] = &[
    CodedChoice { label: "African American", code: "B", synonyms: &["Black"] },
    CodedChoice { label: "Caucasian", code: "W", synonyms: &["White"] },
    CodedChoice { label: "Asian", code: "A", synonyms: &[] },
    CodedChoice {
        label: "Hispanic",
        code: "H",
        synonyms: &["Latino", "Latina", "Mexican", "Mexican American"],
    },
    CodedChoice { label: "Other", code: "U", synonyms: &[] },
];

pub static PAIN_LEVELS: Lazy<ChoiceSet> =
    Lazy::new(|| ChoiceSet::from_labels((1..=10).map(|level| level.to_string())));

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn treatment_name(code: &str) -> Option<&'static str> {
    TREATMENTS.iter().find(|t| t.code == code).map(|t| t.name)
}

pub fn treatment_codes() -> Vec<String> {
    TREATMENTS.iter().map(|t| t.code.to_string()).collect()
}

/// Builds the prompt choice set for a coded table.
pub fn choice_set(options: &[CodedChoice]) -> ChoiceSet {
    ChoiceSet::new(
        options
            .iter()
            .map(|option| Choice::new(option.label).with_synonyms(option.synonyms.iter().copied()))
            .collect(),
    )
}

/// Code stored for the choice with this display label.
pub fn code_for(options: &[CodedChoice], label: &str) -> Option<&'static str> {
    options.iter().find(|o| o.label == label).map(|o| o.code)
}

/// Display label for a stored code.
pub fn label_for(options: &[CodedChoice], code: &str) -> Option<&'static str> {
    options.iter().find(|o| o.code == code).map(|o| o.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_treatment_has_a_name() {
        assert_eq!(TREATMENTS.len(), 7);
        assert_eq!(treatment_name("97111"), Some("Physical Therapy"));
        assert_eq!(treatment_name("00000"), None);
        assert_eq!(treatment_codes()[0], "22554");
    }

    #[test]
    fn test_sex_synonyms_resolve_to_codes() {
        let set = choice_set(BIOLOGICAL_SEXES);
        let found = set.recognize("girl").unwrap();
        assert_eq!(code_for(BIOLOGICAL_SEXES, &found.value), Some("female"));
    }

    #[test]
    fn test_race_codes() {
        let set = choice_set(RACES);
        let found = set.recognize("mexican american").unwrap();
        assert_eq!(code_for(RACES, &found.value), Some("H"));
        assert_eq!(label_for(RACES, "W"), Some("Caucasian"));
    }

    #[test]
    fn test_coded_tables_have_no_overlapping_terms() {
        assert!(choice_set(BIOLOGICAL_SEXES).find_overlap().is_none());
        assert!(choice_set(RACES).find_overlap().is_none());
    }

    #[test]
    fn test_pain_levels_are_one_through_ten() {
        assert_eq!(PAIN_LEVELS.len(), 10);
        assert_eq!(PAIN_LEVELS.recognize("10").unwrap().index, 9);
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }
}
