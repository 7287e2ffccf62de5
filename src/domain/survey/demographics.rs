//! Answers collected by the back-pain survey.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::dialog::DomainRecord;

use super::translations::yes_no;

/// Yes/no health history questions, in the order the survey asks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthQuestion {
    CancerHistory,
    PsychiatricCare,
    PhysicalTherapy,
    CognitiveBehavioralTherapy,
    PreviousBackSurgery,
    Fever,
    FecalIncontinence,
    OpioidUse,
}

impl HealthQuestion {
    pub const ALL: [HealthQuestion; 8] = [
        HealthQuestion::CancerHistory,
        HealthQuestion::PsychiatricCare,
        HealthQuestion::PhysicalTherapy,
        HealthQuestion::CognitiveBehavioralTherapy,
        HealthQuestion::PreviousBackSurgery,
        HealthQuestion::Fever,
        HealthQuestion::FecalIncontinence,
        HealthQuestion::OpioidUse,
    ];

    pub fn prompt(&self) -> &'static str {
        match self {
            HealthQuestion::CancerHistory => "Have you ever been diagnosed with cancer?",
            HealthQuestion::PsychiatricCare => "Have you ever received psychiatric care?",
            HealthQuestion::PhysicalTherapy => "Have you had physical therapy for your back pain?",
            HealthQuestion::CognitiveBehavioralTherapy => {
                "Have you tried cognitive behavioral therapy for your back pain?"
            }
            HealthQuestion::PreviousBackSurgery => "Have you had back surgery before?",
            HealthQuestion::Fever => "Do you currently have a fever?",
            HealthQuestion::FecalIncontinence => "Have you experienced any fecal incontinence?",
            HealthQuestion::OpioidUse => "Are you currently taking opioids for your pain?",
        }
    }

    /// The question asked after this one, if any.
    pub fn next(&self) -> Option<HealthQuestion> {
        let position = Self::ALL.iter().position(|q| q == self)?;
        Self::ALL.get(position + 1).copied()
    }
}

/// Demographic and health answers for one conversation.
///
/// Values keep the coded form the scoring model expects: sex and race codes,
/// `"yes"`/`"no"` flags, and numbers as strings. Submitted postback data may
/// use either camelCase or the PascalCase names of older clients, and may send
/// numbers or booleans where a string is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackPainDemographics {
    #[serde(default, deserialize_with = "lenient_string", alias = "Age")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "BiologicalSex", alias = "Sex")]
    pub biological_sex: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "Race")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "LevelOfPain")]
    pub level_of_pain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "CancerHistory")]
    pub cancer_history: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "PsychiatricCare")]
    pub psychiatric_care: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "HadPhysicalTherapy")]
    pub had_physical_therapy: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "CognitiveBehavioralTherapy")]
    pub cognitive_behavioral_therapy: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "PreviousBackSurgery")]
    pub previous_back_surgery: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "Fever")]
    pub fever: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "FecalIncontinence")]
    pub fecal_incontinence: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", alias = "OpioidUse")]
    pub opioid_use: Option<String>,
}

/// Reads a string, number or boolean as an optional string. Booleans become
/// the `"yes"`/`"no"` codes.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Number(number) => number.to_string(),
        Loose::Flag(flag) => yes_no(flag).to_string(),
    }))
}

impl DomainRecord for BackPainDemographics {
    const NAME: &'static str = "backPainDemographics";
}

impl BackPainDemographics {
    pub fn answer(&self, question: HealthQuestion) -> Option<&str> {
        match question {
            HealthQuestion::CancerHistory => self.cancer_history.as_deref(),
            HealthQuestion::PsychiatricCare => self.psychiatric_care.as_deref(),
            HealthQuestion::PhysicalTherapy => self.had_physical_therapy.as_deref(),
            HealthQuestion::CognitiveBehavioralTherapy => self.cognitive_behavioral_therapy.as_deref(),
            HealthQuestion::PreviousBackSurgery => self.previous_back_surgery.as_deref(),
            HealthQuestion::Fever => self.fever.as_deref(),
            HealthQuestion::FecalIncontinence => self.fecal_incontinence.as_deref(),
            HealthQuestion::OpioidUse => self.opioid_use.as_deref(),
        }
    }

    pub fn set_answer(&mut self, question: HealthQuestion, yes: bool) {
        let value = Some(yes_no(yes).to_string());
        match question {
            HealthQuestion::CancerHistory => self.cancer_history = value,
            HealthQuestion::PsychiatricCare => self.psychiatric_care = value,
            HealthQuestion::PhysicalTherapy => self.had_physical_therapy = value,
            HealthQuestion::CognitiveBehavioralTherapy => self.cognitive_behavioral_therapy = value,
            HealthQuestion::PreviousBackSurgery => self.previous_back_surgery = value,
            HealthQuestion::Fever => self.fever = value,
            HealthQuestion::FecalIncontinence => self.fecal_incontinence = value,
            HealthQuestion::OpioidUse => self.opioid_use = value,
        }
    }

    /// True once every question has an answer.
    pub fn is_complete(&self) -> bool {
        self.age.is_some()
            && self.biological_sex.is_some()
            && self.race.is_some()
            && self.level_of_pain.is_some()
            && HealthQuestion::ALL.iter().all(|q| self.answer(*q).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_chain_in_order() {
        assert_eq!(HealthQuestion::CancerHistory.next(), Some(HealthQuestion::PsychiatricCare));
        assert_eq!(HealthQuestion::FecalIncontinence.next(), Some(HealthQuestion::OpioidUse));
        assert_eq!(HealthQuestion::OpioidUse.next(), None);
    }

    #[test]
    fn test_set_answer_uses_yes_no_codes() {
        let mut demographics = BackPainDemographics::default();
        demographics.set_answer(HealthQuestion::Fever, true);
        demographics.set_answer(HealthQuestion::OpioidUse, false);

        assert_eq!(demographics.fever.as_deref(), Some("yes"));
        assert_eq!(demographics.answer(HealthQuestion::OpioidUse), Some("no"));
        assert_eq!(demographics.answer(HealthQuestion::CancerHistory), None);
    }

    #[test]
    fn test_complete_requires_every_answer() {
        let mut demographics = BackPainDemographics {
            age: Some("45".to_string()),
            biological_sex: Some("female".to_string()),
            race: Some("W".to_string()),
            level_of_pain: Some("7".to_string()),
            ..Default::default()
        };
        assert!(!demographics.is_complete());

        for question in HealthQuestion::ALL {
            demographics.set_answer(question, false);
        }
        assert!(demographics.is_complete());
    }

    #[test]
    fn test_deserializes_legacy_pascal_case() {
        let json = serde_json::json!({
            "Age": "52",
            "Sex": "male",
            "Race": "H",
            "LevelOfPain": "4",
            "OpioidUse": "no"
        });
        let demographics: BackPainDemographics = serde_json::from_value(json).unwrap();
        assert_eq!(demographics.age.as_deref(), Some("52"));
        assert_eq!(demographics.biological_sex.as_deref(), Some("male"));
        assert_eq!(demographics.opioid_use.as_deref(), Some("no"));
        assert_eq!(demographics.fever, None);
    }

    #[test]
    fn test_deserializes_numbers_and_booleans_as_codes() {
        let json = serde_json::json!({
            "age": 52,
            "levelOfPain": 6,
            "biologicalSex": "male",
            "fever": false,
            "OpioidUse": true,
            "race": null
        });
        let demographics: BackPainDemographics = serde_json::from_value(json).unwrap();
        assert_eq!(demographics.age.as_deref(), Some("52"));
        assert_eq!(demographics.level_of_pain.as_deref(), Some("6"));
        assert_eq!(demographics.biological_sex.as_deref(), Some("male"));
        assert_eq!(demographics.fever.as_deref(), Some("no"));
        assert_eq!(demographics.opioid_use.as_deref(), Some("yes"));
        assert_eq!(demographics.race, None);
    }

    #[test]
    fn test_rejects_nested_values() {
        let json = serde_json::json!({"age": {"years": 52}});
        assert!(serde_json::from_value::<BackPainDemographics>(json).is_err());
    }
}
