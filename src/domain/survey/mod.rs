//! Back-pain survey content.
//!
//! - `demographics` - The `BackPainDemographics` domain record
//! - `translations` - Choice tables, codes and the treatment catalog
//! - `back_pain_dialog` - The survey waterfall and its prompts

mod back_pain_dialog;
mod demographics;
mod translations;

pub use back_pain_dialog::{
    prompts, register_back_pain_dialogs, summary, validate_age, BACK_PAIN_DIALOG_ID,
    INELIGIBLE_AGE, MAX_ELIGIBLE_AGE,
};
pub use demographics::{BackPainDemographics, HealthQuestion};
pub use translations::{
    choice_set, code_for, label_for, treatment_codes, treatment_name, yes_no, CodedChoice,
    Treatment, BIOLOGICAL_SEXES, PAIN_LEVELS, RACES, TREATMENTS,
};
