//! Slots: the individual attributes the conversation must resolve, in the
//! fixed order they are asked.
//!
//! Each slot owns its question, the JSON shape the interpreter must return for
//! it, and the parsing/domain checks that turn that JSON into a `SlotValue`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crs::validation::{MAX_AGE, MAX_CLB, MAX_WORK_YEARS};
use crate::models::applicant::{
    CanadianEducation, EducationLevel, LanguageCode, LanguageScores, SecondLanguage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    MaritalStatus,
    Age,
    Education,
    FirstLanguageListening,
    FirstLanguageReading,
    FirstLanguageWriting,
    FirstLanguageSpeaking,
    SecondLanguage,
    CanadianWorkExperience,
    ForeignWorkExperience,
    SpouseEducation,
    SpouseLanguage,
    SpouseCanadianWorkExperience,
    CertificateOfQualification,
    SiblingInCanada,
    CanadianPostSecondary,
    ProvincialNomination,
}

/// A typed value for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValue {
    Flag(bool),
    Age(u8),
    Education(EducationLevel),
    Clb(u8),
    SecondLanguage(Option<SecondLanguage>),
    Years(u32),
    Scores(LanguageScores),
    CanadianEducation(CanadianEducation),
}

impl Slot {
    /// Question order. Spouse slots are skipped when there is no accompanying spouse.
    pub const ORDER: [Slot; 17] = [
        Slot::MaritalStatus,
        Slot::Age,
        Slot::Education,
        Slot::FirstLanguageListening,
        Slot::FirstLanguageReading,
        Slot::FirstLanguageWriting,
        Slot::FirstLanguageSpeaking,
        Slot::SecondLanguage,
        Slot::CanadianWorkExperience,
        Slot::ForeignWorkExperience,
        Slot::SpouseEducation,
        Slot::SpouseLanguage,
        Slot::SpouseCanadianWorkExperience,
        Slot::CertificateOfQualification,
        Slot::SiblingInCanada,
        Slot::CanadianPostSecondary,
        Slot::ProvincialNomination,
    ];

    pub fn is_spouse_slot(self) -> bool {
        matches!(
            self,
            Slot::SpouseEducation | Slot::SpouseLanguage | Slot::SpouseCanadianWorkExperience
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::MaritalStatus => "marital_status",
            Slot::Age => "age",
            Slot::Education => "education",
            Slot::FirstLanguageListening => "first_language_listening",
            Slot::FirstLanguageReading => "first_language_reading",
            Slot::FirstLanguageWriting => "first_language_writing",
            Slot::FirstLanguageSpeaking => "first_language_speaking",
            Slot::SecondLanguage => "second_language",
            Slot::CanadianWorkExperience => "canadian_work_experience",
            Slot::ForeignWorkExperience => "foreign_work_experience",
            Slot::SpouseEducation => "spouse_education",
            Slot::SpouseLanguage => "spouse_language",
            Slot::SpouseCanadianWorkExperience => "spouse_canadian_work_experience",
            Slot::CertificateOfQualification => "certificate_of_qualification",
            Slot::SiblingInCanada => "sibling_in_canada",
            Slot::CanadianPostSecondary => "canadian_post_secondary",
            Slot::ProvincialNomination => "provincial_nomination",
        }
    }

    /// The question put to the user for this slot.
    pub fn question(self) -> &'static str {
        match self {
            Slot::MaritalStatus => {
                "Are you married or in a common-law relationship, and if so, will your spouse \
                 or partner come with you to Canada? (Answer no if they are already a Canadian \
                 citizen or permanent resident.)"
            }
            Slot::Age => "How old are you?",
            Slot::Education => "What is your highest completed level of education?",
            Slot::FirstLanguageListening => {
                "What was your listening result on your first official language test \
                 (CLB level, or the band score from IELTS, CELPIP or TEF)?"
            }
            Slot::FirstLanguageReading => "What was your reading result on that test?",
            Slot::FirstLanguageWriting => "What was your writing result on that test?",
            Slot::FirstLanguageSpeaking => "And your speaking result?",
            Slot::SecondLanguage => {
                "Have you taken a test in your second official language? If so, which language \
                 and what were your listening, reading, writing and speaking results? \
                 You can also just say no."
            }
            Slot::CanadianWorkExperience => {
                "How many years of skilled work experience do you have in Canada?"
            }
            Slot::ForeignWorkExperience => {
                "How many years of skilled work experience do you have outside Canada?"
            }
            Slot::SpouseEducation => {
                "What is your spouse or partner's highest completed level of education?"
            }
            Slot::SpouseLanguage => {
                "Has your spouse or partner taken an official language test? If so, what were \
                 their listening, reading, writing and speaking results?"
            }
            Slot::SpouseCanadianWorkExperience => {
                "How many years of skilled work experience does your spouse or partner have in Canada?"
            }
            Slot::CertificateOfQualification => {
                "Do you hold a certificate of qualification in a trade occupation issued by a \
                 Canadian province or territory?"
            }
            Slot::SiblingInCanada => {
                "Do you or your spouse have a brother or sister living in Canada who is a \
                 citizen or permanent resident?"
            }
            Slot::CanadianPostSecondary => {
                "Have you completed any post-secondary education in Canada? If so, was it a \
                 one- or two-year program, or three years or longer?"
            }
            Slot::ProvincialNomination => "Do you have a provincial or territorial nomination?",
        }
    }

    /// JSON shape the interpreter must return as `value` for this slot.
    pub fn expected_shape(self) -> &'static str {
        match self {
            Slot::MaritalStatus => {
                "a boolean: true only if the applicant has a spouse or common-law partner who \
                 will accompany them and is not a Canadian citizen or permanent resident"
            }
            Slot::Age => "an integer age in years between 0 and 120",
            Slot::Education | Slot::SpouseEducation => {
                "one of the strings \"less_than_secondary\", \"secondary\", \
                 \"one_year_post_secondary\", \"two_year_post_secondary\", \
                 \"bachelors_or_three_year\", \"two_or_more_credentials\", \
                 \"masters_or_professional\", \"doctoral\""
            }
            Slot::FirstLanguageListening
            | Slot::FirstLanguageReading
            | Slot::FirstLanguageWriting
            | Slot::FirstLanguageSpeaking => {
                "an integer CLB level between 0 and 12, converted from the test band score \
                 if the user gave one"
            }
            Slot::SecondLanguage => {
                "null if no second-language test was taken, otherwise an object \
                 {\"language\": \"fr\" or \"other\", \"listening\": CLB, \"reading\": CLB, \
                 \"writing\": CLB, \"speaking\": CLB} with integer CLB/NCLC levels 0-12"
            }
            Slot::SpouseLanguage => {
                "null if no test was taken, otherwise an object {\"listening\": CLB, \
                 \"reading\": CLB, \"writing\": CLB, \"speaking\": CLB} with integer levels 0-12"
            }
            Slot::CanadianWorkExperience
            | Slot::ForeignWorkExperience
            | Slot::SpouseCanadianWorkExperience => {
                "an integer number of full years between 0 and 60"
            }
            Slot::CertificateOfQualification | Slot::SiblingInCanada | Slot::ProvincialNomination => {
                "a boolean"
            }
            Slot::CanadianPostSecondary => {
                "one of the strings \"none\", \"one_or_two_year\", \"three_year_or_more\""
            }
        }
    }

    /// Parses and domain-checks an interpreter value. The error is a
    /// user-facing reason used to re-ask the same slot.
    pub fn parse(self, raw: &Value) -> Result<SlotValue, String> {
        match self {
            Slot::MaritalStatus
            | Slot::CertificateOfQualification
            | Slot::SiblingInCanada
            | Slot::ProvincialNomination => parse_flag(raw).map(SlotValue::Flag),
            Slot::Age => {
                let age = parse_integer(raw, u64::from(MAX_AGE))
                    .ok_or_else(|| "I need your age as a whole number of years.".to_string())?;
                Ok(SlotValue::Age(age as u8))
            }
            Slot::Education | Slot::SpouseEducation => {
                serde_json::from_value::<EducationLevel>(raw.clone())
                    .map(SlotValue::Education)
                    .map_err(|_| "I couldn't tell which education level that is.".to_string())
            }
            Slot::FirstLanguageListening
            | Slot::FirstLanguageReading
            | Slot::FirstLanguageWriting
            | Slot::FirstLanguageSpeaking => parse_clb(raw).map(SlotValue::Clb),
            Slot::SecondLanguage => parse_second_language(raw).map(SlotValue::SecondLanguage),
            Slot::SpouseLanguage => {
                if raw.is_null() {
                    return Ok(SlotValue::Scores(LanguageScores::default()));
                }
                parse_scores(raw).map(SlotValue::Scores)
            }
            Slot::CanadianWorkExperience
            | Slot::ForeignWorkExperience
            | Slot::SpouseCanadianWorkExperience => parse_years(raw).map(SlotValue::Years),
            Slot::CanadianPostSecondary => {
                serde_json::from_value::<CanadianEducation>(raw.clone())
                    .map(SlotValue::CanadianEducation)
                    .map_err(|_| {
                        "Was that a one- or two-year program, or three years or longer?".to_string()
                    })
            }
        }
    }
}

fn parse_flag(raw: &Value) -> Result<bool, String> {
    raw.as_bool()
        .ok_or_else(|| "Could you answer with a simple yes or no?".to_string())
}

/// Accepts non-negative integers up to `max`; whole-valued floats are allowed.
fn parse_integer(raw: &Value, max: u64) -> Option<u64> {
    let n = match raw.as_u64() {
        Some(n) => n,
        None => {
            let f = raw.as_f64()?;
            if f < 0.0 || f.fract() != 0.0 {
                return None;
            }
            f as u64
        }
    };
    (n <= max).then_some(n)
}

fn parse_clb(raw: &Value) -> Result<u8, String> {
    parse_integer(raw, u64::from(MAX_CLB))
        .map(|n| n as u8)
        .ok_or_else(|| format!("I need a CLB level between 0 and {MAX_CLB}."))
}

fn parse_years(raw: &Value) -> Result<u32, String> {
    // Partial years do not count: 2.5 years is 2 full years.
    let floored = raw
        .as_f64()
        .filter(|f| *f >= 0.0)
        .map(|f| Value::from(f.floor() as u64));
    floored
        .as_ref()
        .and_then(|v| parse_integer(v, u64::from(MAX_WORK_YEARS)))
        .map(|n| n as u32)
        .ok_or_else(|| "How many full years is that?".to_string())
}

#[derive(Deserialize)]
struct RawScores {
    listening: Value,
    reading: Value,
    writing: Value,
    speaking: Value,
}

fn parse_scores(raw: &Value) -> Result<LanguageScores, String> {
    let scores: RawScores = serde_json::from_value(raw.clone()).map_err(|_| {
        "I need all four results: listening, reading, writing and speaking.".to_string()
    })?;
    Ok(LanguageScores {
        listening: parse_clb(&scores.listening)?,
        reading: parse_clb(&scores.reading)?,
        writing: parse_clb(&scores.writing)?,
        speaking: parse_clb(&scores.speaking)?,
    })
}

fn parse_second_language(raw: &Value) -> Result<Option<SecondLanguage>, String> {
    if raw.is_null() {
        return Ok(None);
    }
    let language = raw
        .get("language")
        .cloned()
        .map(serde_json::from_value::<LanguageCode>)
        .and_then(Result::ok)
        .ok_or_else(|| "Which language was that test in, French or another language?".to_string())?;
    let scores = parse_scores(raw)?;
    if scores.is_absent() {
        return Ok(None);
    }
    Ok(Some(SecondLanguage { language, scores }))
}
