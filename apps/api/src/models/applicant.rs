use serde::{Deserialize, Serialize};

/// Highest level of completed education, in ascending order.
/// The derived `Ord` follows declaration order and is relied on by the
/// transferability rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    LessThanSecondary,
    Secondary,
    OneYearPostSecondary,
    TwoYearPostSecondary,
    BachelorsOrThreeYear,
    /// Two or more credentials, at least one of them three years or longer.
    TwoOrMoreCredentials,
    MastersOrProfessional,
    Doctoral,
}

impl EducationLevel {
    #[cfg(test)]
    pub const ALL: [EducationLevel; 8] = [
        EducationLevel::LessThanSecondary,
        EducationLevel::Secondary,
        EducationLevel::OneYearPostSecondary,
        EducationLevel::TwoYearPostSecondary,
        EducationLevel::BachelorsOrThreeYear,
        EducationLevel::TwoOrMoreCredentials,
        EducationLevel::MastersOrProfessional,
        EducationLevel::Doctoral,
    ];

    /// Position in the ordered list, used to index the point tables.
    pub fn rank(self) -> usize {
        self as usize
    }
}

/// CLB (or NCLC) results for the four abilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageScores {
    pub listening: u8,
    pub reading: u8,
    pub writing: u8,
    pub speaking: u8,
}

impl LanguageScores {
    #[cfg(test)]
    pub fn uniform(clb: u8) -> Self {
        Self {
            listening: clb,
            reading: clb,
            writing: clb,
            speaking: clb,
        }
    }

    pub fn abilities(&self) -> [u8; 4] {
        [self.listening, self.reading, self.writing, self.speaking]
    }

    /// True when every ability is at or above `clb`.
    pub fn all_at_least(&self, clb: u8) -> bool {
        self.abilities().iter().all(|&s| s >= clb)
    }

    /// All-zero scores mean no test was provided.
    pub fn is_absent(&self) -> bool {
        self.abilities().iter().all(|&s| s == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageCode {
    Fr,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondLanguage {
    pub language: LanguageCode,
    pub scores: LanguageScores,
}

impl SecondLanguage {
    pub fn is_french(&self) -> bool {
        self.language == LanguageCode::Fr
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanadianEducation {
    #[default]
    None,
    OneOrTwoYear,
    ThreeYearOrMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseFactors {
    pub education: EducationLevel,
    #[serde(default)]
    pub first_language: LanguageScores,
    #[serde(default)]
    pub canadian_work_experience: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFactors {
    #[serde(default)]
    pub sibling_in_canada: bool,
    #[serde(default)]
    pub canadian_post_secondary: CanadianEducation,
    #[serde(default)]
    pub provincial_nomination: bool,
}

/// The complete input record for a CRS calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantFactors {
    pub has_spouse: bool,
    pub age: u8,
    pub education: EducationLevel,
    pub first_language: LanguageScores,
    #[serde(default)]
    pub second_language: Option<SecondLanguage>,
    #[serde(default)]
    pub canadian_work_experience: u32,
    #[serde(default)]
    pub foreign_work_experience: u32,
    #[serde(default)]
    pub certificate_of_qualification: bool,
    #[serde(default)]
    pub spouse: Option<SpouseFactors>,
    #[serde(default)]
    pub additional: AdditionalFactors,
}

impl ApplicantFactors {
    /// Second-language scores, zeroed when no second test was provided.
    pub fn second_language_scores(&self) -> LanguageScores {
        self.second_language
            .map(|sl| sl.scores)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_levels_are_ordered() {
        for pair in EducationLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should rank below {:?}", pair[0], pair[1]);
        }
        assert_eq!(EducationLevel::Doctoral.rank(), 7);
    }

    #[test]
    fn test_language_scores_thresholds() {
        let scores = LanguageScores {
            listening: 9,
            reading: 7,
            writing: 8,
            speaking: 10,
        };
        assert!(scores.all_at_least(7));
        assert!(!scores.all_at_least(9));
        assert!(!scores.is_absent());
        assert!(LanguageScores::default().is_absent());
    }

    #[test]
    fn test_applicant_factors_optional_fields_default() {
        let json = serde_json::json!({
            "has_spouse": false,
            "age": 30,
            "education": "bachelors_or_three_year",
            "first_language": {"listening": 8, "reading": 8, "writing": 8, "speaking": 8}
        });
        let factors: ApplicantFactors = serde_json::from_value(json).unwrap();
        assert!(factors.second_language.is_none());
        assert!(factors.spouse.is_none());
        assert_eq!(factors.canadian_work_experience, 0);
        assert_eq!(
            factors.additional.canadian_post_secondary,
            CanadianEducation::None
        );
        assert!(factors.second_language_scores().is_absent());
    }

    #[test]
    fn test_second_language_code_serializes_lowercase() {
        let sl = SecondLanguage {
            language: LanguageCode::Fr,
            scores: LanguageScores::uniform(7),
        };
        let value = serde_json::to_value(sl).unwrap();
        assert_eq!(value["language"], "fr");
        assert!(sl.is_french());
    }
}
