//! CRS Scoring Engine: composes factor-table outputs into a bounded breakdown.
//!
//! `calculate` is pure: same `ApplicantFactors` in, same `ScoreBreakdown` out.
//! Input must already have passed `crs::validation::validate_factors`.

use thiserror::Error;

use crate::crs::factors::{
    age_points, education_points, first_language_points, second_language_points,
    spouse_education_points, spouse_language_points, spouse_work_experience_points,
    work_experience_points, SECOND_LANGUAGE_CAP_WITHOUT_SPOUSE, SECOND_LANGUAGE_CAP_WITH_SPOUSE,
};
use crate::models::applicant::{ApplicantFactors, CanadianEducation, EducationLevel};
use crate::models::score::{
    AdditionalBreakdown, CoreBreakdown, ScoreBreakdown, SpouseBreakdown,
    TransferabilityBreakdown,
};

pub const CEILING_WITH_SPOUSE: u32 = 1000;
pub const CEILING_WITHOUT_SPOUSE: u32 = 1200;

const TRACK_CAP: u32 = 50;
const TRANSFERABILITY_CAP: u32 = 100;
const ADDITIONAL_CAP: u32 = 600;

const PROVINCIAL_NOMINATION_POINTS: u32 = 600;
const SIBLING_POINTS: u32 = 15;
const FRENCH_WITH_ENGLISH_POINTS: u32 = 50;
const FRENCH_ONLY_POINTS: u32 = 25;

const CLB_LOWER_TIER: u8 = 7;
const CLB_UPPER_TIER: u8 = 9;
const CLB_CERTIFICATE_MIN: u8 = 5;
const NCLC_FRENCH_BONUS_MIN: u8 = 7;
const CLB_ENGLISH_FOR_FULL_FRENCH_BONUS: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("CRS invariant violated: {category} = {value} exceeds maximum {max}")]
pub struct InvariantViolation {
    pub category: &'static str,
    pub value: u32,
    pub max: u32,
}

pub fn ceiling(has_spouse: bool) -> u32 {
    if has_spouse {
        CEILING_WITH_SPOUSE
    } else {
        CEILING_WITHOUT_SPOUSE
    }
}

/// Computes the full CRS breakdown for a validated applicant record.
pub fn calculate(factors: &ApplicantFactors) -> ScoreBreakdown {
    let core = core_points(factors);
    let spouse = spouse_points(factors);
    let skill_transferability = skill_transferability(factors);
    let additional = additional_points(factors);

    let ceiling = ceiling(factors.has_spouse);
    let total_score = (core.subtotal
        + spouse.subtotal
        + skill_transferability.subtotal
        + additional.subtotal)
        .min(ceiling);

    ScoreBreakdown {
        core,
        spouse,
        skill_transferability,
        additional,
        total_score,
        ceiling,
    }
}

fn core_points(factors: &ApplicantFactors) -> CoreBreakdown {
    let has_spouse = factors.has_spouse;
    let age = age_points(factors.age, has_spouse);
    let education = education_points(factors.education, has_spouse);
    let first_language = first_language_points(&factors.first_language, has_spouse);
    let second_language = second_language_points(&factors.second_language_scores(), has_spouse);
    let canadian_work_experience =
        work_experience_points(factors.canadian_work_experience, has_spouse);

    CoreBreakdown {
        age,
        education,
        first_language,
        second_language,
        canadian_work_experience,
        subtotal: age + education + first_language + second_language + canadian_work_experience,
    }
}

fn spouse_points(factors: &ApplicantFactors) -> SpouseBreakdown {
    let spouse = match (factors.has_spouse, factors.spouse.as_ref()) {
        (true, Some(spouse)) => spouse,
        _ => return SpouseBreakdown::default(),
    };

    let education = spouse_education_points(spouse.education);
    let language = spouse_language_points(&spouse.first_language);
    let canadian_work_experience = spouse_work_experience_points(spouse.canadian_work_experience);

    SpouseBreakdown {
        education,
        language,
        canadian_work_experience,
        subtotal: education + language + canadian_work_experience,
    }
}

/// Language tier shared by every language-based combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LanguageTier {
    None,
    Clb7,
    Clb9,
}

fn language_tier(factors: &ApplicantFactors) -> LanguageTier {
    if factors.first_language.all_at_least(CLB_UPPER_TIER) {
        LanguageTier::Clb9
    } else if factors.first_language.all_at_least(CLB_LOWER_TIER) {
        LanguageTier::Clb7
    } else {
        LanguageTier::None
    }
}

/// Points for a (weak, strong) pairing: both strong is 50, one strong 25, neither 13.
fn combination_points(first_strong: bool, second_strong: bool) -> u32 {
    match (first_strong, second_strong) {
        (true, true) => 50,
        (true, false) | (false, true) => 25,
        (false, false) => 13,
    }
}

fn skill_transferability(factors: &ApplicantFactors) -> TransferabilityBreakdown {
    let tier = language_tier(factors);
    let canadian = factors.canadian_work_experience;
    let foreign = factors.foreign_work_experience;

    // Education combinations
    let (education_language, education_canadian_experience) =
        if factors.education >= EducationLevel::OneYearPostSecondary {
            let strong_education = factors.education >= EducationLevel::TwoOrMoreCredentials;
            let with_language = match tier {
                LanguageTier::None => 0,
                LanguageTier::Clb7 => combination_points(strong_education, false),
                LanguageTier::Clb9 => combination_points(strong_education, true),
            };
            let with_canadian = match canadian {
                0 => 0,
                1 => combination_points(strong_education, false),
                _ => combination_points(strong_education, true),
            };
            (with_language, with_canadian)
        } else {
            (0, 0)
        };
    let education = (education_language + education_canadian_experience).min(TRACK_CAP);

    // Foreign work experience combinations
    let (foreign_language, foreign_canadian_experience) = if foreign > 0 {
        let strong_foreign = foreign >= 3;
        let with_language = match tier {
            LanguageTier::None => 0,
            LanguageTier::Clb7 => combination_points(strong_foreign, false),
            LanguageTier::Clb9 => combination_points(strong_foreign, true),
        };
        let with_canadian = match canadian {
            0 => 0,
            1 => combination_points(strong_foreign, false),
            _ => combination_points(strong_foreign, true),
        };
        (with_language, with_canadian)
    } else {
        (0, 0)
    };
    let foreign_work_experience = (foreign_language + foreign_canadian_experience).min(TRACK_CAP);

    let certificate_of_qualification = if factors.certificate_of_qualification
        && factors.first_language.all_at_least(CLB_CERTIFICATE_MIN)
    {
        if factors.first_language.all_at_least(CLB_LOWER_TIER) {
            50
        } else {
            25
        }
    } else {
        0
    };

    TransferabilityBreakdown {
        education_language,
        education_canadian_experience,
        education,
        foreign_language,
        foreign_canadian_experience,
        foreign_work_experience,
        certificate_of_qualification,
        subtotal: (education + foreign_work_experience + certificate_of_qualification)
            .min(TRANSFERABILITY_CAP),
    }
}

fn additional_points(factors: &ApplicantFactors) -> AdditionalBreakdown {
    let extra = &factors.additional;

    let provincial_nomination = if extra.provincial_nomination {
        PROVINCIAL_NOMINATION_POINTS
    } else {
        0
    };
    let sibling_in_canada = if extra.sibling_in_canada {
        SIBLING_POINTS
    } else {
        0
    };
    let canadian_post_secondary = match extra.canadian_post_secondary {
        CanadianEducation::None => 0,
        CanadianEducation::OneOrTwoYear => 15,
        CanadianEducation::ThreeYearOrMore => 30,
    };
    let french_language = french_bonus(factors);

    AdditionalBreakdown {
        provincial_nomination,
        sibling_in_canada,
        canadian_post_secondary,
        french_language,
        subtotal: (provincial_nomination + sibling_in_canada + canadian_post_secondary
            + french_language)
            .min(ADDITIONAL_CAP),
    }
}

/// French bonus: NCLC 7+ on all four French abilities, with the full bonus
/// reserved for applicants who also hold CLB 5+ on all four English abilities.
fn french_bonus(factors: &ApplicantFactors) -> u32 {
    let french = match factors.second_language {
        Some(sl) if sl.is_french() => sl.scores,
        _ => return 0,
    };
    if !french.all_at_least(NCLC_FRENCH_BONUS_MIN) {
        return 0;
    }
    if factors
        .first_language
        .all_at_least(CLB_ENGLISH_FOR_FULL_FRENCH_BONUS)
    {
        FRENCH_WITH_ENGLISH_POINTS
    } else {
        FRENCH_ONLY_POINTS
    }
}

impl ScoreBreakdown {
    /// Re-checks every category bound. A failure means a rule table is wrong.
    pub fn check_invariants(&self, has_spouse: bool) -> Result<(), InvariantViolation> {
        let (age, education, first_language, second_language, work) = if has_spouse {
            (100, 140, 128, SECOND_LANGUAGE_CAP_WITH_SPOUSE, 70)
        } else {
            (110, 150, 136, SECOND_LANGUAGE_CAP_WITHOUT_SPOUSE, 80)
        };
        let spouse_max = if has_spouse { 10 } else { 0 };
        let spouse_language_max = if has_spouse { 20 } else { 0 };

        let checks = [
            ("age", self.core.age, age),
            ("education", self.core.education, education),
            ("first_language", self.core.first_language, first_language),
            ("second_language", self.core.second_language, second_language),
            (
                "canadian_work_experience",
                self.core.canadian_work_experience,
                work,
            ),
            ("spouse.education", self.spouse.education, spouse_max),
            ("spouse.language", self.spouse.language, spouse_language_max),
            (
                "spouse.canadian_work_experience",
                self.spouse.canadian_work_experience,
                spouse_max,
            ),
            (
                "skill_transferability.education",
                self.skill_transferability.education,
                TRACK_CAP,
            ),
            (
                "skill_transferability.foreign_work_experience",
                self.skill_transferability.foreign_work_experience,
                TRACK_CAP,
            ),
            (
                "skill_transferability.certificate_of_qualification",
                self.skill_transferability.certificate_of_qualification,
                TRACK_CAP,
            ),
            (
                "skill_transferability",
                self.skill_transferability.subtotal,
                TRANSFERABILITY_CAP,
            ),
            ("additional", self.additional.subtotal, ADDITIONAL_CAP),
            ("total_score", self.total_score, ceiling(has_spouse)),
        ];

        for (category, value, max) in checks {
            if value > max {
                return Err(InvariantViolation {
                    category,
                    value,
                    max,
                });
            }
        }
        Ok(())
    }
}
