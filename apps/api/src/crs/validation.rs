use thiserror::Error;

use crate::models::applicant::{ApplicantFactors, LanguageScores};

pub const MAX_AGE: u8 = 120;
pub const MAX_CLB: u8 = 12;
pub const MAX_WORK_YEARS: u32 = 60;

/// All domain problems found in a single record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid applicant factors: {}", .problems.join("; "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

/// Rejects out-of-domain records before they reach the scoring engine.
pub fn validate_factors(factors: &ApplicantFactors) -> Result<(), ValidationError> {
    let mut problems = Vec::new();

    if factors.age > MAX_AGE {
        problems.push(format!("age {} is outside 0..={MAX_AGE}", factors.age));
    }

    check_scores("first_language", &factors.first_language, &mut problems);
    if let Some(second) = &factors.second_language {
        check_scores("second_language", &second.scores, &mut problems);
    }

    check_years(
        "canadian_work_experience",
        factors.canadian_work_experience,
        &mut problems,
    );
    check_years(
        "foreign_work_experience",
        factors.foreign_work_experience,
        &mut problems,
    );

    match (factors.has_spouse, &factors.spouse) {
        (true, None) => problems.push("has_spouse is true but spouse factors are missing".to_string()),
        (false, Some(_)) => {
            problems.push("spouse factors provided but has_spouse is false".to_string())
        }
        (true, Some(spouse)) => {
            check_scores("spouse.first_language", &spouse.first_language, &mut problems);
            check_years(
                "spouse.canadian_work_experience",
                spouse.canadian_work_experience,
                &mut problems,
            );
        }
        (false, None) => {}
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}

fn check_scores(field: &str, scores: &LanguageScores, problems: &mut Vec<String>) {
    let named = [
        ("listening", scores.listening),
        ("reading", scores.reading),
        ("writing", scores.writing),
        ("speaking", scores.speaking),
    ];
    for (ability, clb) in named {
        if clb > MAX_CLB {
            problems.push(format!("{field}.{ability} CLB {clb} is outside 0..={MAX_CLB}"));
        }
    }
}

fn check_years(field: &str, years: u32, problems: &mut Vec<String>) {
    if years > MAX_WORK_YEARS {
        problems.push(format!("{field} of {years} years exceeds {MAX_WORK_YEARS}"));
    }
}
