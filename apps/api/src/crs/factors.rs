//! CRS factor tables: pure lookups from a single attribute to points.
//!
//! Every table stores `(with_spouse, without_spouse)` pairs where the rules
//! differ by marital status. Inputs above a table's top band saturate.

use crate::models::applicant::{EducationLevel, LanguageScores};

/// Points for ages 18 through 44, indexed by `age - 18`.
const AGE_POINTS: [(u32, u32); 27] = [
    (90, 99),   // 18
    (95, 105),  // 19
    (100, 110), // 20
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110),
    (100, 110), // 29
    (95, 105),  // 30
    (90, 99),
    (85, 94),
    (80, 88),
    (75, 83),
    (70, 77), // 35
    (65, 72),
    (60, 66),
    (55, 61),
    (50, 55),
    (45, 50), // 40
    (35, 39),
    (25, 28),
    (15, 17),
    (5, 6), // 44
];

/// Indexed by `EducationLevel::rank()`.
const EDUCATION_POINTS: [(u32, u32); 8] = [
    (0, 0),
    (28, 30),
    (84, 90),
    (91, 98),
    (112, 120),
    (119, 128),
    (126, 135),
    (140, 150),
];

/// First official language, per ability, indexed by CLB 0..=10 (10+ saturates).
const FIRST_LANGUAGE_POINTS: [(u32, u32); 11] = [
    (0, 0),
    (0, 0),
    (0, 0),
    (0, 0),
    (6, 6), // 4
    (6, 6),
    (8, 9),
    (16, 17),
    (22, 23),
    (29, 31),
    (32, 34), // 10+
];

/// Canadian work experience, indexed by years 0..=5 (5+ saturates).
const WORK_EXPERIENCE_POINTS: [(u32, u32); 6] =
    [(0, 0), (35, 40), (46, 53), (56, 64), (63, 72), (70, 80)];

const SPOUSE_EDUCATION_POINTS: [u32; 8] = [0, 2, 6, 7, 8, 9, 10, 10];
const SPOUSE_WORK_EXPERIENCE_POINTS: [u32; 6] = [0, 5, 7, 8, 9, 10];

pub const SECOND_LANGUAGE_CAP_WITH_SPOUSE: u32 = 22;
pub const SECOND_LANGUAGE_CAP_WITHOUT_SPOUSE: u32 = 24;

fn pick((with_spouse, without_spouse): (u32, u32), has_spouse: bool) -> u32 {
    if has_spouse {
        with_spouse
    } else {
        without_spouse
    }
}

pub fn age_points(age: u8, has_spouse: bool) -> u32 {
    match age {
        18..=44 => pick(AGE_POINTS[usize::from(age - 18)], has_spouse),
        _ => 0,
    }
}

pub fn education_points(level: EducationLevel, has_spouse: bool) -> u32 {
    pick(EDUCATION_POINTS[level.rank()], has_spouse)
}

/// Points for a single language ability.
///
/// Second-language bands are coarser and do not vary with marital status.
pub fn language_ability_points(clb: u8, has_spouse: bool, is_first_language: bool) -> u32 {
    if is_first_language {
        let idx = usize::from(clb.min(10));
        pick(FIRST_LANGUAGE_POINTS[idx], has_spouse)
    } else {
        match clb {
            0..=4 => 0,
            5 | 6 => 1,
            7 | 8 => 3,
            _ => 6,
        }
    }
}

pub fn first_language_points(scores: &LanguageScores, has_spouse: bool) -> u32 {
    scores
        .abilities()
        .iter()
        .map(|&clb| language_ability_points(clb, has_spouse, true))
        .sum()
}

pub fn second_language_points(scores: &LanguageScores, has_spouse: bool) -> u32 {
    let raw: u32 = scores
        .abilities()
        .iter()
        .map(|&clb| language_ability_points(clb, has_spouse, false))
        .sum();
    let cap = if has_spouse {
        SECOND_LANGUAGE_CAP_WITH_SPOUSE
    } else {
        SECOND_LANGUAGE_CAP_WITHOUT_SPOUSE
    };
    raw.min(cap)
}

pub fn work_experience_points(years: u32, has_spouse: bool) -> u32 {
    let idx = years.min(5) as usize;
    pick(WORK_EXPERIENCE_POINTS[idx], has_spouse)
}

pub fn spouse_education_points(level: EducationLevel) -> u32 {
    SPOUSE_EDUCATION_POINTS[level.rank()]
}

pub fn spouse_language_ability_points(clb: u8) -> u32 {
    match clb {
        0..=4 => 0,
        5 | 6 => 1,
        7 | 8 => 3,
        _ => 5,
    }
}

pub fn spouse_language_points(scores: &LanguageScores) -> u32 {
    scores
        .abilities()
        .iter()
        .map(|&clb| spouse_language_ability_points(clb))
        .sum()
}

pub fn spouse_work_experience_points(years: u32) -> u32 {
    SPOUSE_WORK_EXPERIENCE_POINTS[years.min(5) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_is_maximum() {
        for age in 20..=29 {
            assert_eq!(age_points(age, true), 100);
            assert_eq!(age_points(age, false), 110);
        }
    }

    #[test]
    fn test_age_outside_window_is_zero() {
        for age in (0..=17).chain(45..=120) {
            assert_eq!(age_points(age, false), 0, "age {age}");
            assert_eq!(age_points(age, true), 0, "age {age}");
        }
    }

    #[test]
    fn test_age_non_increasing_away_from_band() {
        for has_spouse in [true, false] {
            for age in 20..=119u8 {
                assert!(
                    age_points(age + 1, has_spouse) <= age_points(age, has_spouse),
                    "age {} -> {} increased",
                    age,
                    age + 1
                );
            }
            for age in 1..=20u8 {
                assert!(age_points(age - 1, has_spouse) <= age_points(age, has_spouse));
            }
        }
    }

    #[test]
    fn test_age_thirty_follows_published_table() {
        assert_eq!(age_points(30, true), 95);
        assert_eq!(age_points(30, false), 105);
        assert_eq!(age_points(44, false), 6);
        assert_eq!(age_points(18, true), 90);
    }

    #[test]
    fn test_education_table() {
        assert_eq!(education_points(EducationLevel::LessThanSecondary, false), 0);
        assert_eq!(education_points(EducationLevel::BachelorsOrThreeYear, false), 120);
        assert_eq!(education_points(EducationLevel::BachelorsOrThreeYear, true), 112);
        assert_eq!(education_points(EducationLevel::Doctoral, false), 150);
        assert_eq!(education_points(EducationLevel::Doctoral, true), 140);
    }

    #[test]
    fn test_first_language_bands() {
        assert_eq!(language_ability_points(3, false, true), 0);
        assert_eq!(language_ability_points(4, false, true), 6);
        assert_eq!(language_ability_points(5, true, true), 6);
        assert_eq!(language_ability_points(9, false, true), 31);
        assert_eq!(language_ability_points(9, true, true), 29);
        assert_eq!(language_ability_points(12, false, true), 34);
        assert_eq!(first_language_points(&LanguageScores::uniform(9), false), 124);
        assert_eq!(first_language_points(&LanguageScores::uniform(12), true), 128);
    }

    #[test]
    fn test_second_language_bands_ignore_marital_status() {
        for clb in 0..=12 {
            assert_eq!(
                language_ability_points(clb, true, false),
                language_ability_points(clb, false, false)
            );
        }
        assert_eq!(language_ability_points(4, false, false), 0);
        assert_eq!(language_ability_points(6, false, false), 1);
        assert_eq!(language_ability_points(8, false, false), 3);
        assert_eq!(language_ability_points(9, false, false), 6);
    }

    #[test]
    fn test_second_language_total_capped() {
        let top = LanguageScores::uniform(10);
        assert_eq!(second_language_points(&top, false), 24);
        assert_eq!(second_language_points(&top, true), 22);
        assert_eq!(second_language_points(&LanguageScores::default(), false), 0);
    }

    #[test]
    fn test_work_experience_saturates() {
        assert_eq!(work_experience_points(0, false), 0);
        assert_eq!(work_experience_points(1, false), 40);
        assert_eq!(work_experience_points(1, true), 35);
        assert_eq!(work_experience_points(5, false), 80);
        assert_eq!(work_experience_points(30, false), 80);
        assert_eq!(work_experience_points(30, true), 70);
    }

    #[test]
    fn test_spouse_tables() {
        assert_eq!(spouse_education_points(EducationLevel::Secondary), 2);
        assert_eq!(spouse_education_points(EducationLevel::Doctoral), 10);
        assert_eq!(spouse_language_points(&LanguageScores::uniform(9)), 20);
        assert_eq!(spouse_language_points(&LanguageScores::uniform(4)), 0);
        assert_eq!(spouse_work_experience_points(1), 5);
        assert_eq!(spouse_work_experience_points(9), 10);
    }

    #[test]
    fn test_with_spouse_never_exceeds_without() {
        for age in 0..=120 {
            assert!(age_points(age, true) <= age_points(age, false));
        }
        for level in EducationLevel::ALL {
            assert!(education_points(level, true) <= education_points(level, false));
        }
        for clb in 0..=12 {
            assert!(language_ability_points(clb, true, true) <= language_ability_points(clb, false, true));
        }
        for years in 0..=10 {
            assert!(work_experience_points(years, true) <= work_experience_points(years, false));
        }
    }
}
