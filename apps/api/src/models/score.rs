use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreBreakdown {
    pub age: u32,
    pub education: u32,
    pub first_language: u32,
    pub second_language: u32,
    pub canadian_work_experience: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseBreakdown {
    pub education: u32,
    pub language: u32,
    pub canadian_work_experience: u32,
    pub subtotal: u32,
}

/// Skill transferability, split into its three capped combination tracks.
/// The raw per-combination values are kept alongside the capped track totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferabilityBreakdown {
    pub education_language: u32,
    pub education_canadian_experience: u32,
    /// `education_language + education_canadian_experience`, capped at 50.
    pub education: u32,
    pub foreign_language: u32,
    pub foreign_canadian_experience: u32,
    /// `foreign_language + foreign_canadian_experience`, capped at 50.
    pub foreign_work_experience: u32,
    pub certificate_of_qualification: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalBreakdown {
    pub provincial_nomination: u32,
    pub sibling_in_canada: u32,
    pub canadian_post_secondary: u32,
    pub french_language: u32,
    pub subtotal: u32,
}

/// Full CRS result. `total_score` never exceeds `ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub core: CoreBreakdown,
    pub spouse: SpouseBreakdown,
    pub skill_transferability: TransferabilityBreakdown,
    pub additional: AdditionalBreakdown,
    pub total_score: u32,
    pub ceiling: u32,
}
