// CRS scoring: factor tables, the scoring engine, input validation and the
// stateless scoring endpoint.

pub mod engine;
pub mod factors;
pub mod handlers;
pub mod validation;

use tracing::error;

use crate::errors::AppError;
use crate::models::applicant::ApplicantFactors;
use crate::models::score::ScoreBreakdown;

/// Validates, scores and re-checks a record. The one entry point callers use.
pub fn score_applicant(factors: &ApplicantFactors) -> Result<ScoreBreakdown, AppError> {
    validation::validate_factors(factors)?;
    let breakdown = engine::calculate(factors);
    breakdown.check_invariants(factors.has_spouse).map_err(|e| {
        error!("Scoring engine produced an out-of-range breakdown: {e}");
        AppError::EngineInvariant(e)
    })?;
    Ok(breakdown)
}
