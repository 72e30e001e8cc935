use axum::Json;
use tracing::info;

use crate::crs::score_applicant;
use crate::errors::AppError;
use crate::models::applicant::ApplicantFactors;
use crate::models::score::ScoreBreakdown;

/// POST /api/v1/crs/score
pub async fn handle_score(
    Json(factors): Json<ApplicantFactors>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let breakdown = score_applicant(&factors)?;
    info!(
        "Scored applicant: total={}/{} (spouse={})",
        breakdown.total_score, breakdown.ceiling, factors.has_spouse
    );
    Ok(Json(breakdown))
}
