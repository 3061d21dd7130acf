//! Axum route handlers for the Cover Letter API.

use axum::{extract::State, Json};

use crate::cover_letter::generator::{generate_cover_letter, CoverLetterResult};
use crate::errors::AppError;
use crate::models::request::TailorRequest;
use crate::state::AppState;

/// POST /api/v1/cover-letter
///
/// Draft cover letter, polished for ATS keywords, tone and impact unless
/// refinement is turned off.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<CoverLetterResult>, AppError> {
    request.validate()?;
    let refine = request.refine_or(state.config.enable_refinement);

    let result = generate_cover_letter(
        state.model.as_ref(),
        &request.resume_text,
        &request.job_description,
        refine,
    )
    .await?;

    Ok(Json(result))
}
