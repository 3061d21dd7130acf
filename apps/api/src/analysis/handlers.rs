//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::analyzer::{analyze_resume, CombinedAnalysis};
use crate::cover_letter::generator::{generate_cover_letter, CoverLetterResult};
use crate::errors::AppError;
use crate::models::request::TailorRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub analysis: CombinedAnalysis,
    pub cover_letter: CoverLetterResult,
}

/// POST /api/v1/analyze
///
/// Skills, experience, job requirements, tailored bullets and fit score for
/// one resume against one job description. Sections the model could not
/// produce come back empty.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<CombinedAnalysis>, AppError> {
    request.validate()?;
    let refine = request.refine_or(state.config.enable_refinement);

    let analysis = analyze_resume(
        state.model.as_ref(),
        &request.resume_text,
        &request.job_description,
        refine,
    )
    .await?;

    Ok(Json(analysis))
}

/// POST /api/v1/tailor
///
/// Analysis plus cover letter in one call. A cover letter that could not be
/// generated at all degrades to an empty one; the analysis is still returned.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    request.validate()?;
    let refine = request.refine_or(state.config.enable_refinement);
    let model = state.model.as_ref();

    let analysis =
        analyze_resume(model, &request.resume_text, &request.job_description, refine).await?;

    let cover_letter =
        match generate_cover_letter(model, &request.resume_text, &request.job_description, refine)
            .await
        {
            Ok(letter) => letter,
            Err(AppError::Llm(msg)) => {
                warn!("Cover letter unavailable, returning analysis only: {msg}");
                CoverLetterResult::default()
            }
            Err(e) => return Err(e),
        };

    info!(
        "Tailored content ready (fit score: {:?}, cover letter: {} chars)",
        analysis.overall_score(),
        cover_letter.final_letter.len()
    );

    Ok(Json(TailorResponse {
        analysis,
        cover_letter,
    }))
}
