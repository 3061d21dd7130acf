//! Cover Letter Generation: draft, then optionally polish in three passes.
//!
//! Flow: generate → optimize for ATS → refine tone → enhance impact.
//!
//! Each polishing pass rewrites the latest good letter. A pass with no usable
//! answer is recorded as empty and the chain carries on from the previous letter.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::{field_or, Extracted};
use crate::llm_client::CompletionModel;
use crate::tasks::{
    PromptFields, PromptTask, StepRunner, COVER_LETTER, JOB_DESCRIPTION, RESUME_TEXT,
};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Full output of the cover-letter pipeline. Every key is always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverLetterResult {
    pub initial_cover_letter: Extracted,
    pub ats_optimized: Extracted,
    pub tone_refined: Extracted,
    /// Best letter produced: the impact-enhanced one, else the latest earlier draft.
    pub final_letter: String,
    pub analysis: CoverLetterAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterAnalysis {
    pub tone_analysis: Value,
    pub key_achievements: Value,
    pub improvements: Improvements,
}

impl Default for CoverLetterAnalysis {
    fn default() -> Self {
        Self {
            tone_analysis: json!({}),
            key_achievements: json!([]),
            improvements: Improvements::default(),
        }
    }
}

/// Change notes from each polishing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvements {
    pub ats: Value,
    pub tone: Value,
    pub impact: Value,
}

impl Default for Improvements {
    fn default() -> Self {
        Self {
            ats: json!([]),
            tone: json!([]),
            impact: json!([]),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates a cover letter for `resume_text` against `job_description`.
///
/// With `refine` off only the draft step runs. Returns `AppError::Llm` only
/// when no step reached the model.
pub async fn generate_cover_letter(
    model: &dyn CompletionModel,
    resume_text: &str,
    job_description: &str,
    refine: bool,
) -> Result<CoverLetterResult, AppError> {
    let mut runner = StepRunner::new(model);
    let fields = PromptFields::new()
        .with(RESUME_TEXT, resume_text)
        .with(JOB_DESCRIPTION, job_description);

    let initial = runner.run(PromptTask::GenerateCoverLetter, &fields).await?;
    let mut letter = letter_text(&initial, PromptTask::GenerateCoverLetter);

    let mut result = CoverLetterResult {
        initial_cover_letter: initial,
        ..Default::default()
    };

    if refine && letter.is_none() {
        warn!("No draft cover letter produced; skipping polishing passes");
    }

    if refine && letter.is_some() {
        let optimized =
            polish(&mut runner, PromptTask::OptimizeCoverLetter, &fields, &mut letter).await?;
        let tone_refined =
            polish(&mut runner, PromptTask::RefineTone, &fields, &mut letter).await?;
        let enhanced =
            polish(&mut runner, PromptTask::EnhanceImpact, &fields, &mut letter).await?;

        result.analysis = CoverLetterAnalysis {
            tone_analysis: field_or(&tone_refined, "tone_analysis", json!({})),
            key_achievements: field_or(&enhanced, "key_achievements", json!([])),
            improvements: Improvements {
                ats: field_or(&optimized, "improvements_made", json!([])),
                tone: field_or(&tone_refined, "style_improvements", json!([])),
                impact: field_or(&enhanced, "improvements_made", json!([])),
            },
        };
        result.ats_optimized = optimized;
        result.tone_refined = tone_refined;
    }

    if let Some(last_error) = runner.all_failed() {
        return Err(AppError::Llm(format!(
            "Cover letter generation failed, no model call succeeded: {last_error}"
        )));
    }

    result.final_letter = letter.unwrap_or_default();
    info!(
        "Cover letter ready ({} words)",
        result.final_letter.split_whitespace().count()
    );

    Ok(result)
}

/// Runs one polishing pass over the current letter and advances `letter`
/// when the pass produced a new one.
async fn polish(
    runner: &mut StepRunner<'_>,
    task: PromptTask,
    base: &PromptFields,
    letter: &mut Option<String>,
) -> Result<Extracted, AppError> {
    let current = letter.clone().unwrap_or_default();
    let fields = base.clone().with(COVER_LETTER, current);
    let extracted = runner.run(task, &fields).await?;

    match letter_text(&extracted, task) {
        Some(text) => *letter = Some(text),
        None => warn!("{} produced no letter; keeping the previous version", task.name()),
    }

    Ok(extracted)
}

/// Non-blank letter text under the task's key.
fn letter_text(extracted: &Extracted, task: PromptTask) -> Option<String> {
    extracted
        .get(task.required_key())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
