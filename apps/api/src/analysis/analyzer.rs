//! Resume Analysis: runs the five analysis tasks and merges them.
//!
//! Flow: skills → experience → job requirements → tailored bullets →
//!       fit score → (optional) refinement.
//!
//! Calls are sequential. A step with no usable answer leaves its section empty;
//! it never aborts the other steps.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::{field_or, Extracted};
use crate::llm_client::CompletionModel;
use crate::tasks::{
    PromptFields, PromptTask, StepRunner, ANALYSIS_RESULTS, JOB_DESCRIPTION, RESUME_TEXT,
};

pub const SKILLS_ANALYSIS: &str = "skills_analysis";
pub const EXPERIENCE_ANALYSIS: &str = "experience_analysis";
pub const JOB_REQUIREMENTS: &str = "job_requirements";
pub const TAILORED_BULLETS: &str = "tailored_bullets";
pub const FIT_ANALYSIS: &str = "fit_analysis";

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// Merged analysis. Every section is always present; a failed step leaves an
/// empty object (or empty list for experience and bullets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnalysis {
    pub skills_analysis: Value,
    pub experience_analysis: Value,
    pub job_requirements: Value,
    pub tailored_bullets: Value,
    pub fit_analysis: Value,
}

impl Default for CombinedAnalysis {
    fn default() -> Self {
        Self {
            skills_analysis: json!({}),
            experience_analysis: json!([]),
            job_requirements: json!({}),
            tailored_bullets: json!([]),
            fit_analysis: json!({}),
        }
    }
}

impl CombinedAnalysis {
    /// Builds the merged structure from one extracted result per section.
    pub fn from_steps(
        skills: &Extracted,
        experience: &Extracted,
        requirements: &Extracted,
        bullets: &Extracted,
        fit: &Extracted,
    ) -> Self {
        let empty = Self::default();
        Self {
            skills_analysis: field_or(skills, SKILLS_ANALYSIS, empty.skills_analysis),
            experience_analysis: field_or(experience, EXPERIENCE_ANALYSIS, empty.experience_analysis),
            job_requirements: field_or(requirements, JOB_REQUIREMENTS, empty.job_requirements),
            tailored_bullets: field_or(bullets, TAILORED_BULLETS, empty.tailored_bullets),
            fit_analysis: field_or(fit, FIT_ANALYSIS, empty.fit_analysis),
        }
    }

    /// Overlays a refinement answer. Sections the refinement left out (or set
    /// to null) keep their current value.
    pub fn overlay(&self, refined: &Extracted) -> Self {
        Self {
            skills_analysis: field_or(refined, SKILLS_ANALYSIS, self.skills_analysis.clone()),
            experience_analysis: field_or(
                refined,
                EXPERIENCE_ANALYSIS,
                self.experience_analysis.clone(),
            ),
            job_requirements: field_or(refined, JOB_REQUIREMENTS, self.job_requirements.clone()),
            tailored_bullets: field_or(refined, TAILORED_BULLETS, self.tailored_bullets.clone()),
            fit_analysis: field_or(refined, FIT_ANALYSIS, self.fit_analysis.clone()),
        }
    }

    /// Overall fit score (0–100) if the model produced a numeric one.
    pub fn overall_score(&self) -> Option<u64> {
        self.fit_analysis.get("overall_score").and_then(Value::as_u64)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full analysis of `resume_text` against `job_description`.
///
/// Returns `AppError::Llm` only when no step reached the model at all.
/// A failed refinement falls back to the pre-refinement analysis.
pub async fn analyze_resume(
    model: &dyn CompletionModel,
    resume_text: &str,
    job_description: &str,
    refine: bool,
) -> Result<CombinedAnalysis, AppError> {
    let mut runner = StepRunner::new(model);
    let fields = PromptFields::new()
        .with(RESUME_TEXT, resume_text)
        .with(JOB_DESCRIPTION, job_description);

    let skills = runner.run(PromptTask::ExtractSkills, &fields).await?;
    let experience = runner.run(PromptTask::ExtractExperience, &fields).await?;
    let requirements = runner.run(PromptTask::AnalyzeJobRequirements, &fields).await?;
    let bullets = runner.run(PromptTask::GenerateTailoredBullets, &fields).await?;
    let fit = runner.run(PromptTask::CalculateFitScore, &fields).await?;

    if let Some(last_error) = runner.all_failed() {
        return Err(AppError::Llm(format!(
            "Resume analysis failed, no model call succeeded: {last_error}"
        )));
    }

    let combined = CombinedAnalysis::from_steps(&skills, &experience, &requirements, &bullets, &fit);
    info!(
        "Initial analysis assembled (fit score: {:?})",
        combined.overall_score()
    );

    if !refine {
        return Ok(combined);
    }

    refine_analysis(&mut runner, combined, job_description).await
}

/// One extra round trip that re-sends the whole analysis for refinement.
async fn refine_analysis(
    runner: &mut StepRunner<'_>,
    combined: CombinedAnalysis,
    job_description: &str,
) -> Result<CombinedAnalysis, AppError> {
    let analysis_json = serde_json::to_string_pretty(&combined)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

    let fields = PromptFields::new()
        .with(ANALYSIS_RESULTS, analysis_json)
        .with(JOB_DESCRIPTION, job_description);
    let refined = runner.run(PromptTask::RefineAnalysis, &fields).await?;

    if refined.is_empty() {
        warn!("Refinement produced no usable result; keeping the initial analysis");
        return Ok(combined);
    }

    info!("Analysis refined");
    Ok(combined.overlay(&refined))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::ScriptedModel;

    const SKILLS_PROMPT: &str = "Extract all technical and soft skills";
    const EXPERIENCE_PROMPT: &str = "Extract work experience";
    const REQUIREMENTS_PROMPT: &str = "Analyze the following job description";
    const BULLETS_PROMPT: &str = "Generate tailored bullet points";
    const FIT_PROMPT: &str = "Calculate a fit score";
    const REFINE_PROMPT: &str = "Refine the following resume analysis";

    const RESUME: &str = "Jane Doe\nBackend engineer at Acme (2019-2024). Rust, Postgres, Kafka.";
    const JD: &str = "Senior Rust Engineer. Required: Rust, distributed systems. Preferred: Kafka.";

    fn happy_model() -> ScriptedModel {
        ScriptedModel::new()
            .reply(
                SKILLS_PROMPT,
                r#"{"skills_analysis": {"technical_skills": ["Rust", "Postgres"], "soft_skills": [], "tools_and_technologies": ["Kafka"]}}"#,
            )
            .reply(
                EXPERIENCE_PROMPT,
                "Here you go:\n```json\n{\"experience_analysis\": [{\"company\": \"Acme\", \"title\": \"Backend engineer\", \"dates\": \"2019-2024\", \"responsibilities\": []}]}\n```",
            )
            .reply(
                REQUIREMENTS_PROMPT,
                r#"{"job_requirements": {"required_skills": ["Rust", "distributed systems"], "preferred_skills": ["Kafka"], "responsibilities": [], "qualifications": []}}"#,
            )
            .reply(
                BULLETS_PROMPT,
                r#"{"tailored_bullets": ["Built Kafka pipelines in Rust",],}"#,
            )
            .reply(
                FIT_PROMPT,
                r#"{"fit_analysis": {"overall_score": 78, "skills_match": 85, "experience_match": 70, "missing_requirements": ["distributed systems"], "strengths": ["Rust"], "areas_for_improvement": []}}"#,
            )
    }

    #[tokio::test]
    async fn test_all_steps_succeed_without_refinement() {
        let model = happy_model();
        let analysis = analyze_resume(&model, RESUME, JD, false).await.unwrap();

        assert_eq!(analysis.skills_analysis["technical_skills"], json!(["Rust", "Postgres"]));
        assert_eq!(analysis.experience_analysis[0]["company"], json!("Acme"));
        assert_eq!(analysis.job_requirements["preferred_skills"], json!(["Kafka"]));
        assert_eq!(analysis.tailored_bullets, json!(["Built Kafka pipelines in Rust"]));
        assert_eq!(analysis.overall_score(), Some(78));
        assert_eq!(model.prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let model = happy_model();
        analyze_resume(&model, RESUME, JD, false).await.unwrap();

        let prompts = model.prompts();
        let expected = [SKILLS_PROMPT, EXPERIENCE_PROMPT, REQUIREMENTS_PROMPT, BULLETS_PROMPT, FIT_PROMPT];
        for (prompt, needle) in prompts.iter().zip(expected) {
            assert!(prompt.starts_with(needle), "unexpected order: {prompt}");
        }
    }

    #[tokio::test]
    async fn test_failed_fit_extraction_leaves_only_fit_empty() {
        let model = happy_model().reply(FIT_PROMPT, "I'm sorry, I can't score this.");

        let analysis = analyze_resume(&model, RESUME, JD, false).await.unwrap();

        assert_eq!(analysis.fit_analysis, json!({}));
        assert_eq!(analysis.experience_analysis[0]["company"], json!("Acme"));
        assert_eq!(analysis.tailored_bullets, json!(["Built Kafka pipelines in Rust"]));
        assert_eq!(model.prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_model_error_on_one_step_does_not_abort_others() {
        let model = ScriptedModel::new()
            .fail(SKILLS_PROMPT, 503)
            .reply(EXPERIENCE_PROMPT, "{\"experience_analysis\": []}")
            .reply(REQUIREMENTS_PROMPT, "{\"job_requirements\": {\"required_skills\": [\"Rust\"]}}")
            .reply(BULLETS_PROMPT, "{\"tailored_bullets\": [\"b\"]}")
            .reply(FIT_PROMPT, "{\"fit_analysis\": {\"overall_score\": 50}}");

        let analysis = analyze_resume(&model, RESUME, JD, false).await.unwrap();

        assert_eq!(analysis.skills_analysis, json!({}));
        assert_eq!(analysis.job_requirements["required_skills"], json!(["Rust"]));
        assert_eq!(analysis.overall_score(), Some(50));
    }

    #[tokio::test]
    async fn test_every_model_call_failing_is_a_single_error() {
        let model = ScriptedModel::new();
        let err = analyze_resume(&model, RESUME, JD, true).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        // Refinement is not attempted once everything failed.
        assert_eq!(model.prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_all_extractions_empty_still_yields_well_formed_analysis() {
        let model = ScriptedModel::new().reply("", "no json here");
        let analysis = analyze_resume(&model, RESUME, JD, false).await.unwrap();
        assert_eq!(analysis, CombinedAnalysis::default());
    }

    #[tokio::test]
    async fn test_refinement_replaces_sections_it_returns() {
        let model = happy_model().reply(
            REFINE_PROMPT,
            r#"{"skills_analysis": {"technical_skills": ["Rust", "Kafka"]}, "fit_analysis": {"overall_score": 82}}"#,
        );

        let analysis = analyze_resume(&model, RESUME, JD, true).await.unwrap();

        assert_eq!(analysis.skills_analysis["technical_skills"], json!(["Rust", "Kafka"]));
        assert_eq!(analysis.overall_score(), Some(82));
        // Sections the refinement omitted keep their initial values.
        assert_eq!(analysis.experience_analysis[0]["company"], json!("Acme"));
        assert_eq!(analysis.tailored_bullets, json!(["Built Kafka pipelines in Rust"]));
        assert_eq!(model.prompts().len(), 6);
    }

    #[tokio::test]
    async fn test_refinement_failure_keeps_initial_analysis() {
        let unrefined = analyze_resume(&happy_model(), RESUME, JD, false).await.unwrap();

        let model = happy_model()
            .reply(REFINE_PROMPT, "```json\n{\"notes\": \"looks good\"}\n```");
        let refined = analyze_resume(&model, RESUME, JD, true).await.unwrap();

        assert_eq!(refined, unrefined);
    }

    #[tokio::test]
    async fn test_refinement_model_error_keeps_initial_analysis() {
        let unrefined = analyze_resume(&happy_model(), RESUME, JD, false).await.unwrap();

        let model = happy_model().fail(REFINE_PROMPT, 500);
        let refined = analyze_resume(&model, RESUME, JD, true).await.unwrap();

        assert_eq!(refined, unrefined);
    }

    #[tokio::test]
    async fn test_refinement_prompt_carries_analysis_and_job_description() {
        let model = happy_model().reply(REFINE_PROMPT, "nothing");
        analyze_resume(&model, RESUME, JD, true).await.unwrap();

        let prompts = model.prompts();
        let refine_prompt = prompts.last().unwrap();
        assert!(refine_prompt.starts_with(REFINE_PROMPT));
        assert!(refine_prompt.contains("\"tailored_bullets\": [\n    \"Built Kafka pipelines in Rust\"\n  ]"));
        assert!(refine_prompt.contains(JD));
    }

    #[test]
    fn test_null_sections_become_empty_defaults() {
        let fit: Extracted = serde_json::from_value(json!({"fit_analysis": null})).unwrap();
        let empty = Extracted::new();
        let analysis = CombinedAnalysis::from_steps(&empty, &empty, &empty, &empty, &fit);
        assert_eq!(analysis, CombinedAnalysis::default());
    }

    #[test]
    fn test_combined_analysis_serializes_all_keys() {
        let value = serde_json::to_value(CombinedAnalysis::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in [SKILLS_ANALYSIS, EXPERIENCE_ANALYSIS, JOB_REQUIREMENTS, TAILORED_BULLETS, FIT_ANALYSIS] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 5);
    }
}
