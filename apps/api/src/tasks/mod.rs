//! Prompt Builder: the closed set of model tasks and the round trip that runs one.
//!
//! Every task is statically bound to a template, the text fields that template
//! needs, and the top-level key its answer must carry. There is no runtime
//! task registry: adding a task means adding a variant.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::extract::{extract_json_with_key, Extracted};
use crate::llm_client::prompts::JSON_RETURN_INSTRUCTION;
use crate::llm_client::{CompletionModel, LlmError};

pub mod prompts;

use prompts::*;

pub const RESUME_TEXT: &str = "resume_text";
pub const JOB_DESCRIPTION: &str = "job_description";
pub const ANALYSIS_RESULTS: &str = "analysis_results";
pub const COVER_LETTER: &str = "cover_letter";

/// Placeholder for the shared output rules. Not a caller-supplied field.
const JSON_RULES: &str = "json_rules";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("missing required prompt field '{0}'")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("{task} model call failed: {source}")]
    Model {
        task: &'static str,
        #[source]
        source: LlmError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptTask {
    ExtractSkills,
    ExtractExperience,
    AnalyzeJobRequirements,
    GenerateTailoredBullets,
    CalculateFitScore,
    RefineAnalysis,
    GenerateCoverLetter,
    OptimizeCoverLetter,
    RefineTone,
    EnhanceImpact,
}

impl PromptTask {
    #[cfg(test)]
    pub const ALL: [PromptTask; 10] = [
        PromptTask::ExtractSkills,
        PromptTask::ExtractExperience,
        PromptTask::AnalyzeJobRequirements,
        PromptTask::GenerateTailoredBullets,
        PromptTask::CalculateFitScore,
        PromptTask::RefineAnalysis,
        PromptTask::GenerateCoverLetter,
        PromptTask::OptimizeCoverLetter,
        PromptTask::RefineTone,
        PromptTask::EnhanceImpact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptTask::ExtractSkills => "extract_skills",
            PromptTask::ExtractExperience => "extract_experience",
            PromptTask::AnalyzeJobRequirements => "analyze_job_requirements",
            PromptTask::GenerateTailoredBullets => "generate_tailored_bullets",
            PromptTask::CalculateFitScore => "calculate_fit_score",
            PromptTask::RefineAnalysis => "refine_analysis",
            PromptTask::GenerateCoverLetter => "generate_cover_letter",
            PromptTask::OptimizeCoverLetter => "optimize_cover_letter",
            PromptTask::RefineTone => "refine_tone",
            PromptTask::EnhanceImpact => "enhance_impact",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            PromptTask::ExtractSkills => EXTRACT_SKILLS_TEMPLATE,
            PromptTask::ExtractExperience => EXTRACT_EXPERIENCE_TEMPLATE,
            PromptTask::AnalyzeJobRequirements => ANALYZE_JOB_REQUIREMENTS_TEMPLATE,
            PromptTask::GenerateTailoredBullets => GENERATE_TAILORED_BULLETS_TEMPLATE,
            PromptTask::CalculateFitScore => CALCULATE_FIT_SCORE_TEMPLATE,
            PromptTask::RefineAnalysis => REFINE_ANALYSIS_TEMPLATE,
            PromptTask::GenerateCoverLetter => GENERATE_COVER_LETTER_TEMPLATE,
            PromptTask::OptimizeCoverLetter => OPTIMIZE_COVER_LETTER_TEMPLATE,
            PromptTask::RefineTone => REFINE_TONE_TEMPLATE,
            PromptTask::EnhanceImpact => ENHANCE_IMPACT_TEMPLATE,
        }
    }

    /// Text fields the template embeds. All must be supplied.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            PromptTask::ExtractSkills | PromptTask::ExtractExperience => &[RESUME_TEXT],
            PromptTask::AnalyzeJobRequirements => &[JOB_DESCRIPTION],
            PromptTask::GenerateTailoredBullets
            | PromptTask::CalculateFitScore
            | PromptTask::GenerateCoverLetter => &[RESUME_TEXT, JOB_DESCRIPTION],
            PromptTask::RefineAnalysis => &[ANALYSIS_RESULTS, JOB_DESCRIPTION],
            PromptTask::OptimizeCoverLetter | PromptTask::RefineTone => {
                &[COVER_LETTER, JOB_DESCRIPTION]
            }
            PromptTask::EnhanceImpact => &[COVER_LETTER, RESUME_TEXT],
        }
    }

    /// Top-level key a usable answer must contain.
    pub fn required_key(self) -> &'static str {
        match self {
            PromptTask::ExtractSkills | PromptTask::RefineAnalysis => "skills_analysis",
            PromptTask::ExtractExperience => "experience_analysis",
            PromptTask::AnalyzeJobRequirements => "job_requirements",
            PromptTask::GenerateTailoredBullets => "tailored_bullets",
            PromptTask::CalculateFitScore => "fit_analysis",
            PromptTask::GenerateCoverLetter => "cover_letter",
            PromptTask::OptimizeCoverLetter => "optimized_letter",
            PromptTask::RefineTone => "refined_letter",
            PromptTask::EnhanceImpact => "enhanced_letter",
        }
    }
}

/// Named text fields handed to the Prompt Builder.
#[derive(Debug, Clone, Default)]
pub struct PromptFields {
    values: HashMap<String, String>,
}

impl PromptFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Builds the exact prompt text for `task`.
///
/// Field values are embedded verbatim in a single pass, so placeholder-like
/// text inside a resume or job description is never expanded.
pub fn build_prompt(task: PromptTask, fields: &PromptFields) -> Result<String, PromptError> {
    let mut values = vec![(JSON_RULES, JSON_RETURN_INSTRUCTION)];
    for &name in task.required_fields() {
        let value = fields
            .get(name)
            .ok_or_else(|| PromptError::MissingField(name.to_string()))?;
        values.push((name, value));
    }

    Ok(render(task.template(), &values))
}

fn render(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let hit = values
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One prompt → model → extract round trip.
///
/// Prompt construction and model failures are returned as errors. A response
/// the extractor cannot use is not an error: it comes back as an empty map.
pub async fn run_task(
    model: &dyn CompletionModel,
    task: PromptTask,
    fields: &PromptFields,
) -> Result<Extracted, TaskError> {
    let prompt = build_prompt(task, fields)?;
    debug!("Running task {} ({} prompt chars)", task.name(), prompt.len());

    let response = model
        .complete(&prompt)
        .await
        .map_err(|source| TaskError::Model {
            task: task.name(),
            source,
        })?;

    let extracted = extract_json_with_key(&response, task.required_key());
    info!(
        "Task {} finished: {}",
        task.name(),
        if extracted.is_empty() { "no usable result" } else { "ok" }
    );
    Ok(extracted)
}

/// Runs the sub-steps of a multi-step operation against one model.
///
/// A model failure degrades that step to an empty result and is remembered;
/// it never stops sibling steps. Prompt errors still propagate.
pub struct StepRunner<'a> {
    model: &'a dyn CompletionModel,
    attempted: usize,
    model_failures: Vec<String>,
}

impl<'a> StepRunner<'a> {
    pub fn new(model: &'a dyn CompletionModel) -> Self {
        Self {
            model,
            attempted: 0,
            model_failures: Vec::new(),
        }
    }

    pub async fn run(
        &mut self,
        task: PromptTask,
        fields: &PromptFields,
    ) -> Result<Extracted, PromptError> {
        self.attempted += 1;
        match run_task(self.model, task, fields).await {
            Ok(extracted) => Ok(extracted),
            Err(TaskError::Prompt(e)) => Err(e),
            Err(e @ TaskError::Model { .. }) => {
                warn!("{e}; continuing with an empty result");
                self.model_failures.push(e.to_string());
                Ok(Extracted::new())
            }
        }
    }

    /// The last model error, if every step so far failed to reach the model.
    pub fn all_failed(&self) -> Option<&str> {
        if self.attempted > 0 && self.model_failures.len() == self.attempted {
            self.model_failures.last().map(String::as_str)
        } else {
            None
        }
    }
}
