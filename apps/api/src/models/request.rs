use serde::Deserialize;

use crate::errors::AppError;

/// Body shared by the analyze, cover-letter and tailor endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Overrides `ENABLE_REFINEMENT` for this request.
    #[serde(default)]
    pub refine: Option<bool>,
}

impl TailorRequest {
    /// Both texts must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() || self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide both resume and job description".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refine_or(&self, default: bool) -> bool {
        self.refine.unwrap_or(default)
    }
}
