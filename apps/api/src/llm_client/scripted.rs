//! In-memory `CompletionModel` for orchestration and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionModel, LlmError};

enum Reply {
    Text(String),
    Fail(u16),
}

/// Answers each prompt with the reply of the most recently added rule whose
/// needle occurs in it, so later rules override earlier ones.
/// Prompts matching no rule fail with a 500 so a missing rule is obvious.
#[derive(Default)]
pub struct ScriptedModel {
    rules: Vec<(String, Reply)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn fail(mut self, needle: &str, status: u16) -> Self {
        self.rules.push((needle.to_string(), Reply::Fail(status)));
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.rules.iter().rev().find(|(needle, _)| prompt.contains(needle)) {
            Some((_, Reply::Text(text))) => Ok(text.clone()),
            Some((_, Reply::Fail(status))) => Err(LlmError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::Api {
                status: 500,
                message: "no scripted reply".to_string(),
            }),
        }
    }
}
