use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The model boundary. `LlmClient` in production, a scripted model in tests.
    pub model: Arc<dyn CompletionModel>,
    pub config: Config,
}
