use std::sync::Arc;

use crate::assistant::ResumeAssistant;
use crate::config::Config;
use crate::errors::AppError;
use crate::preview::store::PreviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub previews: PreviewStore,
    /// `None` when no API key is configured; AI endpoints then answer 503.
    pub assistant: Option<Arc<dyn ResumeAssistant>>,
}

impl AppState {
    pub fn assistant(&self) -> Result<&Arc<dyn ResumeAssistant>, AppError> {
        self.assistant.as_ref().ok_or(AppError::AssistantUnavailable)
    }
}
