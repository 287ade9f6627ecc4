//! Resume assistant: AI rewriting of entry descriptions and structuring of
//! uploaded resume text.
//!
//! Handlers depend on [`ResumeAssistant`], never on the LLM client directly.
//! [`LlmAssistant`] is the production implementation.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_NEW_FACTS_INSTRUCTION};
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::{sample_resume, ResumeData, SectionKey};

pub mod prompts;

use prompts::{ENHANCE_PROMPT_TEMPLATE, ENHANCE_SYSTEM, EXTRACT_PROMPT_TEMPLATE};

/// Sections whose entries carry a free-text description worth rewriting.
pub fn is_enhanceable(section: SectionKey) -> bool {
    matches!(
        section,
        SectionKey::Internships | SectionKey::Projects | SectionKey::Positions
    )
}

#[async_trait]
pub trait ResumeAssistant: Send + Sync {
    /// Rewrites `description` as a single, tighter paragraph without new facts.
    async fn enhance_description(
        &self,
        section: SectionKey,
        description: &str,
    ) -> Result<String, AppError>;

    /// Maps free resume text onto the resume data structure.
    async fn structure_resume(&self, resume_text: &str) -> Result<ResumeData, AppError>;
}

pub struct LlmAssistant(pub LlmClient);

#[async_trait]
impl ResumeAssistant for LlmAssistant {
    async fn enhance_description(
        &self,
        section: SectionKey,
        description: &str,
    ) -> Result<String, AppError> {
        let prompt = ENHANCE_PROMPT_TEMPLATE
            .replace("{section}", section_label(section))
            .replace("{no_new_facts}", NO_NEW_FACTS_INSTRUCTION)
            .replace("{description}", description);

        let text = self
            .0
            .call_text(&prompt, ENHANCE_SYSTEM, CallOptions::SHORT_TEXT)
            .await?;
        Ok(single_paragraph(&text))
    }

    async fn structure_resume(&self, resume_text: &str) -> Result<ResumeData, AppError> {
        let schema = serde_json::to_string_pretty(&sample_resume())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("schema serialization: {e}")))?;
        let prompt = EXTRACT_PROMPT_TEMPLATE
            .replace("{schema}", &schema)
            .replace("{no_new_facts}", NO_NEW_FACTS_INSTRUCTION)
            .replace("{resume_text}", resume_text);

        Ok(self
            .0
            .call_json::<ResumeData>(&prompt, JSON_ONLY_SYSTEM, CallOptions::STRUCTURED)
            .await?)
    }
}

fn section_label(section: SectionKey) -> &'static str {
    match section {
        SectionKey::Internships => "professional experience",
        SectionKey::Projects => "project",
        SectionKey::Positions => "position of responsibility",
        _ => "resume entry",
    }
}

/// Collapses model output to one paragraph and drops wrapping quotes.
fn single_paragraph(text: &str) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    joined
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(str::to_string)
        .unwrap_or(joined)
}
