//! Fit Scoring — judges one candidate record against a job description.
//!
//! Trait-based so the backend can be swapped without touching the handler;
//! `AppState` carries an `Arc<dyn FitScorer>`. A scoring failure for one
//! candidate logs and yields `None` — it must never abort the batch or
//! other candidates' results.

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::prompts::{FIT_SCORE_PROMPT, FIT_SCORE_SYSTEM};
use crate::llm_client::{parse_json_response, LlmClient};
use crate::models::{FitDecision, ResumeRecord};

const MAX_SCORE_TOKENS: u32 = 500;

#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(&self, job_description: &str, candidate: &ResumeRecord) -> Option<FitDecision>;
}

/// Semantic scorer backed by the shared LLM client. Deterministic, bounded,
/// single-shot like every other model call in this service.
pub struct LlmFitScorer {
    llm: LlmClient,
}

impl LlmFitScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FitScorer for LlmFitScorer {
    async fn score(&self, job_description: &str, candidate: &ResumeRecord) -> Option<FitDecision> {
        let rendered = match serde_json::to_string_pretty(candidate) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("Failed to render candidate record: {e}");
                return None;
            }
        };

        let prompt = FIT_SCORE_PROMPT
            .replace("{job_description}", job_description)
            .replace("{candidate}", &rendered);

        let content = match self.llm.call(FIT_SCORE_SYSTEM, &prompt, MAX_SCORE_TOKENS).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Error matching resume for {}: {e}", candidate.full_name);
                return None;
            }
        };

        match parse_json_response::<FitDecision>(&content) {
            Ok(decision) => Some(decision),
            Err(e) => {
                warn!("Failed to decode fit decision as JSON: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_decision_parses_from_fenced_output() {
        let raw = "```json\n{\"is_best_fit\": true, \"reason\": \"Strong Rust background\"}\n```";
        let decision: FitDecision = parse_json_response(raw).unwrap();
        assert!(decision.is_best_fit);
        assert_eq!(decision.reason, "Strong Rust background");
    }

    #[test]
    fn test_fit_decision_parses_negative_verdict() {
        let raw = "{\"is_best_fit\": false, \"reason\": \"No overlap with the role\"}";
        let decision: FitDecision = parse_json_response(raw).unwrap();
        assert!(!decision.is_best_fit);
    }

    #[test]
    fn test_fit_decision_rejects_prose() {
        let result: Result<FitDecision, _> =
            parse_json_response("The candidate seems fine to me.");
        assert!(result.is_err());
    }
}
