//! Resume Field Extractor — structures raw resume text via one model call.
//!
//! The contract is that `parse_resume` never fails to its caller: every
//! outcome is a `ParsedResume`, either the structured record or a failure
//! record carrying an `error` key and whatever raw payload aids diagnosis.

use tracing::warn;

use crate::llm_client::prompts::{RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};
use crate::llm_client::{parse_json_response, LlmClient, LlmError};
use crate::models::{ParseFailure, ParsedResume, ResumeRecord};

const MAX_PARSE_TOKENS: u32 = 1000;

pub async fn parse_resume(llm: &LlmClient, text: &str) -> ParsedResume {
    let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", text);

    match llm.call(RESUME_PARSE_SYSTEM, &prompt, MAX_PARSE_TOKENS).await {
        Ok(content) => interpret_model_output(&content),
        Err(LlmError::EmptyContent) => {
            warn!("Model returned empty content for resume parse");
            ParsedResume::Failed(ParseFailure {
                error: "Model API returned empty content".to_string(),
                raw_response: None,
                raw_text: None,
            })
        }
        Err(e) => {
            warn!("Resume parse call failed: {e}");
            ParsedResume::Failed(ParseFailure {
                error: format!("Failed to parse resume: {e}"),
                raw_response: None,
                raw_text: Some(text.to_string()),
            })
        }
    }
}

/// Normalizes model output into a record. Non-JSON content becomes a failure
/// record that preserves the unparsed response.
fn interpret_model_output(raw: &str) -> ParsedResume {
    match parse_json_response::<ResumeRecord>(raw) {
        Ok(record) => ParsedResume::Parsed(record),
        Err(e) => {
            warn!("Failed to decode model response as JSON: {e}");
            ParsedResume::Failed(ParseFailure {
                error: format!("Failed to decode model response as JSON: {e}"),
                raw_response: Some(raw.to_string()),
                raw_text: None,
            })
        }
    }
}
