use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured resume representation returned by the field extractor.
///
/// Every field is serde-defaulted so a sparse model response still parses;
/// the model is instructed to emit the full shape but is not trusted to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub graduation_year: String,
}

/// Outcome of one field-extraction attempt. Serializes untagged: a success is
/// the structured record itself, a failure is an object carrying an `error`
/// key plus whichever raw payload was available for diagnosis.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParsedResume {
    Parsed(ResumeRecord),
    Failed(ParseFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

/// Per-file summary returned from `POST /upload`.
///
/// `parsed_resume` is either the (possibly failed) extraction outcome or a
/// plain marker string when no text could be extracted at all.
#[derive(Debug, Serialize)]
pub struct UploadedFileReport {
    pub filename: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub extracted_text: String,
    pub parsed_resume: Value,
    pub sheets_status: Option<bool>,
    pub cleanup_status: String,
}

/// Boolean judgment plus rationale produced by the fit scorer.
#[derive(Debug, Clone, Deserialize)]
pub struct FitDecision {
    pub is_best_fit: bool,
    #[serde(default)]
    pub reason: String,
}

/// A candidate the model judged a strong fit, destined for the best-fit tab.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub resume: ResumeRecord,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_deserializes_with_defaults() {
        let record: ResumeRecord = serde_json::from_str(r#"{"full_name": "Ada Lovelace"}"#).unwrap();
        assert_eq!(record.full_name, "Ada Lovelace");
        assert_eq!(record.email, "");
        assert!(record.skills.is_empty());
        assert!(record.work_experience.is_empty());
        assert!(record.education.is_empty());
    }

    #[test]
    fn test_full_record_deserializes() {
        let json = r#"{
            "full_name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "555-0100",
            "skills": ["COBOL", "Compilers"],
            "work_experience": [
                {
                    "company": "US Navy",
                    "position": "Rear Admiral",
                    "duration": "1943-1986",
                    "responsibilities": ["Compiler development"]
                }
            ],
            "education": [
                {
                    "institution": "Yale",
                    "degree": "PhD Mathematics",
                    "graduation_year": "1934"
                }
            ]
        }"#;

        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.skills, vec!["COBOL", "Compilers"]);
        assert_eq!(record.work_experience[0].company, "US Navy");
        assert_eq!(record.education[0].graduation_year, "1934");
    }

    #[test]
    fn test_parse_failure_serializes_with_error_key() {
        let failure = ParsedResume::Failed(ParseFailure {
            error: "Failed to decode model response as JSON".to_string(),
            raw_response: Some("not json".to_string()),
            raw_text: None,
        });

        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value.get("error").and_then(|v| v.as_str()),
            Some("Failed to decode model response as JSON")
        );
        assert_eq!(
            value.get("raw_response").and_then(|v| v.as_str()),
            Some("not json")
        );
        assert!(value.get("raw_text").is_none());
    }

    #[test]
    fn test_parsed_record_serializes_untagged() {
        let parsed = ParsedResume::Parsed(ResumeRecord {
            full_name: "Ada Lovelace".to_string(),
            ..Default::default()
        });

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            value.get("full_name").and_then(|v| v.as_str()),
            Some("Ada Lovelace")
        );
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_fit_decision_reason_defaults_to_empty() {
        let decision: FitDecision = serde_json::from_str(r#"{"is_best_fit": true}"#).unwrap();
        assert!(decision.is_best_fit);
        assert_eq!(decision.reason, "");
    }
}
