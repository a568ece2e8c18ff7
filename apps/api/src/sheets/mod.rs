/// Google Sheets client — the single point of entry for spreadsheet writes.
///
/// Auth is the service-account flow: an RS256-signed JWT assertion is
/// exchanged at the key's token endpoint for a bearer token before each
/// operation. The public surface never panics and never leaks transport
/// errors past its boundary: header provisioning swallows failures, row
/// appends report a boolean, and only the best-fit write pass propagates
/// (tab creation excepted — a tab that already exists is not an error worth
/// hearing about).
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{FitResult, ResumeRecord};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Assertion lifetime in seconds; Google caps it at one hour.
const ASSERTION_TTL: i64 = 3600;

pub const BEST_FIT_SHEET_TITLE: &str = "Best Fit Candidates";

const RESUME_HEADERS: [&str; 6] = [
    "Full Name",
    "Email",
    "Phone",
    "Skills",
    "Work Experience",
    "Education",
];
const BEST_FIT_HEADERS: [&str; 3] = ["Full Name", "Email", "Reason"];

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
}

impl SheetsClient {
    pub fn from_credentials_file(path: &str) -> Result<Self, SheetsError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SheetsError::Credentials(format!("cannot read {path}: {e}")))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            SheetsError::Credentials(format!("malformed service account file {path}: {e}"))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            key,
        })
    }

    /// Ensures the primary sheet carries the 6-column header row.
    /// Failures are logged and swallowed — a missing header never blocks an
    /// append.
    pub async fn ensure_headers(&self, spreadsheet_id: &str) {
        if let Err(e) = self.try_ensure_headers(spreadsheet_id).await {
            warn!("Error checking/creating sheet headers: {e}");
        }
    }

    async fn try_ensure_headers(&self, spreadsheet_id: &str) -> Result<(), SheetsError> {
        let existing = self.get_values(spreadsheet_id, "A1:F1").await?;
        if existing.is_none() {
            let headers = vec![RESUME_HEADERS.iter().map(|h| h.to_string()).collect()];
            self.update_values(spreadsheet_id, "A1:F1", headers).await?;
        }
        Ok(())
    }

    /// Appends one flattened resume row. Callers see a boolean outcome, not
    /// an error.
    pub async fn append_resume(
        &self,
        spreadsheet_id: &str,
        range: &str,
        record: &ResumeRecord,
    ) -> bool {
        match self
            .append_values(spreadsheet_id, range, vec![resume_row(record)])
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Error appending data to Google Sheet: {e}");
                false
            }
        }
    }

    /// Creates the best-fit tab. The tab usually already exists, so creation
    /// failure is ignored.
    pub async fn add_best_fit_sheet(&self, spreadsheet_id: &str) {
        if let Err(e) = self.add_sheet(spreadsheet_id, BEST_FIT_SHEET_TITLE).await {
            debug!("Best-fit sheet not created (may already exist): {e}");
        }
    }

    /// Writes the 3-column header and one row per best-fit candidate to the
    /// best-fit tab.
    pub async fn write_best_fit(
        &self,
        spreadsheet_id: &str,
        results: &[FitResult],
    ) -> Result<(), SheetsError> {
        let header = vec![BEST_FIT_HEADERS.iter().map(|h| h.to_string()).collect()];
        self.update_values(
            spreadsheet_id,
            &format!("{BEST_FIT_SHEET_TITLE}!A1:C1"),
            header,
        )
        .await?;

        let rows: Vec<Vec<String>> = results.iter().map(best_fit_row).collect();
        self.append_values(spreadsheet_id, &format!("{BEST_FIT_SHEET_TITLE}!A2"), rows)
            .await?;
        Ok(())
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: OAUTH_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<Vec<Vec<serde_json::Value>>>, SheetsError> {
        let token = self.access_token().await?;
        let url = format!("{SHEETS_API_BASE}/{spreadsheet_id}/values/{range}");

        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        let response = check_status(response).await?;

        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{spreadsheet_id}/values/{range}?valueInputOption=USER_ENTERED"
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": values }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{spreadsheet_id}/values/{range}:append\
             ?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": values }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn add_sheet(&self, spreadsheet_id: &str, title: &str) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = format!("{SHEETS_API_BASE}/{spreadsheet_id}:batchUpdate");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({
                "requests": [
                    { "addSheet": { "properties": { "title": title } } }
                ]
            }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(SheetsError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Flattens a structured record into the fixed 6-column row: name, email,
/// phone, comma-joined skills, one line per job, one line per program.
pub fn resume_row(record: &ResumeRecord) -> Vec<String> {
    vec![
        record.full_name.clone(),
        record.email.clone(),
        record.phone.clone(),
        record.skills.join(", "),
        record
            .work_experience
            .iter()
            .map(|exp| format!("{} - {} ({})", exp.company, exp.position, exp.duration))
            .collect::<Vec<_>>()
            .join("\n"),
        record
            .education
            .iter()
            .map(|edu| format!("{} - {} ({})", edu.institution, edu.degree, edu.graduation_year))
            .collect::<Vec<_>>()
            .join("\n"),
    ]
}

fn best_fit_row(result: &FitResult) -> Vec<String> {
    vec![
        result.resume.full_name.clone(),
        result.resume.email.clone(),
        result.reason.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, WorkExperience};

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            full_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "555-0100".to_string(),
            skills: vec!["COBOL".to_string(), "Compilers".to_string()],
            work_experience: vec![
                WorkExperience {
                    company: "US Navy".to_string(),
                    position: "Rear Admiral".to_string(),
                    duration: "1943-1986".to_string(),
                    responsibilities: vec!["Compiler development".to_string()],
                },
                WorkExperience {
                    company: "Remington Rand".to_string(),
                    position: "Programmer".to_string(),
                    duration: "1949-1967".to_string(),
                    responsibilities: vec![],
                },
            ],
            education: vec![Education {
                institution: "Yale".to_string(),
                degree: "PhD Mathematics".to_string(),
                graduation_year: "1934".to_string(),
            }],
        }
    }

    #[test]
    fn test_resume_row_has_six_columns() {
        assert_eq!(resume_row(&sample_record()).len(), 6);
    }

    #[test]
    fn test_resume_row_round_trips_identity_fields() {
        let record = sample_record();
        let row = resume_row(&record);
        assert_eq!(row[0], record.full_name);
        assert_eq!(row[1], record.email);
        assert_eq!(row[2], record.phone);
    }

    #[test]
    fn test_resume_row_joins_skills_in_order() {
        let row = resume_row(&sample_record());
        assert_eq!(row[3], "COBOL, Compilers");
        let recovered: Vec<&str> = row[3].split(", ").collect();
        assert_eq!(recovered, vec!["COBOL", "Compilers"]);
    }

    #[test]
    fn test_resume_row_joins_experience_one_line_per_job() {
        let row = resume_row(&sample_record());
        let lines: Vec<&str> = row[4].split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "US Navy - Rear Admiral (1943-1986)",
                "Remington Rand - Programmer (1949-1967)",
            ]
        );
    }

    #[test]
    fn test_resume_row_joins_education() {
        let row = resume_row(&sample_record());
        assert_eq!(row[5], "Yale - PhD Mathematics (1934)");
    }

    #[test]
    fn test_resume_row_empty_lists_yield_empty_cells() {
        let row = resume_row(&ResumeRecord::default());
        assert_eq!(row[3], "");
        assert_eq!(row[4], "");
        assert_eq!(row[5], "");
    }

    #[test]
    fn test_best_fit_row_shape() {
        let result = FitResult {
            resume: sample_record(),
            reason: "Deep compiler experience".to_string(),
        };
        let row = best_fit_row(&result);
        assert_eq!(
            row,
            vec![
                "Grace Hopper".to_string(),
                "grace@example.com".to_string(),
                "Deep compiler experience".to_string(),
            ]
        );
    }
}
