use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Credentials are deliberately optional at startup: an endpoint that needs a
/// missing credential fails with a 500 at the point of use, and the service
/// keeps serving everything else.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    /// Path to the Google service-account JSON file.
    pub sheets_credentials_path: Option<String>,
    pub spreadsheet_id: Option<String>,
    /// A1 range resume rows are appended to on the primary sheet.
    pub sheet_range: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            sheets_credentials_path: optional_env("GOOGLE_SHEETS_CREDENTIALS"),
            spreadsheet_id: optional_env("GOOGLE_SHEETS_SPREADSHEET_ID"),
            sheet_range: std::env::var("SHEET_RANGE")
                .unwrap_or_else(|_| "Sheet1!A:F".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
