//! Upload orchestration.
//!
//! Per file: received → validated(ext) → saved(temp) → text extracted →
//! fields extracted → sheet written → cleaned up. Extension validation is
//! all-or-nothing and runs before anything touches disk: one bad filename
//! rejects the whole batch with a 400 and no temp file. Everything after
//! validation degrades per-file — extraction, parsing, and sheet-append
//! failures become markers on that file's report and the batch continues.
//! The temp file is always a deletion candidate, whatever happened before.
//!
//! After the batch, if a job description is set, every resume accumulated in
//! the store (not just this batch) is re-scored against it and positive
//! verdicts are written to the best-fit tab.

use std::path::Path;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::cleanup::TEMP_UPLOAD_DIR;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::models::{FitResult, ParsedResume, UploadedFileReport};
use crate::parser::parse_resume;
use crate::state::AppState;

pub const ALLOWED_EXTENSIONS: [&str; 2] = [".pdf", ".docx"];

const EXTRACTION_FAILED_MARKER: &str = "Text extraction failed or unsupported format";
const PARSE_UNAVAILABLE_MARKER: &str = "Resume parsing failed or no text extracted";

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFileReport>,
}

/// POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        if name.as_deref() != Some("files") {
            continue;
        }
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        let data = field.bytes().await?;
        uploads.push((filename, data.to_vec()));
    }

    if uploads.is_empty() {
        return Err(AppError::Validation(
            "No files were provided in the 'files' field".to_string(),
        ));
    }

    // Batch-level validation: nothing is written to disk until every
    // filename in the batch has an allowed extension.
    if let Some(invalid) = first_invalid_filename(uploads.iter().map(|(name, _)| name.as_str())) {
        return Err(AppError::Validation(format!(
            "File {invalid} has an invalid extension. Allowed extensions are: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let mut files = Vec::with_capacity(uploads.len());
    for (filename, data) in uploads {
        files.push(process_file(&state, filename, &data).await?);
    }

    run_matching_pass(&state).await?;

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".to_string(),
        files,
    }))
}

/// POST /upload_job_description
pub async fn handle_upload_job_description(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut description: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("description") => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            Some("file") => {
                let filename = field.file_name().map(sanitize_filename);
                if let Some(filename) = filename {
                    file = Some((filename, field.bytes().await?.to_vec()));
                }
            }
            _ => {}
        }
    }

    // A file wins over an inline description when both are present.
    let text = if let Some((filename, data)) = file {
        let temp_path = Path::new(TEMP_UPLOAD_DIR).join(&filename);
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e| AppError::Internal(anyhow!("Failed to save {filename}: {e}")))?;
        let extracted = extract_text(&temp_path);
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            warn!("Failed to delete temp file {}: {e}", temp_path.display());
        }
        extracted.ok_or_else(|| {
            AppError::Validation("Failed to extract text from job description file.".to_string())
        })?
    } else if let Some(description) = description {
        description
    } else {
        return Err(AppError::Validation(
            "Provide either a description or a file.".to_string(),
        ));
    };

    state.store.set_job_description(text).await;

    Ok(Json(json!({
        "message": "Job description uploaded successfully."
    })))
}

/// Drives one file through save → extract → parse → sheet append → delete.
/// The temp file is deleted even when an enrichment step fails the request.
async fn process_file(
    state: &AppState,
    filename: String,
    data: &[u8],
) -> Result<UploadedFileReport, AppError> {
    let temp_path = Path::new(TEMP_UPLOAD_DIR).join(&filename);
    tokio::fs::write(&temp_path, data)
        .await
        .map_err(|e| AppError::Internal(anyhow!("Failed to save {filename}: {e}")))?;

    let size_bytes = data.len() as u64;
    let mime_type = mime_guess::from_path(&temp_path)
        .first_raw()
        .map(str::to_owned);

    let extracted = extract_text(&temp_path);
    let enriched = enrich_extracted_text(state, extracted.as_deref()).await;

    let cleanup_status = match tokio::fs::remove_file(&temp_path).await {
        Ok(()) => "File deleted successfully".to_string(),
        Err(e) => format!("Failed to delete file: {e}"),
    };

    let (parsed_resume, sheets_status) = enriched?;

    Ok(UploadedFileReport {
        filename,
        size_bytes,
        mime_type,
        extracted_text: extracted.unwrap_or_else(|| EXTRACTION_FAILED_MARKER.to_string()),
        parsed_resume,
        sheets_status,
        cleanup_status,
    })
}

/// Field extraction plus the primary-sheet append for one file. Returns the
/// report's `parsed_resume` value and sheet status; only missing credentials
/// escalate to an error.
async fn enrich_extracted_text(
    state: &AppState,
    text: Option<&str>,
) -> Result<(Value, Option<bool>), AppError> {
    let Some(text) = text else {
        return Ok((Value::String(PARSE_UNAVAILABLE_MARKER.to_string()), None));
    };

    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Configuration("OpenAI API key not found in environment variables".to_string())
    })?;

    let parsed = parse_resume(llm, text).await;

    let mut sheets_status = None;
    if let ParsedResume::Parsed(record) = &parsed {
        state.store.push_resume(record.clone()).await;

        if let Some(spreadsheet_id) = &state.config.spreadsheet_id {
            let sheets = state.sheets.as_ref().ok_or_else(|| {
                AppError::Configuration(
                    "Google Sheets credentials are not set or unreadable".to_string(),
                )
            })?;
            sheets.ensure_headers(spreadsheet_id).await;
            sheets_status = Some(
                sheets
                    .append_resume(spreadsheet_id, &state.config.sheet_range, record)
                    .await,
            );
        }
    }

    let parsed_resume = serde_json::to_value(&parsed)
        .unwrap_or_else(|_| Value::String(PARSE_UNAVAILABLE_MARKER.to_string()));
    Ok((parsed_resume, sheets_status))
}

/// Scores every accumulated resume against the current job description and
/// writes positive verdicts to the best-fit tab. A single candidate's
/// failure is logged by the scorer and skipped.
async fn run_matching_pass(state: &AppState) -> Result<(), AppError> {
    let Some(job_description) = state.store.job_description().await else {
        return Ok(());
    };
    let resumes = state.store.resumes().await;
    if resumes.is_empty() {
        return Ok(());
    }

    let scorer = state.scorer.as_ref().ok_or_else(|| {
        AppError::Configuration("OpenAI API key not found in environment variables".to_string())
    })?;

    let mut best_fit = Vec::new();
    for resume in &resumes {
        if let Some(decision) = scorer.score(&job_description, resume).await {
            if decision.is_best_fit {
                best_fit.push(FitResult {
                    resume: resume.clone(),
                    reason: decision.reason,
                });
            }
        }
    }

    if best_fit.is_empty() {
        return Ok(());
    }
    let Some(spreadsheet_id) = &state.config.spreadsheet_id else {
        return Ok(());
    };
    let sheets = state.sheets.as_ref().ok_or_else(|| {
        AppError::Configuration("Google Sheets credentials are not set or unreadable".to_string())
    })?;

    sheets.add_best_fit_sheet(spreadsheet_id).await;
    sheets
        .write_best_fit(spreadsheet_id, &best_fit)
        .await
        .map_err(|e| AppError::Sheets(e.to_string()))?;

    Ok(())
}

fn is_valid_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&format!(".{}", ext.to_ascii_lowercase()).as_str()))
        .unwrap_or(false)
}

fn first_invalid_filename<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find(|name| !is_valid_file(name))
}

/// Reduces a client-supplied filename to its basename so uploads cannot
/// escape the temp directory.
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
