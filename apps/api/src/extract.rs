//! Text extraction from uploaded resume documents.
//!
//! Dispatch is strictly by file extension. Every failure path — unsupported
//! format, unreadable file, corrupt document — collapses to `None` with a
//! logged warning; no partial text is ever returned and nothing is thrown.

use std::path::Path;

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::warn;

pub fn extract_text(path: &Path) -> Option<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => extract_text_from_pdf(path),
        Some("docx") => extract_text_from_docx(path),
        other => {
            warn!("Unsupported file format {:?}: {}", other, path.display());
            None
        }
    }
}

/// Whole-document text in page order, trimmed. Empty output counts as failure.
fn extract_text_from_pdf(path: &Path) -> Option<String> {
    match pdf_extract::extract_text(path) {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(e) => {
            warn!("Error extracting text from PDF {}: {e}", path.display());
            None
        }
    }
}

/// Run text concatenated per paragraph, one newline per paragraph, trimmed.
fn extract_text_from_docx(path: &Path) -> Option<String> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Error reading DOCX {}: {e}", path.display());
            return None;
        }
    };

    let docx = match read_docx(&data) {
        Ok(docx) => docx,
        Err(e) => {
            warn!("Error extracting text from DOCX {}: {e}", path.display());
            return None;
        }
    };

    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
