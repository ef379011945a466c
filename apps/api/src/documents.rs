//! Uploaded resume decoding: plain text and PDF in, UTF-8 text out.

use std::panic::AssertUnwindSafe;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Text,
    Pdf,
}

fn document_kind(file_name: &str) -> Result<DocumentKind, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "" | "txt" | "text" | "md" => Ok(DocumentKind::Text),
        "pdf" => Ok(DocumentKind::Pdf),
        other => Err(AppError::UnsupportedMedia(format!(
            "'{file_name}': .{other} files are not supported. Upload .txt or .pdf resumes"
        ))),
    }
}

/// Decodes an uploaded resume into text.
pub async fn decode_resume(
    file_name: &str,
    data: Bytes,
    max_bytes: usize,
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation(format!("'{file_name}' is empty")));
    }
    if data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "'{file_name}' is {} bytes; the limit is {max_bytes} bytes",
            data.len()
        )));
    }

    let text = match document_kind(file_name)? {
        DocumentKind::Text => decode_text(file_name, &data)?,
        DocumentKind::Pdf => extract_pdf_text(file_name, data).await?,
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "'{file_name}' contains no readable text"
        )));
    }

    debug!(file_name, chars = text.len(), "Decoded resume");
    Ok(text)
}

fn decode_text(file_name: &str, data: &[u8]) -> Result<String, AppError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    String::from_utf8(data.to_vec())
        .map_err(|_| AppError::Validation(format!("'{file_name}' is not valid UTF-8 text")))
}

async fn extract_pdf_text(file_name: &str, data: Bytes) -> Result<String, AppError> {
    let file_name = file_name.to_string();
    // pdf-extract is CPU bound and panics on some malformed documents
    tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&data)))
            .map_err(|_| AppError::Validation(format!("'{file_name}' is not a readable PDF")))?
            .map_err(|e| AppError::Validation(format!("'{file_name}' is not a readable PDF: {e}")))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
}

/// Derives a display name for a candidate who only exists as an uploaded file.
pub fn candidate_name_from_file(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let name = stem.replace('_', " ").trim().to_string();
    if name.is_empty() {
        "Unnamed candidate".to_string()
    } else {
        name
    }
}
