//! Resume import: PDF text extraction plus clean-up of AI-structured data.

use tracing::debug;

pub mod handlers;

use crate::errors::AppError;
use crate::models::sample::{PLACEHOLDER_LOGO, PLACEHOLDER_PHOTO};
use crate::models::ResumeData;

/// Pulls the text layer out of a PDF. CPU-bound, runs on a blocking thread.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            // The parser panics on some malformed files.
            if e.is_panic() {
                AppError::UnprocessableEntity("Could not read PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            }
        })?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The PDF has no extractable text (scanned documents are not supported)".to_string(),
        ));
    }
    debug!(chars = text.len(), "Extracted PDF text");
    Ok(text)
}

/// Trims every line and collapses runs of blank lines to one.
fn normalize_whitespace(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !blank && !out.is_empty() {
                out.push("");
            }
            blank = true;
        } else {
            out.push(line);
            blank = false;
        }
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}

/// Makes AI-structured data safe to edit: every entry gets an id and missing
/// images fall back to the upload placeholders.
pub fn finalize_imported(mut data: ResumeData) -> ResumeData {
    data.ensure_entry_ids();
    let details = &mut data.personal_details;
    if details.photo.trim().is_empty() {
        details.photo = PLACEHOLDER_PHOTO.to_string();
    }
    if details.logo.trim().is_empty() {
        details.logo = PLACEHOLDER_LOGO.to_string();
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Project;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("\n\n  JOHN DOE \n\n\n\nB.Tech  \n  \n"),
            "JOHN DOE\n\nB.Tech"
        );
    }

    #[test]
    fn test_finalize_fills_placeholders_and_ids() {
        let mut data = ResumeData::default();
        data.projects.push(Project {
            name: "Chatty".to_string(),
            ..Project::default()
        });
        let data = finalize_imported(data);
        assert_eq!(data.personal_details.photo, PLACEHOLDER_PHOTO);
        assert_eq!(data.personal_details.logo, PLACEHOLDER_LOGO);
        assert!(!data.projects[0].id.is_empty());
    }

    #[test]
    fn test_finalize_keeps_existing_images() {
        let mut data = ResumeData::default();
        data.personal_details.photo = "data:image/jpeg;base64,AAAA".to_string();
        let data = finalize_imported(data);
        assert_eq!(data.personal_details.photo, "data:image/jpeg;base64,AAAA");
    }

    #[tokio::test]
    async fn test_garbage_is_not_a_pdf() {
        let err = extract_pdf_text(b"definitely not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
