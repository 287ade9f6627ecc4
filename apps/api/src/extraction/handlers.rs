use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_pdf_text, finalize_imported};
use crate::models::ResumeData;
use crate::routes::upload::UploadForm;
use crate::state::AppState;

/// POST /api/v1/resumes/extract
///
/// Multipart with a `file` PDF part. Returns editable resume data; open a
/// preview session with it via `POST /api/v1/previews`.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeData>, AppError> {
    let assistant = state.assistant()?.clone();
    let form = UploadForm::read(multipart).await?;
    let bytes = form.require_file()?.to_vec();

    let text = extract_pdf_text(bytes).await?;
    let data = finalize_imported(assistant.structure_resume(&text).await?);
    info!(
        projects = data.projects.len(),
        internships = data.internships.len(),
        "Resume extracted from PDF"
    );
    Ok(Json(data))
}
