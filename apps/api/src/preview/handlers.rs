use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assistant::is_enhanceable;
use crate::errors::AppError;
use crate::models::{sample_resume, ResumeData, SectionKey, Template};
use crate::pagination::{HtmlCompositor, LayoutSnapshot, PageBudget, PassOutcome};
use crate::preview::export::{export_file_name, validate_images};
use crate::preview::images::{crop_to_data_url, CropRect, ImageSlot};
use crate::preview::render::{print_document, render_pages, RenderedPage};
use crate::preview::store::{HeightSource, PreviewSession};
use crate::routes::upload::UploadForm;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePreviewRequest {
    /// Starts from the sample resume when absent.
    #[serde(default)]
    pub resume: Option<ResumeData>,
    #[serde(default)]
    pub template: Template,
}

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub section: SectionKey,
    pub entry_id: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub id: Uuid,
    pub template: Template,
    pub revision: u64,
    /// Number of completed pagination passes.
    pub generation: u64,
    /// True when the last layout signal was rejected and these pages are older.
    pub stale: bool,
    pub height_source: HeightSource,
    pub budget: Option<PageBudget>,
    pub pages: Vec<RenderedPage>,
    pub resume: ResumeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PreviewSession> for PreviewResponse {
    fn from(session: PreviewSession) -> Self {
        let view = session.paginator.view();
        Self {
            id: session.id,
            template: session.template,
            revision: session.revision,
            generation: session.paginator.generation(),
            stale: session.paginator.is_stale(),
            height_source: session.height_source,
            budget: view.map(|v| v.budget),
            pages: view
                .map(|v| render_pages(v, &HtmlCompositor))
                .unwrap_or_default(),
            resume: session.resume,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub entry_id: String,
    pub preview: PreviewResponse,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub outcome: PassOutcome,
    pub preview: PreviewResponse,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub description: String,
    pub preview: PreviewResponse,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub file_name: String,
    pub page_count: usize,
    pub html: String,
}

async fn current(state: &AppState, id: Uuid) -> Result<Json<PreviewResponse>, AppError> {
    Ok(Json(state.previews.get(id).await?.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/previews
pub async fn handle_create_preview(
    State(state): State<AppState>,
    Json(req): Json<CreatePreviewRequest>,
) -> Result<(StatusCode, Json<PreviewResponse>), AppError> {
    let mut resume = req.resume.unwrap_or_else(sample_resume);
    resume.ensure_entry_ids();

    let id = state.previews.create(resume, req.template).await?;
    let preview = state.previews.get(id).await?.into();
    Ok((StatusCode::CREATED, Json(preview)))
}

/// GET /api/v1/previews/:id
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    current(&state, id).await
}

/// DELETE /api/v1/previews/:id
pub async fn handle_delete_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.previews.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Editing
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/previews/:id/resume
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut resume): Json<ResumeData>,
) -> Result<Json<PreviewResponse>, AppError> {
    resume.ensure_entry_ids();
    state
        .previews
        .edit(id, move |existing| {
            *existing = resume;
            Ok(())
        })
        .await?;
    current(&state, id).await
}

/// PATCH /api/v1/previews/:id/personal
pub async fn handle_set_personal_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetFieldRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    state
        .previews
        .edit(id, |resume| Ok(resume.set_personal_field(&req.field, req.value)?))
        .await?;
    current(&state, id).await
}

/// POST /api/v1/previews/:id/sections/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, SectionKey)>,
) -> Result<(StatusCode, Json<AddEntryResponse>), AppError> {
    let entry_id = state
        .previews
        .edit(id, |resume| Ok(resume.add_entry(section)))
        .await?;
    let preview = state.previews.get(id).await?.into();
    Ok((StatusCode::CREATED, Json(AddEntryResponse { entry_id, preview })))
}

/// PATCH /api/v1/previews/:id/sections/:section/:entry_id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, section, entry_id)): Path<(Uuid, SectionKey, String)>,
    Json(req): Json<SetFieldRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    state
        .previews
        .edit(id, |resume| {
            Ok(resume.update_entry_field(section, &entry_id, &req.field, req.value)?)
        })
        .await?;
    current(&state, id).await
}

/// DELETE /api/v1/previews/:id/sections/:section/:entry_id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section, entry_id)): Path<(Uuid, SectionKey, String)>,
) -> Result<Json<PreviewResponse>, AppError> {
    state
        .previews
        .edit(id, |resume| Ok(resume.remove_entry(section, &entry_id)?))
        .await?;
    current(&state, id).await
}

// ────────────────────────────────────────────────────────────────────────────
// Layout, images, AI, export
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/previews/:id/layout
///
/// The renderer calls this once fonts and styles have settled, with its
/// measured snapshot. Missing anchors are not an error: the outcome says
/// `skipped` and the previous pages stay, flagged stale. The snapshot's
/// markup is what later gets exported, so it must be rendered from this
/// session's current resume.
pub async fn handle_layout_stable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(snapshot): Json<LayoutSnapshot>,
) -> Result<Json<LayoutResponse>, AppError> {
    let outcome = state.previews.layout_stable(id, snapshot).await?;
    let preview = state.previews.get(id).await?.into();
    Ok(Json(LayoutResponse { outcome, preview }))
}

/// POST /api/v1/previews/:id/images/:slot
///
/// Multipart: `file` (image bytes), optional `crop` (JSON `{x, y, width, height}`
/// in source pixels).
pub async fn handle_upload_image(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, ImageSlot)>,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let bytes = form.require_file()?.clone();
    let crop = form
        .fields
        .get("crop")
        .map(|raw| serde_json::from_str::<CropRect>(raw))
        .transpose()
        .map_err(|e| AppError::Validation(format!("Invalid crop rectangle: {e}")))?;

    // Decoding and re-encoding is CPU-bound.
    let data_url = tokio::task::spawn_blocking(move || crop_to_data_url(&bytes, crop))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in image crop: {e}")))??;

    state
        .previews
        .edit(id, |resume| {
            Ok(resume.set_personal_field(slot.field(), data_url)?)
        })
        .await?;
    info!(session = %id, slot = slot.field(), "Image updated");
    current(&state, id).await
}

/// POST /api/v1/previews/:id/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let assistant = state.assistant()?.clone();
    if !is_enhanceable(req.section) {
        return Err(AppError::Validation(format!(
            "Entries in {} cannot be enhanced",
            req.section.as_str()
        )));
    }

    let mut resume = state.previews.get(id).await?.resume;
    let original = resume.entry_description(req.section, &req.entry_id)?;
    if original.trim().is_empty() {
        return Err(AppError::Validation(
            "Please write a description first before enhancing.".to_string(),
        ));
    }

    let description = assistant
        .enhance_description(req.section, &original)
        .await?;

    let updated = description.clone();
    state
        .previews
        .edit(id, |resume| {
            Ok(resume.set_entry_description(req.section, &req.entry_id, updated)?)
        })
        .await?;
    let preview = state.previews.get(id).await?.into();
    Ok(Json(EnhanceResponse {
        description,
        preview,
    }))
}

/// POST /api/v1/previews/:id/export
///
/// Preflight plus a print-ready HTML document of the current pages.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let session = state.previews.get(id).await?;
    if let Some(message) = validate_images(&session.resume, session.template) {
        return Err(AppError::Validation(message.to_string()));
    }

    let pages = session
        .paginator
        .view()
        .map(|view| render_pages(view, &HtmlCompositor))
        .unwrap_or_default();
    if pages.is_empty() {
        return Err(AppError::Validation(
            "Could not generate PDF: the resume has no content.".to_string(),
        ));
    }

    let name = &session.resume.personal_details.name;
    let file_name = export_file_name(name);
    info!(session = %id, pages = pages.len(), %file_name, "Export prepared");

    Ok(Json(ExportResponse {
        html: print_document(&format!("{name} Resume"), &pages),
        page_count: pages.len(),
        file_name,
    }))
}
