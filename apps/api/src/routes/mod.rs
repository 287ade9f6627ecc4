pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::preview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Preview sessions
        .route("/api/v1/previews", post(handlers::handle_create_preview))
        .route(
            "/api/v1/previews/:id",
            get(handlers::handle_get_preview).delete(handlers::handle_delete_preview),
        )
        .route(
            "/api/v1/previews/:id/resume",
            put(handlers::handle_replace_resume),
        )
        .route(
            "/api/v1/previews/:id/personal",
            patch(handlers::handle_set_personal_field),
        )
        .route(
            "/api/v1/previews/:id/sections/:section",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/previews/:id/sections/:section/:entry_id",
            patch(handlers::handle_update_entry).delete(handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/previews/:id/layout",
            post(handlers::handle_layout_stable),
        )
        .route(
            "/api/v1/previews/:id/images/:slot",
            post(handlers::handle_upload_image),
        )
        .route("/api/v1/previews/:id/enhance", post(handlers::handle_enhance))
        .route("/api/v1/previews/:id/export", post(handlers::handle_export))
        // Import
        .route(
            "/api/v1/resumes/extract",
            post(extraction::handle_extract_resume),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::assistant::ResumeAssistant;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::models::{ResumeData, SectionKey};
    use crate::preview::store::PreviewStore;

    struct EchoAssistant;

    #[async_trait]
    impl ResumeAssistant for EchoAssistant {
        async fn enhance_description(
            &self,
            _section: SectionKey,
            description: &str,
        ) -> Result<String, AppError> {
            Ok(format!("Improved: {description}"))
        }

        async fn structure_resume(&self, _resume_text: &str) -> Result<ResumeData, AppError> {
            Ok(ResumeData::default())
        }
    }

    fn app(assistant: Option<Arc<dyn ResumeAssistant>>) -> Router {
        build_router(AppState {
            config: Config::default(),
            previews: PreviewStore::default(),
            assistant,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router) -> Value {
        let response = send(app, "POST", "/api/v1/previews", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(None), "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "folio");
    }

    #[tokio::test]
    async fn test_create_preview_from_sample() {
        let app = app(None);
        let preview = create(&app).await;
        assert_eq!(preview["template"], "on-campus");
        assert_eq!(preview["generation"], 1);
        assert_eq!(preview["stale"], false);
        assert_eq!(preview["height_source"], "estimated");
        assert!(preview["created_at"].is_string());
        let pages = preview["pages"].as_array().unwrap();
        assert!(pages.len() >= 2);
        assert!(pages[0]["html"].as_str().unwrap().contains("JOHN DOE"));
    }

    #[tokio::test]
    async fn test_unknown_preview_is_404() {
        let response = send(
            &app(None),
            "GET",
            "/api/v1/previews/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_entry_crud_round() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();

        let response = send(&app, "POST", &format!("/api/v1/previews/{id}/sections/projects"), None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let entry_id = body["entry_id"].as_str().unwrap().to_string();
        assert_eq!(body["preview"]["resume"]["projects"].as_array().unwrap().len(), 4);

        let uri = format!("/api/v1/previews/{id}/sections/projects/{entry_id}");
        let response = send(&app, "PATCH", &uri, Some(json!({"field": "name", "value": "Folio"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resume"]["projects"][3]["name"], "Folio");
        assert_eq!(body["revision"], 2);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_field_is_400() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(
            &app,
            "PATCH",
            &format!("/api/v1/previews/{id}/personal"),
            Some(json!({"field": "salary", "value": "1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_layout_signal_with_missing_anchor_is_skipped() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/previews/{id}/layout"),
            Some(json!({"footer": {"id": 1, "markup": "<footer></footer>"}, "main": {"blocks": []}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["outcome"]["status"], "skipped");
        assert_eq!(body["outcome"]["missing"], "header");
        assert_eq!(body["preview"]["stale"], true);
        assert!(!body["preview"]["pages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_measured_layout_signal_repaginates() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let snapshot = json!({
            "header": {"id": 0, "markup": "<header>H</header>"},
            "footer": {"id": 1, "markup": "<footer>F</footer>"},
            "main": {"blocks": [
                {"kind": "fixed", "id": 2, "markup": "<p>a</p>"},
                {"kind": "fixed", "id": 3, "markup": "<p>b</p>"}
            ]},
            "heights": {"0": 200.0, "1": 60.0, "2": 500.0, "3": 500.0}
        });
        let response = send(&app, "POST", &format!("/api/v1/previews/{id}/layout"), Some(snapshot)).await;
        let body = json_body(response).await;
        assert_eq!(body["outcome"], json!({"status": "paginated", "pages": 2}));
        assert_eq!(body["preview"]["height_source"], "measured");
        assert!(body["preview"]["pages"][1]["html"].as_str().unwrap().contains("<p>b</p>"));
    }

    #[tokio::test]
    async fn test_enhance_without_assistant_is_503() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/previews/{id}/enhance"),
            Some(json!({"section": "projects", "entry_id": "proj1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_enhance_rewrites_description() {
        let app = app(Some(Arc::new(EchoAssistant)));
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/previews/{id}/enhance"),
            Some(json!({"section": "projects", "entry_id": "proj2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let description = body["description"].as_str().unwrap();
        assert!(description.starts_with("Improved: Developed a Weather App"));
        assert_eq!(body["preview"]["resume"]["projects"][1]["description"], description);
    }

    #[tokio::test]
    async fn test_enhance_rejects_other_sections() {
        let app = app(Some(Arc::new(EchoAssistant)));
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/previews/{id}/enhance"),
            Some(json!({"section": "achievements", "entry_id": "ach1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_requires_real_images() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let response = send(&app, "POST", &format!("/api/v1/previews/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please upload a profile photo and the institute logo before downloading."
        );
    }

    #[tokio::test]
    async fn test_export_returns_print_document() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        for field in ["photo", "logo"] {
            let response = send(
                &app,
                "PATCH",
                &format!("/api/v1/previews/{id}/personal"),
                Some(json!({"field": field, "value": "data:image/jpeg;base64,AAAA"})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = send(&app, "POST", &format!("/api/v1/previews/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["file_name"], "JOHN_DOE_Resume.pdf");
        assert!(body["page_count"].as_u64().unwrap() >= 2);
        assert!(body["html"].as_str().unwrap().starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_export_of_empty_resume_fails() {
        let app = app(None);
        let response = send(
            &app,
            "POST",
            "/api/v1/previews",
            Some(json!({"template": "corporate-minimal", "resume": {}})),
        )
        .await;
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        let response = send(&app, "POST", &format!("/api/v1/previews/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_preview() {
        let app = app(None);
        let id = create(&app).await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/previews/{id}");
        assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    }
}
