pub mod evaluation;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate-pdf", post(evaluation::handle_generate_pdf))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
        };
        build_router(AppState::new(config))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate-pdf")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_pdf_streams_attachment() {
        let response = app()
            .oneshot(post_json(json!({
                "evaluatorName": "Dra. García",
                "residentName": "Dr. Pérez",
                "scores": { "crit_1_1": "3" },
                "comments": { "comments_1": "ok" }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content-disposition present");
        assert_eq!(
            disposition,
            "attachment; filename=\"Evaluacion_Dr__P_rez_Dra__Garc_a.pdf\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body streams to completion");
        assert!(bytes.starts_with(b"%PDF"), "body must be a PDF document");
    }

    #[tokio::test]
    async fn test_generate_pdf_missing_comments_is_400() {
        let response = app()
            .oneshot(post_json(json!({
                "evaluatorName": "Eval",
                "residentName": "Res",
                "scores": {}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).expect("JSON error envelope");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap_or_default()
                .contains("comments"),
            "message should name the missing field"
        );
    }

    #[tokio::test]
    async fn test_generate_pdf_empty_maps_still_render() {
        let response = app()
            .oneshot(post_json(json!({
                "evaluatorName": "Eval",
                "residentName": "Res",
                "scores": {},
                "comments": {}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
