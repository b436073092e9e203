//! # Módulo Web
//!
//! Camada HTTP da aplicação, construída com **Axum**. Não há páginas
//! nem estado de sessão: cada requisição é independente.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Axum Router (este módulo)                    │
//! │  ├── GET  /        → descritor do serviço    │
//! │  ├── POST /chat    → ChatResponse (JSON)     │
//! │  └── GET  /health  → modelos + NLU           │
//! ├──────────────────────────────────────────────┤
//! │ tower-http: CorsLayer + TraceLayer           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::IntentResolver;
    use crate::orchestrator::ChatOrchestrator;
    use crate::predictors::PredictorRegistry;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(registry: PredictorRegistry) -> Router {
        let orchestrator = ChatOrchestrator::new(IntentResolver::keywords_only(), Arc::new(registry));
        create_router(AppState::new(orchestrator))
    }

    fn bundled() -> Router {
        app(PredictorRegistry::load(
            &PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models"),
        ))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::post("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn chat_answers_forecast_question() {
        let (status, body) = send(bundled(), post_chat(r#"{"question":"What will Q4 demand look like?"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "forecast");
        assert_eq!(body["params"]["months"], serde_json::json!([10, 11, 12]));
        assert!(!body["insights"].as_array().unwrap().is_empty());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn chat_rejects_missing_question() {
        for body in [r#"{}"#, r#"{"question":""}"#, r#"{"question":"   "}"#, r#"{"question":null}"#] {
            let (status, json) = send(bundled(), post_chat(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], "No question provided");
        }
    }

    #[tokio::test]
    async fn chat_rejects_absent_body() {
        let request = Request::post("/chat").body(Body::empty()).unwrap();
        let (status, json) = send(bundled(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No question provided");
    }

    #[tokio::test]
    async fn chat_rejects_malformed_body_as_json() {
        for body in [r#"{"question":123}"#, r#"{"question":["a"]}"#, r#"{"question":"#, "not json"] {
            let (status, json) = send(bundled(), post_chat(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], "No question provided");
        }
    }

    #[tokio::test]
    async fn health_reports_all_models() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = send(bundled(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["models_loaded"].as_array().unwrap().len(), 5);
        assert_eq!(json["nlu"]["configured"], false);
    }

    #[tokio::test]
    async fn health_without_models_is_unavailable() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (_, json) = send(app(PredictorRegistry::from_predictors(vec![])), request).await;
        assert_eq!(json["status"], "unavailable");
        assert!(json["models_loaded"].as_array().unwrap().is_empty());
        assert_eq!(json["models_unavailable"].as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn index_lists_endpoints() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, json) = send(bundled(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["endpoints"]["/chat"].is_string());
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
