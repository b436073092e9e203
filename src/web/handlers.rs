//! # Handlers HTTP
//!
//! Cada função pública é um handler Axum mapeado em
//! [`super::create_router()`]. Todas as respostas são JSON.
//!
//! | Handler | Método | Rota | Retorno |
//! |---------|--------|------|---------|
//! | `index` | GET | `/` | descritor do serviço |
//! | `chat` | POST | `/chat` | `ChatResponse` ou 400 |
//! | `health` | GET | `/health` | estado dos modelos e do NLU |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use super::state::AppState;
use crate::error::ChatError;

const SERVICE_NAME: &str = "Supply Chain Insight Chat";

/// Corpo de `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// `{ configured, available }` do classificador remoto.
#[derive(Debug, Serialize)]
pub struct NluStatus {
    pub configured: bool,
    pub available: bool,
}

/// Resposta de `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_loaded: Vec<&'static str>,
    /// id do predictor → motivo da falha no carregamento.
    pub models_unavailable: serde_json::Map<String, serde_json::Value>,
    pub nlu: NluStatus,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let message = match self {
            ChatError::InvalidQuestion => "No question provided",
        };
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

/// GET `/` — descritor do serviço.
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/chat": "POST - Ask supply chain questions",
            "/health": "GET - Health check",
        }
    }))
}

/// POST `/chat` — responde uma pergunta.
///
/// Corpo ausente ou malformado, `question` ausente, de outro tipo ou só
/// com espaços → 400 com o mesmo corpo JSON. Falhas de NLU ou de
/// predictor nunca viram erro HTTP: o orquestrador devolve uma resposta
/// degradada.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<crate::core::ChatResponse>, ChatError> {
    let question = match body {
        Ok(Json(req)) => req.question.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "corpo de /chat rejeitado");
            return Err(ChatError::InvalidQuestion);
        }
    };

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);
    let response = state
        .orchestrator
        .handle(&question)
        .instrument(span)
        .await?;
    Ok(Json(response))
}

/// GET `/health` — modelos carregados e disponibilidade do NLU remoto.
///
/// `healthy` com todos os predictors, `degraded` com parte deles,
/// `unavailable` sem nenhum.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.orchestrator.registry();
    let loaded = registry.models_loaded();
    let unavailable = registry.models_unavailable();

    let status = match (loaded.is_empty(), unavailable.is_empty()) {
        (true, _) => "unavailable",
        (false, true) => "healthy",
        (false, false) => "degraded",
    };

    let nlu = match state.orchestrator.resolver().remote() {
        Some(remote) => NluStatus {
            configured: remote.is_configured(),
            available: remote.is_configured() && remote.is_available(),
        },
        None => NluStatus {
            configured: false,
            available: false,
        },
    };

    Json(HealthResponse {
        status,
        models_loaded: loaded,
        models_unavailable: unavailable
            .into_iter()
            .map(|(id, reason)| (id.to_string(), serde_json::Value::String(reason)))
            .collect(),
        nlu,
        timestamp: Utc::now(),
    })
}
