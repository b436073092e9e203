//! # Classificador Remoto de Intent
//!
//! Envia a pergunta (com a lista fechada de rótulos) a um modelo de
//! linguagem remoto e traduz a resposta de volta para [`Intent`].
//!
//! Fala o protocolo `/chat/completions` compatível com OpenAI, o mesmo
//! endpoint serve Gemini (`…/v1beta/openai`), OpenAI, OpenRouter, Groq ou
//! um servidor local.
//!
//! ## Falhas
//!
//! | Situação | Erro |
//! |----------|------|
//! | Sem credencial ou `NLU_ENABLED=false` | [`ClassificationError::Unavailable`] |
//! | Chamada passou de `timeout` | [`ClassificationError::Timeout`] |
//! | HTTP ≠ 2xx, JSON inválido, rótulo fora do conjunto | [`ClassificationError::Error`] |
//!
//! Nenhuma é fatal: o [`IntentResolver`](super::resolver::IntentResolver)
//! recupera todas caindo para keywords. Não há retry aqui: no máximo uma
//! chamada remota por requisição.
//!
//! ## Formato Aceito na Resposta
//!
//! - `{"intent": "forecast"}` (preferido)
//! - o mesmo objeto dentro de uma cerca de código markdown (a cerca é removida)
//! - `forecast` em texto puro também vale

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::IntentClassifier;
use crate::config::NluConfig;
use crate::core::Intent;
use crate::error::ClassificationError;

/// Tokens suficientes para um objeto JSON curto.
const MAX_TOKENS: u32 = 32;

/// Parâmetros de conexão, presentes só quando o classificador está configurado.
#[derive(Clone, Debug)]
struct Endpoint {
    api_key: String,
    base_url: String,
    model: String,
}

/// Classificador de intent via serviço remoto.
pub struct RemoteIntentClassifier {
    client: Client,
    /// `None` = não configurado.
    endpoint: Option<Endpoint>,
    /// Espera máxima por chamada.
    timeout: Duration,
    /// Resultado da última chamada.
    available: AtomicBool,
}

impl RemoteIntentClassifier {
    /// Cria o classificador a partir da configuração.
    ///
    /// Fica **não configurado** se `enabled` for falso ou se não houver
    /// credencial; nesse caso nenhuma chamada de rede é feita.
    pub fn new(config: &NluConfig, client: Client) -> Self {
        let endpoint = match (&config.api_key, config.enabled) {
            (Some(key), true) if !key.trim().is_empty() => Some(Endpoint {
                api_key: key.trim().to_string(),
                base_url: config.api_base.trim_end_matches('/').to_string(),
                model: config.model.clone(),
            }),
            _ => None,
        };

        if let Some(ep) = &endpoint {
            tracing::info!(base_url = %ep.base_url, model = %ep.model, "NLU remoto configurado");
        } else {
            tracing::info!("NLU remoto não configurado, usando apenas keywords");
        }

        Self {
            client,
            endpoint,
            timeout: config.timeout,
            available: AtomicBool::new(true),
        }
    }

    /// Faz a chamada HTTP sem limite de tempo (o limite é aplicado em `classify`).
    async fn request_label(&self, endpoint: &Endpoint, question: &str) -> Result<Intent, ClassificationError> {
        let prompt = build_prompt(question);
        let body = CompletionRequest {
            model: &endpoint.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", endpoint.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&endpoint.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassificationError::Error(format!("falha de rede: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(200).collect();
            return Err(ClassificationError::Error(format!("HTTP {}: {}", status, excerpt)));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::Error(format!("resposta inválida: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassificationError::Error("resposta sem conteúdo".into()))?;

        parse_label(&content)
    }
}

#[async_trait]
impl IntentClassifier for RemoteIntentClassifier {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn is_available(&self) -> bool {
        self.is_configured() && self.available.load(Ordering::Relaxed)
    }

    async fn classify(&self, question: &str) -> Result<Intent, ClassificationError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(ClassificationError::Unavailable);
        };

        let result = match tokio::time::timeout(self.timeout, self.request_label(endpoint, question)).await {
            Ok(inner) => inner,
            Err(_) => Err(ClassificationError::Timeout(self.timeout)),
        };

        self.available.store(result.is_ok(), Ordering::Relaxed);
        result
    }
}

// ── Prompt ──────────────────────────────────────────────────────────

const SYSTEM_PROMPT: &str = "You classify supply chain questions. \
Reply with JSON only, no prose.";

fn build_prompt(question: &str) -> String {
    format!(
        "Analyze this supply chain question and pick exactly one intent.\n\n\
         Question: \"{question}\"\n\n\
         Categories:\n\
         - forecast: demand predictions, trends, Q1/Q2/Q3/Q4, future outlook\n\
         - inventory: stock levels, adjustments, recommendations\n\
         - shipping: delivery, courier performance, delays\n\
         - sentiment: customer reviews, satisfaction, feedback\n\
         - warehouse: operations, efficiency, processing\n\
         - general: help, capabilities, unclear\n\n\
         Allowed labels: {labels}\n\
         Respond as: {{\"intent\": \"<label>\"}}",
        question = question,
        labels = Intent::label_list(),
    )
}

/// Extrai o rótulo da resposta do modelo.
///
/// Tenta JSON (`{"intent": ...}`) depois de remover cercas de markdown;
/// se não for JSON, interpreta o texto inteiro como rótulo.
fn parse_label(content: &str) -> Result<Intent, ClassificationError> {
    let cleaned = strip_code_fences(content);

    if let Ok(reply) = serde_json::from_str::<LabelReply>(cleaned) {
        return reply
            .intent
            .parse::<Intent>()
            .map_err(|e| ClassificationError::Error(e.to_string()));
    }

    cleaned
        .parse::<Intent>()
        .map_err(|e| ClassificationError::Error(e.to_string()))
}

/// Remove ```json … ``` ou ``` … ``` ao redor do conteúdo.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.split("```").next().unwrap_or(rest).trim()
}

// ── Tipos do protocolo /chat/completions ────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct LabelReply {
    intent: String,
}
