//! # Insights e Resposta de Chat
//!
//! Um [`Insight`] é uma afirmação legível apoiada em dados: texto em
//! markdown para o usuário e um mapa `data` para gráficos do frontend.
//! A [`ChatResponse`] é o envelope completo devolvido a quem perguntou.
//!
//! ```json
//! {
//!   "question": "What will Q4 demand look like?",
//!   "intent": "forecast",
//!   "params": { "months": [10, 11, 12], "quarter": "Q4" },
//!   "insights": [{ "type": "forecast", "kind": "headline", "text": "...", "data": {} }],
//!   "timestamp": "2026-10-16T12:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::intent::Intent;
use super::params::ParameterSet;

/// Papel de um insight dentro da lista de uma resposta.
///
/// A lista de uma resposta sempre começa pelo `Headline` (métrica
/// principal); os demais aparecem na ordem em que os limiares são avaliados.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Métrica principal do predictor.
    Headline,
    /// Limiar de risco ultrapassado.
    Risk,
    /// Limiar de oportunidade ultrapassado.
    Opportunity,
    /// Detalhamento complementar (ex: ratings, melhores couriers).
    Breakdown,
    /// Predictor indisponível, substitui os insights normais.
    Unavailable,
    /// Mensagem de ajuda do intent `General`.
    Help,
    /// Falha inesperada convertida em pedido de desculpas.
    Error,
}

/// Uma afirmação legível e apoiada em dados.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Intent a que o insight pertence.
    #[serde(rename = "type")]
    pub intent: Intent,
    /// Papel do insight na resposta.
    pub kind: InsightKind,
    /// Texto em markdown para exibição.
    pub text: String,
    /// Dados estruturados (sempre um objeto JSON).
    pub data: Value,
}

impl Insight {
    pub fn new(intent: Intent, kind: InsightKind, text: impl Into<String>, data: Value) -> Self {
        Self {
            intent,
            kind,
            text: text.into(),
            data,
        }
    }
}

/// Envelope de resposta de uma pergunta.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Pergunta original (já sem espaços nas bordas).
    pub question: String,
    /// Intent resolvido.
    pub intent: Intent,
    /// Parâmetros extraídos.
    pub params: ParameterSet,
    /// Insights em ordem de geração (mais relevante primeiro).
    pub insights: Vec<Insight>,
    /// Momento da resposta.
    pub timestamp: DateTime<Utc>,
}
