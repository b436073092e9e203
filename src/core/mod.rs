//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Tipos que atravessam todo o fluxo de uma pergunta, do texto livre até o
//! envelope de resposta. Todos são criados por requisição e descartados
//! depois da resposta; nenhum estado de conversa é mantido.
//!
//! - [`Intent`] — categoria fechada da pergunta
//! - [`ParameterSet`] / [`Quarter`] — parâmetros extraídos do texto
//! - [`PredictionResult`] / [`Metric`] — saída opaca de um predictor
//! - [`Insight`] / [`InsightKind`] — afirmação legível + dados
//! - [`ChatResponse`] — envelope final
//!
//! ```text
//! texto ──► ParameterSet ──► Intent ──► PredictionResult ──► Vec<Insight> ──► ChatResponse
//! ```

/// Sub-módulo com [`Intent`].
pub mod intent;

/// Sub-módulo com [`ParameterSet`] e [`Quarter`].
pub mod params;

/// Sub-módulo com [`PredictionResult`], [`Metric`] e [`LabeledValue`].
pub mod prediction;

/// Sub-módulo com [`Insight`], [`InsightKind`] e [`ChatResponse`].
pub mod insight;

// Re-exports para conveniência: permite usar `crate::core::Intent` diretamente.
pub use insight::{ChatResponse, Insight, InsightKind};
pub use intent::Intent;
pub use params::{ParameterSet, Quarter};
pub use prediction::{LabeledValue, Metric, PredictionResult};
