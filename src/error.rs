//! # Taxonomia de Erros
//!
//! Cada erro tem um **dono** que decide o que fazer com ele:
//!
//! | Erro | Quem recupera | Visível ao usuário? |
//! |------|---------------|---------------------|
//! | [`ChatError::InvalidQuestion`] | ninguém — vira HTTP 400 | sim, erro de requisição |
//! | [`ClassificationError`] | [`IntentResolver`](crate::nlu::resolver::IntentResolver) | não, cai para keywords |
//! | [`PredictorError`] | [`ChatOrchestrator`](crate::orchestrator::ChatOrchestrator) | sim, como insight de indisponibilidade |
//! | [`AssemblyError`] | [`ChatOrchestrator`](crate::orchestrator::ChatOrchestrator) | sim, como resposta `General` de desculpas |
//! | [`ConfigError`] | `main` | aborta a inicialização |

use std::time::Duration;

use thiserror::Error;

/// Erro no nível da requisição, a única falha que não vira `ChatResponse`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Pergunta vazia ou só com espaços.
    #[error("No question provided")]
    InvalidQuestion,
}

/// Falhas do classificador remoto. Todas são recuperáveis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// Classificador não configurado (sem credencial ou desligado).
    #[error("classificador remoto não configurado")]
    Unavailable,

    /// A chamada excedeu a espera máxima.
    #[error("classificador remoto excedeu {0:?}")]
    Timeout(Duration),

    /// Resposta malformada, fora do conjunto de rótulos, ou falha HTTP.
    #[error("erro no classificador remoto: {0}")]
    Error(String),
}

/// Falhas de um predictor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictorError {
    /// O artefato do modelo não carregou na inicialização.
    #[error("predictor '{predictor}' indisponível: {reason}")]
    Unavailable { predictor: String, reason: String },

    /// O modelo carregou mas não conseguiu produzir um resultado.
    #[error("predictor '{predictor}' falhou: {reason}")]
    Failed { predictor: String, reason: String },
}

impl PredictorError {
    /// Identificador do predictor envolvido.
    pub fn predictor(&self) -> &str {
        match self {
            PredictorError::Unavailable { predictor, .. } => predictor,
            PredictorError::Failed { predictor, .. } => predictor,
        }
    }
}

/// Falha inesperada ao transformar um resultado em insights.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("métrica '{metric}' ausente no resultado de '{predictor}'")]
    MissingMetric { predictor: String, metric: String },

    #[error("métrica '{metric}' de '{predictor}' não é do tipo {expected}")]
    WrongShape {
        predictor: String,
        metric: String,
        expected: &'static str,
    },

    #[error("nenhum insight gerado para '{0}'")]
    Empty(String),
}

/// Configuração inválida na inicialização.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("valor inválido para {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}
