//! # Resolvedor de Intent
//!
//! Política **no máximo uma chamada remota** por requisição:
//!
//! ```text
//! resolve(pergunta)
//!   ├── remoto configurado?
//!   │     ├── sim → classify() com espera limitada (uma tentativa)
//!   │     │         ├── Ok(intent)          → Remote
//!   │     │         └── Err / tempo esgotado → Keywords (warn no log)
//!   │     └── não → Keywords
//!   └── nunca propaga erro ao chamador
//! ```
//!
//! O limite de tempo é aplicado aqui também, independente do limite do
//! próprio classificador, para que uma implementação lenta nunca segure a
//! requisição.

use std::sync::Arc;
use std::time::Duration;

use super::{IntentClassifier, KeywordIntentClassifier};
use crate::core::Intent;
use crate::error::ClassificationError;

/// Quem decidiu o intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    Remote,
    Keywords,
}

/// Intent resolvido + origem + motivo do fallback (se houve).
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub intent: Intent,
    pub source: ResolutionSource,
    pub fallback_reason: Option<ClassificationError>,
}

/// Orquestra os dois classificadores.
pub struct IntentResolver {
    remote: Option<Arc<dyn IntentClassifier>>,
    keywords: KeywordIntentClassifier,
    timeout: Duration,
}

impl IntentResolver {
    /// Resolver com classificador remoto opcional e espera máxima.
    pub fn new(remote: Option<Arc<dyn IntentClassifier>>, timeout: Duration) -> Self {
        Self {
            remote,
            keywords: KeywordIntentClassifier::new(),
            timeout,
        }
    }

    /// Resolver só com keywords.
    pub fn keywords_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Classificador remoto, se houver (usado pelo `/health`).
    pub fn remote(&self) -> Option<&Arc<dyn IntentClassifier>> {
        self.remote.as_ref()
    }

    /// Resolve o intent. Infalível.
    pub async fn resolve(&self, question: &str) -> Intent {
        self.resolve_detailed(question).await.intent
    }

    /// Resolve o intent informando a origem da decisão.
    pub async fn resolve_detailed(&self, question: &str) -> Resolution {
        let remote = self.remote.as_ref().filter(|r| r.is_configured());

        let Some(remote) = remote else {
            return self.by_keywords(question, None);
        };

        let outcome = match tokio::time::timeout(self.timeout, remote.classify(question)).await {
            Ok(result) => result,
            Err(_) => Err(ClassificationError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(intent) => {
                tracing::debug!(classifier = remote.name(), intent = %intent, "intent resolvido remotamente");
                Resolution {
                    intent,
                    source: ResolutionSource::Remote,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                tracing::warn!(classifier = remote.name(), error = %e, "classificador remoto falhou, usando keywords");
                self.by_keywords(question, Some(e))
            }
        }
    }

    fn by_keywords(&self, question: &str, reason: Option<ClassificationError>) -> Resolution {
        Resolution {
            intent: self.keywords.classify(question),
            source: ResolutionSource::Keywords,
            fallback_reason: reason,
        }
    }
}
