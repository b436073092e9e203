//! # NLU — Do Texto Livre ao Par (Intent, Parâmetros)
//!
//! Este módulo transforma a pergunta do usuário em dados determinísticos.
//!
//! ```text
//! Pergunta
//!   ├── ParameterExtractor ─────────────► ParameterSet
//!   └── IntentResolver
//!         ├── 1. RemoteIntentClassifier (se configurado, espera limitada)
//!         │      └── falhou / estourou o tempo ──┐
//!         └── 2. KeywordIntentClassifier ◄───────┘ ─► Intent
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`extractor`] | Percentuais, dias, trimestres e meses por regex |
//! | [`keywords`] | Classificação determinística por tabela de keywords |
//! | [`remote`] | Classificação via serviço remoto (API compatível com OpenAI) |
//! | [`resolver`] | Remoto primeiro, keywords como fallback |

/// Sub-módulo do extrator de parâmetros.
pub mod extractor;

/// Sub-módulo do classificador por keywords.
pub mod keywords;

/// Sub-módulo do classificador remoto.
pub mod remote;

/// Sub-módulo do resolvedor de intent.
pub mod resolver;

use async_trait::async_trait;
use unicode_normalization::UnicodeNormalization;

use crate::core::Intent;
use crate::error::ClassificationError;

pub use extractor::ParameterExtractor;
pub use keywords::KeywordIntentClassifier;
pub use remote::RemoteIntentClassifier;
pub use resolver::{IntentResolver, Resolution, ResolutionSource};

/// Contrato comum dos classificadores de intent.
///
/// Duas implementações: [`KeywordIntentClassifier`] (local, infalível) e
/// [`RemoteIntentClassifier`] (rede, pode falhar). O resolver escolhe
/// entre elas; testes injetam implementações falsas.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Nome curto para logs.
    fn name(&self) -> &'static str;

    /// `false` quando o classificador não deve nem ser tentado.
    fn is_configured(&self) -> bool {
        true
    }

    /// Status da última chamada (`true` se teve sucesso).
    fn is_available(&self) -> bool {
        true
    }

    /// Classifica a pergunta em um dos rótulos de [`Intent::ALL`].
    async fn classify(&self, question: &str) -> Result<Intent, ClassificationError>;
}

/// Normaliza a pergunta: NFC + espaços nas bordas removidos.
///
/// Texto colado de planilhas e PDFs chega com acentos decompostos;
/// NFC garante que regexes e keywords vejam a forma canônica.
pub fn normalize_question(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_string()
}
