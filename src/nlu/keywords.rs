//! # Classificador de Intent por Keywords
//!
//! Classificador **determinístico** baseado numa tabela estática
//! intent → keywords. Não depende de rede nem de modelo, por isso é o
//! fallback garantido do [`IntentResolver`](super::resolver::IntentResolver).
//!
//! ## Regras
//!
//! ```text
//! 1. Texto em minúsculas
//! 2. Para cada intent, conta quantas keywords distintas aparecem
//!    (keyword precisa começar numa fronteira de palavra:
//!     "trend" casa com "trending", "late" não casa com "calculate")
//! 3. Maior contagem vence
//! 4. Empate → prioridade fixa Forecast > Inventory > Shipping > Sentiment > Warehouse
//! 5. Nenhuma keyword → General
//! ```

use async_trait::async_trait;

use super::IntentClassifier;
use crate::core::Intent;
use crate::error::ClassificationError;

/// Tabela estática, já na ordem de prioridade de desempate.
///
/// As listas seguem as do backend de origem, inclusive termos genéricos
/// como "will" e "next" em Forecast: num empate 1 a 1 com outra família,
/// Forecast vence pela prioridade.
const KEYWORD_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Forecast,
        &[
            "forecast", "predict", "demand", "q1", "q2", "q3", "q4", "quarter", "next",
            "future", "trend", "seasonal", "increase expected", "december", "will",
            "look like", "expect", "outlook", "projection",
        ],
    ),
    (
        Intent::Inventory,
        &[
            "inventory", "stock", "adjust", "boost", "stockout", "sufficient", "category",
            "increase by", "surge", "need", "shortage", "restock", "replenish",
        ],
    ),
    (
        Intent::Shipping,
        &[
            "shipping", "delivery", "delay", "transport", "courier", "partner", "late",
            "shipment", "transit",
        ],
    ),
    (
        Intent::Sentiment,
        &[
            "sentiment", "review", "customer", "feedback", "positive", "negative",
            "trending", "rating", "satisfaction", "complaint",
        ],
    ),
    (
        Intent::Warehouse,
        &[
            "warehouse", "processing", "efficiency", "efficient", "operation", "storage",
            "throughput", "fulfillment",
        ],
    ),
];

/// Classificador por keywords. Unit struct: a tabela é estática.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifica a pergunta. Nunca falha: no pior caso devolve `General`.
    pub fn classify(&self, question: &str) -> Intent {
        let lower = question.to_lowercase();
        let mut best = Intent::General;
        let mut best_count = 0usize;

        for (intent, keywords) in KEYWORD_TABLE {
            let matched: Vec<&str> = keywords
                .iter()
                .copied()
                .filter(|kw| contains_at_word_start(&lower, kw))
                .collect();
            if !matched.is_empty() {
                tracing::debug!(intent = %intent, ?matched, "keywords encontradas");
            }
            // Estritamente maior: em empate fica o intent anterior na tabela
            if matched.len() > best_count {
                best_count = matched.len();
                best = *intent;
            }
        }

        best
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    fn name(&self) -> &'static str {
        "keywords"
    }

    async fn classify(&self, question: &str) -> Result<Intent, ClassificationError> {
        Ok(KeywordIntentClassifier::classify(self, question))
    }
}

/// `true` se `needle` aparece em `haystack` começando numa fronteira de palavra.
fn contains_at_word_start(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        KeywordIntentClassifier::new().classify(text)
    }

    #[test]
    fn q4_demand_is_forecast() {
        assert_eq!(classify("What will Q4 demand look like?"), Intent::Forecast);
    }

    #[test]
    fn stock_adjustment_is_inventory() {
        assert_eq!(
            classify("If demand increases by 20%, what stock adjustments are needed?"),
            Intent::Inventory
        );
    }

    #[test]
    fn one_question_per_intent() {
        assert_eq!(classify("Which courier partners cause delivery delays?"), Intent::Shipping);
        assert_eq!(classify("How are customer reviews trending?"), Intent::Sentiment);
        assert_eq!(classify("Which warehouse has the worst processing efficiency?"), Intent::Warehouse);
    }

    #[test]
    fn higher_count_beats_priority() {
        // forecast: 1 ("forecast"), warehouse: 3
        assert_eq!(
            classify("forecast warehouse processing efficiency"),
            Intent::Warehouse
        );
    }

    #[test]
    fn ties_follow_priority_order() {
        assert_eq!(classify("stock forecast"), Intent::Forecast);
        assert_eq!(classify("delay at the warehouse"), Intent::Shipping);
        assert_eq!(classify("storage rating"), Intent::Sentiment);
    }

    #[test]
    fn generic_will_only_decides_ties() {
        // shipping: 2 ("courier", "late"), forecast: 1 ("will")
        assert_eq!(classify("Which courier will be late?"), Intent::Shipping);
        // 1 a 1: prioridade
        assert_eq!(classify("Which partner will ship first?"), Intent::Forecast);
        assert_eq!(classify("Which partner ships first?"), Intent::Shipping);
    }

    #[test]
    fn no_keyword_is_general() {
        assert_eq!(classify("hello there"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn matches_are_case_insensitive() {
        assert_eq!(classify("WAREHOUSE STORAGE"), Intent::Warehouse);
    }

    #[test]
    fn keywords_start_at_word_boundary() {
        // "late" dentro de "calculate" não conta
        assert_eq!(classify("calculate this"), Intent::General);
        assert!(contains_at_word_start("reviews trending up", "trend"));
        assert!(!contains_at_word_start("context", "next"));
    }

    #[test]
    fn classification_is_idempotent() {
        let c = KeywordIntentClassifier::new();
        for text in [
            "What will Q4 demand look like?",
            "delay at the warehouse",
            "random words",
            "customer feedback on late shipments",
        ] {
            assert_eq!(c.classify(text), c.classify(text));
        }
    }
}
