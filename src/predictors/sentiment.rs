//! # Predictor de Sentimento (Sentiment)
//!
//! Pontua avaliações de clientes com um léxico de valências (palavra →
//! valor em `[-4, 4]`) carregado do artefato, no estilo VADER:
//!
//! ```text
//! 1. tokens em minúsculas
//! 2. valência de cada token do léxico; negador nas 3 posições
//!    anteriores ("not", "never", "n't"…) inverte e atenua (× −0.74)
//! 3. compound = s / √(s² + 15)        s = soma das valências
//! 4. pos/neg/neu = proporções de valência positiva, negativa e tokens neutros
//! ```
//!
//! O resultado agrega as primeiras `sample_size` avaliações (médias) e
//! conta avaliações e notas sobre o conjunto inteiro.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::artifacts::Artifact;
use super::{failed, mean, Predictor, PredictorId, PredictorInput};
use crate::core::PredictionResult;
use crate::error::PredictorError;

/// Constante de normalização do compound.
const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const NEGATION_WINDOW: usize = 3;
const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "cannot",
];

fn default_sample_size() -> usize {
    100
}

#[derive(Clone, Debug, Deserialize)]
pub struct Review {
    pub date: NaiveDate,
    pub rating: u8,
    pub text: String,
}

/// Conteúdo de `model_sentiment.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct SentimentArtifact {
    pub lexicon: HashMap<String, f64>,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    pub reviews: Vec<Review>,
}

impl Artifact for SentimentArtifact {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.lexicon.is_empty(), "léxico vazio");
        anyhow::ensure!(!self.reviews.is_empty(), "nenhuma avaliação");
        anyhow::ensure!(self.sample_size > 0, "sample_size precisa ser positivo");
        anyhow::ensure!(
            self.reviews.iter().all(|r| (1..=5).contains(&r.rating)),
            "nota fora de 1..=5"
        );
        anyhow::ensure!(
            self.lexicon.values().all(|v| v.is_finite()),
            "valência inválida no léxico"
        );
        Ok(())
    }
}

/// Pontuação de um texto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polarity {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

pub struct SentimentPredictor {
    lexicon: HashMap<String, f64>,
    sample_size: usize,
    reviews: Vec<Review>,
}

impl SentimentPredictor {
    pub fn new(model: SentimentArtifact) -> Self {
        let lexicon = model
            .lexicon
            .into_iter()
            .map(|(word, valence)| (word.to_lowercase(), valence))
            .collect();
        Self {
            lexicon,
            sample_size: model.sample_size,
            reviews: model.reviews,
        }
    }

    /// Pontua um texto isolado.
    pub fn polarity(&self, text: &str) -> Polarity {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut sum = 0.0;
        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut neutral = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(*token) else {
                neutral += 1;
                continue;
            };
            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| is_negator(t));
            let v = if negated { valence * NEGATION_SCALAR } else { valence };
            sum += v;
            if v > 0.0 {
                positive += v;
            } else if v < 0.0 {
                negative += -v;
            } else {
                neutral += 1;
            }
        }

        let total = positive + negative + neutral as f64;
        let (positive, negative, neutral) = if total > 0.0 {
            (positive / total, negative / total, neutral as f64 / total)
        } else {
            (0.0, 0.0, 1.0)
        };

        Polarity {
            compound: sum / (sum * sum + NORMALIZATION_ALPHA).sqrt(),
            positive,
            negative,
            neutral,
        }
    }
}

fn mean_of(scored: &[Polarity], field: fn(&Polarity) -> f64) -> Option<f64> {
    let values: Vec<f64> = scored.iter().map(field).collect();
    mean(&values)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

impl Predictor for SentimentPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Sentiment
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        let scored: Vec<Polarity> = self
            .reviews
            .iter()
            .take(self.sample_size)
            .map(|r| self.polarity(&r.text))
            .collect();

        let (Some(compound), Some(pos), Some(neg), Some(neu)) = (
            mean_of(&scored, |p| p.compound),
            mean_of(&scored, |p| p.positive),
            mean_of(&scored, |p| p.negative),
            mean_of(&scored, |p| p.neutral),
        ) else {
            return Err(failed(self.id(), "nenhuma avaliação carregada"));
        };

        let ratings: Vec<f64> = self.reviews.iter().map(|r| r.rating as f64).collect();
        let high = self.reviews.iter().filter(|r| r.rating >= 4).count();
        let low = self.reviews.iter().filter(|r| r.rating <= 2).count();
        let in_month = self
            .reviews
            .iter()
            .filter(|r| r.date.month() == input.target_month)
            .count();

        Ok(PredictionResult::new(self.id().as_str())
            .with_value("compound", compound)
            .with_value("positive_pct", pos * 100.0)
            .with_value("negative_pct", neg * 100.0)
            .with_value("neutral_pct", neu * 100.0)
            .with_value("reviews_analyzed", scored.len() as f64)
            .with_value("total_reviews", self.reviews.len() as f64)
            .with_value("avg_rating", mean(&ratings).unwrap_or(0.0))
            .with_value("high_ratings", high as f64)
            .with_value("low_ratings", low as f64)
            .with_value("month_reviews", in_month as f64)
            .with_value("month", input.target_month as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParameterSet;

    fn lexicon() -> HashMap<String, f64> {
        [("good", 1.9), ("great", 3.1), ("bad", -2.5), ("late", -1.2), ("broken", -2.3)]
            .into_iter()
            .map(|(w, v)| (w.to_string(), v))
            .collect()
    }

    fn review(date: &str, rating: u8, text: &str) -> Review {
        Review {
            date: date.parse().unwrap(),
            rating,
            text: text.into(),
        }
    }

    fn predictor(reviews: Vec<Review>) -> SentimentPredictor {
        SentimentPredictor::new(SentimentArtifact {
            lexicon: lexicon(),
            sample_size: 100,
            reviews,
        })
    }

    fn input(target_month: Option<u32>) -> PredictorInput {
        let params = ParameterSet {
            target_month,
            ..Default::default()
        };
        PredictorInput::resolve(
            &params,
            PredictorId::Sentiment.contract(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        )
    }

    #[test]
    fn positive_and_negative_texts() {
        let p = predictor(vec![review("2026-10-01", 5, "x")]);
        assert!(p.polarity("Great product, good value").compound >= 0.05);
        assert!(p.polarity("Arrived late and broken").compound <= -0.05);
        let neutral = p.polarity("it is a box");
        assert_eq!(neutral.compound, 0.0);
        assert_eq!(neutral.neutral, 1.0);
    }

    #[test]
    fn negation_flips_valence() {
        let p = predictor(vec![review("2026-10-01", 5, "x")]);
        assert!(p.polarity("not good").compound < 0.0);
        assert!(p.polarity("wasn't bad at all").compound > 0.0);
        // Negador fora da janela de 3 tokens não conta
        assert!(p.polarity("not that it was a good one").compound > 0.0);
    }

    #[test]
    fn aggregates_ratings_and_month() {
        let p = predictor(vec![
            review("2026-10-02", 5, "great"),
            review("2026-10-09", 4, "good"),
            review("2026-09-20", 1, "bad and broken"),
            review("2026-08-01", 3, "ok"),
        ]);
        let r = p.predict(&input(None)).unwrap();
        assert_eq!(r.value("reviews_analyzed").unwrap(), 4.0);
        assert_eq!(r.value("avg_rating").unwrap(), 3.25);
        assert_eq!(r.value("high_ratings").unwrap(), 2.0);
        assert_eq!(r.value("low_ratings").unwrap(), 1.0);
        assert_eq!(r.value("month").unwrap(), 10.0);
        assert_eq!(r.value("month_reviews").unwrap(), 2.0);

        let sept = p.predict(&input(Some(9))).unwrap();
        assert_eq!(sept.value("month_reviews").unwrap(), 1.0);

        let pct = r.value("positive_pct").unwrap()
            + r.value("negative_pct").unwrap()
            + r.value("neutral_pct").unwrap();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sample_size_limits_scoring() {
        let mut p = predictor(vec![
            review("2026-10-02", 5, "great"),
            review("2026-10-03", 1, "bad"),
        ]);
        p.sample_size = 1;
        let r = p.predict(&input(None)).unwrap();
        assert_eq!(r.value("reviews_analyzed").unwrap(), 1.0);
        assert!(r.value("compound").unwrap() > 0.0);
        // Notas continuam sobre o conjunto todo
        assert_eq!(r.value("total_reviews").unwrap(), 2.0);
    }

    #[test]
    fn artifact_validation() {
        let ok = SentimentArtifact {
            lexicon: lexicon(),
            sample_size: 10,
            reviews: vec![review("2026-10-02", 5, "great")],
        };
        assert!(ok.validate().is_ok());
        let bad = SentimentArtifact {
            reviews: vec![review("2026-10-02", 9, "great")],
            ..ok.clone()
        };
        assert!(bad.validate().is_err());
    }
}
