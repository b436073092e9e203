//! # Predictors — Wrappers dos Modelos Pré-Treinados
//!
//! Cada família de modelo implementa o mesmo contrato [`Predictor`]:
//! recebe um [`PredictorInput`] já validado e devolve um
//! [`PredictionResult`](crate::core::PredictionResult).
//!
//! ```text
//! ParameterSet ──► PredictorInput::resolve(contrato, as_of) ──► Predictor::predict
//!                    (defaults + clamp)                            │
//!                                                                  ▼
//!                                                         PredictionResult
//! ```
//!
//! ## Famílias
//!
//! | Intent | Predictor | Artefato | `days` (default / máx) |
//! |--------|-----------|----------|------------------------|
//! | Forecast | [`seasonal`] | `model_seasonal.json` | 90 / 365 |
//! | Inventory | [`orders`] | `model_orders.json` | 30 / 365 |
//! | Shipping | [`transport`] | `model_transport.json` | 30 / 365 |
//! | Warehouse | [`warehouse`] | `model_warehouse.json` | 30 / 365 |
//! | Sentiment | [`sentiment`] | `model_sentiment.json` | — |
//!
//! Os predictors são síncronos e puros: a mesma entrada produz sempre o
//! mesmo resultado, o que permite o cache de [`cache::CachedPredictor`].

/// Carregamento dos artefatos JSON.
pub mod artifacts;

/// Cache read-through por entrada completa.
pub mod cache;

/// Previsão de demanda sazonal.
pub mod seasonal;

/// Demanda por categoria e ajuste de estoque.
pub mod orders;

/// Desempenho de transportadoras.
pub mod transport;

/// Eficiência de armazéns.
pub mod warehouse;

/// Sentimento de avaliações de clientes.
pub mod sentiment;

/// Registro intent → predictor.
pub mod registry;

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate};

use crate::core::{Intent, ParameterSet, PredictionResult};
use crate::error::PredictorError;

pub use registry::PredictorRegistry;

/// Maior horizonte aceito por qualquer predictor.
pub const MAX_HORIZON_DAYS: u32 = 365;

/// Identificador de cada família de modelo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PredictorId {
    Seasonal,
    Orders,
    Transport,
    Warehouse,
    Sentiment,
}

impl PredictorId {
    pub const ALL: [PredictorId; 5] = [
        PredictorId::Seasonal,
        PredictorId::Orders,
        PredictorId::Transport,
        PredictorId::Warehouse,
        PredictorId::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorId::Seasonal => "seasonal",
            PredictorId::Orders => "orders",
            PredictorId::Transport => "transport",
            PredictorId::Warehouse => "warehouse",
            PredictorId::Sentiment => "sentiment",
        }
    }

    /// Nome do arquivo do artefato dentro do diretório de modelos.
    pub fn file_name(&self) -> &'static str {
        match self {
            PredictorId::Seasonal => "model_seasonal.json",
            PredictorId::Orders => "model_orders.json",
            PredictorId::Transport => "model_transport.json",
            PredictorId::Warehouse => "model_warehouse.json",
            PredictorId::Sentiment => "model_sentiment.json",
        }
    }

    /// Predictor que atende o intent. `General` não tem predictor.
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Forecast => Some(PredictorId::Seasonal),
            Intent::Inventory => Some(PredictorId::Orders),
            Intent::Shipping => Some(PredictorId::Transport),
            Intent::Warehouse => Some(PredictorId::Warehouse),
            Intent::Sentiment => Some(PredictorId::Sentiment),
            Intent::General => None,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            PredictorId::Seasonal => Intent::Forecast,
            PredictorId::Orders => Intent::Inventory,
            PredictorId::Transport => Intent::Shipping,
            PredictorId::Warehouse => Intent::Warehouse,
            PredictorId::Sentiment => Intent::Sentiment,
        }
    }

    /// Contrato de parâmetros da família.
    pub fn contract(&self) -> ParameterContract {
        match self {
            PredictorId::Seasonal => ParameterContract::with_days(90),
            PredictorId::Orders | PredictorId::Transport | PredictorId::Warehouse => {
                ParameterContract::with_days(30)
            }
            // Sentimento não usa horizonte; o valor só entra na chave do cache
            PredictorId::Sentiment => ParameterContract::with_days(30),
        }
    }
}

impl fmt::Display for PredictorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults e limites que o registry aplica antes de invocar um predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterContract {
    pub default_days: u32,
    pub max_days: u32,
}

impl ParameterContract {
    const fn with_days(default_days: u32) -> Self {
        Self {
            default_days,
            max_days: MAX_HORIZON_DAYS,
        }
    }
}

/// Entrada validada de um predictor: todos os campos preenchidos.
///
/// Também é a chave do cache, por isso implementa `Eq + Hash`
/// (o `f64` entra pelo padrão de bits).
#[derive(Clone, Debug, PartialEq)]
pub struct PredictorInput {
    /// Variação de demanda, `>= -1.0`. Default 0.
    pub surge_pct: f64,
    /// Horizonte em dias, dentro de `1..=max_days`.
    pub days: u32,
    /// Meses de interesse (pode ficar vazio).
    pub months: BTreeSet<u32>,
    /// Mês alvo. Default: mês de `as_of`.
    pub target_month: u32,
    /// Data de referência da requisição.
    pub as_of: NaiveDate,
}

impl PredictorInput {
    /// Aplica o contrato da família sobre os parâmetros extraídos.
    pub fn resolve(params: &ParameterSet, contract: ParameterContract, as_of: NaiveDate) -> Self {
        let days = params
            .days
            .unwrap_or(contract.default_days)
            .clamp(1, contract.max_days);
        let surge_pct = params.surge_pct.filter(|s| s.is_finite()).unwrap_or(0.0).max(-1.0);

        Self {
            surge_pct,
            days,
            months: params.months.clone(),
            target_month: params.target_month.unwrap_or_else(|| as_of.month()),
            as_of,
        }
    }

    /// Datas do horizonte: `as_of`, `as_of + 1`, … (`days` itens).
    pub fn horizon(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.as_of.iter_days().take(self.days as usize)
    }
}

impl Eq for PredictorInput {}

impl Hash for PredictorInput {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.surge_pct.to_bits().hash(state);
        self.days.hash(state);
        self.months.hash(state);
        self.target_month.hash(state);
        self.as_of.hash(state);
    }
}

/// Contrato uniforme de todas as famílias de modelo.
pub trait Predictor: Send + Sync {
    fn id(&self) -> PredictorId;

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError>;
}

/// Erro `Failed` já com o id do predictor preenchido.
pub(crate) fn failed(id: PredictorId, reason: impl Into<String>) -> PredictorError {
    PredictorError::Failed {
        predictor: id.as_str().to_string(),
        reason: reason.into(),
    }
}

/// Média aritmética; `None` para fatia vazia.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mediana (média dos dois centrais quando o tamanho é par).
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hash_of(input: &PredictorInput) -> u64 {
        let mut h = DefaultHasher::new();
        input.hash(&mut h);
        h.finish()
    }

    #[test]
    fn every_intent_but_general_has_a_predictor() {
        for intent in Intent::ALL {
            match PredictorId::for_intent(intent) {
                Some(id) => assert_eq!(id.intent(), intent),
                None => assert_eq!(intent, Intent::General),
            }
        }
    }

    #[test]
    fn forecast_defaults_to_ninety_days() {
        let input = PredictorInput::resolve(
            &ParameterSet::default(),
            PredictorId::Seasonal.contract(),
            date(2026, 10, 16),
        );
        assert_eq!(input.days, 90);
        assert_eq!(input.surge_pct, 0.0);
        assert_eq!(input.target_month, 10);
    }

    #[test]
    fn days_are_clamped_to_the_contract() {
        let contract = PredictorId::Orders.contract();
        let mut params = ParameterSet {
            days: Some(5000),
            ..Default::default()
        };
        let input = PredictorInput::resolve(&params, contract, date(2026, 1, 1));
        assert_eq!(input.days, MAX_HORIZON_DAYS);

        params.days = Some(0);
        let input = PredictorInput::resolve(&params, contract, date(2026, 1, 1));
        assert_eq!(input.days, 1);
    }

    #[test]
    fn explicit_values_survive() {
        let params = ParameterSet {
            surge_pct: Some(0.2),
            days: Some(14),
            target_month: Some(3),
            ..Default::default()
        };
        let input = PredictorInput::resolve(&params, PredictorId::Orders.contract(), date(2026, 10, 16));
        assert_eq!(input.surge_pct, 0.2);
        assert_eq!(input.days, 14);
        assert_eq!(input.target_month, 3);
    }

    #[test]
    fn horizon_walks_forward_from_as_of() {
        let params = ParameterSet {
            days: Some(3),
            ..Default::default()
        };
        let input = PredictorInput::resolve(&params, PredictorId::Seasonal.contract(), date(2026, 12, 31));
        let days: Vec<NaiveDate> = input.horizon().collect();
        assert_eq!(days, vec![date(2026, 12, 31), date(2027, 1, 1), date(2027, 1, 2)]);
    }

    #[test]
    fn equal_inputs_hash_equally() {
        let params = ParameterSet {
            surge_pct: Some(0.25),
            ..Default::default()
        };
        let a = PredictorInput::resolve(&params, PredictorId::Orders.contract(), date(2026, 5, 1));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }
}
