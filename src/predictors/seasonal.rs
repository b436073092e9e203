//! # Predictor Sazonal (Forecast)
//!
//! Modelo multiplicativo de índice de demanda:
//!
//! ```text
//! demanda(dia i) = (base_level + daily_trend · i) · fator_mês · fator_dia_semana
//! ```
//!
//! O artefato guarda os 12 fatores mensais (janeiro primeiro) e os 7
//! fatores de dia da semana (segunda primeiro).
//!
//! ## Métricas publicadas
//!
//! | Métrica | Forma | Significado |
//! |---------|-------|-------------|
//! | `avg_demand` | valor | média do horizonte |
//! | `trend` | valor | último dia − primeiro dia |
//! | `peak_demand` / `low_demand` | valor | máximo / mínimo do horizonte |
//! | `horizon_days` | valor | dias previstos |
//! | `forecast` | série | primeiros 10 dias |
//! | `period_avg` | valor | média dos meses pedidos (só se houver meses) |
//! | `expected_uplift` | valor | fator dos meses de interesse vs. média anual − 1 |

use chrono::Datelike;
use serde::Deserialize;

use super::artifacts::Artifact;
use super::{failed, mean, Predictor, PredictorId, PredictorInput};
use crate::core::PredictionResult;
use crate::error::PredictorError;

/// Quantos dias da série vão no resultado.
const FORECAST_PREVIEW_DAYS: usize = 10;

/// Conteúdo de `model_seasonal.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct SeasonalArtifact {
    pub base_level: f64,
    #[serde(default)]
    pub daily_trend: f64,
    pub monthly_factors: Vec<f64>,
    pub weekday_factors: Vec<f64>,
}

impl Artifact for SeasonalArtifact {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.base_level.is_finite() && self.base_level > 0.0,
            "base_level precisa ser positivo"
        );
        anyhow::ensure!(self.daily_trend.is_finite(), "daily_trend inválido");
        anyhow::ensure!(
            self.monthly_factors.len() == 12,
            "monthly_factors precisa de 12 valores, tem {}",
            self.monthly_factors.len()
        );
        anyhow::ensure!(
            self.weekday_factors.len() == 7,
            "weekday_factors precisa de 7 valores, tem {}",
            self.weekday_factors.len()
        );
        anyhow::ensure!(
            self.monthly_factors
                .iter()
                .chain(&self.weekday_factors)
                .all(|f| f.is_finite() && *f > 0.0),
            "fatores precisam ser positivos"
        );
        Ok(())
    }
}

/// Predictor de demanda sazonal.
pub struct SeasonalPredictor {
    model: SeasonalArtifact,
}

impl SeasonalPredictor {
    pub fn new(model: SeasonalArtifact) -> Self {
        Self { model }
    }

    fn monthly(&self, month: u32) -> f64 {
        self.model.monthly_factors[(month as usize - 1) % 12]
    }

    /// Média dos fatores mensais para um conjunto de meses.
    fn mean_monthly<I: IntoIterator<Item = u32>>(&self, months: I) -> Option<f64> {
        let factors: Vec<f64> = months.into_iter().map(|m| self.monthly(m)).collect();
        mean(&factors)
    }
}

impl Predictor for SeasonalPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Seasonal
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        let series: Vec<f64> = input
            .horizon()
            .enumerate()
            .map(|(i, date)| {
                let level = self.model.base_level + self.model.daily_trend * i as f64;
                let weekday = self.model.weekday_factors[date.weekday().num_days_from_monday() as usize];
                (level * self.monthly(date.month()) * weekday).max(0.0)
            })
            .collect();

        let (Some(first), Some(last), Some(avg)) = (series.first(), series.last(), mean(&series)) else {
            return Err(failed(self.id(), "horizonte vazio"));
        };

        let peak = series.iter().copied().fold(f64::MIN, f64::max);
        let low = series.iter().copied().fold(f64::MAX, f64::min);

        let annual = self.mean_monthly(1..=12).unwrap_or(1.0);
        // Meses de interesse: os pedidos, ou os que o horizonte cobre
        let reference = if input.months.is_empty() {
            let mut covered: Vec<u32> = input.horizon().map(|d| d.month()).collect();
            covered.dedup();
            self.mean_monthly(covered)
        } else {
            self.mean_monthly(input.months.iter().copied())
        };
        let uplift = reference.map_or(0.0, |r| r / annual - 1.0);

        let mut result = PredictionResult::new(self.id().as_str())
            .with_value("avg_demand", avg)
            .with_value("trend", last - first)
            .with_value("peak_demand", peak)
            .with_value("low_demand", low)
            .with_value("horizon_days", input.days as f64)
            .with_series(
                "forecast",
                series.iter().copied().take(FORECAST_PREVIEW_DAYS).collect(),
            )
            .with_value("expected_uplift", uplift);

        if !input.months.is_empty() {
            let weekday_avg = mean(&self.model.weekday_factors).unwrap_or(1.0);
            let period = self
                .mean_monthly(input.months.iter().copied())
                .unwrap_or(1.0);
            result = result.with_value("period_avg", self.model.base_level * period * weekday_avg);
        }

        Ok(result)
    }
}
