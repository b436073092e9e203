//! # Predictor de Transporte (Shipping)
//!
//! Avalia transportadoras a partir do histórico de entregas:
//!
//! - **em risco**: prazo médio acima da mediana (ordem: mais lenta primeiro)
//! - **melhores**: as três mais rápidas
//! - **fator de carga no pico**: `envios/dia · multiplicador / capacidade`,
//!   com o multiplicador de pico aplicado só se o horizonte tocar os meses
//!   de pico do artefato

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Deserialize;

use super::artifacts::Artifact;
use super::{failed, mean, median, Predictor, PredictorId, PredictorInput};
use crate::core::{LabeledValue, PredictionResult};
use crate::error::PredictorError;

const BEST_COURIERS: usize = 3;

#[derive(Clone, Debug, Deserialize)]
pub struct CourierStats {
    pub name: String,
    pub avg_delivery_days: f64,
    pub daily_shipments: f64,
    pub daily_capacity: f64,
}

/// Conteúdo de `model_transport.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct TransportArtifact {
    pub couriers: Vec<CourierStats>,
    #[serde(default = "default_peak_multiplier")]
    pub peak_multiplier: f64,
    #[serde(default = "default_peak_months")]
    pub peak_months: BTreeSet<u32>,
}

fn default_peak_multiplier() -> f64 {
    1.0
}

fn default_peak_months() -> BTreeSet<u32> {
    [11, 12].into_iter().collect()
}

impl Artifact for TransportArtifact {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.couriers.is_empty(), "nenhuma transportadora");
        for c in &self.couriers {
            anyhow::ensure!(
                c.avg_delivery_days.is_finite() && c.avg_delivery_days >= 0.0,
                "prazo inválido para '{}'",
                c.name
            );
            anyhow::ensure!(
                c.daily_capacity.is_finite() && c.daily_capacity > 0.0,
                "capacidade precisa ser positiva para '{}'",
                c.name
            );
            anyhow::ensure!(
                c.daily_shipments.is_finite() && c.daily_shipments >= 0.0,
                "envios inválidos para '{}'",
                c.name
            );
        }
        anyhow::ensure!(
            self.peak_multiplier.is_finite() && self.peak_multiplier > 0.0,
            "peak_multiplier precisa ser positivo"
        );
        anyhow::ensure!(
            self.peak_months.iter().all(|m| (1..=12).contains(m)),
            "peak_months fora de 1..=12"
        );
        Ok(())
    }
}

pub struct TransportPredictor {
    model: TransportArtifact,
}

impl TransportPredictor {
    pub fn new(model: TransportArtifact) -> Self {
        Self { model }
    }
}

impl Predictor for TransportPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Transport
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        let couriers = &self.model.couriers;
        let times: Vec<f64> = couriers.iter().map(|c| c.avg_delivery_days).collect();
        let (Some(avg), Some(mid)) = (mean(&times), median(&times)) else {
            return Err(failed(self.id(), "nenhuma transportadora carregada"));
        };

        let mut by_time: Vec<&CourierStats> = couriers.iter().collect();
        by_time.sort_by(|a, b| a.avg_delivery_days.total_cmp(&b.avg_delivery_days));

        let at_risk: Vec<LabeledValue> = by_time
            .iter()
            .rev()
            .filter(|c| c.avg_delivery_days > mid)
            .map(|c| LabeledValue::new(c.name.clone(), c.avg_delivery_days))
            .collect();
        let best: Vec<LabeledValue> = by_time
            .iter()
            .take(BEST_COURIERS)
            .map(|c| LabeledValue::new(c.name.clone(), c.avg_delivery_days))
            .collect();

        let in_peak = input
            .horizon()
            .any(|d| self.model.peak_months.contains(&d.month()));
        let multiplier = if in_peak { self.model.peak_multiplier } else { 1.0 };
        let peak_load = couriers
            .iter()
            .map(|c| c.daily_shipments * multiplier / c.daily_capacity)
            .fold(0.0, f64::max);

        Ok(PredictionResult::new(self.id().as_str())
            .with_value("avg_delivery_days", avg)
            .with_value("late_route_share", at_risk.len() as f64 / couriers.len() as f64)
            .with_labeled("at_risk", at_risk)
            .with_labeled("best", best)
            .with_value("peak_load_factor", peak_load)
            .with_value("horizon_days", input.days as f64))
    }
}
