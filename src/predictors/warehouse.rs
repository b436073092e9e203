//! # Predictor de Armazéns (Warehouse)
//!
//! Divide os armazéns pela mediana do tempo de processamento e estima o
//! ganho de levar os lentos ao patamar dos eficientes.
//!
//! ```text
//! economia_tempo  = média(lentos) − média(eficientes)          [h/pedido]
//! economia_diária = (custo_lentos − custo_eficientes) · pedidos/dia dos lentos
//! economia_mensal = economia_diária · 30
//! ```

use serde::Deserialize;

use super::artifacts::Artifact;
use super::{failed, mean, median, Predictor, PredictorId, PredictorInput};
use crate::core::{LabeledValue, PredictionResult};
use crate::error::PredictorError;

const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Clone, Debug, Deserialize)]
pub struct WarehouseStats {
    pub id: String,
    pub avg_processing_hours: f64,
    pub cost_per_order: f64,
    pub daily_orders: f64,
}

/// Conteúdo de `model_warehouse.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct WarehouseArtifact {
    pub warehouses: Vec<WarehouseStats>,
}

impl Artifact for WarehouseArtifact {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.warehouses.is_empty(), "nenhum armazém");
        for w in &self.warehouses {
            anyhow::ensure!(
                [w.avg_processing_hours, w.cost_per_order, w.daily_orders]
                    .iter()
                    .all(|v| v.is_finite() && *v >= 0.0),
                "valores inválidos no armazém '{}'",
                w.id
            );
        }
        Ok(())
    }
}

pub struct WarehousePredictor {
    model: WarehouseArtifact,
}

impl WarehousePredictor {
    pub fn new(model: WarehouseArtifact) -> Self {
        Self { model }
    }
}

impl Predictor for WarehousePredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Warehouse
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        let all = &self.model.warehouses;
        let hours: Vec<f64> = all.iter().map(|w| w.avg_processing_hours).collect();
        let (Some(avg), Some(mid)) = (mean(&hours), median(&hours)) else {
            return Err(failed(self.id(), "nenhum armazém carregado"));
        };

        let mut slow: Vec<&WarehouseStats> =
            all.iter().filter(|w| w.avg_processing_hours > mid).collect();
        let mut fast: Vec<&WarehouseStats> =
            all.iter().filter(|w| w.avg_processing_hours <= mid).collect();
        slow.sort_by(|a, b| b.avg_processing_hours.total_cmp(&a.avg_processing_hours));
        fast.sort_by(|a, b| a.avg_processing_hours.total_cmp(&b.avg_processing_hours));

        let (time_savings, daily_savings) = match (
            group_mean(&slow, |w| w.avg_processing_hours),
            group_mean(&fast, |w| w.avg_processing_hours),
            group_mean(&slow, |w| w.cost_per_order),
            group_mean(&fast, |w| w.cost_per_order),
        ) {
            (Some(slow_h), Some(fast_h), Some(slow_c), Some(fast_c)) => {
                let slow_orders: f64 = slow.iter().map(|w| w.daily_orders).sum();
                (
                    (slow_h - fast_h).max(0.0),
                    ((slow_c - fast_c) * slow_orders).max(0.0),
                )
            }
            // Todos iguais: não há grupo lento
            _ => (0.0, 0.0),
        };

        Ok(PredictionResult::new(self.id().as_str())
            .with_value("avg_processing_hours", avg)
            .with_labeled("underperforming", labeled(&slow))
            .with_labeled("efficient", labeled(&fast))
            .with_value("time_savings_hours", time_savings)
            .with_value("monthly_cost_savings", daily_savings * DAYS_PER_MONTH)
            .with_value("horizon_days", input.days as f64)
            .with_value("horizon_cost_savings", daily_savings * input.days as f64))
    }
}

fn group_mean(group: &[&WarehouseStats], field: fn(&WarehouseStats) -> f64) -> Option<f64> {
    let values: Vec<f64> = group.iter().map(|w| field(w)).collect();
    mean(&values)
}

fn labeled(group: &[&WarehouseStats]) -> Vec<LabeledValue> {
    group
        .iter()
        .map(|w| LabeledValue::new(w.id.clone(), w.avg_processing_hours))
        .collect()
}
