//! # Predictor de Pedidos (Inventory)
//!
//! Projeta a demanda por categoria no horizonte pedido aplicando a
//! variação `surge_pct`, e calcula quanto estoque extra isso exige.
//!
//! ```text
//! atual(cat)    = daily_demand · days
//! previsto(cat) = atual(cat) · (1 + surge_pct)
//! investimento  = Σ max(0, previsto − atual) · unit_cost
//! cobertura     = Σ stock_on_hand / Σ daily_demand · (1 + surge_pct)
//! ```
//!
//! Só as [`TOP_CATEGORIES`] categorias de maior demanda entram no resultado.

use serde::Deserialize;

use super::artifacts::Artifact;
use super::{failed, Predictor, PredictorId, PredictorInput, MAX_HORIZON_DAYS};
use crate::core::{LabeledValue, PredictionResult};
use crate::error::PredictorError;

pub const TOP_CATEGORIES: usize = 5;

/// Estatísticas históricas de uma categoria.
#[derive(Clone, Debug, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    /// Unidades vendidas por dia.
    pub daily_demand: f64,
    pub unit_cost: f64,
    /// Unidades em estoque hoje.
    pub stock_on_hand: f64,
}

/// Conteúdo de `model_orders.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct OrdersArtifact {
    pub categories: Vec<CategoryStats>,
}

impl Artifact for OrdersArtifact {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.categories.is_empty(), "nenhuma categoria");
        for c in &self.categories {
            anyhow::ensure!(!c.name.trim().is_empty(), "categoria sem nome");
            anyhow::ensure!(
                [c.daily_demand, c.unit_cost, c.stock_on_hand]
                    .iter()
                    .all(|v| v.is_finite() && *v >= 0.0),
                "valores negativos na categoria '{}'",
                c.name
            );
        }
        anyhow::ensure!(
            self.categories.iter().any(|c| c.daily_demand > 0.0),
            "nenhuma categoria com demanda"
        );
        Ok(())
    }
}

pub struct OrdersPredictor {
    /// Já ordenadas por demanda decrescente e cortadas em `TOP_CATEGORIES`.
    top: Vec<CategoryStats>,
}

impl OrdersPredictor {
    pub fn new(model: OrdersArtifact) -> Self {
        let mut top = model.categories;
        top.sort_by(|a, b| b.daily_demand.total_cmp(&a.daily_demand));
        top.truncate(TOP_CATEGORIES);
        Self { top }
    }
}

impl Predictor for OrdersPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Orders
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        if self.top.is_empty() {
            return Err(failed(self.id(), "nenhuma categoria carregada"));
        }

        let factor = 1.0 + input.surge_pct;
        let days = input.days as f64;

        let mut current_total = 0.0;
        let mut investment = 0.0;
        let mut predicted = Vec::with_capacity(self.top.len());
        for c in &self.top {
            let current = c.daily_demand * days;
            let projected = current * factor;
            current_total += current;
            investment += (projected - current).max(0.0) * c.unit_cost;
            predicted.push(LabeledValue::new(c.name.clone(), projected));
        }

        let stock: f64 = self.top.iter().map(|c| c.stock_on_hand).sum();
        let daily_need: f64 = self.top.iter().map(|c| c.daily_demand).sum::<f64>() * factor;
        let cover_days = if daily_need > f64::EPSILON {
            stock / daily_need
        } else {
            // Demanda zerada: o estoque cobre qualquer horizonte aceito
            MAX_HORIZON_DAYS as f64
        };

        Ok(PredictionResult::new(self.id().as_str())
            .with_value("surge_pct", input.surge_pct)
            .with_value("horizon_days", days)
            .with_value("current_demand", current_total)
            .with_labeled("predicted_demand", predicted)
            .with_value("total_investment", investment)
            .with_value("stock_cover_days", cover_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParameterSet;
    use chrono::NaiveDate;

    fn category(name: &str, daily: f64, cost: f64, stock: f64) -> CategoryStats {
        CategoryStats {
            name: name.into(),
            daily_demand: daily,
            unit_cost: cost,
            stock_on_hand: stock,
        }
    }

    fn artifact() -> OrdersArtifact {
        OrdersArtifact {
            categories: vec![
                category("Books", 10.0, 5.0, 100.0),
                category("Electronics", 100.0, 50.0, 2000.0),
                category("Fashion", 50.0, 20.0, 900.0),
            ],
        }
    }

    fn input(surge: Option<f64>, days: Option<u32>) -> PredictorInput {
        let params = ParameterSet {
            surge_pct: surge,
            days,
            ..Default::default()
        };
        PredictorInput::resolve(
            &params,
            PredictorId::Orders.contract(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        )
    }

    #[test]
    fn twenty_percent_surge() {
        let r = OrdersPredictor::new(artifact())
            .predict(&input(Some(0.2), Some(10)))
            .unwrap();
        assert_eq!(r.value("surge_pct").unwrap(), 0.2);
        assert_eq!(r.value("current_demand").unwrap(), 1600.0);

        let predicted = r.labeled("predicted_demand").unwrap();
        // Ordenado por demanda
        assert_eq!(predicted[0].label, "Electronics");
        assert!((predicted[0].value - 1200.0).abs() < 1e-9);

        // (200·50 + 100·20 + 20·5)
        assert!((r.value("total_investment").unwrap() - 12_100.0).abs() < 1e-6);
        // 3000 / (160 · 1.2)
        assert!((r.value("stock_cover_days").unwrap() - 15.625).abs() < 1e-9);
    }

    #[test]
    fn default_surge_is_zero() {
        let r = OrdersPredictor::new(artifact()).predict(&input(None, None)).unwrap();
        assert_eq!(r.value("surge_pct").unwrap(), 0.0);
        assert_eq!(r.value("horizon_days").unwrap(), 30.0);
        assert_eq!(r.value("total_investment").unwrap(), 0.0);
    }

    #[test]
    fn full_drop_does_not_divide_by_zero() {
        let r = OrdersPredictor::new(artifact())
            .predict(&input(Some(-1.0), None))
            .unwrap();
        assert_eq!(r.value("stock_cover_days").unwrap(), MAX_HORIZON_DAYS as f64);
        assert_eq!(r.value("total_investment").unwrap(), 0.0);
    }

    #[test]
    fn only_top_categories_are_kept() {
        let categories = (0..8)
            .map(|i| category(&format!("C{i}"), i as f64 + 1.0, 1.0, 1.0))
            .collect();
        let p = OrdersPredictor::new(OrdersArtifact { categories });
        let r = p.predict(&input(None, None)).unwrap();
        let labels: Vec<&str> = r
            .labeled("predicted_demand")
            .unwrap()
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels, vec!["C7", "C6", "C5", "C4", "C3"]);
    }

    #[test]
    fn artifact_validation() {
        assert!(artifact().validate().is_ok());
        assert!(OrdersArtifact { categories: vec![] }.validate().is_err());
        let bad = OrdersArtifact {
            categories: vec![category("X", -1.0, 1.0, 1.0)],
        };
        assert!(bad.validate().is_err());
    }
}
