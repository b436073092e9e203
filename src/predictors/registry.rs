//! # Registro de Predictors
//!
//! Mapeia cada intent ao predictor da sua família. Os artefatos são
//! lidos uma única vez em [`PredictorRegistry::load`]; daí em diante o
//! registro é somente leitura e pode ser compartilhado via `Arc` entre
//! requisições concorrentes.
//!
//! ## Slots
//!
//! ```text
//! Forecast  → Slot::Ready(seasonal)
//! Inventory → Slot::Unavailable { reason: "Falha ao ler models/model_orders.json" }
//! …
//! General   → (sem slot: resposta estática de ajuda)
//! ```
//!
//! Um slot indisponível vira [`PredictorError::Unavailable`] na hora da
//! predição; os outros continuam atendendo.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use super::artifacts::load_artifact;
use super::cache::CachedPredictor;
use super::orders::OrdersPredictor;
use super::seasonal::SeasonalPredictor;
use super::sentiment::SentimentPredictor;
use super::transport::TransportPredictor;
use super::warehouse::WarehousePredictor;
use super::{Predictor, PredictorId, PredictorInput};
use crate::core::{Intent, ParameterSet, PredictionResult};
use crate::error::PredictorError;

enum Slot {
    Ready(Arc<dyn Predictor>),
    Unavailable { reason: String },
}

/// Registro intent → predictor.
pub struct PredictorRegistry {
    slots: BTreeMap<PredictorId, Slot>,
}

impl PredictorRegistry {
    /// Carrega todos os artefatos de `dir`.
    ///
    /// Nunca falha: um artefato ausente ou inválido deixa apenas o seu
    /// slot indisponível (com o motivo, para o `/health` e os logs).
    pub fn load(dir: &Path) -> Self {
        let mut slots = BTreeMap::new();
        for id in PredictorId::ALL {
            let path = dir.join(id.file_name());
            let slot = match load_predictor(id, &path) {
                Ok(predictor) => {
                    tracing::info!(predictor = %id, path = %path.display(), "modelo carregado");
                    Slot::Ready(predictor)
                }
                Err(e) => {
                    tracing::warn!(predictor = %id, error = %format!("{e:#}"), "modelo indisponível");
                    Slot::Unavailable {
                        reason: format!("{e:#}"),
                    }
                }
            };
            slots.insert(id, slot);
        }
        Self { slots }
    }

    /// Registro montado a partir de predictors já construídos.
    /// Famílias não fornecidas ficam indisponíveis.
    pub fn from_predictors(predictors: Vec<Arc<dyn Predictor>>) -> Self {
        let mut slots: BTreeMap<PredictorId, Slot> = PredictorId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    Slot::Unavailable {
                        reason: "modelo não fornecido".to_string(),
                    },
                )
            })
            .collect();
        for p in predictors {
            slots.insert(p.id(), Slot::Ready(p));
        }
        Self { slots }
    }

    /// Predictor do intent.
    ///
    /// - `None`: o intent não tem predictor (`General`)
    /// - `Some(Err(Unavailable))`: artefato não carregou
    pub fn get(&self, intent: Intent) -> Option<Result<Arc<dyn Predictor>, PredictorError>> {
        let id = PredictorId::for_intent(intent)?;
        Some(match self.slots.get(&id) {
            Some(Slot::Ready(p)) => Ok(Arc::clone(p)),
            Some(Slot::Unavailable { reason }) => Err(unavailable(id, reason)),
            None => Err(unavailable(id, "sem slot registrado")),
        })
    }

    /// Aplica o contrato de parâmetros da família e invoca o predictor.
    pub fn predict(
        &self,
        intent: Intent,
        params: &ParameterSet,
        as_of: NaiveDate,
    ) -> Option<Result<PredictionResult, PredictorError>> {
        let id = PredictorId::for_intent(intent)?;
        Some(self.get(intent)?.and_then(|predictor| {
            let input = PredictorInput::resolve(params, id.contract(), as_of);
            tracing::debug!(predictor = %id, ?input, "invocando predictor");
            predictor.predict(&input)
        }))
    }

    /// Ids dos predictors carregados.
    pub fn models_loaded(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids e motivos dos predictors indisponíveis.
    pub fn models_unavailable(&self) -> Vec<(&'static str, String)> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| match slot {
                Slot::Unavailable { reason } => Some((id.as_str(), reason.clone())),
                Slot::Ready(_) => None,
            })
            .collect()
    }

    pub fn any_loaded(&self) -> bool {
        self.slots.values().any(|s| matches!(s, Slot::Ready(_)))
    }
}

fn unavailable(id: PredictorId, reason: &str) -> PredictorError {
    PredictorError::Unavailable {
        predictor: id.as_str().to_string(),
        reason: reason.to_string(),
    }
}

/// Lê o artefato da família e envolve o predictor no cache.
fn load_predictor(id: PredictorId, path: &Path) -> anyhow::Result<Arc<dyn Predictor>> {
    let predictor: Arc<dyn Predictor> = match id {
        PredictorId::Seasonal => Arc::new(CachedPredictor::new(SeasonalPredictor::new(load_artifact(path)?))),
        PredictorId::Orders => Arc::new(CachedPredictor::new(OrdersPredictor::new(load_artifact(path)?))),
        PredictorId::Transport => Arc::new(CachedPredictor::new(TransportPredictor::new(load_artifact(path)?))),
        PredictorId::Warehouse => Arc::new(CachedPredictor::new(WarehousePredictor::new(load_artifact(path)?))),
        PredictorId::Sentiment => Arc::new(CachedPredictor::new(SentimentPredictor::new(load_artifact(path)?))),
    };
    Ok(predictor)
}
