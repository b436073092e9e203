//! # Resultado de Predição
//!
//! O [`PredictionResult`] é a saída de qualquer predictor: um mapa de
//! métricas nomeadas. Para o núcleo o conteúdo é **opaco**: só o
//! [`InsightAssembler`](crate::assembler::InsightAssembler) conhece os
//! nomes que cada predictor publica.
//!
//! ## Formas de Métrica
//!
//! | Variante | JSON | Exemplo |
//! |----------|------|---------|
//! | [`Metric::Value`] | `12.5` | `avg_demand` |
//! | [`Metric::Series`] | `[1.0, 2.0]` | `forecast` |
//! | [`Metric::Labeled`] | `[{"label": "X", "value": 1.0}]` | `at_risk` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;

/// Par rótulo/valor (ex: categoria e demanda prevista).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Uma métrica publicada por um predictor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    Series(Vec<f64>),
    Labeled(Vec<LabeledValue>),
}

/// Saída estruturada de um predictor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Identificador do predictor que produziu o resultado.
    pub predictor: String,
    /// Métricas nomeadas (ordem alfabética estável).
    pub metrics: BTreeMap<String, Metric>,
}

impl PredictionResult {
    pub fn new(predictor: impl Into<String>) -> Self {
        Self {
            predictor: predictor.into(),
            metrics: BTreeMap::new(),
        }
    }

    /// Builder: adiciona uma métrica escalar.
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), Metric::Value(value));
        self
    }

    /// Builder: adiciona uma série numérica.
    pub fn with_series(mut self, name: &str, series: Vec<f64>) -> Self {
        self.metrics.insert(name.to_string(), Metric::Series(series));
        self
    }

    /// Builder: adiciona uma lista rotulada.
    pub fn with_labeled(mut self, name: &str, values: Vec<LabeledValue>) -> Self {
        self.metrics.insert(name.to_string(), Metric::Labeled(values));
        self
    }

    /// Lê uma métrica escalar obrigatória.
    ///
    /// # Erros
    ///
    /// [`AssemblyError::MissingMetric`] se ausente, [`AssemblyError::WrongShape`]
    /// se existir com outra forma.
    pub fn value(&self, name: &str) -> Result<f64, AssemblyError> {
        match self.metric(name)? {
            Metric::Value(v) => Ok(*v),
            _ => Err(self.wrong_shape(name, "value")),
        }
    }

    /// Lê uma métrica escalar opcional (ausente → `None`).
    pub fn optional_value(&self, name: &str) -> Result<Option<f64>, AssemblyError> {
        match self.metrics.get(name) {
            None => Ok(None),
            Some(Metric::Value(v)) => Ok(Some(*v)),
            Some(_) => Err(self.wrong_shape(name, "value")),
        }
    }

    /// Lê uma série obrigatória.
    pub fn series(&self, name: &str) -> Result<&[f64], AssemblyError> {
        match self.metric(name)? {
            Metric::Series(s) => Ok(s),
            _ => Err(self.wrong_shape(name, "series")),
        }
    }

    /// Lê uma lista rotulada obrigatória.
    pub fn labeled(&self, name: &str) -> Result<&[LabeledValue], AssemblyError> {
        match self.metric(name)? {
            Metric::Labeled(l) => Ok(l),
            _ => Err(self.wrong_shape(name, "labeled")),
        }
    }

    fn metric(&self, name: &str) -> Result<&Metric, AssemblyError> {
        self.metrics
            .get(name)
            .ok_or_else(|| AssemblyError::MissingMetric {
                predictor: self.predictor.clone(),
                metric: name.to_string(),
            })
    }

    fn wrong_shape(&self, name: &str, expected: &'static str) -> AssemblyError {
        AssemblyError::WrongShape {
            predictor: self.predictor.clone(),
            metric: name.to_string(),
            expected,
        }
    }
}
