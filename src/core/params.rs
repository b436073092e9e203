//! # Parâmetros Extraídos da Pergunta
//!
//! O [`ParameterSet`] agrupa os valores estruturados encontrados no texto.
//! Todos os campos são **opcionais e independentes**: um não invalida o
//! outro, e "20% more for Q4" preenche `surge_pct` e `months` ao mesmo tempo.
//!
//! ```text
//! "If demand increases by 20% over the next 45 days in Q4"
//!   ├── surge_pct = 0.20
//!   ├── days      = 45
//!   ├── quarter   = Q4
//!   └── months    = [10, 11, 12]
//! ```

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trimestre do calendário.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Constrói a partir do número 1..=4.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Quarter::Q1),
            2 => Some(Quarter::Q2),
            3 => Some(Quarter::Q3),
            4 => Some(Quarter::Q4),
            _ => None,
        }
    }

    /// Número do trimestre (1..=4).
    pub fn number(&self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    /// Os três meses fixos do trimestre (`Q4` → `[10, 11, 12]`).
    pub fn months(&self) -> [u32; 3] {
        let first = (self.number() - 1) * 3 + 1;
        [first, first + 1, first + 2]
    }

    /// Trimestre que contém a data.
    pub fn containing(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    /// Trimestre seguinte, com virada de ano (`Q4` → `Q1`).
    pub fn next(&self) -> Self {
        match self {
            Quarter::Q1 => Quarter::Q2,
            Quarter::Q2 => Quarter::Q3,
            Quarter::Q3 => Quarter::Q4,
            Quarter::Q4 => Quarter::Q1,
        }
    }

    /// Trimestre anterior (`Q1` → `Q4`).
    pub fn previous(&self) -> Self {
        match self {
            Quarter::Q1 => Quarter::Q4,
            Quarter::Q2 => Quarter::Q1,
            Quarter::Q3 => Quarter::Q2,
            Quarter::Q4 => Quarter::Q3,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// Parâmetros estruturados de uma pergunta.
///
/// ## Invariantes
///
/// - `surge_pct` está em `[-1.0, +∞)` (o extrator faz o clamp inferior)
/// - `days` é sempre positivo quando presente
/// - `months` contém apenas valores `1..=12`, ordenados (é um `BTreeSet`)
/// - `target_month` só existe quando a pergunta nomeia exatamente um mês
///
/// Campos ausentes são omitidos do JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Variação percentual como fração (`"20%"` → `0.20`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surge_pct: Option<f64>,
    /// Horizonte em dias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Meses de interesse (de um trimestre, nomes de meses ou "holidays").
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub months: BTreeSet<u32>,
    /// Mês único nomeado na pergunta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_month: Option<u32>,
    /// Trimestre que originou `months`, quando houver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<Quarter>,
}

impl ParameterSet {
    /// `true` quando nenhum parâmetro foi encontrado.
    pub fn is_empty(&self) -> bool {
        self.surge_pct.is_none()
            && self.days.is_none()
            && self.months.is_empty()
            && self.target_month.is_none()
            && self.quarter.is_none()
    }

    /// `true` se algum mês de interesse cai no pico de fim de ano (out–dez).
    pub fn touches_peak_season(&self) -> bool {
        self.months.iter().any(|m| (10..=12).contains(m))
            || self.target_month.is_some_and(|m| m >= 10)
    }
}
