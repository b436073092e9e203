//! # Extrator de Parâmetros
//!
//! O [`ParameterExtractor`] transforma texto livre em um [`ParameterSet`]
//! usando regexes compiladas uma única vez. A extração é **best-effort**:
//! padrão ausente deixa o campo vazio, nunca gera erro.
//!
//! ## Padrões Reconhecidos
//!
//! | Campo | Padrões | Exemplo |
//! |-------|---------|---------|
//! | `surge_pct` | `N%`, `N percent`, `N per cent` | "20%" → 0.20 |
//! | `surge_pct` em faixa | `N-M%` vale o segundo número | "10-20%" → 0.20 |
//! | `days` | `N day(s)`, `N-day` | "next 45 days" → 45 |
//! | `quarter` + `months` | `Q1`..`Q4` (também "FY26Q4"), "first".."fourth quarter" | "q4" → [10, 11, 12] |
//! | `months` | nomes completos/abreviados, "month N", "holiday(s)" | "holidays" → [11, 12] |
//! | `target_month` | exatamente um mês nomeado | "in December" → 12 |
//! | `quarter` relativo | "this quarter", "last quarter", "quarter" | depende da data |
//!
//! ## Precedência de `months`
//!
//! ```text
//! 1. Trimestre explícito (Q4, fourth quarter)  → trio fixo, sozinho
//! 2. Meses nomeados ∪ holidays                 → união ordenada
//! 3. "quarter" sem número                      → trimestre relativo à data
//! ```
//!
//! O trimestre explícito vence sozinho para que "Q4" signifique sempre
//! `[10, 11, 12]`, independente do resto do texto.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::{ParameterSet, Quarter};

/// Nomes e abreviações de meses (minúsculas) → número do mês.
///
/// "may" fica de fora: como verbo é comum demais ("may demand rise?").
/// O mês de maio só é reconhecido escrito com maiúscula (ver `may_re`).
const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Meses associados a "holiday"/"holidays".
const HOLIDAY_MONTHS: [u32; 2] = [11, 12];

/// Extrator de parâmetros por regex.
///
/// Sem estado além das regexes: `&self` em tudo, seguro para uso
/// concorrente entre requisições.
pub struct ParameterExtractor {
    /// `20%`, `-5 %`, `12.5 percent`, `10 per cent`.
    percent_re: Regex,
    /// `45 days`, `1 day`, `30-day`.
    days_re: Regex,
    /// `Q1`..`Q4` como token isolado.
    quarter_re: Regex,
    /// `first quarter`, `4th quarter`.
    ordinal_quarter_re: Regex,
    /// `quarter` sem número, com modificador opcional.
    relative_quarter_re: Regex,
    /// Nomes de meses (exceto "may").
    month_re: Regex,
    /// `May` com maiúscula.
    may_re: Regex,
    /// `month 12`.
    month_number_re: Regex,
    /// `holiday`, `holidays`.
    holiday_re: Regex,
}

impl ParameterExtractor {
    /// Cria um novo extrator com regexes compiladas.
    pub fn new() -> Self {
        let month_alternation = MONTH_NAMES
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|");

        Self {
            // O sinal só vale fora de faixas: em "10-20%" o hífen separa números
            percent_re: Regex::new(
                r"(?i)(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*(?:%|percent\b|per\s+cent\b)",
            )
            .expect("invalid regex"),
            days_re: Regex::new(r"(?i)\b(\d+)\s*-?\s*days?\b").expect("invalid regex"),
            quarter_re: Regex::new(r"(?i)(?:\b|\d)q([1-4])\b").expect("invalid regex"),
            ordinal_quarter_re: Regex::new(
                r"(?i)\b(first|second|third|fourth|1st|2nd|3rd|4th)\s+quarter\b",
            )
            .expect("invalid regex"),
            relative_quarter_re: Regex::new(
                r"(?i)\b(?:(this|current|next|upcoming|coming|last|previous)\s+)?quarters?\b",
            )
            .expect("invalid regex"),
            month_re: Regex::new(&format!(r"(?i)\b({})\b", month_alternation))
                .expect("invalid regex"),
            may_re: Regex::new(r"\bMay\b").expect("invalid regex"),
            month_number_re: Regex::new(r"(?i)\bmonth\s+(1[0-2]|0?[1-9])\b")
                .expect("invalid regex"),
            holiday_re: Regex::new(r"(?i)\bholidays?\b").expect("invalid regex"),
        }
    }

    /// Extrai parâmetros usando a data local de hoje para termos relativos.
    pub fn extract(&self, question: &str) -> ParameterSet {
        self.extract_at(question, chrono::Local::now().date_naive())
    }

    /// Extrai parâmetros relativos a uma data de referência.
    ///
    /// Função pura de `(question, today)`, é esta a variante usada nos testes.
    pub fn extract_at(&self, question: &str, today: NaiveDate) -> ParameterSet {
        let mut params = ParameterSet {
            surge_pct: self.percentage(question),
            days: self.days(question),
            ..Default::default()
        };

        let named = self.named_months(question);
        if named.len() == 1 {
            params.target_month = named.first().copied();
        }

        if let Some(quarter) = self.explicit_quarter(question) {
            params.quarter = Some(quarter);
            params.months = quarter.months().into_iter().collect();
            return params;
        }

        let mut months: BTreeSet<u32> = named.into_iter().collect();
        if self.holiday_re.is_match(question) {
            months.extend(HOLIDAY_MONTHS);
        }

        if months.is_empty() {
            if let Some(quarter) = self.relative_quarter(question, today) {
                params.quarter = Some(quarter);
                months.extend(quarter.months());
            }
        }

        params.months = months;
        params
    }

    /// Primeiro percentual do texto, como fração. Sem agregação.
    fn percentage(&self, text: &str) -> Option<f64> {
        let caps = self.percent_re.captures(text)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        let fraction = value / 100.0;
        // Uma queda não passa de -100%
        fraction.is_finite().then(|| fraction.max(-1.0))
    }

    /// Primeira contagem de dias positiva. Sem teto, quem consome faz o clamp.
    fn days(&self, text: &str) -> Option<u32> {
        self.days_re
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .find(|d| *d > 0)
    }

    /// Trimestre explícito que aparece primeiro no texto.
    fn explicit_quarter(&self, text: &str) -> Option<Quarter> {
        let numbered = self.quarter_re.captures(text).and_then(|caps| {
            let m = caps.get(1)?;
            let n: u32 = m.as_str().parse().ok()?;
            Some((m.start(), Quarter::from_number(n)?))
        });

        let ordinal = self.ordinal_quarter_re.captures(text).and_then(|caps| {
            let m = caps.get(1)?;
            let n = match m.as_str().to_lowercase().as_str() {
                "first" | "1st" => 1,
                "second" | "2nd" => 2,
                "third" | "3rd" => 3,
                _ => 4,
            };
            Some((m.start(), Quarter::from_number(n)?))
        });

        match (numbered, ordinal) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a.1 } else { b.1 }),
            (Some(a), None) => Some(a.1),
            (None, Some(b)) => Some(b.1),
            (None, None) => None,
        }
    }

    /// "quarter" sem número, resolvido contra a data de referência.
    ///
    /// - "this"/"current" → trimestre corrente
    /// - "last"/"previous" → trimestre anterior
    /// - sem modificador, "next", "upcoming", "coming" → próximo trimestre
    fn relative_quarter(&self, text: &str, today: NaiveDate) -> Option<Quarter> {
        let caps = self.relative_quarter_re.captures(text)?;
        let current = Quarter::containing(today);
        let modifier = caps.get(1).map(|m| m.as_str().to_lowercase());
        Some(match modifier.as_deref() {
            Some("this") | Some("current") => current,
            Some("last") | Some("previous") => current.previous(),
            _ => current.next(),
        })
    }

    /// Meses nomeados, distintos, na ordem em que aparecem.
    fn named_months(&self, text: &str) -> Vec<u32> {
        let mut found: Vec<(usize, u32)> = Vec::new();

        for m in self.month_re.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            if let Some((_, month)) = MONTH_NAMES.iter().find(|(name, _)| *name == lower) {
                found.push((m.start(), *month));
            }
        }
        for m in self.may_re.find_iter(text) {
            found.push((m.start(), 5));
        }
        for caps in self.month_number_re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                if let Ok(month) = m.as_str().parse::<u32>() {
                    found.push((m.start(), month));
                }
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        let mut months = Vec::new();
        for (_, month) in found {
            if !months.contains(&month) {
                months.push(month);
            }
        }
        months
    }
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        Self::new()
    }
}
