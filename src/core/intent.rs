//! # Intenção da Pergunta
//!
//! O [`Intent`] é a categoria grossa da pergunta de supply chain. O conjunto
//! é **fechado**: tanto o classificador por keywords quanto o classificador
//! remoto devolvem sempre um destes seis rótulos.
//!
//! | Intent | Predictor | Exemplo |
//! |--------|-----------|---------|
//! | [`Forecast`](Intent::Forecast) | `seasonal` | "What will Q4 demand look like?" |
//! | [`Inventory`](Intent::Inventory) | `orders` | "What stock adjustments are needed?" |
//! | [`Shipping`](Intent::Shipping) | `transport` | "Which couriers cause delays?" |
//! | [`Sentiment`](Intent::Sentiment) | `sentiment` | "How are reviews trending?" |
//! | [`Warehouse`](Intent::Warehouse) | `warehouse` | "How efficient is processing?" |
//! | [`General`](Intent::General) | — | "hello" |
//!
//! No JSON o intent é serializado em minúsculas (`"forecast"`), o mesmo
//! formato que o frontend do dashboard já consome.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categoria de uma pergunta, imutável depois de resolvida.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Previsão de demanda, tendências, trimestres.
    Forecast,
    /// Níveis de estoque, ajustes, rupturas.
    Inventory,
    /// Entregas, couriers, atrasos.
    Shipping,
    /// Reviews e satisfação de clientes.
    Sentiment,
    /// Operação e eficiência de armazéns.
    Warehouse,
    /// Catch-all quando nada mais se aplica.
    General,
}

impl Intent {
    /// Todos os rótulos, na ordem de prioridade de negócio.
    ///
    /// A ordem importa: é o critério de desempate do classificador por
    /// keywords (`Forecast > Inventory > Shipping > Sentiment > Warehouse`).
    pub const ALL: [Intent; 6] = [
        Intent::Forecast,
        Intent::Inventory,
        Intent::Shipping,
        Intent::Sentiment,
        Intent::Warehouse,
        Intent::General,
    ];

    /// Rótulo em minúsculas, usado no JSON e no prompt do NLU remoto.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Forecast => "forecast",
            Intent::Inventory => "inventory",
            Intent::Shipping => "shipping",
            Intent::Sentiment => "sentiment",
            Intent::Warehouse => "warehouse",
            Intent::General => "general",
        }
    }

    /// Nome da capacidade em inglês, para textos exibidos ao usuário.
    pub fn capability(&self) -> &'static str {
        match self {
            Intent::Forecast => "demand forecasting",
            Intent::Inventory => "inventory planning",
            Intent::Shipping => "shipping analysis",
            Intent::Sentiment => "customer sentiment analysis",
            Intent::Warehouse => "warehouse efficiency analysis",
            Intent::General => "general help",
        }
    }

    /// Todos os rótulos separados por vírgula (para prompts).
    pub fn label_list() -> String {
        Intent::ALL
            .iter()
            .map(|i| i.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rótulo fora do conjunto fechado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rótulo de intent desconhecido: '{}'", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    /// Aceita o rótulo com qualquer caixa e espaços/pontuação nas bordas
    /// (`" FORECAST."` → `Forecast`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.label() == cleaned)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}
