//! # Configuração
//!
//! Toda a configuração vem de variáveis de ambiente (um `.env` na raiz é
//! carregado por `main` via `dotenv`). Nenhuma é obrigatória.
//!
//! | Variável | Default | Uso |
//! |----------|---------|-----|
//! | `INSIGHT_BIND_ADDR` | `0.0.0.0:5000` | endereço do servidor HTTP |
//! | `INSIGHT_MODELS_DIR` | `models` | diretório dos artefatos dos predictors |
//! | `NLU_ENABLED` | `true` | liga/desliga o classificador remoto |
//! | `NLU_API_KEY` / `GEMINI_API_KEY` | — | credencial do classificador remoto |
//! | `NLU_API_BASE` | endpoint OpenAI-compatível do Gemini | URL base |
//! | `NLU_MODEL` | `gemini-2.0-flash` | modelo usado na classificação |
//! | `NLU_TIMEOUT_MS` | `500` | espera máxima pela classificação remota |
//!
//! O parsing recebe uma função de lookup em vez de ler `std::env`
//! diretamente, assim os testes não mexem no ambiente do processo.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MODELS_DIR: &str = "models";
pub const DEFAULT_NLU_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_NLU_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_NLU_TIMEOUT_MS: u64 = 500;

/// Configuração do classificador remoto.
#[derive(Clone, Debug, PartialEq)]
pub struct NluConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            api_base: DEFAULT_NLU_API_BASE.to_string(),
            model: DEFAULT_NLU_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_NLU_TIMEOUT_MS),
        }
    }
}

/// Configuração completa da aplicação.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub models_dir: PathBuf,
    pub nlu: NluConfig,
}

impl AppConfig {
    /// Lê do ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê de uma função de lookup arbitrária. Valores vazios contam como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("INSIGHT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "INSIGHT_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let models_dir = PathBuf::from(
            get("INSIGHT_MODELS_DIR").unwrap_or_else(|| DEFAULT_MODELS_DIR.to_string()),
        );

        let enabled = match get("NLU_ENABLED") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                var: "NLU_ENABLED",
                value: raw,
            })?,
        };

        let timeout = match get("NLU_TIMEOUT_MS") {
            None => Duration::from_millis(DEFAULT_NLU_TIMEOUT_MS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "NLU_TIMEOUT_MS",
                        value: raw,
                    })
                }
            },
        };

        let nlu = NluConfig {
            enabled,
            api_key: get("NLU_API_KEY").or_else(|| get("GEMINI_API_KEY")),
            api_base: get("NLU_API_BASE").unwrap_or_else(|| DEFAULT_NLU_API_BASE.to_string()),
            model: get("NLU_MODEL").unwrap_or_else(|| DEFAULT_NLU_MODEL.to_string()),
            timeout,
        };

        Ok(Self {
            bind_addr,
            models_dir,
            nlu,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
