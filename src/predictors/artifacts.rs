//! # Artefatos de Modelo
//!
//! Cada família de modelo é um arquivo JSON no diretório de modelos,
//! lido **uma única vez** na inicialização. Depois de desserializado o
//! artefato passa por [`Artifact::validate`]; um artefato inválido conta
//! como não carregado e o predictor fica indisponível.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Artefato JSON de um modelo.
pub trait Artifact: DeserializeOwned {
    /// Checa invariantes que o formato JSON não expressa.
    fn validate(&self) -> Result<()>;
}

/// Lê, desserializa e valida um artefato.
///
/// # Erros
///
/// Arquivo ausente, JSON inválido ou falha de validação, sempre com o
/// caminho no contexto.
pub fn load_artifact<T: Artifact>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let artifact: T = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    artifact
        .validate()
        .with_context(|| format!("Artefato inválido em {}", path.display()))?;
    Ok(artifact)
}
