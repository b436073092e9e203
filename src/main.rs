//! # Supply Insight — Chat de Supply Chain
//!
//! **Ponto de entrada** do serviço. Recebe perguntas em linguagem natural
//! sobre a operação (demanda, estoque, transportadoras, avaliações,
//! armazéns) e responde com insights montados a partir de predictors
//! pré-treinados.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Carrega .env (opcional) e AppConfig
//!   ├── Configura tracing/logging
//!   ├── Carrega artefatos dos predictors (spawn_blocking, uma única vez)
//!   ├── Monta IntentResolver (NLU remoto opcional + keywords)
//!   ├── Monta ChatOrchestrator → AppState → Router
//!   └── Inicia servidor TCP
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Logs detalhados, incluindo as transições do orquestrador
//! RUST_LOG=debug cargo run
//!
//! curl -s localhost:5000/chat -H 'content-type: application/json' \
//!      -d '{"question": "What will Q4 demand look like?"}'
//! ```

/// Módulo `assembler` — transforma resultados de predictors em insights.
mod assembler;

/// Módulo `config` — configuração via variáveis de ambiente.
mod config;

/// Módulo `core` — tipos fundamentais: Intent, ParameterSet, Insight, ChatResponse.
mod core;

/// Módulo `error` — taxonomia de erros tipados.
mod error;

/// Módulo `nlu` — extração de parâmetros e classificação de intent.
mod nlu;

/// Módulo `orchestrator` — máquina de estados de uma pergunta.
mod orchestrator;

/// Módulo `predictors` — artefatos, predictors e o registro intent → predictor.
mod predictors;

/// Módulo `web` — servidor axum e handlers HTTP.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::nlu::{IntentClassifier, IntentResolver, RemoteIntentClassifier};
use crate::orchestrator::ChatOrchestrator;
use crate::predictors::PredictorRegistry;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env é opcional
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("📦 Supply Insight — Starting...");

    let config = AppConfig::from_env().context("Configuração inválida")?;

    // Leitura e validação dos artefatos é bloqueante
    let models_dir = config.models_dir.clone();
    let registry = tokio::task::spawn_blocking(move || PredictorRegistry::load(&models_dir))
        .await
        .context("Falha ao carregar os predictors")?;

    if registry.any_loaded() {
        tracing::info!(models = ?registry.models_loaded(), "predictors prontos");
    } else {
        tracing::error!(
            dir = %config.models_dir.display(),
            "nenhum predictor carregado, as perguntas receberão resposta de indisponibilidade"
        );
    }

    let client = reqwest::Client::builder()
        .build()
        .context("Falha ao criar o cliente HTTP")?;
    let remote = RemoteIntentClassifier::new(&config.nlu, client);
    let remote: Option<Arc<dyn IntentClassifier>> = if remote.is_configured() {
        Some(Arc::new(remote))
    } else {
        None
    };
    let resolver = IntentResolver::new(remote, config.nlu.timeout);

    let orchestrator = ChatOrchestrator::new(resolver, Arc::new(registry));
    let app = web::create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Falha ao abrir {}", config.bind_addr))?;
    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
