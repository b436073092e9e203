//! # Estado da Aplicação Web
//!
//! Estado compartilhado entre todos os handlers Axum. Tudo aqui é
//! imutável depois do startup: o orquestrador é `Send + Sync` e os
//! artefatos nunca são recarregados, então basta um `Arc`.
//!
//! ```text
//! main()
//!   ├── PredictorRegistry::load (spawn_blocking)
//!   ├── IntentResolver (remoto opcional + keywords)
//!   └── AppState { orchestrator } ──► Router ──► handlers
//! ```

use std::sync::Arc;

use crate::orchestrator::ChatOrchestrator;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: ChatOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
