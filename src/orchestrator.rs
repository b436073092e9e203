//! # Orquestrador de Chat
//!
//! O [`ChatOrchestrator`] é o ponto de entrada do núcleo: recebe a
//! pergunta crua e devolve a [`ChatResponse`] completa.
//!
//! ## Máquina de Estados
//!
//! ```text
//! RECEIVED → PARAMS_EXTRACTED → INTENT_RESOLVED → PREDICTED → ASSEMBLED → RESPONDED
//!     │                                              │            │
//!     └── pergunta vazia ──► FAILED (Err)            └────────────┴──► FAILED
//!                                                     nenhum modelo     erro de
//!                                                     carregado         montagem
//! ```
//!
//! As transições são sequenciais e nenhuma é pulada; `General` passa por
//! `PREDICTED` sem invocar predictor. Cada transição sai no log em `debug`.
//!
//! ## Degradação
//!
//! | Situação | Resposta |
//! |----------|----------|
//! | Pergunta vazia | `Err(ChatError::InvalidQuestion)` |
//! | NLU remoto falhou | keywords decidem, resposta normal |
//! | Predictor do intent indisponível | intent mantido, **um** insight `unavailable` |
//! | Nenhum predictor carregado | `FAILED` → resposta `General` com insight de erro |
//! | Falha na montagem | `FAILED` → resposta `General` com pedido de desculpas |
//!
//! O orquestrador não guarda estado entre requisições: tudo que é criado
//! em [`ChatOrchestrator::handle`] morre com a resposta.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};

use crate::assembler::InsightAssembler;
use crate::core::{ChatResponse, Insight, Intent, ParameterSet};
use crate::error::ChatError;
use crate::nlu::{normalize_question, IntentResolver, ParameterExtractor};
use crate::predictors::PredictorRegistry;

/// Estados de uma requisição.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    ParamsExtracted,
    IntentResolved,
    Predicted,
    Assembled,
    Responded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "RECEIVED",
            Stage::ParamsExtracted => "PARAMS_EXTRACTED",
            Stage::IntentResolved => "INTENT_RESOLVED",
            Stage::Predicted => "PREDICTED",
            Stage::Assembled => "ASSEMBLED",
            Stage::Responded => "RESPONDED",
            Stage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Caminho percorrido por uma requisição.
struct Progress {
    path: Vec<Stage>,
}

impl Progress {
    fn start() -> Self {
        tracing::debug!(stage = %Stage::Received, "requisição recebida");
        Self {
            path: vec![Stage::Received],
        }
    }

    fn stage(&self) -> Stage {
        self.path.last().copied().unwrap_or(Stage::Received)
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage(), to = %next, "transição");
        self.path.push(next);
    }
}

/// Resultado da etapa de predição + montagem.
enum Outcome {
    Insights(Vec<Insight>),
    Failed(Insight),
}

/// Ponto de entrada do núcleo.
///
/// `Send + Sync`: uma instância é compartilhada via `Arc` por todos os
/// handlers web.
pub struct ChatOrchestrator {
    extractor: ParameterExtractor,
    resolver: IntentResolver,
    registry: Arc<PredictorRegistry>,
    assembler: InsightAssembler,
}

impl ChatOrchestrator {
    pub fn new(resolver: IntentResolver, registry: Arc<PredictorRegistry>) -> Self {
        Self {
            extractor: ParameterExtractor::new(),
            resolver,
            registry,
            assembler: InsightAssembler::new(),
        }
    }

    pub fn registry(&self) -> &PredictorRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    /// Responde uma pergunta agora.
    pub async fn handle(&self, question: &str) -> Result<ChatResponse, ChatError> {
        self.handle_at(question, Utc::now()).await
    }

    /// Responde uma pergunta num instante fixo.
    ///
    /// A data UTC de `now` é a referência para termos relativos
    /// ("this quarter") e para o horizonte dos predictors.
    ///
    /// # Erros
    ///
    /// Só [`ChatError::InvalidQuestion`]. Qualquer outra falha vira uma
    /// resposta degradada.
    pub async fn handle_at(&self, question: &str, now: DateTime<Utc>) -> Result<ChatResponse, ChatError> {
        self.run(question, now).await.0
    }

    /// Executa a máquina de estados, devolvendo também o caminho percorrido.
    async fn run(&self, question: &str, now: DateTime<Utc>) -> (Result<ChatResponse, ChatError>, Vec<Stage>) {
        let started = Instant::now();
        let mut progress = Progress::start();

        let question = normalize_question(question);
        if question.is_empty() {
            progress.advance(Stage::Failed);
            return (Err(ChatError::InvalidQuestion), progress.path);
        }

        let today = now.date_naive();
        let params = self.extractor.extract_at(&question, today);
        progress.advance(Stage::ParamsExtracted);

        let resolution = self.resolver.resolve_detailed(&question).await;
        let intent = resolution.intent;
        progress.advance(Stage::IntentResolved);

        let response = match self.predict_and_assemble(intent, &params, today, &mut progress) {
            Outcome::Insights(insights) => ChatResponse {
                question,
                intent,
                params,
                insights,
                timestamp: now,
            },
            Outcome::Failed(insight) => ChatResponse {
                question,
                intent: Intent::General,
                params,
                insights: vec![insight],
                timestamp: now,
            },
        };
        if progress.stage() != Stage::Failed {
            progress.advance(Stage::Responded);
        }

        tracing::info!(
            intent = %response.intent,
            source = ?resolution.source,
            insights = response.insights.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pergunta respondida"
        );
        (Ok(response), progress.path)
    }

    fn predict_and_assemble(
        &self,
        intent: Intent,
        params: &ParameterSet,
        today: NaiveDate,
        progress: &mut Progress,
    ) -> Outcome {
        let Some(prediction) = self.registry.predict(intent, params, today) else {
            // General: sem predictor
            progress.advance(Stage::Predicted);
            progress.advance(Stage::Assembled);
            return Outcome::Insights(vec![self.assembler.help()]);
        };

        let result = match prediction {
            Ok(result) => result,
            Err(e) if !self.registry.any_loaded() => {
                tracing::warn!(error = %e, "nenhum predictor carregado");
                progress.advance(Stage::Failed);
                return Outcome::Failed(self.assembler.outage());
            }
            Err(e) => {
                tracing::warn!(predictor = e.predictor(), error = %e, "predictor falhou, resposta degradada");
                progress.advance(Stage::Predicted);
                progress.advance(Stage::Assembled);
                return Outcome::Insights(vec![self.assembler.unavailable(intent, &e)]);
            }
        };
        progress.advance(Stage::Predicted);

        match self.assembler.assemble(intent, params, &result) {
            Ok(insights) => {
                progress.advance(Stage::Assembled);
                Outcome::Insights(insights)
            }
            Err(e) => {
                tracing::warn!(error = %e, "falha ao montar insights");
                progress.advance(Stage::Failed);
                Outcome::Failed(self.assembler.apology())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InsightKind, PredictionResult};
    use crate::error::{ClassificationError, PredictorError};
    use crate::nlu::IntentClassifier;
    use crate::predictors::{Predictor, PredictorId, PredictorInput};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn bundled_models() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models")
    }

    fn orchestrator_with(registry: PredictorRegistry) -> ChatOrchestrator {
        ChatOrchestrator::new(IntentResolver::keywords_only(), Arc::new(registry))
    }

    fn bundled() -> ChatOrchestrator {
        orchestrator_with(PredictorRegistry::load(&bundled_models()))
    }

    #[tokio::test]
    async fn q4_demand_question() {
        let r = bundled().handle_at("What will Q4 demand look like?", now()).await.unwrap();
        assert_eq!(r.intent, Intent::Forecast);
        assert_eq!(r.params.months.iter().copied().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert!(r.insights.iter().any(|i| i.intent == Intent::Forecast));
        assert_eq!(r.insights[0].kind, InsightKind::Headline);
        assert_eq!(r.timestamp, now());
    }

    #[tokio::test]
    async fn surge_question_is_inventory() {
        let r = bundled()
            .handle_at("If demand increases by 20%, what stock adjustments are needed?", now())
            .await
            .unwrap();
        assert_eq!(r.intent, Intent::Inventory);
        assert_eq!(r.params.surge_pct, Some(0.20));
        assert!(r.insights.iter().all(|i| i.intent == Intent::Inventory));
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let o = bundled();
        for q in ["", "   ", "\n\t"] {
            let (result, path) = o.run(q, now()).await;
            assert_eq!(result.unwrap_err(), ChatError::InvalidQuestion);
            assert_eq!(path, vec![Stage::Received, Stage::Failed]);
        }
    }

    #[tokio::test]
    async fn happy_path_visits_every_stage() {
        let (result, path) = bundled().run("Which couriers are late?", now()).await;
        assert!(result.is_ok());
        assert_eq!(
            path,
            vec![
                Stage::Received,
                Stage::ParamsExtracted,
                Stage::IntentResolved,
                Stage::Predicted,
                Stage::Assembled,
                Stage::Responded,
            ]
        );
    }

    #[tokio::test]
    async fn general_question_gets_help() {
        let r = bundled().handle_at("hello there", now()).await.unwrap();
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.insights.len(), 1);
        assert_eq!(r.insights[0].kind, InsightKind::Help);
    }

    #[tokio::test]
    async fn missing_forecast_model_degrades() {
        let dir = tempfile::tempdir().unwrap();
        for id in PredictorId::ALL {
            if id != PredictorId::Seasonal {
                std::fs::copy(bundled_models().join(id.file_name()), dir.path().join(id.file_name())).unwrap();
            }
        }
        let o = orchestrator_with(PredictorRegistry::load(dir.path()));

        let r = o.handle_at("What will Q4 demand look like?", now()).await.unwrap();
        assert_eq!(r.intent, Intent::Forecast);
        assert_eq!(r.insights.len(), 1);
        assert_eq!(r.insights[0].kind, InsightKind::Unavailable);
        assert_eq!(r.insights[0].intent, Intent::Forecast);

        // Os outros intents seguem normais
        let r = o.handle_at("Which warehouse is least efficient?", now()).await.unwrap();
        assert_eq!(r.intent, Intent::Warehouse);
        assert_eq!(r.insights[0].kind, InsightKind::Headline);
    }

    #[tokio::test]
    async fn no_models_at_all_fails_to_general() {
        let o = orchestrator_with(PredictorRegistry::from_predictors(vec![]));
        let (result, path) = o.run("What will Q4 demand look like?", now()).await;
        let r = result.unwrap();
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.insights.len(), 1);
        assert_eq!(r.insights[0].kind, InsightKind::Error);
        assert_eq!(path.last(), Some(&Stage::Failed));
    }

    /// Predictor que devolve um resultado sem métricas.
    struct Hollow;

    impl Predictor for Hollow {
        fn id(&self) -> PredictorId {
            PredictorId::Transport
        }

        fn predict(&self, _input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
            Ok(PredictionResult::new("transport"))
        }
    }

    #[tokio::test]
    async fn assembly_failure_becomes_apology() {
        let o = orchestrator_with(PredictorRegistry::from_predictors(vec![Arc::new(Hollow)]));
        let r = o.handle_at("Which couriers are late?", now()).await.unwrap();
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.insights.len(), 1);
        assert_eq!(r.insights[0].kind, InsightKind::Error);
        assert!(r.insights[0].text.starts_with("**Sorry"));
    }

    struct Broken;

    #[async_trait]
    impl IntentClassifier for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn classify(&self, _question: &str) -> Result<Intent, ClassificationError> {
            Err(ClassificationError::Error("garbage".into()))
        }
    }

    #[tokio::test]
    async fn failing_remote_falls_back_to_keywords() {
        let resolver = IntentResolver::new(Some(Arc::new(Broken)), Duration::from_millis(100));
        let o = ChatOrchestrator::new(resolver, Arc::new(PredictorRegistry::load(&bundled_models())));
        let r = o.handle_at("What will Q4 demand look like?", now()).await.unwrap();
        assert_eq!(r.intent, Intent::Forecast);
    }

    #[tokio::test]
    async fn never_fails_for_non_empty_input() {
        let o = bundled();
        let inputs = [
            "?",
            "%%%",
            "0%",
            "-100% demand",
            "999999999999999999999%",
            "forecast for 100000 days",
            "Q9 quarter of the month 13",
            "café ☕ reviews",
            "stock stock stock warehouse warehouse",
            "delivery in december holidays for the next quarter",
        ];
        for q in inputs {
            let r = o.handle_at(q, now()).await;
            assert!(r.is_ok(), "{q}");
            assert!(!r.unwrap().insights.is_empty(), "{q}");
        }
    }

    #[tokio::test]
    async fn question_is_trimmed_in_response() {
        let r = bundled().handle_at("  How are customer reviews trending?  ", now()).await.unwrap();
        assert_eq!(r.question, "How are customer reviews trending?");
        assert_eq!(r.intent, Intent::Sentiment);
    }
}
