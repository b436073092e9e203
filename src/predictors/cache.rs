//! Cache read-through de resultados.
//!
//! Chave = [`PredictorInput`] completo (inclui a data de referência e o
//! `surge_pct` vindo do usuário), então o espaço de chaves não é finito:
//! o cache é um LRU de capacidade fixa. Os artefatos nunca mudam depois
//! da carga, então uma entrada só sai por despejo. Só resultados `Ok`
//! são guardados.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::{Predictor, PredictorId, PredictorInput};
use crate::core::PredictionResult;
use crate::error::PredictorError;

/// Entradas por predictor.
pub const CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(size) => size,
    None => panic!("capacidade do cache precisa ser positiva"),
};

/// Envolve um predictor com cache de resultados.
pub struct CachedPredictor<P> {
    inner: P,
    // `LruCache::get` atualiza a ordem de uso, por isso Mutex e não RwLock
    cache: Mutex<LruCache<PredictorInput, PredictionResult>>,
}

impl<P: Predictor> CachedPredictor<P> {
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Quantidade de entradas em cache.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<P: Predictor> Predictor for CachedPredictor<P> {
    fn id(&self) -> PredictorId {
        self.inner.id()
    }

    fn predict(&self, input: &PredictorInput) -> Result<PredictionResult, PredictorError> {
        if let Some(hit) = self.cache.lock().get(input) {
            tracing::debug!(predictor = %self.id(), "cache hit");
            return Ok(hit.clone());
        }

        // Predição fora do lock; duas requisições podem calcular a mesma chave
        let result = self.inner.predict(input)?;
        self.cache.lock().put(input.clone(), result.clone());
        Ok(result)
    }
}
