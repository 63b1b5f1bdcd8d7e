use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::error::ServiceError;
use crate::domain::{ArticleService, QuickSearchHit};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_LIMIT: u32 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Results(Vec<QuickSearchHit>),
    /// the term was blank, any shown results should be cleared
    Cleared,
    /// a newer query was issued while this one was pending
    Superseded,
}

/// Debounced title search where only the most recently issued query may
/// deliver results.
#[derive(Clone, Debug)]
pub struct QuickSearch<S: ArticleService> {
    service: S,
    debounce: Duration,
    limit: u32,
    generation: Arc<AtomicU64>,
}

impl<S: ArticleService> QuickSearch<S> {
    pub fn new(service: S, debounce: Duration, limit: u32) -> Self {
        Self {
            service,
            debounce,
            limit: limit.max(1),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn query(&self, term: &str) -> Result<SearchOutcome, ServiceError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchOutcome::Cleared);
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(generation) {
            tracing::trace!("quick search for '{}' superseded before dispatch", term);
            return Ok(SearchOutcome::Superseded);
        }

        let result = self.service.quick_search(term, self.limit).await;
        if !self.is_current(generation) {
            tracing::debug!("dropping stale quick search answer for '{}'", term);
            return Ok(SearchOutcome::Superseded);
        }
        result.map(SearchOutcome::Results)
    }
}
