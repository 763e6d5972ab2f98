//! The optional external search collaborator consumed by the narrative
//! scorer's freshness probe (spec §6.3, §4.C.3). Guarded by
//! `PipelineConfig::enable_external_search`; most runs never touch it.

use async_trait::async_trait;
use hypecycle_core::PipelineError;

/// "Given a query phrase and a recency window, return an approximate count
/// of relevant results" (spec §6.3).
#[async_trait]
pub trait ExternalSearchProvider: Send + Sync {
    async fn recent_count(&self, query: &str, window_days: i64) -> Result<u64, PipelineError>;
}

/// Default collaborator when `enable_external_search` is false: always
/// reports zero recent results so the freshness probe's "disabled" branch
/// is exercised uniformly regardless of wiring.
pub struct NullExternalSearch;

#[async_trait]
impl ExternalSearchProvider for NullExternalSearch {
    async fn recent_count(&self, _query: &str, _window_days: i64) -> Result<u64, PipelineError> {
        Ok(0)
    }
}
