use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextCompleter;
use crate::pricing::policy::PricingPolicy;
use crate::pricing::rate_lookup::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Completion backend. Default: `LlmClient`.
    pub llm: Arc<dyn TextCompleter>,
    /// Profile reads for rate lookup. Default: `PgProfileStore` over `db`.
    pub profiles: Arc<dyn ProfileStore>,
    pub policy: Arc<PricingPolicy>,
    pub config: Config,
}
