use std::sync::Arc;

use crate::advisor_client::AdviceGenerator;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Advice backend. `GeminiClient` in production, a fake in tests.
    pub advisor: Arc<dyn AdviceGenerator>,
}
