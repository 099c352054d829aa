use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ClientFactory;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    /// Builds a key-bound chat client per analysis. Swapped for a stub in tests.
    pub llm: Arc<dyn ClientFactory>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn ClientFactory>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            llm,
            config,
        }
    }
}
