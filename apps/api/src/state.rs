use std::sync::Arc;

use crate::config::Config;
use crate::conversation::orchestrator::Orchestrator;
use crate::conversation::store::ConversationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Drives conversation turns. Holds the pluggable slot interpreter.
    pub orchestrator: Arc<Orchestrator>,
    /// In-memory conversations; nothing is persisted.
    pub conversations: ConversationStore,
    pub config: Config,
}
