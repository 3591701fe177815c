use std::sync::Arc;

use crate::config::Config;
use crate::document::store::DocumentStore;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Ephemeral document store. Default: in-memory map with 24h retention.
    /// Swap for a TTL-capable cache when deploying more than one instance.
    pub store: Arc<dyn DocumentStore>,
    /// Pluggable completion backend. Default: the Anthropic Messages API.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
