use crate::llm_client::LlmClient;
use crate::store::SharedStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one application store for this process. Lock, do one operation, release;
    /// never hold it across an LLM or PDF call.
    pub store: SharedStore,
    pub llm: LlmClient,
}
