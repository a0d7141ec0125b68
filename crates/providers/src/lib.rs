pub mod google;
pub mod traits;
pub(crate) mod sse;
pub(crate) mod util;

// Re-exports for convenience.
pub use google::GoogleProvider;
pub use traits::{ChatRequest, LlmProvider};
pub use util::resolve_api_key;

use mx_domain::config::{ProviderConfig, ProviderKind};
use mx_domain::error::Result;
use std::sync::Arc;

/// Instantiate the adapter selected by `cfg.kind`.
pub fn from_config(cfg: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match cfg.kind {
        ProviderKind::Google => Arc::new(GoogleProvider::from_config(cfg)?),
    };
    tracing::info!(provider_id = %cfg.id, kind = ?cfg.kind, "registered LLM provider");
    Ok(provider)
}
