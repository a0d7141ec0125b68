use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Explorer queries
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-query generation settings.
///
/// Sampling temperature is deliberately absent: explorer queries always run
/// at 1.0.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExplorerConfig {
    /// Model override. When `None`, the provider's `default_model` is used.
    #[serde(default)]
    pub model: Option<String>,
    /// Cap on generated tokens. When `None`, the provider chooses.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}
