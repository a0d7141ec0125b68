use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::tool::ToolCall;

/// A boxed async stream, used for LLM streaming responses.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;

/// One incrementally delivered piece of a streamed generation
/// (provider-agnostic).
///
/// A chunk may carry any number of structured calls, a narrative text
/// fragment, or neither (e.g. a trailing chunk that only reports the
/// finish reason).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chunk {
    /// Structured calls completed in this chunk, in emission order.
    pub calls: Vec<ToolCall>,
    /// Narrative text fragment, if the chunk carried any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on the final chunk when the provider reports why it stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Chunk {
    /// A chunk carrying only a text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A chunk carrying only structured calls.
    pub fn calls(calls: Vec<ToolCall>) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.text.as_deref().map_or(true, str::is_empty)
    }
}

/// Token usage for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
