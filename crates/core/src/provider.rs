//! ChatProvider trait — the abstraction over LLM backends.
//!
//! A provider adapter knows how to translate the internal
//! `system/user/assistant/tool` message model into one backend's wire
//! protocol and back, hiding two structurally different protocols behind
//! a single contract. The agent loop calls `invoke()` and `stream()`
//! without knowing which backend is configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::ChatMessage;
use crate::tool::ToolCall;

/// Which function-schema dialect a backend speaks.
///
/// Resolved once per session from configuration; the agent loop never
/// branches on it beyond asking the registry for a schema projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Request/response family: `choices[0].message`, SSE `data:` lines.
    OpenAi,
    /// Turn/parts family: `contents[]`, `candidates[0].content.parts[]`.
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("unknown provider '{other}' (expected 'openai' or 'gemini')")),
        }
    }
}

/// How the backend should decide about tool use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
    Required,
}

/// Options for a single `invoke` call.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    /// Tool schemas, already projected into this provider's dialect by
    /// `ToolRegistry::schemas_for`.
    pub tools: Vec<serde_json::Value>,

    /// Tool choice mode (only sent when tools are present).
    pub tool_choice: ToolChoice,
}

/// A complete (non-streaming) response from a provider.
///
/// Exactly one of "has tool calls" or "has final content" drives the
/// agent loop's branch decision each step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Flat text content — the concatenation of all textual parts.
    pub content: String,

    /// Tool calls requested by the model, in request order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A single fragment of a streaming response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Partial text, when this fragment carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The core provider trait.
///
/// `stream` yields a finite, non-restartable sequence of text fragments
/// over a channel; consumer suspension occurs only at "await next fragment".
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// The schema dialect this provider expects from the tool registry.
    fn kind(&self) -> ProviderKind;

    /// Send the conversation and get a complete response.
    async fn invoke(
        &self,
        messages: &[ChatMessage],
        options: &InvokeOptions,
    ) -> std::result::Result<ChatResponse, ProviderError>;

    /// Send the conversation and get a stream of text fragments.
    async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamDelta, ProviderError>>,
        ProviderError,
    >;
}
