//! Gemini adapter — the turn/parts wire-protocol family.
//!
//! This backend has no native "system" turn and no native "tool" result
//! turn, so both are simulated:
//! - a system message becomes a synthetic two-turn pair: the instruction
//!   as a user turn, followed by a fixed model acknowledgment turn;
//! - a tool result becomes a user turn carrying a `functionResponse` part
//!   tagged with the tool's name.
//!
//! The backend also never emits tool-call ids, so the adapter assigns a
//! fresh unique id to every `functionCall` part it extracts.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use arka_core::error::ProviderError;
use arka_core::message::{ChatMessage, Role};
use arka_core::provider::{ChatProvider, ChatResponse, InvokeOptions, ProviderKind, StreamDelta};
use arka_core::tool::ToolCall;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The fixed model turn that completes a simulated system instruction.
const SYSTEM_ACK: &str = "Understood.";

/// Adapter for the Gemini generateContent protocol.
pub struct GeminiProvider {
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(model, api_key, DEFAULT_BASE_URL)
    }

    /// Point the adapter at a compatible endpoint (proxies, test servers).
    pub fn with_base_url(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Translate the internal message model into the backend's two-role
    /// turn model.
    fn build_contents(messages: &[ChatMessage]) -> Vec<Content> {
        let mut contents = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => {
                    contents.push(Content::text("user", &msg.content));
                    contents.push(Content::text("model", SYSTEM_ACK));
                }
                Role::User => {
                    contents.push(Content::text("user", &msg.content));
                }
                Role::Assistant => {
                    let mut parts = Vec::new();
                    if !msg.content.is_empty() {
                        parts.push(Part {
                            text: Some(msg.content.clone()),
                            ..Part::default()
                        });
                    }
                    for tc in &msg.tool_calls {
                        parts.push(Part {
                            function_call: Some(FunctionCall {
                                name: tc.name.clone(),
                                args: Some(tc.args.clone()),
                            }),
                            ..Part::default()
                        });
                    }
                    if !parts.is_empty() {
                        contents.push(Content {
                            role: "model".into(),
                            parts,
                        });
                    }
                }
                Role::Tool => {
                    contents.push(Content {
                        role: "user".into(),
                        parts: vec![Part {
                            function_response: Some(FunctionResponse {
                                name: msg.name.clone().unwrap_or_default(),
                                response: serde_json::json!({ "result": msg.content }),
                            }),
                            ..Part::default()
                        }],
                    });
                }
            }
        }

        contents
    }

    /// Flatten a backend response envelope into the internal shape:
    /// concatenate all textual parts, collect all function calls.
    fn convert_response(api: ApiResponse) -> ChatResponse {
        let parts = api
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in parts {
            if let Some(text) = part.text {
                content.push_str(&text);
            } else if let Some(call) = part.function_call {
                if call.args.is_none() {
                    warn!(tool = %call.name, "Tool call arrived without args");
                }
                tool_calls.push(ToolCall {
                    // The backend emits no id; assign a fresh one so tool
                    // results can still be correlated.
                    id: format!("call_{}", Uuid::new_v4().simple()),
                    name: call.name,
                    args: call.args.unwrap_or_else(|| serde_json::json!({})),
                });
            }
        }

        ChatResponse {
            content,
            tool_calls,
        }
    }

    /// Extract the incremental text from one SSE `data:` payload.
    /// Returns `None` for unparsable or empty fragments.
    fn delta_text(data: &str) -> Option<String> {
        let parsed: ApiResponse = serde_json::from_str(data).ok()?;
        let parts = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)?;

        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn invoke(
        &self,
        messages: &[ChatMessage],
        options: &InvokeOptions,
    ) -> Result<ChatResponse, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut body = serde_json::json!({
            "contents": Self::build_contents(messages),
        });

        if !options.tools.is_empty() {
            body["tools"] = serde_json::json!([{
                "functionDeclarations": options.tools,
            }]);
        }

        debug!(model = %self.model, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                body: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(Self::convert_response(api_response))
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<
        tokio::sync::mpsc::Receiver<Result<StreamDelta, ProviderError>>,
        ProviderError,
    > {
        let url = format!(
            "{}/models/{}:streamGenerateContent?key={}&alt=sse",
            self.base_url, self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": Self::build_contents(messages),
        });

        debug!(model = %self.model, "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider streaming error");
            return Err(ProviderError::ApiError {
                status_code: status,
                body: error_body,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        // Same SSE framing as the other family, without a [DONE] sentinel:
        // the stream simply ends. Frame complete lines before decoding,
        // since reads can split mid-character.
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = crate::sse::LineBuffer::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                buffer.push(&bytes);

                while let Some(line) = buffer.next_line() {
                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    if let Some(data) = line.strip_prefix("data: ") {
                        match Self::delta_text(data.trim()) {
                            Some(text) => {
                                if tx.send(Ok(StreamDelta { text: Some(text) })).await.is_err() {
                                    return; // receiver dropped
                                }
                            }
                            None => {
                                trace!(data = %data, "Skipping SSE fragment without text");
                            }
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![Part {
                text: Some(text.into()),
                ..Part::default()
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(
        default,
        rename = "functionCall",
        skip_serializing_if = "Option::is_none"
    )]
    function_call: Option<FunctionCall>,

    #[serde(
        default,
        rename = "functionResponse",
        skip_serializing_if = "Option::is_none"
    )]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_becomes_two_turn_pair() {
        let contents = GeminiProvider::build_contents(&[ChatMessage::system("Be terse.")]);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text.as_deref(), Some("Be terse."));
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text.as_deref(), Some(SYSTEM_ACK));
    }

    #[test]
    fn system_pair_emitted_once_per_request() {
        // Re-serializing the same conversation must not duplicate the
        // synthetic acknowledgment: one system message, one pair.
        let messages = vec![
            ChatMessage::system("Be terse."),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let contents = GeminiProvider::build_contents(&messages);
        let acks = contents
            .iter()
            .filter(|c| c.parts[0].text.as_deref() == Some(SYSTEM_ACK))
            .count();
        assert_eq!(acks, 1);
        assert_eq!(contents.len(), 4);
    }

    #[test]
    fn tool_result_becomes_function_response_turn() {
        let msg = ChatMessage::tool_result("call_1", "read_file", "file text");
        let contents = GeminiProvider::build_contents(&[msg]);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
        let fr = contents[0].parts[0].function_response.as_ref().unwrap();
        assert_eq!(fr.name, "read_file");
        assert_eq!(fr.response["result"], "file text");
    }

    #[test]
    fn assistant_tool_calls_become_function_call_parts() {
        let msg = ChatMessage::assistant_with_calls(
            "",
            vec![ToolCall {
                id: "call_x".into(),
                name: "make_dir".into(),
                args: serde_json::json!({"path": "src"}),
            }],
        );
        let contents = GeminiProvider::build_contents(&[msg]);
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "model");
        let fc = contents[0].parts[0].function_call.as_ref().unwrap();
        assert_eq!(fc.name, "make_dir");
        assert_eq!(fc.args.as_ref().unwrap()["path"], "src");
    }

    #[test]
    fn empty_assistant_message_is_skipped() {
        let contents = GeminiProvider::build_contents(&[ChatMessage::assistant("")]);
        assert!(contents.is_empty());
    }

    #[test]
    fn convert_concatenates_text_parts() {
        let api: ApiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":"Hello, "},{"text":"world"}
            ]}}]}"#,
        )
        .unwrap();
        let response = GeminiProvider::convert_response(api);
        assert_eq!(response.content, "Hello, world");
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn convert_assigns_fresh_tool_call_ids() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"functionCall":{"name":"read_file","args":{"path":"a.txt"}}},
            {"functionCall":{"name":"read_file","args":{"path":"b.txt"}}}
        ]}}]}"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let response = GeminiProvider::convert_response(api);
        assert_eq!(response.tool_calls.len(), 2);
        assert!(response.tool_calls[0].id.starts_with("call_"));
        assert_ne!(response.tool_calls[0].id, response.tool_calls[1].id);
    }

    #[test]
    fn convert_missing_args_becomes_empty_object() {
        let api: ApiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"functionCall":{"name":"current_loc"}}
            ]}}]}"#,
        )
        .unwrap();
        let response = GeminiProvider::convert_response(api);
        assert_eq!(response.tool_calls[0].args, serde_json::json!({}));
    }

    #[test]
    fn convert_empty_candidates_is_empty_response() {
        let api: ApiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let response = GeminiProvider::convert_response(api);
        assert_eq!(response.content, "");
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn delta_text_concatenates_parts() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        assert_eq!(GeminiProvider::delta_text(data).as_deref(), Some("ab"));
    }

    #[test]
    fn delta_text_skips_malformed() {
        assert!(GeminiProvider::delta_text("{not json").is_none());
        assert!(GeminiProvider::delta_text(r#"{"candidates":[]}"#).is_none());
    }
}
