//! Make an HTTP request. Mutating methods are approval-gated.

use std::time::Duration;

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{ApprovalPolicy, Tool, ToolContext};

/// Response bodies above this size are truncated before being handed
/// back to the model.
const MAX_BODY_CHARS: usize = 20_000;

pub struct HttpRequestTool;

#[async_trait]
impl Tool for HttpRequestTool {
    fn name(&self) -> &str {
        "http_request"
    }

    fn description(&self) -> &str {
        "Make an HTTP request and return the status code and response body."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to request"
                },
                "method": {
                    "type": "string",
                    "description": "HTTP method (defaults to GET)",
                    "enum": ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD"]
                },
                "headers": {
                    "type": "object",
                    "description": "Request headers as string key/value pairs"
                },
                "body": {
                    "type": "string",
                    "description": "Request body"
                }
            },
            "required": ["url"]
        })
    }

    fn approval_policy(&self) -> ApprovalPolicy {
        // GET is read-only; everything else can mutate remote state.
        ApprovalPolicy::Conditional(std::sync::Arc::new(|args| {
            args["method"]
                .as_str()
                .is_some_and(|m| !m.eq_ignore_ascii_case("GET"))
        }))
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let url = args["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' argument".into()))?;
        let method = args["method"].as_str().unwrap_or("GET");
        let method: reqwest::Method = method
            .parse()
            .map_err(|_| ToolError::InvalidArguments(format!("invalid HTTP method: {method}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "http_request".into(),
                reason: e.to_string(),
            })?;

        let mut request = client.request(method, url);
        if let Some(headers) = args["headers"].as_object() {
            for (key, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(key, value);
                }
            }
        }
        if let Some(body) = args["body"].as_str() {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: "http_request".into(),
            reason: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let mut body = response.text().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: "http_request".into(),
            reason: e.to_string(),
        })?;
        if body.chars().count() > MAX_BODY_CHARS {
            body = body.chars().take(MAX_BODY_CHARS).collect::<String>() + "\n[truncated]";
        }

        Ok(format!("HTTP {status}\n{body}"))
    }
}
