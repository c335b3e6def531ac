//! Web search via the Tavily API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

const TAVILY_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: u32 = 5;

pub struct WebSearchTool {
    api_key: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web and return the top results with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let response = self
            .client
            .post(TAVILY_URL)
            .json(&serde_json::json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": MAX_RESULTS,
            }))
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: format!("search API returned status {status}"),
            });
        }

        let parsed: SearchResponse =
            response.json().await.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            })?;

        if parsed.results.is_empty() && parsed.answer.is_none() {
            return Ok(format!("No results for '{query}'"));
        }

        let mut out = String::new();
        if let Some(answer) = parsed.answer {
            out.push_str(&format!("Answer: {answer}\n\n"));
        }
        for (idx, result) in parsed.results.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} ({})\n   {}\n",
                idx + 1,
                result.title,
                result.url,
                result.content
            ));
        }
        Ok(out.trim_end().to_string())
    }
}
