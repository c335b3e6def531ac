//! Agent-level streaming events.
//!
//! `AgentEvent` wraps provider-level stream deltas and tool activity into
//! higher-level events that the CLI renders as they arrive.

use serde::{Deserialize, Serialize};

/// Events emitted by the agent while answering one query.
///
/// - `fragment`    — partial text of the final answer
/// - `tool_call`   — the agent is invoking a tool
/// - `tool_result` — tool execution completed (or was denied)
/// - `truncated`   — the step cap was hit before a final answer
/// - `done`        — the answer is complete
/// - `error`       — a fatal error ended the query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Partial text of the final answer.
    Fragment { text: String },

    /// The agent is calling a tool.
    ToolCall {
        id: String,
        name: String,
        args: serde_json::Value,
    },

    /// Tool execution completed.
    ToolResult {
        id: String,
        name: String,
        output: String,
        success: bool,
    },

    /// The step cap was reached before the model produced a final answer.
    Truncated { notice: String },

    /// The answer is complete.
    Done { steps: usize, tool_calls_made: usize },

    /// A fatal error ended the query.
    Error { message: String },
}

impl AgentEvent {
    /// Event name for logging and rendering.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Fragment { .. } => "fragment",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Truncated { .. } => "truncated",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_fragment() {
        let event = AgentEvent::Fragment {
            text: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"fragment""#));
        assert!(json.contains(r#""text":"Hello""#));
    }

    #[test]
    fn event_serialization_tool_call() {
        let event = AgentEvent::ToolCall {
            id: "call_1".into(),
            name: "read_file".into(),
            args: serde_json::json!({"path": "a.txt"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"tool_call""#));
        assert!(json.contains(r#""name":"read_file""#));
    }

    #[test]
    fn event_serialization_done() {
        let event = AgentEvent::Done {
            steps: 3,
            tool_calls_made: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"done""#));
        assert!(json.contains(r#""steps":3"#));
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            AgentEvent::Truncated { notice: "".into() }.event_type(),
            "truncated"
        );
        assert_eq!(
            AgentEvent::Error { message: "".into() }.event_type(),
            "error"
        );
    }
}
