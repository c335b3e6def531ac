//! Tool trait and registry — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world: run
//! shell commands, read/write files, search the web, inspect code.
//! Each tool declares a name, a JSON Schema input contract, and an
//! approval policy; the registry projects the whole set into whichever
//! function-schema dialect the active provider speaks.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::provider::ProviderKind;

/// A request to execute a tool, produced by a provider response.
///
/// Consumed at most once by the registry. An `id` is always present:
/// backends that do not emit one get an adapter-generated id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque call id (matches the backend's tool_call id when it has one)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    pub args: serde_json::Value,
}

/// When a tool invocation must pass the human approval gate.
///
/// `Conditional` predicates are evaluated lazily against the concrete call
/// arguments at dispatch time, not at registration time — approval may
/// depend on the specific path or command requested.
#[derive(Clone)]
pub enum ApprovalPolicy {
    /// Never gate this tool.
    Never,
    /// Gate every invocation.
    Always,
    /// Gate when the predicate holds for these arguments.
    Conditional(Arc<dyn Fn(&serde_json::Value) -> bool + Send + Sync>),
}

impl ApprovalPolicy {
    /// Decide whether this concrete call needs approval.
    pub fn requires_approval(&self, args: &serde_json::Value) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Conditional(predicate) => predicate(args),
        }
    }
}

impl std::fmt::Debug for ApprovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "Never"),
            Self::Always => write!(f, "Always"),
            Self::Conditional(_) => write!(f, "Conditional(..)"),
        }
    }
}

/// Execution context passed by reference to every tool call within one
/// agent-loop invocation.
///
/// The working directory and cancellation handle are explicit values, not
/// ambient process state, so the same registry can serve concurrent
/// queries.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Directory that relative tool paths resolve against.
    pub cwd: PathBuf,

    /// Cooperative cancellation signal for long-running executors.
    pub cancel: CancellationToken,
}

impl ToolContext {
    /// Create a fresh context rooted at `cwd` with its own token.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            cancel: CancellationToken::new(),
        }
    }
}

/// The core Tool trait.
///
/// Each tool (read_file, write_file, execute_command, web_search, ...)
/// implements this trait and is registered once at startup; definitions
/// are immutable thereafter.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// When invocations of this tool must be approved by a human.
    fn approval_policy(&self) -> ApprovalPolicy {
        ApprovalPolicy::Never
    }

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> std::result::Result<String, ToolError>;
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Project tool schemas into the active provider's dialect
/// 2. Look up and execute tools when the LLM requests them
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Registration order, so schema lists are stable across runs.
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Duplicate names are a configuration error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> std::result::Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateName(name));
        }
        tracing::debug!(tool = %name, "Registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Project every registered definition into the given provider's
    /// function-schema dialect.
    ///
    /// The name, description, and parameter schema (including `required`)
    /// pass through losslessly; only the envelope differs.
    pub fn schemas_for(&self, kind: ProviderKind) -> Vec<serde_json::Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                let declaration = serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                });
                match kind {
                    ProviderKind::OpenAi => serde_json::json!({
                        "type": "function",
                        "function": declaration,
                    }),
                    ProviderKind::Gemini => declaration,
                }
            })
            .collect()
    }

    /// Execute a tool call by name.
    ///
    /// Fails with `ToolError::NotFound` for unregistered names and surfaces
    /// executor errors unmodified — the agent loop is responsible for
    /// containing them.
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(args, ctx).await
    }
}
