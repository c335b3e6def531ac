//! The agent reasoning loop implementation.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use arka_core::approval::{ApprovalGate, ApprovalRequest};
use arka_core::memory::{MemoryStore, MemoryTurn};
use arka_core::message::{ChatMessage, Role};
use arka_core::provider::{ChatProvider, InvokeOptions};
use arka_core::tool::{ToolCall, ToolContext, ToolRegistry};

use crate::event::AgentEvent;
use crate::prompt::build_system_prompt;

/// Hard cap on reasoning steps per query. One step is one LLM invocation.
pub const MAX_STEPS: usize = 20;

/// Tool result recorded when the human gate denies an invocation.
pub const DENIED_TOOL_RESULT: &str = "User denied this action.";

/// Text emitted when the step cap is reached without a final answer.
pub const TRUNCATION_NOTICE: &str = "\n[Stopped after maximum steps reached]";

/// The agent loop that orchestrates LLM calls and tool execution.
///
/// One instance serves one query at a time; everything it holds is shared
/// state behind `Arc`, so it is cheap to clone for concurrent queries.
#[derive(Clone)]
pub struct AgentLoop {
    /// The LLM backend adapter
    provider: Arc<dyn ChatProvider>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Human approval gate for destructive tools
    approval: Arc<dyn ApprovalGate>,

    /// Memory store for cross-session context
    memory: Arc<dyn MemoryStore>,

    /// Directory that relative tool paths resolve against
    working_dir: PathBuf,

    /// Maximum reasoning steps per query
    max_steps: usize,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        approval: Arc<dyn ApprovalGate>,
        memory: Arc<dyn MemoryStore>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            tools,
            approval,
            memory,
            working_dir: working_dir.into(),
            max_steps: MAX_STEPS,
        }
    }

    /// Override the step cap (tests mostly).
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    /// Answer one user query.
    ///
    /// Returns a receiver of [`AgentEvent`]s; the loop itself runs on a
    /// spawned task and ends with exactly one of `Done`, `Truncated`, or
    /// `Error`.
    pub fn run(&self, query: impl Into<String>) -> mpsc::Receiver<AgentEvent> {
        let (tx, rx) = mpsc::channel(32);
        let agent = self.clone();
        let query = query.into();
        tokio::spawn(async move {
            agent.drive(query, tx).await;
        });
        rx
    }

    async fn drive(self, query: String, tx: mpsc::Sender<AgentEvent>) {
        info!(provider = %self.provider.name(), "Starting agent loop");

        // Memory is best-effort context: a failing store degrades the
        // prompt, never the query.
        let short_term = self.memory.short_term().await.unwrap_or_else(|e| {
            warn!("Failed to read short-term memory: {e}");
            vec![]
        });
        let long_term = self.memory.long_term().await.unwrap_or_else(|e| {
            warn!("Failed to read long-term memory: {e}");
            vec![]
        });

        let system = build_system_prompt(&self.working_dir, &short_term, &long_term);
        let mut messages = vec![ChatMessage::system(system), ChatMessage::user(&query)];

        let options = InvokeOptions {
            tools: self.tools.schemas_for(self.provider.kind()),
            ..Default::default()
        };
        let ctx = ToolContext::new(&self.working_dir);
        let mut tool_calls_made = 0usize;

        for step in 1..=self.max_steps {
            debug!(step, messages = messages.len(), "Agent loop step");

            let response = match self.provider.invoke(&messages, &options).await {
                Ok(response) => response,
                Err(e) => {
                    let _ = tx.send(AgentEvent::Error { message: e.to_string() }).await;
                    return;
                }
            };

            if !response.has_tool_calls() {
                // Final answer: re-ask the backend in streaming mode so the
                // user sees tokens as they arrive.
                let answer = match self.stream_answer(&messages, &tx).await {
                    Some(answer) => answer,
                    None => return, // error already reported
                };

                let turns = [
                    MemoryTurn::new(Role::User, &query),
                    MemoryTurn::new(Role::Assistant, &answer),
                ];
                if let Err(e) = self.memory.record(&turns).await {
                    warn!("Failed to record exchange in memory: {e}");
                }

                let _ = tx
                    .send(AgentEvent::Done {
                        steps: step,
                        tool_calls_made,
                    })
                    .await;
                return;
            }

            // The model wants tools. Append its request, then execute each
            // call in order so later calls can depend on earlier results.
            let calls = response.tool_calls.clone();
            messages.push(ChatMessage::assistant_with_calls(
                response.content,
                response.tool_calls,
            ));

            for call in &calls {
                tool_calls_made += 1;
                if tx
                    .send(AgentEvent::ToolCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        args: call.args.clone(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }

                let (output, success) = self.dispatch(call, &ctx).await;
                messages.push(ChatMessage::tool_result(&call.id, &call.name, &output));

                if tx
                    .send(AgentEvent::ToolResult {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        output,
                        success,
                    })
                    .await
                    .is_err()
                {
                    return;
                }
            }
        }

        warn!(max_steps = self.max_steps, "Step cap reached without a final answer");
        let _ = tx
            .send(AgentEvent::Truncated {
                notice: TRUNCATION_NOTICE.into(),
            })
            .await;
    }

    /// Stream the final answer, forwarding fragments as they arrive.
    ///
    /// Returns the full answer text, or `None` after reporting an error.
    async fn stream_answer(
        &self,
        messages: &[ChatMessage],
        tx: &mpsc::Sender<AgentEvent>,
    ) -> Option<String> {
        let mut stream = match self.provider.stream(messages).await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = tx.send(AgentEvent::Error { message: e.to_string() }).await;
                return None;
            }
        };

        let mut answer = String::new();
        while let Some(delta) = stream.recv().await {
            match delta {
                Ok(delta) => {
                    if let Some(text) = delta.text {
                        if text.is_empty() {
                            continue;
                        }
                        answer.push_str(&text);
                        if tx.send(AgentEvent::Fragment { text }).await.is_err() {
                            return None;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(AgentEvent::Error { message: e.to_string() }).await;
                    return None;
                }
            }
        }
        Some(answer)
    }

    /// Gate and execute one tool call.
    ///
    /// Every failure mode is contained here as a `(text, false)` result the
    /// model can read and recover from; nothing a tool does ends the query.
    async fn dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> (String, bool) {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "Model requested unknown tool");
            return (format!("Error: Tool not found: {}", call.name), false);
        };

        if tool.approval_policy().requires_approval(&call.args) {
            let request = ApprovalRequest {
                tool_name: call.name.clone(),
                args: call.args.clone(),
            };
            if !self.approval.review(&request).await.is_approved() {
                info!(tool = %call.name, "Tool call denied by user");
                return (DENIED_TOOL_RESULT.into(), false);
            }
        }

        match self.tools.execute(&call.name, call.args.clone(), ctx).await {
            Ok(output) => (output, true),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                (format!("Error: {e}"), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use arka_core::approval::{ApprovalDecision, AutoApproveGate};
    use arka_core::error::{ProviderError, ToolError};
    use arka_core::provider::{ChatResponse, ProviderKind, StreamDelta};
    use arka_core::tool::{ApprovalPolicy, Tool};
    use arka_memory::InMemoryStore;

    /// A provider scripted with a fixed sequence of invoke responses.
    ///
    /// When the script runs out it repeats the last response, which makes
    /// truncation tests trivial (an endlessly tool-hungry model).
    struct ScriptedProvider {
        script: Mutex<VecDeque<ChatResponse>>,
        repeat_last: Option<ChatResponse>,
        stream_fragments: Vec<String>,
        invoke_count: AtomicUsize,
        stream_count: AtomicUsize,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<ChatResponse>, stream_fragments: Vec<&str>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                repeat_last: None,
                stream_fragments: stream_fragments.into_iter().map(String::from).collect(),
                invoke_count: AtomicUsize::new(0),
                stream_count: AtomicUsize::new(0),
                seen: Mutex::new(vec![]),
            }
        }

        fn endless(response: ChatResponse) -> Self {
            let mut provider = Self::new(vec![], vec![]);
            provider.repeat_last = Some(response);
            provider
        }

        fn text(content: &str) -> ChatResponse {
            ChatResponse {
                content: content.into(),
                tool_calls: vec![],
            }
        }

        fn calls(calls: Vec<ToolCall>) -> ChatResponse {
            ChatResponse {
                content: String::new(),
                tool_calls: calls,
            }
        }

        fn invokes(&self) -> usize {
            self.invoke_count.load(Ordering::SeqCst)
        }

        fn streams(&self) -> usize {
            self.stream_count.load(Ordering::SeqCst)
        }

        fn last_messages(&self) -> Vec<ChatMessage> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        async fn invoke(
            &self,
            messages: &[ChatMessage],
            _options: &InvokeOptions,
        ) -> Result<ChatResponse, ProviderError> {
            self.invoke_count.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(messages.to_vec());
            let scripted = self.script.lock().unwrap().pop_front();
            scripted
                .or_else(|| self.repeat_last.clone())
                .ok_or_else(|| ProviderError::MalformedResponse("script exhausted".into()))
        }

        async fn stream(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<mpsc::Receiver<Result<StreamDelta, ProviderError>>, ProviderError> {
            self.stream_count.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = mpsc::channel(16);
            let fragments = self.stream_fragments.clone();
            tokio::spawn(async move {
                for text in fragments {
                    let _ = tx.send(Ok(StreamDelta { text: Some(text) })).await;
                }
            });
            Ok(rx)
        }
    }

    /// A provider whose invoke always fails.
    struct BrokenProvider;

    #[async_trait]
    impl ChatProvider for BrokenProvider {
        fn name(&self) -> &str {
            "broken"
        }
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }
        async fn invoke(
            &self,
            _messages: &[ChatMessage],
            _options: &InvokeOptions,
        ) -> Result<ChatResponse, ProviderError> {
            Err(ProviderError::ApiError {
                status_code: 500,
                body: "upstream exploded".into(),
            })
        }
        async fn stream(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<mpsc::Receiver<Result<StreamDelta, ProviderError>>, ProviderError> {
            Err(ProviderError::Network("unreachable".into()))
        }
    }

    /// Counting tool so tests can assert the executor ran (or didn't).
    struct CountingTool {
        name: &'static str,
        policy: ApprovalPolicy,
        runs: AtomicUsize,
        result: Result<&'static str, &'static str>,
    }

    impl CountingTool {
        fn ok(name: &'static str, output: &'static str) -> Self {
            Self {
                name,
                policy: ApprovalPolicy::Never,
                runs: AtomicUsize::new(0),
                result: Ok(output),
            }
        }

        fn failing(name: &'static str, reason: &'static str) -> Self {
            Self {
                name,
                policy: ApprovalPolicy::Never,
                runs: AtomicUsize::new(0),
                result: Err(reason),
            }
        }

        fn gated(name: &'static str, output: &'static str) -> Self {
            Self {
                policy: ApprovalPolicy::Always,
                ..Self::ok(name, output)
            }
        }
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "test tool"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {}})
        }
        fn approval_policy(&self) -> ApprovalPolicy {
            self.policy.clone()
        }
        async fn execute(
            &self,
            _args: serde_json::Value,
            _ctx: &ToolContext,
        ) -> Result<String, ToolError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Ok(output) => Ok(output.into()),
                Err(reason) => Err(ToolError::ExecutionFailed {
                    tool_name: self.name.into(),
                    reason: reason.into(),
                }),
            }
        }
    }

    struct DenyAllGate;

    #[async_trait]
    impl ApprovalGate for DenyAllGate {
        async fn review(&self, _request: &ApprovalRequest) -> ApprovalDecision {
            ApprovalDecision::Deny
        }
    }

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            args: json!({}),
        }
    }

    fn agent_with(
        provider: Arc<dyn ChatProvider>,
        tools: ToolRegistry,
        approval: Arc<dyn ApprovalGate>,
        memory: Arc<dyn MemoryStore>,
    ) -> AgentLoop {
        AgentLoop::new(provider, Arc::new(tools), approval, memory, "/tmp")
    }

    async fn collect(mut rx: mpsc::Receiver<AgentEvent>) -> Vec<AgentEvent> {
        let mut events = vec![];
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn text_answer_streams_and_persists() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![ScriptedProvider::text("Four.")],
            vec!["Fo", "ur."],
        ));
        let memory = Arc::new(InMemoryStore::new());
        let agent = agent_with(
            provider.clone(),
            ToolRegistry::new(),
            Arc::new(AutoApproveGate),
            memory.clone(),
        );

        let events = collect(agent.run("what's 2+2")).await;

        let fragments: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::Fragment { text } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(fragments, vec!["Fo", "ur."]);
        assert!(matches!(
            events.last(),
            Some(AgentEvent::Done { steps: 1, tool_calls_made: 0 })
        ));

        // One reasoning invoke, one streaming pass for the answer.
        assert_eq!(provider.invokes(), 1);
        assert_eq!(provider.streams(), 1);

        // The streamed answer is what memory persisted.
        let turns = memory.short_term().await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "what's 2+2");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "Four.");
    }

    #[tokio::test]
    async fn tool_round_trip_feeds_results_back() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![
                ScriptedProvider::calls(vec![call("call_1", "lookup")]),
                ScriptedProvider::text("Done."),
            ],
            vec!["Done."],
        ));
        let tool = Arc::new(CountingTool::ok("lookup", "42"));
        let mut tools = ToolRegistry::new();
        tools.register(tool.clone()).unwrap();

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(AutoApproveGate),
            Arc::new(InMemoryStore::new()),
        );
        let events = collect(agent.run("look it up")).await;

        assert_eq!(tool.runs.load(Ordering::SeqCst), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            AgentEvent::ToolResult { id, output, success: true, .. }
                if id == "call_1" && output == "42"
        )));

        // The second invoke saw the assistant's request and the tool result.
        let messages = provider.last_messages();
        let tool_msg = messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_msg.content, "42");
        let assistant_msg = messages.iter().find(|m| m.role == Role::Assistant).unwrap();
        assert_eq!(assistant_msg.tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn multiple_calls_execute_in_order() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![
                ScriptedProvider::calls(vec![
                    call("call_a", "first"),
                    call("call_b", "second"),
                ]),
                ScriptedProvider::text("Both done."),
            ],
            vec!["Both done."],
        ));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CountingTool::ok("first", "one"))).unwrap();
        tools.register(Arc::new(CountingTool::ok("second", "two"))).unwrap();

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(AutoApproveGate),
            Arc::new(InMemoryStore::new()),
        );
        let events = collect(agent.run("do both")).await;

        let results: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::ToolResult { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(results, vec!["call_a", "call_b"]);

        // Both results landed in the transcript, in call order.
        let messages = provider.last_messages();
        let tool_ids: Vec<_> = messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.clone())
            .collect();
        assert_eq!(tool_ids, vec!["call_a", "call_b"]);
    }

    #[tokio::test]
    async fn denial_skips_executor_and_reports_it() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![
                ScriptedProvider::calls(vec![call("call_1", "dangerous")]),
                ScriptedProvider::text("Understood, I won't.")
            ],
            vec!["Understood, I won't."],
        ));
        let tool = Arc::new(CountingTool::gated("dangerous", "should not appear"));
        let mut tools = ToolRegistry::new();
        tools.register(tool.clone()).unwrap();

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(DenyAllGate),
            Arc::new(InMemoryStore::new()),
        );
        let events = collect(agent.run("do the dangerous thing")).await;

        assert_eq!(tool.runs.load(Ordering::SeqCst), 0, "denied tool must not run");
        assert!(events.iter().any(|e| matches!(
            e,
            AgentEvent::ToolResult { output, success: false, .. }
                if output == DENIED_TOOL_RESULT
        )));

        // The model sees the denial as an ordinary tool result.
        let messages = provider.last_messages();
        let tool_msg = messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert_eq!(tool_msg.content, DENIED_TOOL_RESULT);
    }

    #[tokio::test]
    async fn tool_failure_is_contained() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![
                ScriptedProvider::calls(vec![call("call_1", "flaky")]),
                ScriptedProvider::text("It failed, sorry."),
            ],
            vec!["It failed, sorry."],
        ));
        let mut tools = ToolRegistry::new();
        tools
            .register(Arc::new(CountingTool::failing("flaky", "disk on fire")))
            .unwrap();

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(AutoApproveGate),
            Arc::new(InMemoryStore::new()),
        );
        let events = collect(agent.run("try it")).await;

        // The failure became a readable result, and the loop kept going to
        // a normal Done.
        assert!(events.iter().any(|e| matches!(
            e,
            AgentEvent::ToolResult { output, success: false, .. }
                if output == "Error: flaky: disk on fire"
        )));
        assert!(matches!(events.last(), Some(AgentEvent::Done { .. })));
    }

    #[tokio::test]
    async fn unknown_tool_is_contained() {
        let provider = Arc::new(ScriptedProvider::new(
            vec![
                ScriptedProvider::calls(vec![call("call_1", "no_such_tool")]),
                ScriptedProvider::text("My mistake."),
            ],
            vec!["My mistake."],
        ));

        let agent = agent_with(
            provider.clone(),
            ToolRegistry::new(),
            Arc::new(AutoApproveGate),
            Arc::new(InMemoryStore::new()),
        );
        let events = collect(agent.run("hallucinate a tool")).await;

        assert!(events.iter().any(|e| matches!(
            e,
            AgentEvent::ToolResult { output, success: false, .. }
                if output == "Error: Tool not found: no_such_tool"
        )));
        assert!(matches!(events.last(), Some(AgentEvent::Done { .. })));
    }

    #[tokio::test]
    async fn step_cap_truncates_without_streaming_or_memory() {
        let provider = Arc::new(ScriptedProvider::endless(ScriptedProvider::calls(vec![
            call("call_n", "lookup"),
        ])));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CountingTool::ok("lookup", "again"))).unwrap();
        let memory = Arc::new(InMemoryStore::new());

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(AutoApproveGate),
            memory.clone(),
        );
        let events = collect(agent.run("loop forever")).await;

        assert_eq!(provider.invokes(), MAX_STEPS);
        assert_eq!(provider.streams(), 0, "no final answer, no stream");

        let notices = events
            .iter()
            .filter(|e| matches!(e, AgentEvent::Truncated { notice } if notice == TRUNCATION_NOTICE))
            .count();
        assert_eq!(notices, 1);
        assert!(matches!(events.last(), Some(AgentEvent::Truncated { .. })));

        // A truncated query is not a completed exchange.
        assert_eq!(memory.turn_count().await, 0);
    }

    #[tokio::test]
    async fn lowered_step_cap_is_honored() {
        let provider = Arc::new(ScriptedProvider::endless(ScriptedProvider::calls(vec![
            call("call_n", "lookup"),
        ])));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CountingTool::ok("lookup", "again"))).unwrap();

        let agent = agent_with(
            provider.clone(),
            tools,
            Arc::new(AutoApproveGate),
            Arc::new(InMemoryStore::new()),
        )
        .with_max_steps(3);
        let _ = collect(agent.run("loop")).await;

        assert_eq!(provider.invokes(), 3);
    }

    #[tokio::test]
    async fn provider_failure_ends_the_query() {
        let memory = Arc::new(InMemoryStore::new());
        let agent = agent_with(
            Arc::new(BrokenProvider),
            ToolRegistry::new(),
            Arc::new(AutoApproveGate),
            memory.clone(),
        );
        let events = collect(agent.run("hello")).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            AgentEvent::Error { message } if message.contains("500")
        ));
        assert_eq!(memory.turn_count().await, 0);
    }
}
