//! Shared wiring for the `ask` and `chat` commands.

use std::io::Write;
use std::sync::Arc;

use arka_agent::{AgentEvent, AgentLoop};
use arka_config::AppConfig;
use arka_core::approval::{ApprovalGate, AutoApproveGate};
use arka_memory::FileMemoryStore;

use crate::approval::StdinApprovalGate;

/// Build an agent loop from the loaded config and current directory.
pub fn build_agent(
    config: &AppConfig,
    auto_approve: bool,
) -> Result<AgentLoop, Box<dyn std::error::Error>> {
    let provider = arka_providers::build_from_config(config)?;
    let tools = arka_tools::default_registry(config.search_api_key.clone())?;
    let memory = Arc::new(FileMemoryStore::new(config.memory_dir()));
    let approval: Arc<dyn ApprovalGate> = if auto_approve {
        Arc::new(AutoApproveGate)
    } else {
        Arc::new(StdinApprovalGate)
    };
    let cwd = std::env::current_dir()?;

    Ok(AgentLoop::new(provider, Arc::new(tools), approval, memory, cwd))
}

/// Run one query and render its events to the terminal.
///
/// Answer text goes to stdout; tool activity and notices go to stderr so
/// piped output stays clean.
pub async fn run_query(agent: &AgentLoop, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut rx = agent.run(query);

    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::Fragment { text } => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            AgentEvent::ToolCall { name, args, .. } => {
                eprintln!("  [tool] {name} {args}");
            }
            AgentEvent::ToolResult { name, success, .. } => {
                if !success {
                    eprintln!("  [tool] {name} did not succeed");
                }
            }
            AgentEvent::Truncated { notice } => {
                println!("{notice}");
            }
            AgentEvent::Done { .. } => {
                println!();
            }
            AgentEvent::Error { message } => {
                return Err(message.into());
            }
        }
    }

    Ok(())
}
