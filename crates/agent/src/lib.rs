//! The arka agent loop — the heart of the CLI.
//!
//! One user query drives a **reason → act → observe** cycle:
//!
//! 1. **Build context** (system prompt + working directory + memory)
//! 2. **Invoke the LLM** with the projected tool schemas
//! 3. **If tool calls**: gate, execute, append results, loop back to step 2
//! 4. **If text only**: stream the final answer and persist the exchange
//!
//! The cycle runs until the LLM answers with text alone or the step cap
//! is reached, in which case a truncation notice is emitted instead.

pub mod event;
pub mod loop_runner;
pub mod prompt;

pub use event::AgentEvent;
pub use loop_runner::{AgentLoop, DENIED_TOOL_RESULT, MAX_STEPS, TRUNCATION_NOTICE};
pub use prompt::build_system_prompt;
