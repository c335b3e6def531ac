//! Provider adapters for arka.
//!
//! Both adapters implement `arka_core::ChatProvider`, normalizing two
//! structurally different wire protocols into one internal shape:
//!
//! - `OpenAiProvider` — the request/response family (`choices[]`, SSE
//!   `data:` lines with a `[DONE]` sentinel)
//! - `GeminiProvider` — the turn/parts family (`contents[]`,
//!   `candidates[0].content.parts[]`)
//!
//! The adapter is selected once per session from configuration; nothing
//! downstream branches on provider identity.

pub mod gemini;
pub mod openai;

mod sse;

use std::sync::Arc;

use arka_config::AppConfig;
use arka_core::{ChatProvider, Error, ProviderKind};

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Build the configured provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn ChatProvider>, Error> {
    let kind = config.provider_kind()?;
    let api_key = config.resolve_api_key(kind)?;
    Ok(match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(&config.model, api_key)),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(&config.model, api_key)),
    })
}
