//! Configuration loading and validation for arka.
//!
//! Loads configuration from `~/.arka/config.toml` with environment
//! variable overrides. The provider tag is resolved once at startup;
//! nothing downstream branches on provider identity.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use arka_core::{Error, ProviderKind};

/// The root configuration structure.
///
/// Maps directly to `~/.arka/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which backend to talk to: "openai" or "gemini"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// The model to request from that backend
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the OpenAI backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// API key for the Gemini backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// API key for the web search tool (Tavily)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_api_key: Option<String>,

    /// Memory storage settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            openai_api_key: None,
            gemini_api_key: None,
            search_api_key: None,
            memory: MemoryConfig::default(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("search_api_key", &redact(&self.search_api_key))
            .field("memory", &self.memory)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Directory holding short-term and long-term memory files.
    /// Defaults to `~/.arka/memory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { dir: None }
    }
}

impl AppConfig {
    /// The arka config directory: `~/.arka`.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".arka")
    }

    /// Load `~/.arka/config.toml`, then apply environment overrides.
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load() -> Result<Self, Error> {
        let path = Self::config_dir().join("config.toml");
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| Error::Config {
                message: format!("failed to parse {}: {e}", path.display()),
            })?,
            Err(_) => {
                debug!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("ARKA_PROVIDER") {
            self.provider = provider;
        }
        if let Ok(model) = std::env::var("ARKA_MODEL") {
            self.model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.search_api_key = Some(key);
        }
    }

    /// Resolve the provider tag. Done once per session.
    pub fn provider_kind(&self) -> Result<ProviderKind, Error> {
        self.provider
            .parse()
            .map_err(|message| Error::Config { message })
    }

    /// The API key for the given backend, or a configuration error
    /// naming the missing setting.
    pub fn resolve_api_key(&self, kind: ProviderKind) -> Result<String, Error> {
        let (key, setting, env) = match kind {
            ProviderKind::OpenAi => (&self.openai_api_key, "openai_api_key", "OPENAI_API_KEY"),
            ProviderKind::Gemini => (&self.gemini_api_key, "gemini_api_key", "GEMINI_API_KEY"),
        };
        key.clone().ok_or_else(|| Error::Config {
            message: format!("no API key for {kind}: set {setting} in config.toml or ${env}"),
        })
    }

    /// Where memory files live.
    pub fn memory_dir(&self) -> PathBuf {
        self.memory
            .dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("memory"))
    }
}
