//! `arka tools` — list the available tools.

use arka_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = arka_tools::default_registry(config.search_api_key.clone())?;

    println!("Available tools ({}):", registry.len());
    for name in registry.names() {
        let tool = registry.get(name).ok_or("registry lookup failed")?;
        println!("  {:<18} {}", tool.name(), tool.description());
    }

    if config.search_api_key.is_none() {
        println!();
        println!("  (web_search is disabled — set TAVILY_API_KEY to enable it)");
    }

    Ok(())
}
