//! `arka ask` — answer a single query and exit.

use arka_config::AppConfig;

use crate::session;

pub async fn run(query: &str, auto_approve: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let agent = session::build_agent(&config, auto_approve)?;
    session::run_query(&agent, query).await
}
