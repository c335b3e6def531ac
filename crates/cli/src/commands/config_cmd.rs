//! `arka config` — show the effective configuration.

use arka_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Config file: {}", AppConfig::config_dir().join("config.toml").display());
    println!("Memory dir:  {}", config.memory_dir().display());
    println!();
    // Debug output redacts API keys.
    println!("{config:#?}");

    Ok(())
}
