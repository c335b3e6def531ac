//! `arka chat` — interactive session.

use std::io::Write;

use arka_config::AppConfig;

use crate::session;

pub async fn run(auto_approve: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let agent = session::build_agent(&config, auto_approve)?;

    println!();
    println!("  arka — interactive mode");
    println!("  Provider: {}  Model: {}", config.provider, config.model);
    println!("  Type your message and press Enter. Type 'exit' to quit.");
    println!();

    loop {
        print!("you > ");
        std::io::stdout().flush()?;

        // Stdin line reads block; keep them off the runtime.
        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(0) => None, // EOF
                Ok(_) => Some(line),
                Err(_) => None,
            }
        })
        .await?;

        let Some(line) = line else { break };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }

        if let Err(e) = session::run_query(&agent, query).await {
            eprintln!("error: {e}");
        }
        println!();
    }

    Ok(())
}
