//! System prompt assembly.
//!
//! The prompt seeds every query with the agent's identity, the working
//! directory, today's date, and whatever memory the store holds.

use std::path::Path;

use arka_core::memory::MemoryTurn;
use arka_core::message::Role;

/// Build the system prompt for one query.
pub fn build_system_prompt(
    cwd: &Path,
    short_term: &[MemoryTurn],
    long_term: &[String],
) -> String {
    let mut prompt = format!(
        "You are Arka, an AI assistant running in a CLI terminal. You help the \
         user by answering questions and by using the tools available to you.\n\
         Use tools whenever they let you answer with facts instead of guesses. \
         When a task needs several steps, take them one tool call at a time.\n\n\
         Current working directory: {}\n\
         Today's date: {}",
        cwd.display(),
        chrono::Local::now().format("%Y-%m-%d"),
    );

    if !long_term.is_empty() {
        prompt.push_str("\n\nThings the user has told you to remember:\n");
        for pref in long_term {
            prompt.push_str(&format!("- {pref}\n"));
        }
    }

    if !short_term.is_empty() {
        prompt.push_str("\nRecent conversation:\n");
        for turn in short_term {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
                _ => continue,
            };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content));
        }
    }

    prompt
}
