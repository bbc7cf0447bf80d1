//! `interdesk chat` — Interactive or single-message chat mode.
//!
//! Runs the full orchestrator against an in-memory store, so marker
//! dispatch and history truncation behave exactly as they do behind the
//! gateway — only persistence differs.

use interdesk_agent::orchestrator::Orchestrator;
use interdesk_agent::prompt::system_prompt;
use interdesk_config::AppConfig;
use interdesk_core::message::{ConversationId, Message, Role};
use interdesk_core::HistoryStore;
use interdesk_history::InMemoryStore;
use interdesk_providers::GroqClient;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path)?;

    if config.provider.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    GROQ_API_KEY=gsk_...");
        eprintln!();
        eprintln!("  Or add it to interdesk.toml:");
        eprintln!("    [provider]");
        eprintln!("    api_key = \"gsk_...\"");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }
    config.validate()?;

    let client = Arc::new(GroqClient::new(&config.provider)?);
    let orchestrator = Orchestrator::new(client, config.agent.max_history);
    let store = InMemoryStore::new();
    let conversation_id = ConversationId::new();

    if let Some(message) = message {
        let reply = turn(&orchestrator, &store, &conversation_id, &message).await?;
        println!("{reply}");
        return Ok(());
    }

    println!("InterDesk support chat — type 'exit' to quit\n");
    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        match turn(&orchestrator, &store, &conversation_id, line).await {
            Ok(reply) => println!("agent> {reply}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    Ok(())
}

/// One conversation turn: replay stored history, orchestrate, persist.
async fn turn(
    orchestrator: &Orchestrator,
    store: &InMemoryStore,
    conversation_id: &ConversationId,
    user_message: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let stored = store.load_history(conversation_id).await?;
    let mut messages = Vec::with_capacity(stored.len() + 2);
    messages.push(Message::system(system_prompt()));
    messages.extend(stored);
    messages.push(Message::user(user_message));

    let reply = orchestrator.respond(&mut messages).await?;

    store.append(conversation_id, Role::User, user_message).await?;
    store.append(conversation_id, Role::Assistant, &reply).await?;
    Ok(reply)
}
