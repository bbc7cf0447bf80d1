//! `interdesk doctor` — Diagnose configuration and upstream connectivity.

use interdesk_config::AppConfig;
use interdesk_core::message::Message;
use interdesk_core::CompletionClient;
use interdesk_providers::GroqClient;
use std::path::Path;
use std::sync::Arc;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("InterDesk Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  [ok]   Config loaded");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            return Err("Configuration could not be loaded.".into());
        }
    };

    if config.provider.api_key.is_some() {
        println!("  [ok]   API key configured");
    } else {
        println!("  [warn] No API key — set GROQ_API_KEY");
        issues += 1;
    }

    if config.jwt_secret.is_some() {
        println!("  [ok]   JWT secret configured");
    } else {
        println!("  [warn] No JWT secret — `serve` will refuse to start");
        issues += 1;
    }

    if config.database_url.is_some() {
        println!("  [ok]   Database URL configured");
    } else {
        println!("  [warn] No database URL — `serve` will refuse to start");
        issues += 1;
    }

    // Round-trip one tiny completion to prove the endpoint is reachable.
    if config.provider.api_key.is_some() {
        let client: Arc<dyn CompletionClient> = Arc::new(GroqClient::new(&config.provider)?);
        match client.complete(&[Message::user("ping")]).await {
            Ok(_) => println!("  [ok]   Upstream endpoint reachable ({})", config.provider.api_url),
            Err(e) => {
                println!("  [fail] Upstream endpoint unreachable: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
