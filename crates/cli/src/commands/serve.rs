//! `interdesk serve` — Start the HTTP API gateway.

use interdesk_config::AppConfig;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("InterDesk Gateway");
    println!("  Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("  Model:     {}", config.provider.model);

    interdesk_gateway::start(config).await?;

    Ok(())
}
