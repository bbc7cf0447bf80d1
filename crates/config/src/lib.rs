//! Configuration loading and validation for InterDesk.
//!
//! Loads configuration from an optional TOML file (default
//! `interdesk.toml` in the working directory) with environment variable
//! overrides. Validates all settings at startup. Secrets never appear in
//! Debug output.

use interdesk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `interdesk.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Secret used to sign access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,

    /// Completion endpoint configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Orchestrator configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &redact(&self.database_url))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("provider", &self.provider)
            .field("gateway", &self.gateway)
            .field("agent", &self.agent)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            jwt_secret: None,
            provider: ProviderConfig::default(),
            gateway: GatewayConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Fixed model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum messages kept in the context sent upstream.
    /// The system message always survives truncation.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    20
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

impl AppConfig {
    /// Load configuration: TOML file (if present) + environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => {
                let default_path = Path::new("interdesk.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    AppConfig::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| Error::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Environment variables take precedence over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DATABASE_URL") {
            self.database_url = Some(v);
        }
        if let Ok(v) = std::env::var("JWT_SECRET") {
            self.jwt_secret = Some(v);
        }
        if let Ok(v) = std::env::var("GROQ_API_KEY") {
            self.provider.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("INTERDESK_API_URL") {
            self.provider.api_url = v;
        }
        if let Ok(v) = std::env::var("INTERDESK_MODEL") {
            self.provider.model = v;
        }
        if let Ok(v) = std::env::var("INTERDESK_HOST") {
            self.gateway.host = v;
        }
        if let Ok(v) = std::env::var("INTERDESK_PORT")
            && let Ok(port) = v.parse()
        {
            self.gateway.port = port;
        }
    }

    /// Validate settings needed to serve traffic.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Config {
                message: "provider.api_key is required (set GROQ_API_KEY)".into(),
            });
        }
        if self.agent.max_history < 2 {
            return Err(Error::Config {
                message: "agent.max_history must be at least 2 (system message + latest turn)"
                    .into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_production_model() {
        let config = AppConfig::default();
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
        assert_eq!(config.agent.max_history, 20);
        assert_eq!(config.gateway.port, 8080);
    }

    #[test]
    fn parses_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [provider]
            api_key = "gsk_test"

            [gateway]
            port = 9000
            "#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.gateway.port, 9000);
        // Untouched sections keep defaults
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("gsk_super_secret".into());
        config.jwt_secret = Some("hmac_key".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_super_secret"));
        assert!(!debug.contains("hmac_key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
