use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    pub key: Option<String>,
}

/// SMTP relay credentials. When absent the service falls back to a
/// log-only mailer so the rest of the API stays usable in development.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Sender identity and public link base used in outgoing mail.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Public site base for links embedded in mail (unsubscribe etc.)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum concurrent SMTP sends during bulk dispatch
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_otel_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Atelier Fotografia".to_string()
}

fn default_from_address() -> String {
    "contato@atelierfotografia.com.br".to_string()
}

fn default_base_url() -> String {
    "https://atelierfotografia.com.br".to_string()
}

fn default_max_concurrent_sends() -> usize {
    8
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_service_name() -> String {
    "atelier-notification-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("email.from_name", "Atelier Fotografia")?
            .set_default("email.from_address", "contato@atelierfotografia.com.br")?
            .set_default("email.base_url", "https://atelierfotografia.com.br")?
            .set_default("email.max_concurrent_sends", 8)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SERVER_PORT, SMTP_HOST, EMAIL_FROM_ADDRESS, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_name: default_from_name(),
            from_address: default_from_address(),
            base_url: default_base_url(),
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_otel_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl EmailConfig {
    /// RFC 5322 mailbox for the From header
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }

    pub fn unsubscribe_url(&self, email: &str) -> String {
        format!("{}/unsubscribe?email={}", self.base_url, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8082);
    }

    #[test]
    fn test_email_defaults() {
        let email = EmailConfig::default();
        assert_eq!(email.from_address, "contato@atelierfotografia.com.br");
        assert_eq!(
            email.unsubscribe_url("ana@example.com"),
            "https://atelierfotografia.com.br/unsubscribe?email=ana@example.com"
        );
    }
}
