//! Application settings and configuration
//!
//! Settings load from environment variables with sensible defaults; a
//! `.env` file is honored when present. Nothing here is reloaded at
//! runtime.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!(
                "Invalid environment: {}. Expected: development, staging, or production",
                s
            ),
        }
    }
}

/// Base URLs of the backend manager services plus the shared RPC timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub call_manager_url: String,
    pub contact_manager_url: String,
    pub campaign_manager_url: String,
    pub conversation_manager_url: String,
    pub timeline_manager_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            call_manager_url: "http://call-manager:8080/rpc".to_string(),
            contact_manager_url: "http://contact-manager:8080/rpc".to_string(),
            campaign_manager_url: "http://campaign-manager:8080/rpc".to_string(),
            conversation_manager_url: "http://conversation-manager:8080/rpc".to_string(),
            timeline_manager_url: "http://timeline-manager:8080/rpc".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // Authentication
    pub require_auth: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,

    /// Ephemeral access token (generated at startup for local development,
    /// never persisted).
    #[serde(skip)]
    pub ephemeral_access_token: Option<String>,

    // Backend managers
    pub backend: BackendConfig,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("APP_NAME", "telco-api-gateway"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "8080")
                .parse()
                .context("Invalid PORT value")?,

            require_auth: env_or_default("REQUIRE_AUTH", "true")
                .parse()
                .unwrap_or(true),
            jwt_secret: env::var("JWT_SECRET").ok(),
            ephemeral_access_token: None,

            backend: BackendConfig {
                call_manager_url: env_or_default(
                    "CALL_MANAGER_URL",
                    "http://call-manager:8080/rpc",
                ),
                contact_manager_url: env_or_default(
                    "CONTACT_MANAGER_URL",
                    "http://contact-manager:8080/rpc",
                ),
                campaign_manager_url: env_or_default(
                    "CAMPAIGN_MANAGER_URL",
                    "http://campaign-manager:8080/rpc",
                ),
                conversation_manager_url: env_or_default(
                    "CONVERSATION_MANAGER_URL",
                    "http://conversation-manager:8080/rpc",
                ),
                timeline_manager_url: env_or_default(
                    "TIMELINE_MANAGER_URL",
                    "http://timeline-manager:8080/rpc",
                ),
                request_timeout_seconds: env_or_default("BACKEND_REQUEST_TIMEOUT", "30")
                    .parse()
                    .unwrap_or(30),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.backend.request_timeout_seconds == 0 {
            anyhow::bail!("Backend request timeout must be > 0");
        }

        if self.environment == Environment::Production {
            if !self.require_auth {
                tracing::warn!("Running in production without authentication!");
            }
            if self.jwt_secret.is_none() {
                anyhow::bail!("JWT_SECRET is required in production");
            }
        }

        Ok(())
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Generate and set an ephemeral access token for local development.
    /// Returns the generated token.
    pub fn generate_ephemeral_token(&mut self) -> String {
        let token = format!("at-{}", uuid::Uuid::new_v4().to_string().replace('-', ""));
        self.ephemeral_access_token = Some(token.clone());
        token
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "telco-api-gateway".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            require_auth: true,
            jwt_secret: None,
            ephemeral_access_token: None,
            backend: BackendConfig::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "telco-api-gateway");
        assert_eq!(settings.port, 8080);
        assert!(settings.require_auth);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("bogus".parse::<Environment>().is_err());
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_ephemeral_token() {
        let mut settings = Settings::default();
        let token = settings.generate_ephemeral_token();
        assert!(token.starts_with("at-"));
        assert_eq!(settings.ephemeral_access_token, Some(token));
    }
}
