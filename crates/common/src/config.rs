//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Survey form configuration.
    #[serde(default)]
    pub survey: SurveyConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL. The store is a single database file.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign tenant and admin bearer tokens.
    ///
    /// Defaults to a fresh random value per process, which invalidates
    /// outstanding bearer tokens on restart. Set explicitly for stable
    /// sessions across restarts.
    #[serde(default = "default_auth_secret")]
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_auth_secret(),
        }
    }
}

/// Survey form configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// Path to the survey form template served at `/survey/{token}`.
    #[serde(default = "default_form_template")]
    pub form_template: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            form_template: default_form_template(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite://survey_database.db?mode=rwc".to_string()
}

const fn default_max_connections() -> u32 {
    16
}

const fn default_min_connections() -> u32 {
    1
}

fn default_auth_secret() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn default_form_template() -> String {
    "index.html".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SURVEY_ENV`)
    /// 3. Environment variables with `SURVEY_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SURVEY_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SURVEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SURVEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            survey: SurveyConfig::default(),
        };

        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.starts_with("sqlite://"));
        assert_eq!(config.survey.form_template, "index.html");
        // 32 random bytes, hex encoded
        assert_eq!(config.auth.secret.len(), 64);
    }

    #[test]
    fn test_default_secret_is_unique_per_call() {
        assert_ne!(default_auth_secret(), default_auth_secret());
    }
}
