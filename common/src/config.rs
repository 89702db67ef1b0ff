// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use config::{Config as ConfigFile, File, Environment};
use tracing::Level;

use crate::error::AuthError;
use crate::token::TokenOptions;

/// Secrets shorter than this are accepted but logged as weak
const RECOMMENDED_SECRET_LENGTH: usize = 32;

/// Secret shipped in `Config::default()` and config/default.toml
pub const DEV_JWT_SECRET: &str = "dev_secret_change_me_in_production!";

/// Central configuration for the auth server
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub web_server_addr: String,
    /// HMAC secret used to sign and verify session tokens
    pub jwt_secret: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Token issuance and expected claims on validation
    #[serde(default)]
    pub token: TokenOptions,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server_addr: "127.0.0.1:8081".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            log_level: default_log_level(),
            token: TokenOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Locate the config directory
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let config = ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // e.g. APP__JWT_SECRET, APP__TOKEN__EXPIRES_IN
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files, falling back to plain environment variables
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");
                Self::from_plain_env()
            }
        }
    }

    fn from_plain_env() -> Self {
        let defaults = Self::default();

        let web_server_addr = env::var("WEB_SERVER_ADDR")
            .unwrap_or(defaults.web_server_addr);

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or(defaults.jwt_secret);

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or(defaults.log_level);

        let mut token = TokenOptions::default();
        if let Ok(expires_in) = env::var("TOKEN_EXPIRES_IN") {
            token = match token.clone().with_expires_in_str(&expires_in) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Ignoring TOKEN_EXPIRES_IN: {}", e);
                    token
                }
            };
        }
        token.issuer = env::var("TOKEN_ISSUER").ok();
        token.audience = env::var("TOKEN_AUDIENCE").ok();
        token.subject = env::var("TOKEN_SUBJECT").ok();

        Self {
            web_server_addr,
            jwt_secret,
            log_level,
            token,
        }
    }

    /// Check the configuration before the server starts
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::configuration_invalid("jwt_secret must not be empty"));
        }
        if self.uses_dev_secret() {
            tracing::warn!(
                "jwt_secret is the built-in development secret; tokens can be forged by anyone who has seen it"
            );
        } else if self.jwt_secret.len() < RECOMMENDED_SECRET_LENGTH {
            tracing::warn!(
                "jwt_secret is shorter than {} bytes; use a longer secret in production",
                RECOMMENDED_SECRET_LENGTH
            );
        }
        self.tracing_level()?;
        self.token.validate()
    }

    /// Whether the signing secret is still the public development default
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn tracing_level(&self) -> Result<Level, AuthError> {
        Level::from_str(&self.log_level).map_err(|e| {
            AuthError::configuration_invalid(format!("invalid log_level {:?}", self.log_level))
                .with_source(e)
        })
    }

    pub fn secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
