//! Configuration file support for scm-bridge.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `SCM_BRIDGE_`, e.g., `SCM_BRIDGE_CODING_TOKEN`)
//! 3. Config file (~/.config/scm-bridge/config.toml or ./scm-bridge.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [coding]
//! host = "https://e.coding.net"  # or a private deployment
//! token = "..."                  # or use SCM_BRIDGE_CODING_TOKEN env var
//!
//! [webhook]
//! secret = "..."  # token expected in X-Gitlab-Token; empty skips verification
//!
//! [http]
//! timeout = 30  # seconds
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Default Coding host; the driver appends `/open-api`.
pub const DEFAULT_CODING_HOST: &str = "https://e.coding.net";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coding configuration.
    pub coding: CodingConfig,
    /// Webhook verification.
    pub webhook: WebhookConfig,
    /// HTTP transport settings.
    pub http: HttpConfig,
}

/// Coding configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodingConfig {
    /// Coding host or open-api URL.
    /// Can also be set via SCM_BRIDGE_CODING_HOST environment variable.
    pub host: String,
    /// Personal access token.
    /// Can also be set via SCM_BRIDGE_CODING_TOKEN environment variable.
    pub token: Option<String>,
}

impl Default for CodingConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CODING_HOST.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Shared secret compared against the delivery token header.
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/scm-bridge/config.toml)
    /// 3. Local config file (./scm-bridge.toml)
    /// 4. Environment variables with SCM_BRIDGE_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::default_config_path()
            && path.exists()
        {
            tracing::debug!("Loading config from {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let local_config = PathBuf::from("scm-bridge.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./scm-bridge.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., SCM_BRIDGE_CODING_TOKEN -> coding.token
        builder = builder.add_source(
            Environment::with_prefix("SCM_BRIDGE")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Coding token, empty when unset.
    pub fn coding_token(&self) -> String {
        self.coding.token.clone().unwrap_or_default()
    }

    /// Webhook secret, empty when unset.
    pub fn webhook_secret(&self) -> String {
        self.webhook.secret.clone().unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "scm-bridge").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
