//! # zonewise-settings
//!
//! Settings are loaded from four layers, lowest priority first:
//! 1. Compiled defaults ([`Settings::default()`])
//! 2. User file `~/.zonewise/config.toml`
//! 3. Project file `./zonewise.toml`
//! 4. Environment variables `ZONEWISE_*`, with `__` separating sections
//!    (`ZONEWISE_SERVER__PORT=8080` sets `server.port`)

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for SettingsError {
    fn from(e: figment::Error) -> Self {
        Self::Figment(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Wrap the provider with retry and circuit breaking.
    pub retry: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".into(),
            model: "claude-sonnet-4-20250514".into(),
            max_tokens: 2048,
            api_key_env: "ANTHROPIC_API_KEY".into(),
            retry: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub database_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: zonewise_dir().join("database").join("zonewise.db"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: true,
        }
    }
}

impl Settings {
    /// Load from all layers.
    pub fn load() -> Result<Self> {
        let settings: Self = Self::figment().extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider chain, public so callers can merge extra layers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let global_path = zonewise_dir().join("config.toml");
        if global_path.exists() {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from("zonewise.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ZONEWISE_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.max_tokens == 0 {
            return Err(SettingsError::InvalidValue {
                field: "llm.max_tokens".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.llm.provider != "anthropic" && self.llm.provider != "mock" {
            return Err(SettingsError::InvalidValue {
                field: "llm.provider".into(),
                reason: format!("unsupported provider '{}'", self.llm.provider),
            });
        }
        Ok(())
    }
}

/// `~/.zonewise`, falling back to /tmp when HOME is unset.
fn zonewise_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".zonewise")
}
