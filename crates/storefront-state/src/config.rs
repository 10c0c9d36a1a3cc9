//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     STOREFRONT_DB_PATH=/tmp/shop.db                                     │
//! │     STOREFRONT_AUTH_LATENCY_MS=0                                        │
//! │     STOREFRONT_TAX_RATE_BPS=825                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/storefront/storefront.toml (Linux)                        │
//! │     ~/Library/Application Support/com.storefront.storefront/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `STOREFRONT_COLOR_SCHEME` is not a config override. The host scheme
//! source reads it on every call unless `[theme] host_scheme` pins it.
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! path = "/path/to/storefront.db"
//! max_connections = 2
//!
//! [auth]
//! simulated_latency_ms = 1000
//!
//! [checkout]
//! tax_rate_bps = 1000
//!
//! [theme]
//! host_scheme = "light"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use storefront_core::{ColorScheme, TaxRate, DEFAULT_AUTH_LATENCY_MS};

use crate::error::{StateError, StateResult};

pub const ENV_DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const ENV_AUTH_LATENCY_MS: &str = "STOREFRONT_AUTH_LATENCY_MS";
pub const ENV_TAX_RATE_BPS: &str = "STOREFRONT_TAX_RATE_BPS";
pub const ENV_COLOR_SCHEME: &str = "STOREFRONT_COLOR_SCHEME";

const CONFIG_FILE: &str = "storefront.toml";
const DATABASE_FILE: &str = "storefront.db";

/// Upper bound on the simulated sign-in delay.
const MAX_AUTH_LATENCY_MS: u64 = 60_000;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Defaults to `storefront.db` in the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    2
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Simulated network round-trip for sign-in and sign-up.
    #[serde(default = "default_latency")]
    pub simulated_latency_ms: u64,
}

fn default_latency() -> u64 {
    DEFAULT_AUTH_LATENCY_MS
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            simulated_latency_ms: default_latency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    TaxRate::CHECKOUT_DEFAULT.bps()
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Forces the host color scheme. Unset means "ask the environment".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_scheme: Option<ColorScheme>,
}

// =============================================================================
// Storefront Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub theme: ThemeSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StateResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> StateResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StateError::ConfigSave("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::ConfigSave(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StateError::ConfigSave(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StateResult<()> {
        if self.storage.max_connections == 0 {
            return Err(StateError::Config(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.auth.simulated_latency_ms > MAX_AUTH_LATENCY_MS {
            return Err(StateError::Config(format!(
                "auth.simulated_latency_ms must be at most {}",
                MAX_AUTH_LATENCY_MS
            )));
        }

        if self.checkout.tax_rate_bps > 10_000 {
            return Err(StateError::Config(
                "checkout.tax_rate_bps must be between 0 and 10000".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(latency) = lookup(ENV_AUTH_LATENCY_MS) {
            match latency.parse::<u64>() {
                Ok(ms) => self.auth.simulated_latency_ms = ms,
                Err(_) => warn!(value = %latency, "Ignoring invalid {}", ENV_AUTH_LATENCY_MS),
            }
        }

        if let Some(bps) = lookup(ENV_TAX_RATE_BPS) {
            match bps.parse::<u32>() {
                Ok(bps) => self.checkout.tax_rate_bps = bps,
                Err(_) => warn!(value = %bps, "Ignoring invalid {}", ENV_TAX_RATE_BPS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured database path, else `storefront.db` in the data dir,
    /// else the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth.simulated_latency_ms)
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.checkout.tax_rate_bps)
    }
}
