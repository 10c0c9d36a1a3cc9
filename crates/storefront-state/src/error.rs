//! # State Error Types
//!
//! Store mutations never return these; they are for setup (config, opening
//! storage) and for the explicit `flush` / `shutdown` calls.

use thiserror::Error;

use storefront_db::DbError;

/// Result type alias for state-layer operations.
pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration is present but invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSave(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// The persistence writer is gone.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Db(#[from] DbError),
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for StateError {
    fn from(err: toml::de::Error) -> Self {
        StateError::ConfigLoad(err.to_string())
    }
}

impl From<toml::ser::Error> for StateError {
    fn from(err: toml::ser::Error) -> Self {
        StateError::ConfigSave(err.to_string())
    }
}
