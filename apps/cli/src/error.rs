//! # CLI Error Type
//!
//! Every subcommand returns `Result<String, AppError>`. On error the binary
//! prints `error[CODE]: message` to stderr and exits with status 1.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError ─────┐                                                       │
//! │  ValidationError┼──► AppError { code, message } ──► stderr, exit(1)     │
//! │  StateError ────┤                                                       │
//! │  DbError ───────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::Serialize;

use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;
use storefront_state::StateError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code.
    pub code: ErrorCode,

    /// Human-readable message.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, address or order not found.
    NotFound,

    /// Input validation failed.
    ValidationError,

    /// The command needs a signed-in session.
    NotAuthenticated,

    /// Checkout could not proceed.
    CheckoutError,

    /// Config file missing fields or out of range.
    ConfigError,

    /// Storage could not be opened or written.
    DatabaseError,

    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::CheckoutError => "CHECKOUT_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        };
        f.write_str(code)
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_authenticated() -> Self {
        AppError::new(
            ErrorCode::NotAuthenticated,
            "Not signed in. Run `storefront auth login` first.",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::AddressNotFound(id) => AppError::not_found("Address", &id),
            CoreError::EmptyCart => AppError::new(ErrorCode::CheckoutError, "Cart is empty"),
            CoreError::NotAuthenticated => AppError::not_authenticated(),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Could not open storefront database")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => {
                tracing::error!("Database error: {}", other);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Config(msg) | StateError::ConfigLoad(msg) | StateError::ConfigSave(msg) => {
                AppError::new(ErrorCode::ConfigError, msg)
            }
            StateError::Db(e) => AppError::from(e),
            StateError::Channel(msg) => AppError::internal(msg),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err = AppError::from(CoreError::ProductNotFound("42".into()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.to_string(), "error[NOT_FOUND]: Product not found: 42");

        let err = AppError::from(CoreError::EmptyCart);
        assert_eq!(err.code, ErrorCode::CheckoutError);
    }

    #[test]
    fn test_config_error_mapping() {
        let err = AppError::from(StateError::Config("bad".into()));
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.message, "bad");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&AppError::not_authenticated()).unwrap();
        assert!(json.starts_with(r#"{"code":"NOT_AUTHENTICATED","message":"#));
    }
}
