//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core (this file)                                            │
//! │  ├── CoreError        - Domain failures (checkout, lookups)             │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  storefront-db                                                          │
//! │  ├── DbError          - Storage failures                                │
//! │  └── SnapshotError    - Persisted record could not be read              │
//! │                                                                         │
//! │  apps/cli                                                               │
//! │  └── AppError         - What the user sees (code + message)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Most store operations never return these: cart operations on unknown
//! ids are no-ops and failed logins are a plain `false`. The errors exist
//! for the callers that want the reason.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Address id is not in the user's address book.
    ///
    /// ## When This Occurs
    /// - Checkout with an explicit address id the user does not own
    /// - Checkout for a user with an empty address book
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a logged-in session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. an email without `@`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
