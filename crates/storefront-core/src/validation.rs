//! # Validation Module
//!
//! Input checks for the sign-in, sign-up, profile and address forms.
//!
//! ## Two Strictness Levels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session store (login / register)                                       │
//! │  └── validate_credentials / validate_registration                       │
//! │      Presence only. Any non-empty pair signs in.                        │
//! │                                                                         │
//! │  Forms (CLI front end)                                                  │
//! │  ├── validate_email       local@domain.tld, no whitespace               │
//! │  ├── validate_password    at least 6 characters                         │
//! │  └── validate_address     required fields present                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_credentials, validate_email};
//!
//! assert!(validate_credentials("a@b.com", "pw").is_ok());
//! assert!(validate_credentials("", "pw").is_err());
//! assert!(validate_email("not-an-email").is_err());
//! ```

use crate::error::ValidationError;
use crate::user::Address;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length on the sign-up form.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Presence Checks
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Checks that both sign-in fields are present.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    require("email", email)?;
    require("password", password)
}

/// Checks that all three sign-up fields are present.
pub fn validate_registration(name: &str, email: &str, password: &str) -> ValidationResult<()> {
    require("name", name)?;
    validate_credentials(email, password)
}

// =============================================================================
// Form Checks
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - No whitespace
/// - Exactly one `@` with a non-empty local part
/// - The domain contains a `.` with text on both sides
///
/// ```rust
/// use storefront_core::validation::validate_email;
///
/// assert!(validate_email("john.doe@example.com").is_ok());
/// assert!(validate_email("john@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    require("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("expected exactly one '@' after a name"));
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid("domain must look like example.com")),
    }
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    require("password", password)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
        });
    }
    Ok(())
}

/// Validates the required fields of an address form.
pub fn validate_address(address: &Address) -> ValidationResult<()> {
    let fields = [
        ("name", &address.name),
        ("line1", &address.line1),
        ("city", &address.city),
        ("state", &address.state),
        ("postal code", &address.postal_code),
        ("country", &address.country),
    ];

    for (field, value) in fields {
        require(field, value.trim())?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::demo_user;

    #[test]
    fn test_credentials_presence() {
        assert_eq!(
            validate_credentials("", "x"),
            Err(ValidationError::required("email"))
        );
        assert_eq!(
            validate_credentials("x", ""),
            Err(ValidationError::required("password"))
        );
        assert!(validate_credentials("", "").is_err());
        // presence only, no format check
        assert!(validate_credentials("x", "y").is_ok());
    }

    #[test]
    fn test_registration_presence() {
        assert_eq!(
            validate_registration("", "a@b.com", "pw"),
            Err(ValidationError::required("name"))
        );
        assert!(validate_registration("Ada", "a@b.com", "pw").is_ok());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@b.").is_err());
        assert!(validate_email("ab.com").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_address_required_fields() {
        let mut address = demo_user().addresses[1].clone();
        assert!(validate_address(&address).is_ok());

        address.city = "  ".to_string();
        assert_eq!(
            validate_address(&address),
            Err(ValidationError::required("city"))
        );
    }
}
