//! # Session State
//!
//! ```text
//!                 login / register
//!   ┌───────────┐ ───────────────► ┌────────────┐   success   ┌──────────┐
//!   │ LoggedOut │                  │ LoggingIn  │ ──────────► │ LoggedIn │
//!   └───────────┘ ◄─────────────── └────────────┘             └──────────┘
//!        ▲           empty input                                   │
//!        └─────────────────────────── logout ──────────────────────┘
//! ```
//!
//! Only `user` and `is_authenticated` are persisted; `is_loading` is
//! transient and always restores as `false`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::user::User;

/// Derived lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AuthPhase {
    LoggedOut,
    LoggingIn,
    LoggedIn,
}

/// The auth/session snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionState {
    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub is_authenticated: bool,

    #[serde(skip)]
    pub is_loading: bool,
}

impl SessionState {
    /// A signed-in session for `user`.
    pub fn signed_in(user: User) -> Self {
        SessionState {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::LoggingIn
        } else if self.is_authenticated {
            AuthPhase::LoggedIn
        } else {
            AuthPhase::LoggedOut
        }
    }

    /// Clears the profile and the authenticated flag.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::demo_user;

    #[test]
    fn test_phase() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), AuthPhase::LoggedOut);

        state.is_loading = true;
        assert_eq!(state.phase(), AuthPhase::LoggingIn);

        state = SessionState::signed_in(demo_user());
        assert_eq!(state.phase(), AuthPhase::LoggedIn);

        state.sign_out();
        assert_eq!(state.phase(), AuthPhase::LoggedOut);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_loading_flag_is_not_persisted() {
        let mut state = SessionState::signed_in(demo_user());
        state.is_loading = true;

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("isLoading").is_none());
        assert_eq!(json["isAuthenticated"], true);

        let back: SessionState = serde_json::from_value(json).unwrap();
        assert!(!back.is_loading);
        assert_eq!(back.user.unwrap().id, "1");
    }
}
