//! # Session Store
//!
//! Sign-in state, the signed-in profile and its address book.
//!
//! ## Request Tokens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin_login(...)  ──► token #7 issued, #7 becomes the live request     │
//! │        │               is_loading = true                                │
//! │        ▼                                                                │
//! │  sleep(simulated latency)                                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  still live? ──yes──► attach profile, persist ──► Authenticated         │
//! │        │                                                                │
//! │        no  (cancel(#7), or begin_login issued #8 meanwhile)             │
//! │        └────────────► session untouched        ──► Cancelled            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only one request is live at a time. The newest one wins; whatever it
//! superseded resolves as `Cancelled` without touching the session.
//!
//! Empty fields are rejected up front, before any delay. A rejected
//! attempt never signs an existing session out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use storefront_core::user::registered_user;
use storefront_core::validation::{validate_credentials, validate_registration};
use storefront_core::{
    Address, AuthPhase, SessionState, User, UserPatch, ValidationError, DEFAULT_AUTH_LATENCY_MS,
};
use storefront_db::{snapshot, KeyValueStore, LoadStatus};

use crate::persist::PersistHandle;
use crate::AUTH_STORAGE_KEY;

// =============================================================================
// Request Token / Outcome
// =============================================================================

/// Identifies one sign-in or sign-up attempt. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// How an auth attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session is now signed in.
    Authenticated,
    /// Input was rejected; the session is unchanged.
    Rejected(ValidationError),
    /// Cancelled or superseded; the session is unchanged.
    Cancelled,
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

/// An in-flight auth attempt.
#[derive(Debug)]
pub struct PendingAuth {
    pub token: RequestToken,
    pub handle: JoinHandle<AuthOutcome>,
}

impl PendingAuth {
    /// Waits for the attempt to finish.
    pub async fn wait(self) -> AuthOutcome {
        self.handle.await.unwrap_or(AuthOutcome::Cancelled)
    }
}

enum AuthRequest {
    Login,
    Register { name: String, email: String },
}

// =============================================================================
// Session Store
// =============================================================================

struct Inner {
    state: SessionState,
    /// Token of the request allowed to complete, if any.
    live: Option<RequestToken>,
}

struct Shared {
    inner: Mutex<Inner>,
    next_token: AtomicU64,
    latency: Duration,
    persist: PersistHandle,
}

/// Cloneable handle to the session.
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("phase", &self.phase())
            .field("latency", &self.shared.latency)
            .finish()
    }
}

impl SessionStore {
    /// A signed-out session using the default simulated latency.
    pub fn new(persist: PersistHandle) -> Self {
        SessionStore::with_latency(persist, Duration::from_millis(DEFAULT_AUTH_LATENCY_MS))
    }

    pub fn with_latency(persist: PersistHandle, latency: Duration) -> Self {
        SessionStore::from_state(SessionState::default(), persist, latency)
    }

    fn from_state(state: SessionState, persist: PersistHandle, latency: Duration) -> Self {
        SessionStore {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner { state, live: None }),
                next_token: AtomicU64::new(0),
                latency,
                persist,
            }),
        }
    }

    /// Restores `auth-storage`, falling back to signed out.
    pub async fn rehydrate<S: KeyValueStore>(
        store: &S,
        persist: PersistHandle,
        latency: Duration,
    ) -> (Self, LoadStatus) {
        let (mut state, status) =
            snapshot::load_or_default::<SessionState, _>(store, AUTH_STORAGE_KEY)
                .await
                .resolve();

        if state.is_authenticated && state.user.is_none() {
            debug!("Authenticated flag without a user, restoring signed out");
            state.is_authenticated = false;
        }

        info!(?status, authenticated = state.is_authenticated, "Session rehydrated");
        (SessionStore::from_state(state, persist, latency), status)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &SessionState) {
        self.shared.persist.write(AUTH_STORAGE_KEY, state);
    }

    // =========================================================================
    // Auth Requests
    // =========================================================================

    /// Starts a sign-in attempt on the tokio runtime.
    pub fn begin_login(&self, email: &str, password: &str) -> PendingAuth {
        let validation = validate_credentials(email, password);
        self.begin(AuthRequest::Login, validation)
    }

    /// Starts a sign-up attempt on the tokio runtime.
    pub fn begin_register(&self, name: &str, email: &str, password: &str) -> PendingAuth {
        let validation = validate_registration(name, email, password);
        let request = AuthRequest::Register {
            name: name.to_string(),
            email: email.to_string(),
        };
        self.begin(request, validation)
    }

    /// Signs in. Returns `false` for empty input or a cancelled attempt.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.begin_login(email, password).wait().await.is_authenticated()
    }

    /// Signs up and in. Returns `false` for empty input or a cancelled attempt.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> bool {
        self.begin_register(name, email, password)
            .wait()
            .await
            .is_authenticated()
    }

    /// Marks an attempt stale. Returns `true` if it was still live.
    pub fn cancel(&self, token: RequestToken) -> bool {
        let mut inner = self.lock();
        if inner.live != Some(token) {
            return false;
        }
        inner.live = None;
        inner.state.is_loading = false;
        debug!(token = token.value(), "Auth request cancelled");
        true
    }

    fn begin(
        &self,
        request: AuthRequest,
        validation: Result<(), ValidationError>,
    ) -> PendingAuth {
        let token = RequestToken(self.shared.next_token.fetch_add(1, Ordering::SeqCst) + 1);

        {
            let mut inner = self.lock();
            if let Some(previous) = inner.live.replace(token) {
                debug!(superseded = previous.value(), by = token.value(), "Auth request superseded");
            }
            inner.state.is_loading = true;
        }
        debug!(token = token.value(), "Auth request started");

        let store = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(reason) = validation {
                return store.finish(token, |_| AuthOutcome::Rejected(reason));
            }

            tokio::time::sleep(store.shared.latency).await;

            store.finish(token, |state| {
                let user = match request {
                    AuthRequest::Login => storefront_core::user::demo_user(),
                    AuthRequest::Register { name, email } => registered_user(&name, &email),
                };
                info!(user_id = %user.id, "Signed in");
                *state = SessionState::signed_in(user);
                AuthOutcome::Authenticated
            })
        });

        PendingAuth { token, handle }
    }

    /// Completes `token` if it is still live.
    fn finish<F>(&self, token: RequestToken, apply: F) -> AuthOutcome
    where
        F: FnOnce(&mut SessionState) -> AuthOutcome,
    {
        let mut inner = self.lock();
        if inner.live != Some(token) {
            debug!(token = token.value(), "Discarding stale auth result");
            return AuthOutcome::Cancelled;
        }

        inner.live = None;
        inner.state.is_loading = false;

        let outcome = apply(&mut inner.state);
        match &outcome {
            AuthOutcome::Authenticated => self.persist(&inner.state),
            AuthOutcome::Rejected(reason) => debug!(%reason, "Auth request rejected"),
            AuthOutcome::Cancelled => {}
        }
        outcome
    }

    // =========================================================================
    // Session Mutations
    // =========================================================================

    /// Signs out immediately. Any in-flight attempt is left to finish.
    pub fn logout(&self) {
        let mut inner = self.lock();
        inner.state.sign_out();
        self.persist(&inner.state);
        info!("Signed out");
    }

    /// Applies `f` to the signed-in user and persists. No-op when signed out.
    fn with_user_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut User) -> R,
    {
        let mut inner = self.lock();
        let result = f(inner.state.user.as_mut()?);
        self.persist(&inner.state);
        Some(result)
    }

    /// Shallow-merges `patch` into the profile.
    ///
    /// Returns `false` when no one is signed in.
    pub fn update_user(&self, patch: UserPatch) -> bool {
        debug!(
            name = patch.name.is_some(),
            email = patch.email.is_some(),
            addresses = patch.addresses.as_ref().map(Vec::len),
            "Updating profile"
        );
        self.with_user_mut(|user| user.apply(patch)).is_some()
    }

    /// Inserts or replaces an address by id.
    pub fn save_address(&self, address: Address) -> bool {
        debug!(address_id = %address.id, is_default = address.is_default(), "Saving address");
        self.with_user_mut(|user| user.upsert_address(address)).is_some()
    }

    /// Returns `true` if the address existed and was removed.
    pub fn remove_address(&self, id: &str) -> bool {
        debug!(address_id = %id, "Removing address");
        self.with_user_mut(|user| user.remove_address(id))
            .unwrap_or(false)
    }

    /// Returns `true` if the address exists and is now the only default.
    pub fn set_default_address(&self, id: &str) -> bool {
        debug!(address_id = %id, "Setting default address");
        self.with_user_mut(|user| user.set_default_address(id))
            .unwrap_or(false)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().state.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading
    }

    pub fn phase(&self) -> AuthPhase {
        self.lock().state.phase()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
