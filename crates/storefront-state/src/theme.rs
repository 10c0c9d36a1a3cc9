//! # Theme Store
//!
//! Holds the display-mode preference and resolves it against the host's
//! color scheme at read time. Only the preference is persisted; the
//! effective scheme for `System` follows the host on every read.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use storefront_core::{ColorScheme, ThemePreference};
use storefront_db::{snapshot, KeyValueStore, LoadStatus};

use crate::config::ENV_COLOR_SCHEME;
use crate::persist::PersistHandle;
use crate::THEME_STORAGE_KEY;

// =============================================================================
// Host Color Scheme
// =============================================================================

/// Reports the host's current color scheme.
pub trait ColorSchemeSource: Send + Sync {
    fn current(&self) -> ColorScheme;
}

/// Always reports the same scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedColorScheme(pub ColorScheme);

impl ColorSchemeSource for FixedColorScheme {
    fn current(&self) -> ColorScheme {
        self.0
    }
}

/// Follows a `watch` channel fed by whatever observes the host.
#[derive(Debug, Clone)]
pub struct WatchColorScheme {
    rx: watch::Receiver<ColorScheme>,
}

impl WatchColorScheme {
    pub fn new(rx: watch::Receiver<ColorScheme>) -> Self {
        WatchColorScheme { rx }
    }

    /// A source plus the sender that drives it.
    pub fn channel(initial: ColorScheme) -> (watch::Sender<ColorScheme>, Self) {
        let (tx, rx) = watch::channel(initial);
        (tx, WatchColorScheme { rx })
    }
}

impl ColorSchemeSource for WatchColorScheme {
    fn current(&self) -> ColorScheme {
        *self.rx.borrow()
    }
}

/// Reads `STOREFRONT_COLOR_SCHEME` on every call. Unset or unknown is light.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvColorScheme;

impl ColorSchemeSource for EnvColorScheme {
    fn current(&self) -> ColorScheme {
        std::env::var(ENV_COLOR_SCHEME)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Persisted shape: `{ "theme": "system" }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    pub theme: ThemePreference,
}

// =============================================================================
// Theme Store
// =============================================================================

#[derive(Clone)]
pub struct ThemeStore {
    preference: Arc<Mutex<ThemePreference>>,
    host: Arc<dyn ColorSchemeSource>,
    persist: PersistHandle,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("preference", &self.preference())
            .field("host", &self.host.current())
            .finish()
    }
}

impl ThemeStore {
    /// Starts at `System`.
    pub fn new(host: Arc<dyn ColorSchemeSource>, persist: PersistHandle) -> Self {
        ThemeStore::with_preference(ThemePreference::default(), host, persist)
    }

    fn with_preference(
        preference: ThemePreference,
        host: Arc<dyn ColorSchemeSource>,
        persist: PersistHandle,
    ) -> Self {
        ThemeStore {
            preference: Arc::new(Mutex::new(preference)),
            host,
            persist,
        }
    }

    /// Restores `theme-storage`, falling back to `System`.
    pub async fn rehydrate<S: KeyValueStore>(
        store: &S,
        host: Arc<dyn ColorSchemeSource>,
        persist: PersistHandle,
    ) -> (Self, LoadStatus) {
        let (snapshot, status) =
            snapshot::load_or_default::<ThemeSnapshot, _>(store, THEME_STORAGE_KEY)
                .await
                .resolve();
        info!(?status, theme = %snapshot.theme, "Theme rehydrated");
        (ThemeStore::with_preference(snapshot.theme, host, persist), status)
    }

    fn lock(&self) -> MutexGuard<'_, ThemePreference> {
        self.preference.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_theme(&self, theme: ThemePreference) {
        let mut preference = self.lock();
        *preference = theme;
        self.persist
            .write(THEME_STORAGE_KEY, &ThemeSnapshot { theme });
        debug!(%theme, "Theme preference set");
    }

    pub fn preference(&self) -> ThemePreference {
        *self.lock()
    }

    /// The scheme to render with right now.
    pub fn effective_mode(&self) -> ColorScheme {
        self.preference().resolve(self.host.current())
    }

    pub fn host_scheme(&self) -> ColorScheme {
        self.host.current()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_db::MemoryStore;

    fn store(host: ColorScheme) -> ThemeStore {
        ThemeStore::new(
            Arc::new(FixedColorScheme(host)),
            PersistHandle::detached(),
        )
    }

    #[test]
    fn test_defaults_to_system() {
        let theme = store(ColorScheme::Dark);
        assert_eq!(theme.preference(), ThemePreference::System);
        assert_eq!(theme.effective_mode(), ColorScheme::Dark);
    }

    #[test]
    fn test_explicit_preference_ignores_host() {
        let theme = store(ColorScheme::Light);
        theme.set_theme(ThemePreference::Dark);
        assert_eq!(theme.effective_mode(), ColorScheme::Dark);

        let theme = store(ColorScheme::Dark);
        theme.set_theme(ThemePreference::Light);
        assert_eq!(theme.effective_mode(), ColorScheme::Light);
    }

    #[test]
    fn test_system_tracks_host_changes() {
        let (tx, source) = WatchColorScheme::channel(ColorScheme::Light);
        let theme = ThemeStore::new(Arc::new(source), PersistHandle::detached());
        assert_eq!(theme.effective_mode(), ColorScheme::Light);

        tx.send(ColorScheme::Dark).unwrap();
        assert_eq!(theme.effective_mode(), ColorScheme::Dark);

        theme.set_theme(ThemePreference::Light);
        assert_eq!(theme.effective_mode(), ColorScheme::Light);
    }

    #[tokio::test]
    async fn test_persisted_shape_and_rehydrate() {
        let kv = MemoryStore::new();
        let persist = PersistHandle::spawn(kv.clone());
        let theme = ThemeStore::new(Arc::new(FixedColorScheme::default()), persist.clone());
        theme.set_theme(ThemePreference::Dark);
        persist.flush().await.unwrap();

        let raw = kv.get(THEME_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"state":{"theme":"dark"},"version":0}"#);

        let (restored, status) = ThemeStore::rehydrate(
            &kv,
            Arc::new(FixedColorScheme::default()),
            PersistHandle::detached(),
        )
        .await;
        assert_eq!(status, LoadStatus::Restored);
        assert_eq!(restored.preference(), ThemePreference::Dark);
    }

    #[tokio::test]
    async fn test_unknown_preference_falls_back_to_system() {
        let kv = MemoryStore::new();
        kv.set(THEME_STORAGE_KEY, r#"{"state":{"theme":"sepia"},"version":0}"#)
            .await
            .unwrap();

        let (theme, status) = ThemeStore::rehydrate(
            &kv,
            Arc::new(FixedColorScheme::default()),
            PersistHandle::detached(),
        )
        .await;
        assert_eq!(status, LoadStatus::Fallback);
        assert_eq!(theme.preference(), ThemePreference::System);
    }
}
