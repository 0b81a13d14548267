use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default per-request transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

type AuthFailureHook = Arc<dyn Fn() + Send + Sync>;

/// Shared client configuration: transport timeout, current bearer token,
/// and an optional authentication-failure hook.
///
/// One session is shared by every call going through a
/// [`CourierClient`](crate::CourierClient). The token lives behind a lock
/// and is snapshotted at request-build time, so an external authentication
/// flow may replace it at any moment; in-flight calls keep the snapshot
/// they were built with.
pub struct Session {
    timeout: Duration,
    token: RwLock<Option<String>>,
    auth_failure: Option<AuthFailureHook>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("timeout", &self.timeout)
            .field("token", &"<redacted>")
            .field("auth_failure", &self.auth_failure.is_some())
            .finish()
    }
}

impl Session {
    /// Creates a session with the default timeout and no token.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            token: RwLock::new(None),
            auth_failure: None,
        }
    }

    /// Sets the per-request transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Installs a hook for the application to fire on authentication
    /// failures.
    ///
    /// The client never invokes this itself — detecting an auth failure
    /// (e.g. a 401 response) and calling
    /// [`notify_auth_failure`](Session::notify_auth_failure) is the
    /// integrating application's decision.
    pub fn on_auth_failure(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.auth_failure = Some(Arc::new(hook));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replaces the current bearer token. `None` clears it.
    pub fn set_auth_token(&self, token: Option<String>) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token;
    }

    /// Snapshot of the current bearer token.
    pub fn auth_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Fires the stored authentication-failure hook, if any.
    pub fn notify_auth_failure(&self) {
        if let Some(hook) = &self.auth_failure {
            hook();
        }
    }
}
