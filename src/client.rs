use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::sleep;

use crate::{
    build::build_request, retry::RetryState, CourierError, RequestDescriptor, Response, Result,
    Session,
};

/// Cancellation handle for in-flight calls.
///
/// Cloneable and sticky: once [`cancel`](CancelToken::cancel) fires, every
/// call the token was passed to aborts its transport attempt and any
/// pending retry wait, surfacing [`CourierError::Cancelled`], and later
/// calls with the same token fail immediately.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts every call this token was passed to.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    async fn cancelled_wait(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel()
            // cannot slip between the check and the wait.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Async HTTP client executing [`RequestDescriptor`] calls.
///
/// Cloning is cheap; clones share the underlying connection pool and the
/// [`Session`], so a token set through any clone is seen by all of them.
///
/// ```no_run
/// use courier_http::{CourierClient, RequestDescriptor};
///
/// # async fn run() -> courier_http::Result<()> {
/// let client = CourierClient::new();
/// client.set_auth_token(Some("my-token".to_owned()));
///
/// let descriptor = RequestDescriptor::new("https://api.example.com")
///     .api_path("/v1")
///     .resource("/users")
///     .endpoint("/42");
/// let response = client.execute(&descriptor).await?;
/// println!("status = {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CourierClient {
    http: reqwest::Client,
    session: Arc<Session>,
}

impl fmt::Debug for CourierClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourierClient")
            .field("session", &self.session)
            .finish()
    }
}

impl Default for CourierClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CourierClient {
    /// Creates a client over a default [`Session`].
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    /// Creates a client over an explicitly configured session.
    pub fn with_session(session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            session: Arc::new(session),
        }
    }

    /// Shared session, e.g. for an authentication flow to update the token
    /// or fire the auth-failure hook.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Replaces the current bearer token. `None` clears it.
    pub fn set_auth_token(&self, token: Option<String>) {
        self.session.set_auth_token(token);
    }

    /// Executes one descriptor to completion.
    ///
    /// A completed HTTP exchange is `Ok` whatever its status code; only
    /// transport-level failures (connect, timeout, TLS, interrupted body)
    /// are errors, and those are retried per the descriptor's
    /// [`RetryPolicy`](crate::RetryPolicy) before the last error is
    /// surfaced verbatim. Build failures are never retried.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        self.run(descriptor, None).await
    }

    /// Like [`execute`](CourierClient::execute), but abortable through the
    /// given token.
    pub async fn execute_with_cancel(
        &self,
        descriptor: &RequestDescriptor,
        cancel: &CancelToken,
    ) -> Result<Response> {
        self.run(descriptor, Some(cancel)).await
    }

    async fn run(
        &self,
        descriptor: &RequestDescriptor,
        cancel: Option<&CancelToken>,
    ) -> Result<Response> {
        let mut retry = descriptor.retry.map(RetryState::new);

        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(CourierError::Cancelled);
            }

            // The whole pipeline re-runs on every attempt: the token is
            // re-snapshotted, so one refreshed mid-retry is picked up.
            let token = self.session.auth_token();
            let request = build_request(descriptor, token.as_deref(), self.session.timeout())?;

            let outcome = match cancel {
                Some(cancel) => tokio::select! {
                    outcome = self.dispatch(request) => outcome,
                    () = cancel.cancelled_wait() => return Err(CourierError::Cancelled),
                },
                None => self.dispatch(request).await,
            };

            let err = match outcome {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let Some(delay) = retry.as_mut().and_then(RetryState::next_delay) else {
                return Err(CourierError::Transport(err));
            };

            #[cfg(feature = "tracing")]
            tracing::debug!("retrying after {} ms: {err}", delay.as_millis());

            match cancel {
                Some(cancel) => tokio::select! {
                    () = sleep(delay) => {}
                    () = cancel.cancelled_wait() => return Err(CourierError::Cancelled),
                },
                None => sleep(delay).await,
            }
        }
    }

    /// One transport attempt. Any HTTP status is a success at this layer.
    async fn dispatch(
        &self,
        request: reqwest::Request,
    ) -> std::result::Result<Response, reqwest::Error> {
        let response = self.http.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(bytes.to_vec())
        };
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelToken, CourierClient};

    #[test]
    fn cancel_token_is_sticky_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn debug_does_not_leak_the_session_token() {
        let client = CourierClient::new();
        client.set_auth_token(Some("secret-token".to_owned()));
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
    }
}
