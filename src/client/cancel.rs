//! Cooperative cancellation for in-flight requests.

use std::sync::Arc;

use tokio::sync::watch;

/// Clonable cancellation handle accepted by
/// [`execute_with_cancel`](super::HttpClient::execute_with_cancel) and
/// [`download_with_cancel`](super::HttpClient::download_with_cancel).
///
/// Cancelling closes the underlying connection; the awaiting caller gets
/// [`TransportError::Cancelled`](crate::error::TransportError::Cancelled)
/// and no partial response.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            inner: Arc::new(Inner { tx, rx }),
        }
    }

    /// Fire the token. All clones observe the cancellation; firing twice
    /// is harmless.
    pub fn cancel(&self) {
        let _ = self.inner.tx.send(true);
    }

    /// Whether the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.rx.borrow()
    }

    /// Resolve once the token fires. Returns immediately if it already
    /// has.
    pub async fn cancelled(&self) {
        let mut rx = self.inner.rx.clone();
        // The sender lives in the same Arc, so wait_for cannot fail from
        // sender drop while `self` is alive.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_resolves_immediately() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
