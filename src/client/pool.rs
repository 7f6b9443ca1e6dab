//! Idle HTTP/1.1 connection pool.
//!
//! Reuse is an optimization, never a correctness requirement: a handle
//! that went stale while idle is discarded and the caller dials a fresh
//! connection. The pool is populated lazily and torn down by
//! [`HttpClient::shutdown`](super::HttpClient::shutdown).

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::Full;
use hyper::client::conn::http1::SendRequest;
use tokio::sync::Mutex;

pub(crate) type PooledSender = SendRequest<Full<Bytes>>;

/// Key identifying connections that may serve the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PoolKey {
    pub https: bool,
    pub host: String,
    pub port: u16,
}

pub(crate) struct ConnectionPool {
    idle: Mutex<HashMap<PoolKey, Vec<PooledSender>>>,
    max_idle_per_host: usize,
}

impl ConnectionPool {
    pub(crate) fn new(max_idle_per_host: usize) -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
            max_idle_per_host,
        }
    }

    /// Take an idle, still-usable handle for `key`, skipping stale ones.
    pub(crate) async fn checkout(&self, key: &PoolKey) -> Option<PooledSender> {
        let mut idle = self.idle.lock().await;
        let list = idle.get_mut(key)?;
        while let Some(sender) = list.pop() {
            if sender.is_closed() || !sender.is_ready() {
                tracing::debug!(host = %key.host, port = key.port, "discarding stale pooled connection");
                continue;
            }
            return Some(sender);
        }
        None
    }

    /// Return a handle after the response body has been fully consumed.
    pub(crate) async fn checkin(&self, key: PoolKey, sender: PooledSender) {
        if sender.is_closed() {
            return;
        }
        let mut idle = self.idle.lock().await;
        let list = idle.entry(key).or_default();
        if list.len() < self.max_idle_per_host {
            list.push(sender);
        } else {
            tracing::debug!("idle limit reached, dropping connection");
        }
    }

    /// Drop every idle handle, closing the underlying connections.
    pub(crate) async fn clear(&self) {
        self.idle.lock().await.clear();
    }
}
