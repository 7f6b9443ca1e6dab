//! The transport: executes request descriptors over HTTP/1.1.
//!
//! [`HttpClient`] is caller-owned with an explicit lifecycle: construct,
//! execute/download, [`shutdown`](HttpClient::shutdown). There is no
//! process-wide client. Cloning shares the connection pool and the
//! statistics counters. Any number of calls may be in flight at once;
//! nothing is retried internally.

mod cancel;
mod download;
mod pool;
mod stats;

pub use cancel::CancelToken;
pub use stats::{ClientStats, StatsSnapshot};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderValue, HOST, USER_AGENT};
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::http::{RawResponse, RequestDescriptor};
use pool::{ConnectionPool, PoolKey, PooledSender};

/// Asynchronous HTTP/1.1 transport with an optional connection pool.
#[derive(Clone)]
pub struct HttpClient {
    config: ClientConfig,
    pool: Arc<ConnectionPool>,
    stats: Arc<ClientStats>,
    tls: TlsConnector,
}

impl HttpClient {
    /// A client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        // The default configuration is within bounds; see the config tests.
        Self::from_config(ClientConfig::default())
    }

    /// A client with the given configuration. Out-of-bounds values are
    /// rejected; see [`ClientConfig::validate`].
    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: ClientConfig) -> Self {
        let pool = Arc::new(ConnectionPool::new(config.pool_max_idle_per_host));
        Self {
            config,
            pool,
            stats: Arc::new(ClientStats::default()),
            tls: tls_connector(),
        }
    }

    /// The transport counters shared by all clones of this client.
    #[must_use]
    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// Execute a request and buffer the full response.
    ///
    /// Suspends the calling task until the response body has arrived;
    /// other requests proceed concurrently. The deadline is the
    /// descriptor's timeout, falling back to the configured default;
    /// exceeding it yields [`TransportError::Timeout`].
    pub async fn execute(
        &self,
        request: RequestDescriptor,
    ) -> Result<RawResponse, TransportError> {
        self.run(request, None).await
    }

    /// [`execute`](Self::execute), abandoning the request when `cancel`
    /// fires. Cancellation closes the connection and yields
    /// [`TransportError::Cancelled`]; no partial response is delivered.
    pub async fn execute_with_cancel(
        &self,
        request: RequestDescriptor,
        cancel: &CancelToken,
    ) -> Result<RawResponse, TransportError> {
        self.run(request, Some(cancel)).await
    }

    /// Close all pooled connections. In-flight requests are unaffected;
    /// the client remains usable and will dial fresh connections.
    pub async fn shutdown(&self) {
        self.pool.clear().await;
    }

    async fn run(
        &self,
        request: RequestDescriptor,
        cancel: Option<&CancelToken>,
    ) -> Result<RawResponse, TransportError> {
        self.stats.record_request();
        let deadline = request.timeout().unwrap_or(self.config.timeout);
        let fut = self.perform(request);

        let result = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::Cancelled),
                    res = tokio::time::timeout(deadline, fut) => flatten_deadline(res, deadline),
                }
            }
            None => flatten_deadline(tokio::time::timeout(deadline, fut).await, deadline),
        };

        match &result {
            Ok(response) => {
                self.stats.record_success();
                self.stats.record_bytes_received(response.body().len() as u64);
            }
            Err(_) => self.stats.record_failure(),
        }
        result
    }

    async fn perform(&self, request: RequestDescriptor) -> Result<RawResponse, TransportError> {
        let (key, mut sender) = self.obtain_connection(request.url()).await?;
        let wire = into_wire_request(&request, &self.config)?;

        let response = sender
            .send_request(wire)
            .await
            .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;
        let (parts, body) = response.into_parts();
        let collected = body
            .collect()
            .await
            .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;

        // The body is fully consumed, so the handle is safe to reuse.
        self.pool.checkin(key, sender).await;
        Ok(RawResponse::new(
            parts.status,
            parts.headers,
            collected.to_bytes(),
        ))
    }

    async fn obtain_connection(
        &self,
        url: &Url,
    ) -> Result<(PoolKey, PooledSender), TransportError> {
        let host = url.host_str().ok_or_else(|| {
            TransportError::ConnectionFailed(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "URL has no host",
            )))
        })?;
        let https = url.scheme() == "https";
        let port = url
            .port_or_known_default()
            .unwrap_or(if https { 443 } else { 80 });
        let key = PoolKey {
            https,
            host: host.to_owned(),
            port,
        };

        if let Some(sender) = self.pool.checkout(&key).await {
            self.stats.record_connection_reused();
            tracing::debug!(host = %key.host, port = key.port, "reusing pooled connection");
            return Ok((key, sender));
        }

        let connect = self.dial(&key);
        let sender = match tokio::time::timeout(self.config.connect_timeout, connect).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TransportError::Timeout {
                    limit: self.config.connect_timeout,
                });
            }
        };
        Ok((key, sender))
    }

    async fn dial(&self, key: &PoolKey) -> Result<PooledSender, TransportError> {
        tracing::debug!(host = %key.host, port = key.port, https = key.https, "opening connection");
        let stream = TcpStream::connect((key.host.as_str(), key.port))
            .await
            .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;

        let sender = if key.https {
            let server_name = rustls::pki_types::ServerName::try_from(key.host.clone())
                .map_err(|e| TransportError::Tls(Box::new(e)))?;
            let tls = self
                .tls
                .connect(server_name, stream)
                .await
                .map_err(|e| TransportError::Tls(Box::new(e)))?;
            handshake(TokioIo::new(tls)).await?
        } else {
            handshake(TokioIo::new(stream)).await?
        };

        self.stats.record_connection_opened();
        Ok(sender)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Perform the HTTP/1.1 handshake and park the connection driver on its
/// own task.
async fn handshake<T>(io: T) -> Result<PooledSender, TransportError>
where
    T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (sender, connection) = http1::handshake::<_, Full<Bytes>>(io)
        .await
        .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::debug!(error = %err, "connection task ended with error");
        }
    });
    Ok(sender)
}

/// Convert a descriptor into an origin-form hyper request, supplying
/// `Host` and `User-Agent` when the caller did not.
fn into_wire_request(
    request: &RequestDescriptor,
    config: &ClientConfig,
) -> Result<Request<Full<Bytes>>, TransportError> {
    let url = request.url();
    let path_and_query = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_owned(),
    };

    let mut wire = Request::builder()
        .method(request.method().clone())
        .uri(path_and_query)
        .body(Full::new(request.body().cloned().unwrap_or_default()))
        .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;
    *wire.headers_mut() = request.headers().clone();

    if !wire.headers().contains_key(HOST) {
        let host = url.host_str().unwrap_or_default();
        let value = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };
        let value = HeaderValue::from_str(&value)
            .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;
        wire.headers_mut().insert(HOST, value);
    }
    if !wire.headers().contains_key(USER_AGENT) {
        if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
            wire.headers_mut().insert(USER_AGENT, value);
        }
    }
    Ok(wire)
}

fn flatten_deadline<T>(
    result: Result<Result<T, TransportError>, tokio::time::error::Elapsed>,
    limit: Duration,
) -> Result<T, TransportError> {
    match result {
        Ok(inner) => inner,
        Err(_) => Err(TransportError::Timeout { limit }),
    }
}

fn tls_connector() -> TlsConnector {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
