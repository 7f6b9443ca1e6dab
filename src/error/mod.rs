//! Error taxonomy for the request/response pipeline.
//!
//! Every stage returns a `Result`; nothing is thrown past a caller and
//! nothing is retried. Stage errors convert into the top-level [`Error`]
//! via `From`, so a caller composing the full pipeline can use `?`
//! throughout and still see which stage failed.

use std::ops::Range;
use std::time::Duration;

/// A `Result` alias where the error case is the pipeline [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal pipeline error, tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request construction failed.
    #[error("request build failed: {0}")]
    Build(#[from] BuildError),

    /// Parameter encoding failed.
    #[error("parameter encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The request could not be executed against the network.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The response was delivered but rejected by a validation rule.
    #[error("response validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The response body could not be converted to the requested form.
    #[error("response decoding failed: {0}")]
    Decode(#[from] DecodeError),
}

/// A [`ClientConfig`](crate::config::ClientConfig) value that would make
/// every request fail or hoard resources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid client configuration: {reason}")]
pub struct ConfigError {
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from [`RequestBuilder::build`](crate::builder::RequestBuilder::build).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The base URL did not parse, or is not an http/https URL.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The parameters cannot be represented under the chosen strategy.
    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

/// Errors from encoding a [`Parameters`](crate::params::Parameters) value.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The value at `key` has no representation under the URL-style
    /// flattening convention (see the `encode` module docs).
    #[error("value at `{key}` cannot be form-encoded")]
    UnsupportedNesting { key: String },

    /// A constructed header value contains bytes HTTP forbids.
    #[error("invalid header value: {reason}")]
    InvalidHeader { reason: String },

    /// JSON serialization of the parameters failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from [`HttpClient::execute`](crate::client::HttpClient::execute)
/// and [`HttpClient::download`](crate::client::HttpClient::download).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// TCP connect failed, or an established connection broke mid-request.
    #[error("connection failed")]
    ConnectionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the deadline.
    #[error("request timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// TLS setup or handshake failed.
    #[error("TLS error")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The caller's cancel token fired. The connection is closed and no
    /// partial response is delivered.
    #[error("request cancelled")]
    Cancelled,

    /// The download destination rejected a write. Not part of the network
    /// failure set proper, but a download terminates through it.
    #[error("destination write failed")]
    Sink(#[source] std::io::Error),
}

/// Errors from [`validate`](crate::validate::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Status code fell outside the acceptable range.
    #[error("unacceptable status code {got}, expected {}..{}", expected.start, expected.end)]
    UnacceptableStatusCode { got: u16, expected: Range<u16> },

    /// Content type missing or not in the acceptable set.
    #[error("unacceptable content type {got:?}, expected one of {expected:?}")]
    UnacceptableContentType {
        got: Option<String>,
        expected: Vec<String>,
    },
}

/// Errors from [`decode`](crate::decode::decode) and the typed decode
/// conveniences on [`RawResponse`](crate::http::RawResponse).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Body bytes are not valid in the declared text encoding.
    #[error("body is not valid UTF-8 (valid up to byte {valid_up_to})")]
    EncodingMismatch { valid_up_to: usize },

    /// JSON parse failure, with the byte offset of the failure.
    #[error("malformed JSON at byte offset {offset}: {source}")]
    MalformedJson {
        offset: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Body does not start with a recognized image signature.
    #[error("unrecognized image signature")]
    UnsupportedImageFormat,
}
