//! The buffered raw response and download summary.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::decode::{self, DecodeTarget, Decoded, Image};
use crate::error::{DecodeError, ValidationError};
use crate::validate::{self, ValidationRule};

/// A fully buffered HTTP response: status, headers, body bytes.
///
/// Produced once per [`execute`](crate::client::HttpClient::execute) call
/// and immutable afterwards. Decoding borrows the body and never mutates
/// it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// Assemble a response from its parts. Public so validators and
    /// decoders can be exercised without a live transport.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The response status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body bytes.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The `Content-Type` header value, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Whether the status is in the 2xx range.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Apply `rules` in order; the first failure wins. Returns `&self` so
    /// validation reads left-to-right in a pipeline.
    ///
    /// An empty rule slice passes trivially; use
    /// [`validate::default_rules`] for the standard status check.
    pub fn validate(&self, rules: &[ValidationRule]) -> Result<&Self, ValidationError> {
        validate::validate(self, rules)?;
        Ok(self)
    }

    /// Decode the body to the requested target representation.
    pub fn decode(&self, target: DecodeTarget) -> Result<Decoded, DecodeError> {
        decode::decode(self, target)
    }

    /// The body as owned bytes (identity decode).
    #[must_use]
    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str, DecodeError> {
        decode::text(&self.body)
    }

    /// The body deserialized as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        decode::json(&self.body)
    }

    /// The body as a recognized image.
    pub fn image(&self) -> Result<Image, DecodeError> {
        decode::image(&self.body)
    }
}

/// Outcome of a completed [`download`](crate::client::HttpClient::download).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Total bytes written to the destination.
    pub bytes_written: u64,
    /// Final response status code.
    pub status: StatusCode,
}
