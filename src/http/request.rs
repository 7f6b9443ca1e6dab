//! The immutable request descriptor.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

/// A fully assembled HTTP request: method, URL, headers, optional body.
///
/// Immutable once constructed by
/// [`RequestBuilder::build`](crate::builder::RequestBuilder::build);
/// consumed by one transport call. Header insertion order is preserved
/// for wire output.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub(crate) fn new(
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
            timeout,
        }
    }

    /// The HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URL, query string included.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request headers, in insertion order.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body, if any.
    #[inline]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Per-request deadline override. `None` falls back to the client
    /// configuration.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether a body is present.
    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}
