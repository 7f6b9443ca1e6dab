//! Parameter encoding strategies.
//!
//! Each strategy is a pure function from [`Parameters`] to headers plus a
//! payload (query string or body bytes).
//!
//! URL-style encodings (`UrlQuery`, `UrlEncodedBody`) flatten nested values
//! with a fixed convention:
//!
//! - a scalar under key `k` encodes as `k=value`
//! - a sequence element encodes under `k[]`
//! - a mapping entry `s` encodes under `k[s]`
//!
//! applied recursively, in insertion order, percent-encoded as
//! `application/x-www-form-urlencoded`. Booleans encode as `true`/`false`.
//! The top-level value must be a mapping.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use url::form_urlencoded;

use crate::error::EncodeError;
use crate::params::Parameters;

/// Policy for turning [`Parameters`] into wire bytes and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    /// Flatten into `key=value` pairs appended to the request URL.
    UrlQuery,
    /// Same flattening, placed in the body as
    /// `application/x-www-form-urlencoded`.
    UrlEncodedBody,
    /// Serialize to canonical JSON text with `Content-Type: application/json`.
    JsonBody,
}

impl EncodingStrategy {
    /// The default strategy for a method: query-string for bodyless
    /// methods, URL-encoded body otherwise.
    #[must_use]
    pub fn default_for(method: &http::Method) -> Self {
        match *method {
            http::Method::GET | http::Method::HEAD | http::Method::DELETE => {
                EncodingStrategy::UrlQuery
            }
            _ => EncodingStrategy::UrlEncodedBody,
        }
    }
}

/// Headers plus payload produced by one encoding pass. Exactly one of
/// `query` and `body` is set, so a descriptor never carries both a body
/// and a query-string encoding for the same parameter set.
#[derive(Debug, Default)]
pub struct EncodedPayload {
    pub headers: HeaderMap,
    pub query: Option<String>,
    pub body: Option<Bytes>,
}

/// Encode `params` under `strategy`.
pub fn encode(
    params: &Parameters,
    strategy: EncodingStrategy,
) -> Result<EncodedPayload, EncodeError> {
    match strategy {
        EncodingStrategy::UrlQuery => Ok(EncodedPayload {
            query: Some(form_encode(params)?),
            ..EncodedPayload::default()
        }),
        EncodingStrategy::UrlEncodedBody => {
            let encoded = form_encode(params)?;
            let mut headers = HeaderMap::new();
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            Ok(EncodedPayload {
                headers,
                query: None,
                body: Some(Bytes::from(encoded)),
            })
        }
        EncodingStrategy::JsonBody => {
            let body = serde_json::to_vec(params)?;
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(EncodedPayload {
                headers,
                query: None,
                body: Some(Bytes::from(body)),
            })
        }
    }
}

fn form_encode(params: &Parameters) -> Result<String, EncodeError> {
    let Parameters::Map(entries) = params else {
        return Err(EncodeError::UnsupportedNesting {
            key: "(root)".to_owned(),
        });
    };

    let mut pairs = Vec::new();
    for (key, value) in entries {
        flatten(key, value, &mut pairs);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

fn flatten(key: &str, value: &Parameters, out: &mut Vec<(String, String)>) {
    match value {
        Parameters::Seq(items) => {
            let nested = format!("{key}[]");
            for item in items {
                flatten(&nested, item, out);
            }
        }
        Parameters::Map(entries) => {
            for (sub, item) in entries {
                flatten(&format!("{key}[{sub}]"), item, out);
            }
        }
        scalar => {
            if let Some(text) = scalar.scalar_text() {
                out.push((key.to_owned(), text));
            }
        }
    }
}
