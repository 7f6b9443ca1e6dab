//! Request assembly.
//!
//! [`RequestBuilder`] collects a method, base URL, headers, parameters,
//! and an encoding strategy, then produces an immutable
//! [`RequestDescriptor`] in one `build` call. Errors surface at build
//! time, not during execution.

use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use http::Method;
use url::Url;

use crate::auth;
use crate::encode::{self, EncodingStrategy};
use crate::error::{BuildError, EncodeError};
use crate::http::RequestDescriptor;
use crate::params::Parameters;

/// Consuming builder for a [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    params: Option<Parameters>,
    encoding: Option<EncodingStrategy>,
    auth: Option<Auth>,
    timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
enum Auth {
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer(String),
}

impl RequestBuilder {
    /// Start a request with an explicit method.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            params: None,
            encoding: None,
            auth: None,
            timeout: None,
        }
    }

    /// Start a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Start a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Start a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// Start a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Start a PATCH request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Start a HEAD request.
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    /// Add a header. Invalid names or values are reported by `build`.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach request parameters, encoded at build time.
    #[must_use]
    pub fn params(mut self, params: Parameters) -> Self {
        self.params = Some(params);
        self
    }

    /// Choose an encoding strategy explicitly. The default is
    /// [`EncodingStrategy::default_for`] the method: query-string for
    /// GET/HEAD/DELETE, URL-encoded body otherwise.
    #[must_use]
    pub fn encoding(mut self, strategy: EncodingStrategy) -> Self {
        self.encoding = Some(strategy);
        self
    }

    /// Authenticate with HTTP Basic credentials.
    #[must_use]
    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: password.map(Into::into),
        });
        self
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    /// Override the client's default deadline for this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Assemble the immutable descriptor.
    ///
    /// Fails with [`BuildError::InvalidUrl`] if the URL does not parse or
    /// is not http/https, and with [`BuildError::Encoding`] if the
    /// parameters or a header cannot be represented.
    pub fn build(self) -> Result<RequestDescriptor, BuildError> {
        let mut url = Url::parse(&self.url).map_err(|e| BuildError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(BuildError::InvalidUrl {
                    url: self.url.clone(),
                    reason: format!("unsupported scheme `{other}`"),
                });
            }
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| EncodeError::InvalidHeader {
                    reason: format!("`{name}`: {e}"),
                })?;
            let value = HeaderValue::from_str(value).map_err(|e| EncodeError::InvalidHeader {
                reason: e.to_string(),
            })?;
            headers.append(name, value);
        }

        let mut body = None;
        if let Some(params) = &self.params {
            let strategy = self
                .encoding
                .unwrap_or_else(|| EncodingStrategy::default_for(&self.method));
            let payload = encode::encode(params, strategy).map_err(BuildError::Encoding)?;

            // Caller-supplied headers win over encoding-derived ones.
            for (name, value) in payload.headers.iter() {
                if !headers.contains_key(name) {
                    headers.insert(name.clone(), value.clone());
                }
            }
            if let Some(query) = payload.query.filter(|q| !q.is_empty()) {
                let combined = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                    _ => query,
                };
                url.set_query(Some(&combined));
            }
            body = payload.body;
        }

        if let Some(auth) = &self.auth {
            let value = match auth {
                Auth::Basic { username, password } => {
                    auth::basic_auth(username, password.as_ref())?
                }
                Auth::Bearer(token) => auth::bearer_auth(token)?,
            };
            headers.insert(AUTHORIZATION, value);
        }

        Ok(RequestDescriptor::new(
            self.method,
            url,
            headers,
            body,
            self.timeout,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn get_parameters_default_to_the_query_string() {
        let request = RequestBuilder::get("https://httpbin.org/get")
            .params(Parameters::map([("foo", Parameters::from("bar"))]))
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://httpbin.org/get?foo=bar");
        assert!(!request.has_body());
    }

    #[test]
    fn post_parameters_default_to_a_form_body() {
        let request = RequestBuilder::post("https://httpbin.org/post")
            .params(Parameters::map([("foo", Parameters::from("bar"))]))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), None);
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(request.body().unwrap().as_ref(), b"foo=bar");
    }

    #[test]
    fn explicit_json_encoding_overrides_the_default() {
        let request = RequestBuilder::post("https://httpbin.org/post")
            .params(Parameters::map([("foo", Parameters::from("bar"))]))
            .encoding(EncodingStrategy::JsonBody)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(request.body().unwrap().as_ref(), br#"{"foo":"bar"}"#);
    }

    #[test]
    fn query_parameters_merge_with_an_existing_query() {
        let request = RequestBuilder::get("https://httpbin.org/get?a=1")
            .params(Parameters::map([("b", Parameters::from(2))]))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("a=1&b=2"));
    }

    #[test]
    fn unparseable_urls_fail_at_build_time() {
        let err = RequestBuilder::get("not a url").build().unwrap_err();
        assert!(matches!(err, BuildError::InvalidUrl { .. }));

        let err = RequestBuilder::get("ftp://example.com/file")
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidUrl { .. }));
    }

    #[test]
    fn basic_auth_sets_the_authorization_header() {
        let request = RequestBuilder::get("https://httpbin.org/basic-auth/user/password")
            .basic_auth("user", Some("password"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Basic dXNlcjpwYXNzd29yZA=="
        );
    }

    #[test]
    fn caller_headers_beat_encoding_headers() {
        let request = RequestBuilder::post("https://httpbin.org/post")
            .header("content-type", "application/x-custom")
            .params(Parameters::map([("foo", Parameters::from("bar"))]))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-custom"
        );
    }

    #[test]
    fn invalid_header_names_are_reported() {
        let err = RequestBuilder::get("https://httpbin.org/get")
            .header("bad header", "v")
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Encoding(_)));
    }
}
