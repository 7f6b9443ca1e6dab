//! Composable asynchronous HTTP request/response pipeline.
//!
//! Request building, parameter encoding, an HTTP/1.1 transport with an
//! optional connection pool, ordered response validation, typed decoding,
//! and a streaming download sink. Stages compose left to right; each
//! returns a `Result`, nothing is retried, and the first failure is the
//! one the caller sees.
//!
//! ```no_run
//! use arbalest::prelude::*;
//!
//! # async fn run() -> std::result::Result<(), arbalest::Error> {
//! let client = HttpClient::new();
//!
//! let request = RequestBuilder::get("https://httpbin.org/get")
//!     .params(Parameters::map([("foo", Parameters::from("bar"))]))
//!     .build()?;
//!
//! let response = client.execute(request).await?;
//! let value: serde_json::Value = response
//!     .validate(&validate::default_rules())?
//!     .json()?;
//! println!("{value}");
//!
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! Downloads stream to any [`tokio::io::AsyncWrite`] with bounded memory:
//!
//! ```no_run
//! use arbalest::prelude::*;
//!
//! # async fn run() -> std::result::Result<(), arbalest::Error> {
//! let client = HttpClient::new();
//! let request = RequestBuilder::get("https://httpbin.org/image/png").build()?;
//! let mut file = tokio::fs::File::create("image.png")
//!     .await
//!     .map_err(TransportError::Sink)?;
//! let summary = client.download(request, &mut file).await?;
//! println!("{} bytes, status {}", summary.bytes_written, summary.status);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod builder;
pub mod client;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod http;
pub mod params;
pub mod validate;

pub mod prelude;

pub use crate::builder::RequestBuilder;
pub use crate::client::{CancelToken, HttpClient, StatsSnapshot};
pub use crate::config::ClientConfig;
pub use crate::decode::{DecodeTarget, Decoded, Image, ImageFormat};
pub use crate::encode::EncodingStrategy;
pub use crate::error::{
    BuildError, ConfigError, DecodeError, EncodeError, Error, Result, TransportError,
    ValidationError,
};
pub use crate::http::{DownloadSummary, RawResponse, RequestDescriptor};
pub use crate::params::Parameters;
pub use crate::validate::ValidationRule;
