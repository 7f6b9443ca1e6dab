//! Canonical imports for pipeline callers.

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
pub use crate::validate::{self, ValidationRule};
