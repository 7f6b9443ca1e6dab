//! Request and response types shared across the pipeline.

pub mod request;
pub mod response;

pub use request::RequestDescriptor;
pub use response::{DownloadSummary, RawResponse};
