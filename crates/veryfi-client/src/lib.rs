#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client construction and request dispatch.
pub const TRACING_TARGET_CLIENT: &str = "veryfi_client::client";

/// Tracing target for transport construction.
pub const TRACING_TARGET_TRANSPORT: &str = "veryfi_client::transport";

mod client;
mod error;
mod options;
#[doc(hidden)]
pub mod prelude;
mod provider;
pub mod scheme;
mod transport;

pub use crate::client::{
    API_VERSION_V7, DOCUMENT_URI, HttpClient, authorization_header, build_url, endpoint_url,
};
pub use crate::error::{BoxedError, Error, Result, ServerError, check};
pub use crate::options::{
    DEFAULT_ENVIRONMENT_URL, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_MAX_WAIT_TIME,
    DEFAULT_RETRY_WAIT_TIME, DEFAULT_TIMEOUT, HttpOptions, Jitter, Options, RetryOptions,
};
pub use crate::provider::VeryfiProvider;
pub use crate::transport::{Transport, build_transport, build_transport_with_policy};
