//! Prelude for the veryfi-client crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use crate::client::HttpClient;
pub use crate::error::{Error, Result, ServerError};
pub use crate::options::{HttpOptions, Options, RetryOptions};
pub use crate::provider::VeryfiProvider;
pub use crate::scheme::{Document, DocumentUrlOptions, ErrorScheme};
