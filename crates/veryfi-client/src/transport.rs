//! HTTP transport with timeout and retry policy.

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryPolicy, RetryTransientMiddleware};

use crate::TRACING_TARGET_TRANSPORT;
use crate::error::{Error, Result};
use crate::options::{Options, RetryOptions};

/// Shared HTTP transport used for every request of a client.
///
/// Cloning is cheap; clones share the same connection pool.
pub type Transport = ClientWithMiddleware;

/// Builds a transport from the given options.
///
/// The options are resolved first, so unset timing fields use their defaults.
/// Transient failures (connection errors, timeouts, 408, 429 and 5xx responses)
/// are retried up to `retry.count` times with exponential backoff between
/// `retry.wait_time` and `retry.max_wait_time`.
///
/// # Errors
///
/// Returns [`Error::Config`] if a required option is empty or the underlying
/// HTTP client cannot be built.
pub fn build_transport(options: &Options) -> Result<Transport> {
    let options = options.clone().resolve()?;
    let policy = backoff_policy(&options.http.retry);
    build_resolved(&options, policy)
}

/// Builds a transport that retries according to a caller supplied policy.
///
/// The options are resolved first. Only their timeout is used;
/// `options.http.retry` is ignored.
///
/// # Errors
///
/// Same as [`build_transport`].
pub fn build_transport_with_policy<P>(options: &Options, policy: P) -> Result<Transport>
where
    P: RetryPolicy + Send + Sync + 'static,
{
    let options = options.clone().resolve()?;
    build_resolved(&options, policy)
}

fn build_resolved<P>(options: &Options, policy: P) -> Result<Transport>
where
    P: RetryPolicy + Send + Sync + 'static,
{
    let timeout = options.http.timeout();

    tracing::debug!(
        target: TRACING_TARGET_TRANSPORT,
        timeout_ms = timeout.as_millis(),
        "Creating transport"
    );

    let http = Client::builder()
        .timeout(timeout)
        .user_agent(default_user_agent())
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

    let transport = ClientBuilder::new(http)
        .with(RetryTransientMiddleware::new_with_policy(policy))
        .build();

    Ok(transport)
}

/// Translates retry options into an exponential backoff policy.
///
/// The upper bound is raised to the initial wait when it is smaller.
pub(crate) fn backoff_policy(retry: &RetryOptions) -> ExponentialBackoff {
    let min = retry.wait_time();
    let max = retry.max_wait_time().max(min);

    tracing::trace!(
        target: TRACING_TARGET_TRANSPORT,
        count = retry.count,
        min_ms = min.as_millis(),
        max_ms = max.as_millis(),
        jitter = %retry.jitter,
        "Configuring retry policy"
    );

    ExponentialBackoff::builder()
        .retry_bounds(min, max)
        .jitter(retry.jitter.into())
        .build_with_max_retries(retry.count)
}

fn default_user_agent() -> String {
    format!("veryfi-client/{}", env!("CARGO_PKG_VERSION"))
}
