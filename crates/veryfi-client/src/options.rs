//! Client options and their default values.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default environment URL used by [`Options::new`].
pub const DEFAULT_ENVIRONMENT_URL: &str = "https://api.veryfi.com/";

/// Default per-attempt request timeout: 120 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default wait before the first retry: 100 milliseconds.
pub const DEFAULT_RETRY_WAIT_TIME: Duration = Duration::from_millis(100);

/// Default upper bound on the wait between retries: 2 seconds.
pub const DEFAULT_RETRY_MAX_WAIT_TIME: Duration = Duration::from_secs(2);

/// Options for a Veryfi client.
///
/// Timing fields use zero as "unset". [`Options::resolve`] replaces every unset
/// field with its documented default and keeps caller values verbatim.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use veryfi_client::Options;
///
/// let options = Options::new("client-id", "username", "api-key")
///     .with_timeout(Duration::from_secs(30))
///     .with_retry_count(5)
///     .resolve()
///     .unwrap();
///
/// assert_eq!(options.http.retry.count, 5);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct Options {
    /// Client identifier sent with every request
    #[cfg_attr(
        feature = "config",
        arg(long = "veryfi-client-id", env = "VERYFI_CLIENT_ID")
    )]
    pub client_id: String,

    /// Username used in the authorization header
    #[cfg_attr(
        feature = "config",
        arg(long = "veryfi-username", env = "VERYFI_USERNAME")
    )]
    pub username: String,

    /// API key used in the authorization header
    #[cfg_attr(
        feature = "config",
        arg(long = "veryfi-api-key", env = "VERYFI_API_KEY", hide_env_values = true)
    )]
    pub api_key: String,

    /// Base URL of the Veryfi deployment
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-environment-url",
            env = "VERYFI_ENVIRONMENT_URL",
            default_value = DEFAULT_ENVIRONMENT_URL
        )
    )]
    pub environment_url: String,

    /// HTTP transport options
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub http: HttpOptions,
}

/// HTTP transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
pub struct HttpOptions {
    /// Per-attempt request timeout in milliseconds (0 = default)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-http-timeout-ms",
            env = "VERYFI_HTTP_TIMEOUT_MS",
            default_value = "0"
        )
    )]
    pub timeout_ms: u64,

    /// Retry options
    #[cfg_attr(feature = "config", command(flatten))]
    pub retry: RetryOptions,
}

/// Retry options applied by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
pub struct RetryOptions {
    /// Number of retries after the first attempt (0 = default)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-retry-count",
            env = "VERYFI_RETRY_COUNT",
            default_value = "0"
        )
    )]
    pub count: u32,

    /// Wait before the first retry in milliseconds (0 = default)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-retry-wait-ms",
            env = "VERYFI_RETRY_WAIT_MS",
            default_value = "0"
        )
    )]
    pub wait_time_ms: u64,

    /// Upper bound on the wait between retries in milliseconds (0 = default)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-retry-max-wait-ms",
            env = "VERYFI_RETRY_MAX_WAIT_MS",
            default_value = "0"
        )
    )]
    pub max_wait_time_ms: u64,

    /// Randomization applied to each backoff interval
    #[cfg_attr(
        feature = "config",
        arg(
            long = "veryfi-retry-jitter",
            env = "VERYFI_RETRY_JITTER",
            value_enum,
            default_value = "bounded"
        )
    )]
    pub jitter: Jitter,
}

/// Randomization strategy for retry backoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Jitter {
    /// Use the computed interval as is.
    None,
    /// Pick uniformly between zero and the computed interval.
    Full,
    /// Pick uniformly between the minimum wait and the computed interval.
    #[default]
    Bounded,
}

impl From<Jitter> for reqwest_retry::Jitter {
    fn from(jitter: Jitter) -> Self {
        match jitter {
            Jitter::None => reqwest_retry::Jitter::None,
            Jitter::Full => reqwest_retry::Jitter::Full,
            Jitter::Bounded => reqwest_retry::Jitter::Bounded,
        }
    }
}

impl Options {
    /// Create options for the default environment with the given credentials.
    pub fn new(
        client_id: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            username: username.into(),
            api_key: api_key.into(),
            environment_url: DEFAULT_ENVIRONMENT_URL.to_string(),
            http: HttpOptions::default(),
        }
    }

    /// Validates identity fields and fills in defaults for unset timing fields.
    ///
    /// Resolving already resolved options returns them unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the environment URL or any credential is empty.
    pub fn resolve(mut self) -> Result<Self> {
        let required = [
            ("environment_url", &self.environment_url),
            ("client_id", &self.client_id),
            ("username", &self.username),
            ("api_key", &self.api_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{name} must not be empty")));
            }
        }

        let http = &mut self.http;
        if http.timeout_ms == 0 {
            http.timeout_ms = duration_to_millis(DEFAULT_TIMEOUT);
        }

        let retry = &mut http.retry;
        if retry.count == 0 {
            retry.count = DEFAULT_RETRY_COUNT;
        }
        if retry.wait_time_ms == 0 {
            retry.wait_time_ms = duration_to_millis(DEFAULT_RETRY_WAIT_TIME);
        }
        if retry.max_wait_time_ms == 0 {
            retry.max_wait_time_ms = duration_to_millis(DEFAULT_RETRY_MAX_WAIT_TIME);
        }

        Ok(self)
    }

    /// Set the environment URL.
    #[must_use]
    pub fn with_environment_url(mut self, url: impl Into<String>) -> Self {
        self.environment_url = url.into();
        self
    }

    /// Set the per-attempt request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Set the number of retries after the first attempt.
    #[must_use]
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.http.retry.count = count;
        self
    }

    /// Set the wait before the first retry.
    #[must_use]
    pub fn with_retry_wait_time(mut self, wait_time: Duration) -> Self {
        self.http.retry.wait_time_ms = duration_to_millis(wait_time);
        self
    }

    /// Set the upper bound on the wait between retries.
    #[must_use]
    pub fn with_retry_max_wait_time(mut self, max_wait_time: Duration) -> Self {
        self.http.retry.max_wait_time_ms = duration_to_millis(max_wait_time);
        self
    }

    /// Set the backoff jitter strategy.
    #[must_use]
    pub fn with_retry_jitter(mut self, jitter: Jitter) -> Self {
        self.http.retry.jitter = jitter;
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("environment_url", &self.environment_url)
            .field("http", &self.http)
            .finish()
    }
}

impl HttpOptions {
    /// Returns the per-attempt request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RetryOptions {
    /// Returns the wait before the first retry.
    #[inline]
    pub fn wait_time(&self) -> Duration {
        Duration::from_millis(self.wait_time_ms)
    }

    /// Returns the upper bound on the wait between retries.
    #[inline]
    pub fn max_wait_time(&self) -> Duration {
        Duration::from_millis(self.max_wait_time_ms)
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
