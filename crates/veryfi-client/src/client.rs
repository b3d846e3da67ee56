//! Veryfi HTTP client and request execution.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_CLIENT;
use crate::error::{BoxedError, Error, Result, check};
use crate::options::Options;
use crate::scheme::ErrorScheme;
use crate::transport::{Transport, build_transport};

/// Version of the Veryfi API spoken by [`HttpClient::new_v7`].
pub const API_VERSION_V7: &str = "v7";

/// Endpoint for processing and fetching documents.
pub const DOCUMENT_URI: &str = "partner/documents/";

/// Path segment between the environment URL and the API version.
const API_SEGMENT: &str = "api";

/// Joins URL parts with single `/` separators.
///
/// Leading and trailing slashes of every part are dropped, so
/// `https://api.example.com/`, `api` and `v7` become
/// `https://api.example.com/api/v7`.
pub fn build_url(environment_url: &str, segment: &str, version: &str) -> String {
    [environment_url, segment, version]
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Appends an endpoint path to a base URL.
///
/// The endpoint keeps its trailing slash since Veryfi routes depend on it.
pub fn endpoint_url(base_url: &str, uri: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}

/// Returns the value of the `AUTHORIZATION` header.
pub fn authorization_header(username: &str, api_key: &str) -> String {
    format!("apikey {}:{}", username, api_key)
}

/// Request shape handed to the shared dispatch path.
enum ApiRequest<'a> {
    Get { query: &'a [(&'a str, &'a str)] },
    Post { body: Vec<u8> },
}

impl ApiRequest<'_> {
    fn method(&self) -> Method {
        match self {
            ApiRequest::Get { .. } => Method::GET,
            ApiRequest::Post { .. } => Method::POST,
        }
    }
}

/// Inner client that holds the transport and the resolved options.
struct HttpClientInner {
    transport: Transport,
    options: Options,
    api_version: &'static str,
    base_url: String,
}

/// Client for the Veryfi API.
///
/// The client owns one [`Transport`] that is built once and reused by every
/// request. Cloning is cheap and clones share the transport, so a client can be
/// used from many tasks at the same time.
///
/// # Examples
///
/// ```rust,ignore
/// use veryfi_client::{HttpClient, Options, VeryfiProvider};
/// use veryfi_client::scheme::DocumentUrlOptions;
///
/// let client = HttpClient::new_v7(Options::new("client-id", "username", "api-key"))?;
///
/// let request = DocumentUrlOptions::new("https://cdn.example.com/receipt.jpg");
/// let document = client.process_document_url(&request).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("options", &self.inner.options)
            .field("api_version", &self.inner.api_version)
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client for version 7 of the Veryfi API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required option is empty or the
    /// transport cannot be built.
    pub fn new_v7(options: Options) -> Result<Self> {
        Self::with_version(options, API_VERSION_V7)
    }

    fn with_version(options: Options, api_version: &'static str) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            environment_url = %options.environment_url,
            api_version,
            "Creating Veryfi client"
        );

        let options = options.resolve()?;
        let transport = build_transport(&options)?;
        Self::from_parts(options, transport, api_version)
    }

    /// Creates a v7 client around an existing transport.
    ///
    /// Use this to supply a transport with a custom retry policy, see
    /// [`build_transport_with_policy`](crate::build_transport_with_policy).
    /// The transport keeps the timeout it was built with.
    pub fn with_transport(options: Options, transport: Transport) -> Result<Self> {
        let options = options.resolve()?;
        Self::from_parts(options, transport, API_VERSION_V7)
    }

    fn from_parts(
        options: Options,
        transport: Transport,
        api_version: &'static str,
    ) -> Result<Self> {
        let base_url = build_url(&options.environment_url, API_SEGMENT, api_version);
        let inner = HttpClientInner {
            transport,
            options,
            api_version,
            base_url,
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            base_url = %inner.base_url,
            "Veryfi client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the resolved client options.
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Gets the API version this client talks to.
    pub fn api_version(&self) -> &str {
        self.inner.api_version
    }

    /// Gets the versioned base URL, e.g. `https://api.veryfi.com/api/v7`.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Performs a GET request and decodes the response body.
    ///
    /// Returns `Ok(None)` when the response carried neither a body nor a
    /// recognizable error.
    pub async fn get<T>(&self, uri: &str, query: &[(&str, &str)]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.dispatch(uri, ApiRequest::Get { query }).await
    }

    /// Performs a POST request with a JSON body and decodes the response body.
    ///
    /// Returns `Ok(None)` when the response carried neither a body nor a
    /// recognizable error.
    pub async fn post<B, T>(&self, uri: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body)
            .map_err(|e| Error::execution("failed to serialize request body", e))?;

        self.dispatch(uri, ApiRequest::Post { body }).await
    }

    /// Same as [`get`](Self::get), but returns [`Error::Cancelled`] as soon as
    /// `token` is cancelled.
    pub async fn get_cancellable<T>(
        &self,
        uri: &str,
        query: &[(&str, &str)],
        token: &CancellationToken,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        token
            .run_until_cancelled(self.get(uri, query))
            .await
            .unwrap_or_else(|| Err(Error::Cancelled))
    }

    /// Same as [`post`](Self::post), but returns [`Error::Cancelled`] as soon as
    /// `token` is cancelled.
    pub async fn post_cancellable<B, T>(
        &self,
        uri: &str,
        body: &B,
        token: &CancellationToken,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        token
            .run_until_cancelled(self.post(uri, body))
            .await
            .unwrap_or_else(|| Err(Error::Cancelled))
    }

    /// Sends one logical request and normalizes its outcome.
    async fn dispatch<T>(&self, uri: &str, request: ApiRequest<'_>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let url = endpoint_url(&self.inner.base_url, uri);
        let method = request.method();
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            method = %method,
            uri,
            "Sending request to Veryfi"
        );

        let builder = match request {
            ApiRequest::Get { query } => self.inner.transport.get(&url).query(query),
            ApiRequest::Post { body } => self.inner.transport.post(&url).body(body),
        };

        let options = &self.inner.options;
        let builder = builder
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .header("CLIENT-ID", &options.client_id)
            .header(
                "AUTHORIZATION",
                authorization_header(&options.username, &options.api_key),
            );

        let mut error_scheme = ErrorScheme::default();
        let result = match builder.send().await {
            Ok(response) => match route_response(response, &mut error_scheme).await {
                Ok(success) => check(None::<BoxedError>, &error_scheme).map(|()| success),
                Err(err) => Err(err),
            },
            Err(err) => check(Some(err), &error_scheme).map(|()| None),
        };

        let elapsed = started_at.elapsed();
        match result {
            Ok(success) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    method = %method,
                    uri,
                    has_body = success.is_some(),
                    elapsed_ms = elapsed.as_millis(),
                    "Request completed"
                );
                Ok(success)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    method = %method,
                    uri,
                    category = err.category(),
                    error = %err,
                    elapsed_ms = elapsed.as_millis(),
                    "Request failed"
                );
                Err(err)
            }
        }
    }
}

/// Decodes a response into the success value or the error scheme.
///
/// Successful responses fill the returned value; any other status fills
/// `error_scheme`. Empty bodies leave both untouched.
async fn route_response<T>(
    response: Response,
    error_scheme: &mut ErrorScheme,
) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::execution("failed to read response from Veryfi", e))?;

    tracing::trace!(
        target: TRACING_TARGET_CLIENT,
        status = status.as_u16(),
        size = body.len(),
        "Received response from Veryfi"
    );

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let decode_error =
        |e: serde_json::Error| Error::execution("failed to decode response from Veryfi", e);
    if status.is_success() {
        serde_json::from_slice(&body).map(Some).map_err(decode_error)
    } else {
        *error_scheme = serde_json::from_slice(&body).map_err(decode_error)?;
        Ok(None)
    }
}
