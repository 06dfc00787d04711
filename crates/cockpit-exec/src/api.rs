//! Direct calls to remote provider HTTP APIs.
//!
//! Request construction and response extraction live in the provider registry;
//! this module adds credentials, performs the POST, and maps every failure to
//! an [`ExecutionResult::Failed`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use cockpit_core::providers;
use cockpit_core::{BuiltRequest, ExecutionResult, ProcessOutput};
use serde_json::Value;

use crate::error::TransportError;

/// Default bound on a single provider call.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(60);

/// Status and fully read body of a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Trait for sending a built provider request.
///
/// This trait abstracts the HTTP client, allowing for
/// mock implementations in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `request` and read the whole response.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error on DNS, connection, timeout or body read failures.
    async fn post(&self, request: &BuiltRequest) -> Result<TransportResponse, TransportError>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .build()?;
        Ok(Self { client })
    }

    /// Create a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: &BuiltRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.post(&request.url).body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Source of provider credentials.
pub trait Credentials: Send + Sync {
    /// The value of credential variable `name`, if set.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl Credentials for EnvCredentials {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Credentials for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// The API Execution Adapter.
pub struct ApiAdapter<T> {
    transport: T,
    credentials: Box<dyn Credentials>,
}

impl<T: HttpTransport> ApiAdapter<T> {
    /// Create an adapter reading credentials from the environment.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_credentials(transport, EnvCredentials)
    }

    /// Create an adapter with an explicit credential source.
    #[must_use]
    pub fn with_credentials(transport: T, credentials: impl Credentials + 'static) -> Self {
        Self {
            transport,
            credentials: Box::new(credentials),
        }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `prompt` to `provider_id` and normalize the outcome.
    ///
    /// Never fails: unknown providers, missing credentials, transport errors
    /// and non-2xx statuses come back as [`ExecutionResult::Failed`]. No
    /// request is sent when a required credential is missing.
    pub async fn run(&self, provider_id: &str, model: &str, prompt: &str) -> ExecutionResult {
        let spec = match providers::require(provider_id) {
            Ok(spec) => spec,
            Err(err) => return ExecutionResult::failed(err.to_string()),
        };

        let credential = match spec.credential_env {
            Some(var) => match self.credentials.lookup(var).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => {
                    tracing::warn!(provider = %provider_id, var = %var, "Provider credential missing");
                    return ExecutionResult::failed(format!(
                        "Set {var} environment variable for {provider_id} API access."
                    ));
                }
            },
            None => String::new(),
        };

        let request = spec.build_request(&credential, model, prompt);
        tracing::debug!(
            provider = %provider_id,
            model = %spec.effective_model(model),
            url = %request.url,
            "Calling provider API"
        );

        let response = match self.transport.post(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(provider = %provider_id, error = %err, "Provider request failed");
                return ExecutionResult::failed(format!("{provider_id} API call failed: {err}"));
            }
        };

        if !response.is_success() {
            tracing::error!(
                provider = %provider_id,
                status = response.status,
                "Provider returned error status"
            );
            return ExecutionResult::failed(format!(
                "{provider_id} API error ({}): {}",
                response.status, response.body
            ));
        }

        match serde_json::from_str::<Value>(&response.body) {
            Ok(data) => ProcessOutput::from_text(spec.parse_response(&data)).into(),
            Err(err) => ExecutionResult::failed(format!(
                "{provider_id} API call failed: invalid JSON response: {err}"
            )),
        }
    }
}

/// A transport that records requests and replays a canned outcome.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct MockTransport {
    outcome: Result<TransportResponse, String>,
    requests: parking_lot::Mutex<Vec<BuiltRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// A transport answering every request with `status` and `body`.
    #[must_use]
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(TransportResponse {
                status,
                body: body.into(),
            }),
            requests: parking_lot::Mutex::default(),
        }
    }

    /// A transport failing every request with a connection error.
    #[must_use]
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            requests: parking_lot::Mutex::default(),
        }
    }

    /// Every request sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<BuiltRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests sent so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: &BuiltRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request.clone());
        self.outcome
            .clone()
            .map_err(TransportError::Connection)
    }
}
