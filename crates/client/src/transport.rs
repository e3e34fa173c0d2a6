//! Authenticated request transport.
//!
//! Every outbound call to the Central Server goes through [`Transport`]:
//! it reads the credential record before each send, attaches the bearer
//! token when one exists, applies a bounded retry policy to idempotent
//! requests, and recovers from an expired access token by refreshing it
//! at most once per logical request.
//!
//! Refresh runs on a second, structurally retry-free executor. Nothing
//! loops around it, so "refresh failed with 401" can never trigger a
//! retry of the refresh itself.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bento_core::CredentialRecord;
use bento_session::SessionStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenResponse;
use crate::error::ClientError;

/// Per-request timeout applied to both executors.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API version prefix appended to the configured base URL.
const API_PREFIX: &str = "/api/v1";

/// Statuses the generic retry policy considers transient.
pub const RETRYABLE_STATUSES: [u16; 9] = [401, 403, 408, 413, 429, 500, 502, 503, 504];

// ──────────────────────────────────────────────
// Request shape
// ──────────────────────────────────────────────

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }

    /// Only idempotent requests are eligible for generic retry.
    /// PATCH and POST are replayed solely via the refresh-on-401 path.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Method::Get)
    }
}

/// Body of an outbound request, kept re-sendable across retries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A fully prepared outbound request.
pub(crate) struct WireRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub bearer: Option<&'a str>,
    pub payload: &'a Payload,
}

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx statuses arrive here rather than as errors so the caller can
/// read the server's detail message and decide on retry or refresh.
#[derive(Debug, Clone)]
pub(crate) struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one prepared request against the network.
///
/// The transport owns two of these: the main executor (wrapped in the
/// retry loop) and the refresh executor (never retried). Tests inject
/// scripted implementations.
pub(crate) trait HttpExec: Send + Sync {
    fn run(&self, request: WireRequest<'_>) -> Result<WireResponse, ClientError>;
}

// ──────────────────────────────────────────────
// Retry policy
// ──────────────────────────────────────────────

/// Bounded retry with doubling backoff for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles each retry.
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_backoff_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Whether a further generic retry is allowed for this attempt.
    ///
    /// `attempt` is zero-based: the number of retries already spent.
    pub fn should_retry(&self, method: Method, status: u16, attempt: u32) -> bool {
        attempt < self.max_retries
            && method.is_idempotent()
            && RETRYABLE_STATUSES.contains(&status)
    }

    fn backoff_ms(&self, attempt: u32) -> u64 {
        self.initial_backoff_ms.saturating_mul(1 << attempt.min(16))
    }
}

// ──────────────────────────────────────────────
// ureq executor
// ──────────────────────────────────────────────

/// Executor backed by a `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)`: error
/// statuses come back as responses with readable bodies, which the
/// transport needs for detail messages and the refresh decision.
struct UreqExec {
    agent: ureq::Agent,
}

impl UreqExec {
    fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        UreqExec { agent }
    }
}

impl HttpExec for UreqExec {
    fn run(&self, request: WireRequest<'_>) -> Result<WireResponse, ClientError> {
        let bearer = request
            .bearer
            .map(|token| format!("Bearer {}", token));

        let result = match (request.method, request.payload) {
            (Method::Get, _) => {
                let mut call = self.agent.get(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.call()
            }
            (Method::Post, Payload::Form(fields)) => {
                let mut call = self.agent.post(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.send_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }
            (Method::Post, Payload::Json(body)) => {
                let mut call = self.agent.post(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.send_json(body)
            }
            (Method::Post, Payload::Empty) => {
                let mut call = self.agent.post(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.send_empty()
            }
            (Method::Patch, Payload::Json(body)) => {
                let mut call = self.agent.patch(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.send_json(body)
            }
            (Method::Patch, _) => {
                let mut call = self.agent.patch(request.url);
                if let Some(value) = &bearer {
                    call = call.header("Authorization", value);
                }
                call.send_empty()
            }
        };

        let response = result.map_err(|e| ClientError::Network {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| ClientError::Network {
                message: e.to_string(),
            })?;

        Ok(WireResponse { status, body })
    }
}

// ──────────────────────────────────────────────
// Transport
// ──────────────────────────────────────────────

/// The authenticated request path to the Central Server.
pub struct Transport {
    base_url: String,
    store: Arc<dyn SessionStore>,
    policy: RetryPolicy,
    exec: Box<dyn HttpExec>,
    refresh_exec: Box<dyn HttpExec>,
    terminate_hook: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Transport {
    /// Create a transport for the given server base URL (without the
    /// `/api/v1` prefix) backed by the given session store.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Transport {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            policy: RetryPolicy::default(),
            exec: Box::new(UreqExec::new(REQUEST_TIMEOUT)),
            refresh_exec: Box::new(UreqExec::new(REQUEST_TIMEOUT)),
            terminate_hook: None,
        }
    }

    /// Override the generic retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Install a hook invoked exactly once whenever the session is
    /// terminated (the browser client's "redirect to login").
    pub fn with_termination_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.terminate_hook = Some(Box::new(hook));
        self
    }

    #[cfg(test)]
    fn with_execs(mut self, exec: Box<dyn HttpExec>, refresh_exec: Box<dyn HttpExec>) -> Self {
        self.exec = exec;
        self.refresh_exec = refresh_exec;
        self
    }

    /// The session store this transport reads tokens from.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    // ── Typed entry points ───────────────────────────────────────────────────

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.request(Method::Get, path, &Payload::Empty)?;
        decode(&body)
    }

    pub fn patch_json(&self, path: &str, body: &impl Serialize) -> Result<(), ClientError> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })?;
        self.request(Method::Patch, path, &Payload::Json(value))?;
        Ok(())
    }

    pub fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let payload = Payload::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        let body = self.request(Method::Post, path, &payload)?;
        decode(&body)
    }

    // ── Request loop ─────────────────────────────────────────────────────────

    /// Send one logical request, applying bearer attachment, generic
    /// retry, and the refresh-on-401 recovery path.
    ///
    /// At most one refresh happens per logical request: a second 401
    /// after a successful refresh terminates the session instead of
    /// looping.
    fn request(&self, method: Method, path: &str, payload: &Payload) -> Result<String, ClientError> {
        let url = self.api_url(path);
        let mut attempt = 0u32;
        let mut refreshed = false;

        loop {
            // Read the store fresh on every attempt so a refresh (or a
            // concurrent login) is picked up immediately.
            let record = self.store.load()?;
            let response = self.exec.run(WireRequest {
                method,
                url: &url,
                bearer: record.as_ref().map(|r| r.access_token.as_str()),
                payload,
            })?;

            if response.is_success() {
                return Ok(response.body);
            }

            if response.status == 401 {
                let Some(record) = record else {
                    // Nothing to refresh: surface the 401 as-is.
                    return Err(api_error(&response));
                };
                if refreshed {
                    // Fresh token was already tried once. Final failure.
                    self.terminate_session()?;
                    return Err(ClientError::AuthenticationFailed);
                }
                let Some(refresh_token) = record.refresh_token else {
                    self.terminate_session()?;
                    return Err(ClientError::AuthenticationFailed);
                };
                match self.refresh(&refresh_token) {
                    Ok(renewed) => {
                        self.store.store(&renewed)?;
                        refreshed = true;
                        continue;
                    }
                    Err(_) => {
                        self.terminate_session()?;
                        return Err(ClientError::AuthenticationFailed);
                    }
                }
            }

            if self.policy.should_retry(method, response.status, attempt) {
                thread::sleep(Duration::from_millis(self.policy.backoff_ms(attempt)));
                attempt += 1;
                continue;
            }

            if method.is_idempotent() && RETRYABLE_STATUSES.contains(&response.status) {
                return Err(ClientError::RetryExhausted {
                    status: response.status,
                    attempts: attempt + 1,
                });
            }

            return Err(api_error(&response));
        }
    }

    /// Exchange the refresh token for new credentials on the retry-free
    /// executor. The previous refresh token is carried over when the
    /// server omits one from its response.
    fn refresh(&self, refresh_token: &str) -> Result<CredentialRecord, ClientError> {
        let payload = Payload::Json(serde_json::json!({ "refresh_token": refresh_token }));
        let response = self.refresh_exec.run(WireRequest {
            method: Method::Post,
            url: &self.api_url("/auth/refresh"),
            bearer: None,
            payload: &payload,
        })?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let token: TokenResponse = decode(&response.body)?;
        Ok(token.into_record(Some(refresh_token)))
    }

    /// Clear all local session state and invoke the termination hook.
    fn terminate_session(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        if let Some(hook) = &self.terminate_hook {
            hook();
        }
        Ok(())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        message: e.to_string(),
    })
}

/// Map a non-success response to an API error, preferring the server's
/// `detail` message when the body carries one.
fn api_error(response: &WireResponse) -> ClientError {
    ClientError::Api {
        status: response.status,
        detail: error_detail(&response.body)
            .unwrap_or_else(|| format!("request failed with status {}", response.status)),
    }
}

/// Extract the `detail` field from a JSON error body, if present.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(|s| s.to_string())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
