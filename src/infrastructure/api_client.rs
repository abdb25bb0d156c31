// Diagnostic API adapter - timed GET requests against a single origin
use crate::error::{ApiError, GENERIC_SERVER_ERROR, UNREACHABLE_HINT};
use crate::infrastructure::trace::{RequestTrace, TraceEvent};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Seam between the typed query functions and the network.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// GET `path` with the given query parameters and return the decoded JSON body.
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    trace: RequestTrace,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, trace: RequestTrace) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            trace,
        })
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        if query.is_empty() {
            return format!("{}{}", self.base_url, path);
        }
        let encoded: Vec<String> = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();
        format!("{}{}?{}", self.base_url, path, encoded.join("&"))
    }

    async fn execute(&self, url: &str) -> Result<(u16, serde_json::Value), (Option<u16>, ApiError)> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| (None, classify_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| (Some(status.as_u16()), classify_transport_error(&e)))?;

        if !status.is_success() {
            let error = ApiError::ServerError {
                status: status.as_u16(),
                message: server_error_message(&body),
            };
            return Err((Some(status.as_u16()), error));
        }

        let value = serde_json::from_str(&body).map_err(|e| {
            (
                Some(status.as_u16()),
                ApiError::MalformedResponse(format!("response is not valid JSON: {}", e)),
            )
        })?;

        Ok((status.as_u16(), value))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.build_url(path, query);
        self.trace.record(TraceEvent::request(&url));
        let started = Instant::now();

        let outcome = self.execute(&url).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((status, value)) => {
                self.trace
                    .record(TraceEvent::response(&url, status, elapsed_ms));
                Ok(value)
            }
            Err((status, error)) => {
                self.trace.record(TraceEvent::failure(
                    &url,
                    status,
                    elapsed_ms,
                    error.to_string(),
                ));
                Err(error)
            }
        }
    }
}

fn classify_transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else if error.is_decode() {
        ApiError::MalformedResponse(error.to_string())
    } else {
        tracing::debug!("No response from diagnostic API: {}", error);
        ApiError::NetworkUnreachable(UNREACHABLE_HINT.to_string())
    }
}

/// Pull the server's `detail` string out of an error body, or fall back to the generic message.
pub fn server_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::trim)
                .filter(|detail| !detail.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}
