//! Minimal HTTP plumbing for the store client.
//!
//! - Bounded retries for 429/5xx with exponential backoff and
//!   `Retry-After` support
//! - 404 is an expected absence on lookups, not an error
//! - Structured `tracing` events; credential values are never logged

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget.
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET JSON; `Ok(None)` when the server answers 404.
    pub async fn get_json_opt<T>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::GET, path, bearer, None)
            .await
    }

    /// PATCH a JSON body, decoding the JSON reply.
    pub async fn patch_json<B, T>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .request_json(Method::PATCH, path, bearer, Some(body))
            .await?;
        // PATCH never produces a 404-as-absent result for our paths; an
        // empty decode here means the server broke contract.
        resp.ok_or_else(|| HttpError::Api {
            status: StatusCode::NOT_FOUND,
            message: "document path rejected".into(),
        })
    }

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<Option<T>, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let mut attempt = 0usize;
        loop {
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(self.default_timeout);
            if let Some(token) = bearer {
                rb = rb.bearer_auth(token);
            }
            if let Some(b) = body {
                rb = rb.json(b);
            }

            tracing::debug!(
                attempt = attempt + 1,
                max_retries = self.max_retries,
                method = %method,
                host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
                auth = bearer.is_some(),
                "store.http.request"
            );

            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < self.max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            attempt,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "store.http.retrying_network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => return Err(HttpError::Network(err.to_string())),
            };

            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if status.is_success() {
                let snippet = snip_body(&bytes);
                return serde_json::from_slice::<T>(&bytes)
                    .map(Some)
                    .map_err(|e| {
                        tracing::warn!(
                            serde_err = %e,
                            body_snippet = %snippet,
                            "store.http.decode_error"
                        );
                        HttpError::Decode(e.to_string(), snippet)
                    });
            }

            let message = extract_error_message(&bytes);
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < self.max_retries {
                attempt += 1;
                let delay = retry_after_delay_secs(&headers)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| {
                        let exp = backoff_delay(attempt);
                        if status == StatusCode::TOO_MANY_REQUESTS {
                            exp.max(Duration::from_millis(1100))
                        } else {
                            exp
                        }
                    });
                tracing::warn!(
                    %status,
                    attempt,
                    backoff_ms = delay.as_millis() as u64,
                    message = %message,
                    "store.http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(%status, message = %message, "store.http.error");
            return Err(HttpError::Api { status, message });
        }
    }
}

fn backoff_delay(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt - 1).min(8)))
}

/// Pull a human-readable message out of a Firestore-style error body,
/// `{"error": {"message": "..."}}`, with flat fallbacks.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Envelope>(body) {
        return env.error.message;
    }
    if let Ok(flat) = serde_json::from_slice::<Flat>(body) {
        if !flat.message.is_empty() {
            return flat.message;
        }
        if !flat.error.is_empty() {
            return flat.error;
        }
    }
    snip_body(body)
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firestore_error_envelope_is_unwrapped() {
        let body = br#"{"error":{"code":403,"message":"Missing permission","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(extract_error_message(body), "Missing permission");
    }

    #[test]
    fn flat_message_is_used_as_fallback() {
        assert_eq!(
            extract_error_message(br#"{"message":"nope"}"#),
            "nope"
        );
    }

    #[test]
    fn unparseable_bodies_fall_back_to_a_snippet() {
        assert_eq!(extract_error_message(b"service unavailable"), "service unavailable");
    }

    #[test]
    fn backoff_grows_exponentially() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(400));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }
}
