//! HTTP adapters for the chat, user-data, and contact services.
//!
//! All requests go through browser `fetch()` via gloo-net. Every call is
//! bounded by a gloo-timers timeout; nothing here retries.

pub mod inference;
pub mod user_data;
pub mod contact;

pub use inference::InferenceClient;
pub use user_data::{remote_session, UserDataClient};
pub use contact::ContactClient;

use std::future::Future;

use futures::future::{select, Either};
use gloo_net::http::Response;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;

use assistant_types::{AppError, Result};

/// Join a configured base URL and a path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Race `fut` against a timer. The losing request is dropped.
pub async fn with_timeout<T>(
    timeout_ms: u64,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let timer = TimeoutFuture::new(u32::try_from(timeout_ms).unwrap_or(u32::MAX));
    futures::pin_mut!(fut);
    match select(fut, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(AppError::Timeout(timeout_ms)),
    }
}

/// Body of a 2xx response, or `AppError::Http` carrying the server's
/// `message` when it sent one.
pub(crate) async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(e.to_string()))?;

    if response.ok() {
        return Ok(body);
    }
    Err(AppError::Http {
        status,
        message: error_message(&body, &response.status_text()),
    })
}

/// The services report errors as `{ "message": ... }`; fall back to the raw
/// body, then to the status text.
pub fn error_message(body: &str, status_text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status_text.to_string()
    } else {
        trimmed.to_string()
    }
}
