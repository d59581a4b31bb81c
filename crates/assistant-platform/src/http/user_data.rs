//! User-data service adapter: the durable copy of a session.

use async_trait::async_trait;
use gloo_net::http::Request;

use assistant_core::ports::UserDataPort;
use assistant_types::{
    AppError, Result,
    config::UserDataConfig,
    session::{RemoteRecord, SessionState},
};

use super::{endpoint, read_body, with_timeout};

/// Same bound the chat service uses by default
const TIMEOUT_MS: u64 = 30_000;

pub struct UserDataClient {
    config: UserDataConfig,
}

impl UserDataClient {
    pub fn new(config: UserDataConfig) -> Self {
        Self { config }
    }

    fn user_url(&self, user_id: &str) -> String {
        endpoint(&self.config.base_url, &format!("api/user/{}", user_id))
    }
}

/// Interpret the outcome of `GET /api/user/:id`. A 404 or a `null` body
/// means the user has no stored session yet.
pub fn remote_session(body: Result<String>) -> Result<Option<SessionState>> {
    let text = match body {
        Ok(text) => text,
        Err(AppError::Http { status: 404, .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    let record: Option<RemoteRecord> = serde_json::from_str(&text)?;
    Ok(record.map(SessionState::from))
}

#[async_trait(?Send)]
impl UserDataPort for UserDataClient {
    async fn load_remote(&self, user_id: &str) -> Result<Option<SessionState>> {
        let url = self.user_url(user_id);

        let text = with_timeout(TIMEOUT_MS, async {
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|e| AppError::Network(e.to_string()))?;
            read_body(response).await
        })
        .await;

        remote_session(text)
    }

    async fn save_remote(&self, user_id: &str, record: &RemoteRecord) -> Result<()> {
        let url = self.user_url(user_id);

        with_timeout(TIMEOUT_MS, async {
            let response = Request::post(&url)
                .json(record)
                .map_err(|e| AppError::Serialization(e.to_string()))?
                .send()
                .await
                .map_err(|e| AppError::Network(e.to_string()))?;
            read_body(response).await
        })
        .await?;

        log::debug!("Session for {} saved remotely", user_id);
        Ok(())
    }
}
