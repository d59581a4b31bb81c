//! Contact form submission.

use async_trait::async_trait;
use gloo_net::http::Request;

use assistant_core::ports::ContactPort;
use assistant_types::{
    AppError, Result,
    config::UserDataConfig,
    contact::{ContactReceipt, ContactSubmission},
};

use super::{endpoint, read_body, with_timeout};

const TIMEOUT_MS: u64 = 30_000;

/// Posts to `/contact` on the user-data server
pub struct ContactClient {
    base_url: String,
}

impl ContactClient {
    pub fn new(config: &UserDataConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait(?Send)]
impl ContactPort for ContactClient {
    async fn submit_contact(&self, form: &ContactSubmission) -> Result<ContactReceipt> {
        let form = form.normalized()?;
        let url = endpoint(&self.base_url, "contact");

        let text = with_timeout(TIMEOUT_MS, async {
            let response = Request::post(&url)
                .json(&form)
                .map_err(|e| AppError::Serialization(e.to_string()))?
                .send()
                .await
                .map_err(|e| AppError::Network(e.to_string()))?;
            read_body(response).await
        })
        .await?;

        let receipt: ContactReceipt = serde_json::from_str(&text)?;
        log::info!("Contact form accepted: {}", receipt.message);
        Ok(receipt)
    }
}
