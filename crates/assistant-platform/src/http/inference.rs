//! Chat service adapter.
//!
//! `POST /chat` answers a query; `GET /documents` lists the shop catalog.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use assistant_core::ports::{AskRequest, InferencePort};
use assistant_types::{
    AppError, Result,
    catalog::Product,
    config::GatewayConfig,
    turn::Answer,
    wire::ChatResponseBody,
};

use super::{endpoint, read_body, with_timeout};

pub struct InferenceClient {
    config: GatewayConfig,
}

impl InferenceClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl InferencePort for InferenceClient {
    async fn ask(&self, req: AskRequest) -> Result<Answer> {
        let url = endpoint(&self.config.base_url, "chat");
        let body = req.to_wire();
        log::debug!(
            "POST {} (topic {}, {} prior turns)",
            url,
            body.selected_index.wire_value(),
            req.history.len()
        );

        let text = with_timeout(self.config.timeout_ms, async {
            let response = Request::post(&url)
                .json(&body)
                .map_err(|e| AppError::Serialization(e.to_string()))?
                .send()
                .await
                .map_err(|e| AppError::GatewayUnavailable(e.to_string()))?;
            read_body(response).await
        })
        .await?;

        let parsed: ChatResponseBody = serde_json::from_str(&text)?;
        Ok(parsed.into_answer())
    }

    async fn list_documents(&self) -> Result<Vec<Product>> {
        let url = endpoint(&self.config.base_url, "documents");

        let text = with_timeout(self.config.timeout_ms, async {
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|e| AppError::GatewayUnavailable(e.to_string()))?;
            read_body(response).await
        })
        .await?;

        let rows: Vec<Value> = serde_json::from_str(&text)?;
        let products = Product::from_values(&rows);
        if products.len() < rows.len() {
            log::warn!(
                "Skipped {} unreadable catalog rows",
                rows.len() - products.len()
            );
        }
        Ok(products)
    }
}
