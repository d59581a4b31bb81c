//! JSON bodies exchanged with the chat service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Product;
use crate::session::TopicFilter;
use crate::turn::{null_as_default, Answer, HistoryPair};

/// `POST /chat` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
    pub selected_index: TopicFilter,
    /// Alternating question, answer, question, answer, ...
    pub chat_history: Vec<String>,
}

impl ChatRequestBody {
    pub fn new(message: impl Into<String>, topic: TopicFilter, history: &[HistoryPair]) -> Self {
        Self {
            message: message.into(),
            selected_index: topic,
            chat_history: history
                .iter()
                .flat_map(|pair| [pair.question.clone(), pair.answer.clone()])
                .collect(),
        }
    }
}

/// `POST /chat` response body. Everything except `response` is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponseBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default)]
    pub urls: Option<Vec<String>>,
    /// Older deployments return a single `url`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub related_products: Option<Vec<Value>>,
    #[serde(default)]
    pub video_links: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub video_titles: Option<Vec<String>>,
}

impl ChatResponseBody {
    pub fn into_answer(self) -> Answer {
        let mut video_urls = self.urls.unwrap_or_default();
        if let Some(url) = self.url.filter(|u| !u.is_empty()) {
            if !video_urls.contains(&url) {
                video_urls.insert(0, url);
            }
        }

        Answer {
            text: self.response,
            video_urls,
            video_links: self.video_links.unwrap_or_default(),
            video_titles: self.video_titles.unwrap_or_default(),
            products: Product::from_values(&self.related_products.unwrap_or_default()),
        }
    }
}
