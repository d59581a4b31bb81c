use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::Product;

/// A completed question/answer exchange.
///
/// Field names match the persisted chat blob (`text`, `videoLinks`, ...), so
/// records written by earlier frontends load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    /// Answer text, possibly containing `[videoN]` markers
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: Vec<String>,
    #[serde(default, deserialize_with = "stored_products")]
    pub products: Vec<Product>,
    /// Marker token (e.g. `[video1]`) → video URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_links: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub video_titles: Vec<String>,
}

/// Earlier frontends stored whatever the service sent, `null` included.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Products as objects or tuples with string or numeric ids; entries that
/// are not products at all are dropped.
fn stored_products<'de, D>(deserializer: D) -> Result<Vec<Product>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = null_as_default(deserializer)?;
    Ok(values.iter().filter_map(Product::decode).collect())
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: Answer) -> Self {
        Self {
            question: question.into(),
            text: answer.text,
            videos: answer.video_urls,
            products: answer.products,
            video_links: answer.video_links,
            video_titles: answer.video_titles,
        }
    }

    /// The video shown next to the answer: the first linked one, falling
    /// back to the first related URL.
    pub fn primary_video(&self) -> Option<&str> {
        self.video_links
            .values()
            .next()
            .or_else(|| self.videos.first())
            .map(String::as_str)
    }
}

/// What the chat service returned for one query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer {
    pub text: String,
    pub video_urls: Vec<String>,
    pub video_links: BTreeMap<String, String>,
    pub video_titles: Vec<String>,
    pub products: Vec<Product>,
}

impl Answer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One prior exchange as sent back to the service for context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPair {
    pub question: String,
    pub answer: String,
}

impl From<&ConversationTurn> for HistoryPair {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            question: turn.question.clone(),
            answer: turn.text.clone(),
        }
    }
}
