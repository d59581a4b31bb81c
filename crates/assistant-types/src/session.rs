use serde::{Deserialize, Serialize};

use crate::turn::{null_as_default, ConversationTurn, HistoryPair};

/// Content category the chat service searches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TopicFilter {
    /// The service names its unfiltered index "bents"
    #[default]
    #[serde(rename = "bents", alias = "all")]
    All,
    #[serde(rename = "shop-improvement")]
    ShopImprovement,
    #[serde(rename = "tool-recommendations")]
    ToolRecommendations,
}

impl TopicFilter {
    pub fn all() -> &'static [TopicFilter] {
        &[
            TopicFilter::All,
            TopicFilter::ShopImprovement,
            TopicFilter::ToolRecommendations,
        ]
    }

    /// Value sent as `selected_index`
    pub fn wire_value(&self) -> &'static str {
        match self {
            TopicFilter::All => "bents",
            TopicFilter::ShopImprovement => "shop-improvement",
            TopicFilter::ToolRecommendations => "tool-recommendations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopicFilter::All => "All",
            TopicFilter::ShopImprovement => "Shop Improvement",
            TopicFilter::ToolRecommendations => "Tool Recommendations",
        }
    }
}

/// Everything the assistant remembers for one user.
///
/// Serialized as the local chat blob. Every field is optional on input so
/// partial or older blobs still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    #[serde(deserialize_with = "null_as_default")]
    pub conversations: Vec<ConversationTurn>,
    #[serde(deserialize_with = "null_as_default")]
    pub search_history: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_index: TopicFilter,
    /// Set only while the latest query has failed to reach the service
    pub pending_query: Option<String>,
}

impl SessionState {
    /// Prior exchanges in chronological order.
    pub fn history(&self) -> Vec<HistoryPair> {
        self.conversations.iter().map(HistoryPair::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

/// The user-data service's copy of a session.
///
/// Extra fields on the stored document (`_id`, `userId`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub conversations: Vec<ConversationTurn>,
    #[serde(deserialize_with = "null_as_default")]
    pub search_history: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_index: TopicFilter,
}

impl From<&SessionState> for RemoteRecord {
    fn from(state: &SessionState) -> Self {
        Self {
            conversations: state.conversations.clone(),
            search_history: state.search_history.clone(),
            selected_index: state.selected_index,
        }
    }
}

impl From<RemoteRecord> for SessionState {
    fn from(record: RemoteRecord) -> Self {
        Self {
            conversations: record.conversations,
            search_history: record.search_history,
            selected_index: record.selected_index,
            pending_query: None,
        }
    }
}
