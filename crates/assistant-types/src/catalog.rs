//! Product references, as listed by the catalog and attached to answers.
//!
//! The chat service is loose about shape: catalog rows arrive as tuples
//! `[id, title, tags, link, imageData?]`, related products as objects.
//! `Product::from_value` accepts both. Stored turns go through the same
//! decoding, so numeric ids and `null` fields written by older frontends
//! still load.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub tags: String,
    pub link: String,
    /// Data URL or remote URL of a thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Decode a catalog tuple or a product object. Returns `None` for
    /// anything that has neither a title nor a link.
    pub fn from_value(value: &Value) -> Option<Self> {
        Product::decode(value).filter(|p| !(p.title.is_empty() && p.link.is_empty()))
    }

    /// Like `from_value` but keeps entries without a title or link, so a
    /// stored turn reloads exactly as it was saved.
    pub(crate) fn decode(value: &Value) -> Option<Self> {
        let product = match value {
            Value::Array(row) => Product {
                id: row.first().map(scalar_to_string).unwrap_or_default(),
                title: row.get(1).map(scalar_to_string).unwrap_or_default(),
                tags: row.get(2).map(scalar_to_string).unwrap_or_default(),
                link: row.get(3).map(scalar_to_string).unwrap_or_default(),
                image: row.get(4).and_then(non_empty_string),
            },
            Value::Object(map) => Product {
                id: map.get("id").map(scalar_to_string).unwrap_or_default(),
                title: map.get("title").map(scalar_to_string).unwrap_or_default(),
                tags: map.get("tags").map(scalar_to_string).unwrap_or_default(),
                link: map.get("link").map(scalar_to_string).unwrap_or_default(),
                image: map.get("image").and_then(non_empty_string),
            },
            _ => return None,
        };
        Some(product)
    }

    /// Decode a list, skipping entries that do not look like products.
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().filter_map(Product::from_value).collect()
    }

    pub fn description(&self) -> String {
        format!("Product tags: {}", self.tags)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(String::from)
}
