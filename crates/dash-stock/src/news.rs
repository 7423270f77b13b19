//! News items from the provider's sentiment feed

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A news article
///
/// Only the title is used; every other provider field is carried along
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// A provider field other than the title
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Titles joined with `separator`, in feed order
pub fn join_titles(items: &[NewsItem], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
