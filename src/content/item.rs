//! content::item
//!
//! A single content item file.

use serde::Serialize;

use crate::forge::DirEntry;

/// One file of a collection's items directory.
///
/// Once fetched, exactly one of `content` and `error` is set. Both are
/// absent in metadata-only listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFile {
    pub name: String,
    /// Repository-relative path
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemFile {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: None,
            error: None,
        }
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self.error = None;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self.content = None;
        self
    }

    /// Whether content retrieval was attempted.
    pub fn is_fetched(&self) -> bool {
        self.content.is_some() || self.error.is_some()
    }
}

impl From<&DirEntry> for ItemFile {
    fn from(entry: &DirEntry) -> Self {
        ItemFile::new(&entry.name, &entry.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_and_error_are_exclusive() {
        let item = ItemFile::new("a.json", "posts/a.json");
        assert!(!item.is_fetched());

        let item = item.with_error("boom".into());
        assert!(item.is_fetched());

        let item = item.with_content("{}".into());
        assert_eq!(item.content.as_deref(), Some("{}"));
        assert!(item.error.is_none());
    }

    #[test]
    fn unfetched_fields_are_omitted_from_json() {
        let value = serde_json::to_value(ItemFile::new("a.json", "posts/a.json")).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "a.json", "path": "posts/a.json" }));
    }
}
