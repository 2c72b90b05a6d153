//! content::collections
//!
//! Collection discovery from the root configuration document.
//!
//! The document is not parsed as YAML. Only the `collections:` block is
//! scanned, line by line:
//!
//! ```yaml
//! collections:
//!   posts:
//!     config: collections/posts.yml
//!   pages:
//!     settings: { config: pages.yml }
//!   drafts:
//! site:
//!   title: ignored
//! ```
//!
//! The block ends at the first non-indented line. Every bare `name:` line
//! indented by two or more spaces opens an entry, whatever its depth. A
//! `config:` key (on its own line or inside an inline map) on a line indented
//! deeper than the latest opener sets that entry's config path; the first one
//! wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::split_indent;

/// A collection declared in the root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    pub name: String,
    /// Repository path of the collection's schema document
    pub config_path: Option<String>,
}

impl CollectionEntry {
    pub fn new(name: impl Into<String>, config_path: Option<&str>) -> Self {
        Self {
            name: name.into(),
            config_path: config_path.map(str::to_string),
        }
    }
}

/// Two or more spaces, a bare identifier, a colon, end of line.
static ENTRY_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{2,}([A-Za-z0-9_-]+):\s*$").expect("entry opener pattern is valid")
});

/// A `config:` key, on its own or inside an inline map.
static CONFIG_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s{,-])config\s*:\s*["']?([^"',}\s]+)"#)
        .expect("config key pattern is valid")
});

/// Parse the collection entries out of the root configuration text.
///
/// Never fails: text without a `collections:` line yields no entries.
pub fn parse_collections(text: &str) -> Vec<CollectionEntry> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.trim() == "collections:") {
        return Vec::new();
    }

    let mut entries: Vec<CollectionEntry> = Vec::new();
    // Indentation of the latest opener line.
    let mut opener_indent = 0;

    for line in lines {
        let line = line.trim_end();
        let (indent, rest) = split_indent(line);
        if rest.is_empty() || rest.starts_with('#') {
            continue;
        }
        if indent == 0 {
            break;
        }

        if let Some(caps) = ENTRY_OPENER.captures(line) {
            entries.push(CollectionEntry::new(&caps[1], None));
            opener_indent = indent;
            continue;
        }

        if let Some(entry) = entries.last_mut() {
            if indent > opener_indent {
                set_config(entry, rest);
            }
        }
    }

    entries
}

/// Record the first `config:` value found for `entry`.
fn set_config(entry: &mut CollectionEntry, text: &str) {
    if entry.config_path.is_some() {
        return;
    }
    if let Some(caps) = CONFIG_KEY.captures(text) {
        entry.config_path = Some(caps[1].to_string());
    }
}

/// Look up a collection by name.
///
/// With repeated names the first declaration is returned.
pub fn find_collection<'a>(
    entries: &'a [CollectionEntry],
    name: &str,
) -> Option<&'a CollectionEntry> {
    entries.iter().find(|e| e.name == name)
}
