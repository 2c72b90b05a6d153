//! content
//!
//! The read path: from the root configuration document to item files.
//!
//! # Pipeline
//!
//! 1. [`collections`] - which collections exist and where their schemas live
//! 2. [`schema`] - fields and storage layout of one collection
//! 3. [`resolver`] - which directory holds the collection's items
//! 4. [`fetcher`] - item contents, fetched concurrently
//! 5. [`pagination`] - in-memory page slicing over the full item set
//!
//! Every read recomputes all of this from the host; nothing is cached.

pub mod collections;
pub mod fetcher;
pub mod item;
pub mod pagination;
pub mod resolver;
pub mod schema;

pub use collections::{parse_collections, CollectionEntry};
pub use fetcher::{fetch_items, FetchMode, FetchedItems};
pub use item::ItemFile;
pub use pagination::{paginate, Pagination};
pub use resolver::{candidate_directories, resolve_items};
pub use schema::{
    parse_schema, CollectionSchema, FieldSpec, FieldType, InputKind, StorageFormat, StorageSpec,
};

/// Split a line into its leading-whitespace width (in characters) and the
/// remaining text with trailing whitespace removed.
pub(crate) fn split_indent(line: &str) -> (usize, &str) {
    let rest = line.trim_start();
    let indent = line[..line.len() - rest.len()].chars().count();
    (indent, rest.trim_end())
}

#[cfg(test)]
mod tests {
    use super::split_indent;

    #[test]
    fn split_indent_counts_leading_whitespace() {
        assert_eq!(split_indent("    title:  "), (4, "title:"));
        assert_eq!(split_indent("top:"), (0, "top:"));
        assert_eq!(split_indent("   "), (3, ""));
        assert_eq!(split_indent("\tkey: v\r"), (1, "key: v"));
    }
}
