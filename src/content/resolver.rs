//! content::resolver
//!
//! Locating a collection's items directory.
//!
//! Candidates are probed strictly in order and the first directory whose
//! listing is non-empty wins; later candidates are never queried. A missing
//! directory, a path that is a file, and an empty directory all fall through
//! to the next candidate, so an empty collection and a wrong path look the
//! same. Any other host failure stops the probe.
//!
//! Candidate order:
//! 1. A directory hint from the schema text (`items_dir`, `items-directory`,
//!    `folder`, `path` or `dir`; first occurrence)
//! 2. `collections/<name>`
//! 3. `<name>`
//! 4. `content/<name>`
//! 5. `data/<name>`
//! 6. `_collections/<name>`

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::item::ItemFile;
use crate::core::CoreError;
use crate::forge::{EntryKind, Forge, ForgeError, RepoRef};

static DIRECTORY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:items_dir|items-directory|folder|path|dir)[ \t]*:[ \t]*(.+?)[ \t\r]*$")
        .expect("directory hint pattern is valid")
});

/// Directory named by the schema text, if any.
///
/// Surrounding quotes and trailing slashes are removed.
pub fn directory_hint(schema_text: &str) -> Option<String> {
    let caps = DIRECTORY_HINT.captures(schema_text)?;
    let value = caps.get(1)?.as_str().trim_matches(|c| c == '"' || c == '\'');
    let value = value.trim_end_matches('/');
    (!value.is_empty()).then(|| value.to_string())
}

/// Ordered, de-duplicated list of directories to probe.
pub fn candidate_directories(collection: &str, schema_text: &str) -> Vec<String> {
    let fallbacks = [
        format!("collections/{}", collection),
        collection.to_string(),
        format!("content/{}", collection),
        format!("data/{}", collection),
        format!("_collections/{}", collection),
    ];

    let mut candidates: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
    for dir in directory_hint(schema_text).into_iter().chain(fallbacks) {
        if !candidates.contains(&dir) {
            candidates.push(dir);
        }
    }
    candidates
}

/// Resolve the item files of `collection` on `branch`.
///
/// Returns the files of the first candidate directory with a non-empty
/// listing (subdirectories are listed by the host but are not items).
///
/// # Errors
///
/// - `NotFound` when no candidate yields entries
/// - `UpstreamFailure` when a probe fails for another reason
pub async fn resolve_items(
    forge: &dyn Forge,
    repo: &RepoRef,
    branch: &str,
    collection: &str,
    schema_text: &str,
) -> Result<Vec<ItemFile>, CoreError> {
    for dir in candidate_directories(collection, schema_text) {
        match forge.list_directory(repo, branch, &dir).await {
            Ok(entries) if !entries.is_empty() => {
                debug!(collection, dir = %dir, entries = entries.len(), "resolved items directory");
                return Ok(entries
                    .iter()
                    .filter(|entry| entry.kind == EntryKind::File)
                    .map(ItemFile::from)
                    .collect());
            }
            Ok(_) => debug!(collection, dir = %dir, "candidate directory is empty"),
            Err(ForgeError::NotFound(_)) | Err(ForgeError::NotADirectory(_)) => {
                debug!(collection, dir = %dir, "candidate directory not found")
            }
            Err(e) => {
                return Err(CoreError::UpstreamFailure(format!(
                    "listing '{}' failed: {}",
                    dir, e
                )))
            }
        }
    }

    Err(CoreError::NotFound(format!(
        "no items directory found for collection '{}'",
        collection
    )))
}
