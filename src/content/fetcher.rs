//! content::fetcher
//!
//! Item content retrieval.
//!
//! In full mode every item's file is read from the host with at most
//! `concurrency` reads in flight, and results keep listing order. A failed
//! read is recorded on its item and never fails the batch.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::item::ItemFile;
use crate::forge::{Forge, RepoRef};

/// How much of each item to retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Names and paths only; no host reads.
    #[default]
    MetadataOnly,
    /// Names, paths, and file contents.
    Full,
}

impl FetchMode {
    pub fn from_include_content(include_content: bool) -> Self {
        if include_content {
            FetchMode::Full
        } else {
            FetchMode::MetadataOnly
        }
    }
}

/// Result of a fetch over the full item set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItems {
    pub items: Vec<ItemFile>,
    pub total_count: usize,
}

impl FetchedItems {
    /// Items whose content could not be read.
    pub fn failures(&self) -> impl Iterator<Item = &ItemFile> {
        self.items.iter().filter(|item| item.error.is_some())
    }
}

/// Fetch `entries` according to `mode`.
///
/// Content is decoded as UTF-8, replacing invalid sequences.
pub async fn fetch_items(
    forge: &dyn Forge,
    repo: &RepoRef,
    branch: &str,
    entries: Vec<ItemFile>,
    mode: FetchMode,
    concurrency: usize,
) -> FetchedItems {
    let total_count = entries.len();
    if mode == FetchMode::MetadataOnly {
        return FetchedItems {
            items: entries,
            total_count,
        };
    }

    debug!(count = total_count, concurrency, "fetching item contents");
    let items: Vec<ItemFile> = stream::iter(entries)
        .map(|item| async move {
            match forge.get_file_content(repo, branch, &item.path).await {
                Ok(bytes) => item.with_content(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    warn!(path = %item.path, error = %e, "failed to fetch item content");
                    item.with_error(e.to_string())
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    FetchedItems { items, total_count }
}
