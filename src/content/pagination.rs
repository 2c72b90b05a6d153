//! content::pagination
//!
//! In-memory pagination over a fully resolved item set.
//!
//! The host has no paging primitive for directory contents, so the whole set
//! is resolved first and a page is a plain slice of it:
//! `items[(page - 1) * limit .. (page - 1) * limit + limit]`.

use serde::Serialize;

use crate::core::CoreError;

/// Page metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    /// Compute page metadata.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `page` or `limit` is zero.
    pub fn new(page: usize, limit: usize, total_count: usize) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::InvalidInput("page must be at least 1".into()));
        }
        if limit == 0 {
            return Err(CoreError::InvalidInput("limit must be at least 1".into()));
        }

        let total_pages = total_count.div_ceil(limit);
        Ok(Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        })
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Slice one page out of `items`.
///
/// A page past the end is empty but still valid.
pub fn paginate<T>(
    items: Vec<T>,
    page: usize,
    limit: usize,
) -> Result<(Vec<T>, Pagination), CoreError> {
    let pagination = Pagination::new(page, limit, items.len())?;
    let slice = items
        .into_iter()
        .skip(pagination.offset())
        .take(limit)
        .collect();
    Ok((slice, pagination))
}
