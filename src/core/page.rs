//! Pagination primitives shared by every listing operation.
//!
//! Listings never hand back unbounded vectors; they run through
//! [`fetch_page`] so callers always get the slice plus the totals needed
//! to render a pager.

use crate::errors::Result;
use sea_orm::{PaginatorTrait, prelude::*};

/// One page of query results plus the bookkeeping around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Zero-based page index that was requested
    pub page: u64,
    /// Page size the slice was cut with
    pub per_page: u64,
    /// Matching rows across all pages
    pub total_items: u64,
    /// Number of pages at this size
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// True when the whole result set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// Runs a select as one page. `per_page` is clamped to at least 1; a page
/// index past the end yields an empty `items` with the totals intact.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    page: u64,
    per_page: u64,
) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let per_page = per_page.max(1);
    let paginator = select.paginate(db, per_page);
    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(page).await?;
    let total_pages = total_items.div_ceil(per_page);

    Ok(Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    })
}
