//! Page-window arithmetic.
//!
//! Pure, storage-free, and total over its inputs: out-of-range pages clamp to
//! the nearest boundary instead of failing, so stale client state (a
//! bookmarked page after deletions) never errors.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Page numbers for the four navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationTargets {
    /// Always page 1.
    pub first: usize,
    /// Always the last page.
    pub last: usize,
    /// `min(total_pages, page + 1)`.
    pub next: usize,
    /// `max(1, page - 1)`.
    pub previous: usize,
}

/// Window plus targets, computed together for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page numbers to jump to.
    pub targets: NavigationTargets,
    /// The resolved window.
    pub window: PaginationWindow,
}

/// The resolved page window and its boundary flags.
#[allow(clippy::struct_excessive_bools, reason = "one flag per navigation button")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    /// A first page that differs from the current one exists.
    pub has_first: bool,
    /// A last page that differs from the current one exists.
    pub has_last: bool,
    /// `page < total_pages`.
    pub has_next: bool,
    /// `page > 1`.
    pub has_previous: bool,
    /// Page size.
    pub limit: usize,
    /// One-based page number after clamping.
    pub page: usize,
    /// Number of items being paginated.
    pub total: usize,
    /// At least 1, even when `total` is 0.
    pub total_pages: usize,
}

impl PaginationWindow {
    /// Zero-based index of the first item on this page.
    pub const fn offset(&self) -> usize {
        return self.page.saturating_sub(1).saturating_mul(self.limit);
    }
}

/// Clamp a client-supplied page number into `[1, total_pages]`.
fn clamp_page(page: i64, total_pages: usize) -> usize {
    if page < 1 {
        return 1;
    }
    return usize::try_from(page).map_or(total_pages, |p| p.min(total_pages));
}

/// One-based page holding the item at a zero-based ordinal rank.
pub fn page_for_rank(rank: usize, limit: NonZeroUsize) -> usize {
    return rank.checked_div(limit.get()).unwrap_or(0).saturating_add(1);
}

/// Compute the window and navigation targets for one page request.
///
/// `total_pages = max(1, ceil(total_count / limit))`; `page` is clamped into range.
pub fn paginate(total_count: usize, page: i64, limit: NonZeroUsize) -> Pagination {
    let total_pages = total_count.div_ceil(limit.get()).max(1);
    let page = clamp_page(page, total_pages);

    let window = PaginationWindow {
        has_first: page != 1,
        has_last: page != total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
        limit: limit.get(),
        page,
        total: total_count,
        total_pages,
    };

    let targets = NavigationTargets {
        first: 1,
        last: total_pages,
        next: page.saturating_add(1).min(total_pages),
        previous: page.saturating_sub(1).max(1),
    };

    return Pagination { targets, window };
}
