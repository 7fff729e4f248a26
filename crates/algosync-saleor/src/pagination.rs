//! Relay-style cursor pagination for Saleor connections.
//!
//! Every connection query returns a `pageInfo` block:
//!
//! ```text
//! "pageInfo": { "hasNextPage": true, "endCursor": "WyJhcHBsZS1qdWljZSJd" }
//! ```
//!
//! The next page is requested by passing `endCursor` as the `after` variable.

use crate::types::PageInfo;

/// Returns the cursor for the next page, or `None` when the connection is
/// exhausted.
///
/// A page that claims `hasNextPage` without an `endCursor` (or with an empty
/// one) is treated as the last page; requesting `after: null` again would
/// restart from the beginning and loop forever.
#[must_use]
pub fn next_cursor(page_info: &PageInfo) -> Option<String> {
    if !page_info.has_next_page {
        return None;
    }
    page_info
        .end_cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
}
