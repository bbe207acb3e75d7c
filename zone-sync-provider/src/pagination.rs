//! Cursor pagination
//!
//! Every listing endpoint answers with a `pageInfo` block carrying
//! `hasNextPage` and an opaque `endCursor`. [`fetch_all`] walks the pages in
//! order and concatenates their items. Any failing page aborts the whole
//! fetch; partial results are dropped.

use std::future::Future;

use crate::error::{ProviderError, Result};
use crate::types::{Page, PageRequest};

/// Upper bound accepted by the API for `page_request.first`.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Fetch every page and return all items in arrival order.
///
/// `fetch_page` is called once per page with the request for that page,
/// starting from the `-1` cursor.
///
/// # Errors
///
/// - [`ProviderError::InvalidParameter`] if `page_size` is outside `1..=MAX_PAGE_SIZE`
/// - [`ProviderError::PaginationError`] if a page claims more data without
///   supplying a new cursor
/// - whatever `fetch_page` returns for a failed page
pub async fn fetch_all<T, F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ProviderError::InvalidParameter {
            param: "page_size".to_string(),
            detail: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    let mut request = PageRequest::first_page(page_size);
    let mut all_items = Vec::new();
    let mut page_count = 0_u32;

    loop {
        page_count += 1;
        let page = fetch_page(request.clone()).await?;

        let item_count = page.items.len();
        all_items.extend(page.items);

        log::debug!(
            "Fetched page {page_count} ({item_count} items, {} total)",
            all_items.len()
        );

        if !page.page_info.has_next_page {
            break;
        }

        let next_cursor = match page.page_info.end_cursor {
            Some(cursor) if !cursor.is_empty() => cursor,
            _ => {
                return Err(ProviderError::PaginationError {
                    detail: format!("page {page_count} has a next page but no end cursor"),
                });
            }
        };

        if next_cursor == request.after {
            return Err(ProviderError::PaginationError {
                detail: format!("cursor '{next_cursor}' did not advance after page {page_count}"),
            });
        }

        request.after = next_cursor;
    }

    Ok(all_items)
}
