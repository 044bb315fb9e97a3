//! Offset pagination over ordered collections.
//!
//! [`paginate`] never clamps its page size; callers normalise user input
//! first with [`clamp_page_size`] and [`normalize_cursor`].

use insight_model::PagedResult;

use crate::cursor::{decode_cursor, encode_cursor};
use crate::error::{InsightError, Result};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Clamps a requested page size into `[1, MAX_PAGE_SIZE]`.
///
/// Absent and non-positive requests fall back to [`DEFAULT_PAGE_SIZE`].
pub fn clamp_page_size(requested: Option<i64>) -> usize {
    match requested {
        Some(size) if size > 0 => usize::try_from(size).map_or(MAX_PAGE_SIZE, |s| s.min(MAX_PAGE_SIZE)),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Treats an empty cursor and the literal `"null"` as "first page".
pub fn normalize_cursor(cursor: Option<&str>) -> Option<&str> {
    cursor.filter(|c| !c.is_empty() && *c != "null")
}

/// Returns one page of `items`, starting at the offset encoded in `cursor`.
///
/// Reads `page_size + 1` items from the offset to learn whether more
/// remain. `total_count` is the number of items the iterator yields in total,
/// also when the offset lies past the end and the page is empty.
///
/// # Errors
///
/// - [`InsightError::InvalidArgument`] if `page_size` is zero.
/// - [`InsightError::MalformedCursor`] if `cursor` does not decode.
pub fn paginate<I>(items: I, page_size: usize, cursor: Option<&str>) -> Result<PagedResult<I::Item>>
where
    I: IntoIterator,
{
    if page_size == 0 {
        return Err(InsightError::invalid_argument(
            "page_size",
            "page size must be at least 1",
        ));
    }
    let offset = match cursor {
        Some(cursor) => decode_cursor(cursor)?,
        None => 0,
    };

    let mut total_count = 0usize;
    let mut window = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        total_count += 1;
        if index >= offset && window.len() <= page_size {
            window.push(item);
        }
    }

    let has_more = window.len() > page_size;
    if has_more {
        window.truncate(page_size);
    }
    let next_cursor = has_more.then(|| encode_cursor(offset + page_size));

    Ok(PagedResult {
        items: window,
        next_cursor,
        has_more,
        total_count,
    })
}
