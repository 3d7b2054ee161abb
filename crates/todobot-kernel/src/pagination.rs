//! Cursor-driven scanning of paginated listings.
//!
//! Listings are consumed one page at a time.  [`find_first`] stops fetching
//! as soon as an item matches; [`collect_matching`] walks to the end.

use std::collections::HashSet;

use futures::future::BoxFuture;

use crate::error::{Result, ServiceError};
use crate::model::Page;

/// Future returned by a page fetcher.
pub type PageFuture<'a, T> = BoxFuture<'a, Result<Page<T>>>;

/// Return the first item, in listing order, for which `matches` holds.
///
/// `fetch` is called with `None` for the first page and with each page's
/// `next_cursor` afterwards.  A cursor handed out twice is a
/// [`ServiceError::StalledCursor`].
pub async fn find_first<'a, T, F, P>(mut fetch: F, mut matches: P) -> Result<Option<T>>
where
    F: FnMut(Option<String>) -> PageFuture<'a, T>,
    P: FnMut(&T) -> bool,
{
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();
    loop {
        let page = fetch(cursor.clone()).await?;
        let next = page.next().map(str::to_owned);
        if let Some(hit) = page.results.into_iter().find(|item| matches(item)) {
            return Ok(Some(hit));
        }
        match advance(&mut seen, next)? {
            Some(next) => cursor = Some(next),
            None => return Ok(None),
        }
    }
}

/// Return every item, across all pages, for which `matches` holds.
pub async fn collect_matching<'a, T, F, P>(mut fetch: F, mut matches: P) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> PageFuture<'a, T>,
    P: FnMut(&T) -> bool,
{
    let mut found = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();
    loop {
        let page = fetch(cursor.clone()).await?;
        let next = page.next().map(str::to_owned);
        found.extend(page.results.into_iter().filter(|item| matches(item)));
        match advance(&mut seen, next)? {
            Some(next) => cursor = Some(next),
            None => return Ok(found),
        }
    }
}

/// A service that hands back a cursor it already gave out would loop
/// forever; treat that as an error instead.
fn advance(seen: &mut HashSet<String>, next: Option<String>) -> Result<Option<String>> {
    match next {
        Some(next) if !seen.insert(next.clone()) => {
            Err(ServiceError::StalledCursor { cursor: next })
        }
        other => Ok(other),
    }
}
