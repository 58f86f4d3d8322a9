use std::future::Future;

use forumfix_core::pagination::PageCursor;
use indicatif::ProgressBar;

/// Fetch every page of a listing of `total` items, one request at a time.
///
/// `fetch_page` receives the 1-based start index of the page to request.
/// Pages may be of any size; the cursor moves by what each one returned.
pub async fn collect_pages<T, E, F, Fut>(
    total: usize,
    progress: &ProgressBar,
    mut fetch_page: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut cursor = PageCursor::new(total);
    let mut items = Vec::with_capacity(total);

    while let Some(start) = cursor.next_start() {
        let page = fetch_page(start).await?;
        cursor.advance(page.len());
        items.extend(page);
        progress.set_position(cursor.fetched().min(total) as u64);
    }

    if cursor.fetched() < total {
        log::debug!(
            "Listing ended after {} of {} items ({}%)",
            cursor.fetched(),
            total,
            cursor.percent()
        );
    }

    Ok(items)
}
