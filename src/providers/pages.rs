//! Lazy iteration over the pages of an [`ApplicationSource`].

use futures::stream::{self, Stream};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::providers::{ApplicationSource, Page};
use crate::error::{MonitorError, MonitorResult};

enum Cursor {
    First,
    Next(String),
}

/// Pages of application registrations, fetched one at a time as the stream is polled.
///
/// The stream ends after the last page or when the source has no data at all.
/// Cancellation is checked before every fetch and also aborts a fetch in
/// flight; that page is dropped and the stream ends with
/// [`MonitorError::Cancelled`]. A cancellation arriving after the last page
/// goes unnoticed. The first error ends the stream.
pub fn application_pages<'a>(
    source: &'a dyn ApplicationSource,
    cancel: CancellationToken,
) -> impl Stream<Item = MonitorResult<Page>> + Send + 'a {
    stream::try_unfold(Some(Cursor::First), move |cursor| {
        fetch(source, cancel.clone(), cursor)
    })
}

async fn fetch(
    source: &dyn ApplicationSource,
    cancel: CancellationToken,
    cursor: Option<Cursor>,
) -> MonitorResult<Option<(Page, Option<Cursor>)>> {
    let Some(cursor) = cursor else {
        return Ok(None);
    };
    if cancel.is_cancelled() {
        debug!("Cancelled before fetching the next page");
        return Err(MonitorError::Cancelled);
    }

    let request = async {
        match &cursor {
            Cursor::First => source.first_page().await,
            Cursor::Next(link) => source.next_page(link).await.map(Some),
        }
    };

    let page = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Cancelled while fetching a page, discarding it");
            return Err(MonitorError::Cancelled);
        }
        page = request => page?,
    };

    Ok(page.map(|page| {
        let next = page.next_link.clone().map(Cursor::Next);
        (page, next)
    }))
}
