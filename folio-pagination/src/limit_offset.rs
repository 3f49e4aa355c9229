//! Stateless limit/offset pagination behind an opaque cursor.
//!
//! Ordering is exactly as stable as the source: an insert ahead of the
//! current window shifts every later page by one. Nothing is persisted.

use folio_core::{CursorCodec, FolioResult, OffsetCursor, PaginationConfig};

use crate::page::Page;
use crate::request::PageRequest;
use crate::source::OffsetSource;

/// The rows a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetWindow {
    pub limit: usize,
    pub offset: usize,
}

impl From<OffsetCursor> for OffsetWindow {
    fn from(cursor: OffsetCursor) -> Self {
        Self {
            limit: cursor.limit,
            offset: cursor.offset,
        }
    }
}

/// Paginator that wraps limit and offset in a cursor token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOffsetCursorPaginator {
    config: PaginationConfig,
}

impl LimitOffsetCursorPaginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Work out which rows a request wants.
    ///
    /// Without a cursor the window starts at 0 with the requested (or
    /// default) size. With one, the cursor's limit is reused and any
    /// `page_size` on the request is ignored.
    pub fn window(&self, request: &PageRequest) -> FolioResult<OffsetWindow> {
        match request.cursor.as_deref() {
            None => Ok(OffsetWindow {
                limit: self.config.effective_page_size(request.page_size),
                offset: 0,
            }),
            Some(token) => {
                let cursor = CursorCodec::decode_offset(token)?;
                Ok(OffsetWindow {
                    limit: self.config.clamp(cursor.limit),
                    offset: cursor.offset,
                })
            }
        }
    }

    /// Build the response for a window whose rows the caller fetched.
    ///
    /// A full page implies there may be more, so `next` is set whenever
    /// `results.len() == limit`; the final page of an exact multiple
    /// therefore links to one empty page.
    pub fn respond<T>(&self, window: OffsetWindow, results: Vec<T>) -> Page<T> {
        let OffsetWindow { limit, offset } = window;

        let next = (results.len() == limit)
            .then(|| OffsetCursor::new(limit, offset.saturating_add(limit)).into());
        let previous =
            (offset > 0).then(|| OffsetCursor::new(limit, offset.saturating_sub(limit)).into());

        Page::new(previous, next, results)
    }

    /// Fetch and wrap one page from `source`.
    pub async fn paginate<S>(&self, request: &PageRequest, source: &S) -> FolioResult<Page<S::Element>>
    where
        S: OffsetSource + ?Sized,
    {
        let window = self.window(request)?;
        let results = source.fetch(window.offset, window.limit).await?;
        Ok(self.respond(window, results))
    }
}
