use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::api::Catalog;
use crate::error::Result;
use crate::filter::visible_entries;
use crate::types::CatalogEntry;

/// One generation's worth of entries.
pub const PAGE_SIZE: u32 = 151;
/// Upper bound on entries per batch.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Result of a batch as it is handed back to the state: the merged
/// entries, or the reason the page request failed.
pub type BatchOutcome = std::result::Result<Vec<CatalogEntry>, String>;

/// A started batch. The loading flag is already set by the time this exists.
pub type PendingBatch = BoxFuture<'static, BatchOutcome>;

/// Scroll geometry of whatever surface produced the scroll signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_position: usize,
    pub visible_height: usize,
    pub content_height: usize,
}

impl Viewport {
    pub fn at_bottom(&self) -> bool {
        self.scroll_position + self.visible_height >= self.content_height
    }
}

/// The page a batch is fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub page: u32,
    pub offset: u64,
    pub limit: u32,
}

/// View-state shared by the fetch coordinator and the filter view.
///
/// `entries` only ever grows, `cursor` only ever increments, and `loading`
/// is true from creation until the first batch settles, then from each
/// batch start until it is merged or aborted.
#[derive(Debug)]
pub struct CatalogState {
    entries: Vec<CatalogEntry>,
    cursor: u32,
    loading: bool,
    search: String,
    page_size: u32,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl CatalogState {
    pub fn new(page_size: u32) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 1,
            loading: true,
            search: String::new(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Entries matching the current search, in fetch order.
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        visible_entries(&self.entries, &self.search)
    }

    fn next_request(&self) -> BatchRequest {
        BatchRequest {
            page: self.cursor,
            offset: u64::from(self.cursor - 1) * u64::from(self.page_size),
            limit: self.page_size,
        }
    }

    fn begin_batch(&mut self) -> BatchRequest {
        self.loading = true;
        let request = self.next_request();
        tracing::debug!(page = request.page, offset = request.offset, "starting batch");
        request
    }

    /// Starts fetching the page under the cursor. The loading flag is set
    /// before this returns; the returned future does the network work and
    /// its outcome goes back through `finish_batch`.
    pub fn load_next_batch(&mut self, catalog: Arc<dyn Catalog>) -> PendingBatch {
        let request = self.begin_batch();
        async move {
            fetch_batch(catalog.as_ref(), request)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed()
    }

    /// Trigger policy for scroll events: start a batch only when the
    /// viewport has reached its bottom edge and nothing is in flight.
    pub fn on_scroll_signal(
        &mut self,
        viewport: Viewport,
        catalog: &Arc<dyn Catalog>,
    ) -> Option<PendingBatch> {
        if self.loading || !viewport.at_bottom() {
            return None;
        }
        Some(self.load_next_batch(Arc::clone(catalog)))
    }

    /// Applies a settled batch. Either way the loading flag is cleared.
    pub fn finish_batch(&mut self, outcome: BatchOutcome) {
        match outcome {
            Ok(entries) => self.merge_batch(entries),
            Err(reason) => self.abort_batch(&reason),
        }
    }

    fn merge_batch(&mut self, entries: Vec<CatalogEntry>) {
        tracing::info!(
            page = self.cursor,
            received = entries.len(),
            total = self.entries.len() + entries.len(),
            "batch merged"
        );
        self.entries.extend(entries);
        self.cursor += 1;
        self.loading = false;
    }

    // Page-level failure: nothing is merged and the cursor stays put, so a
    // later trigger retries the same offset.
    fn abort_batch(&mut self, reason: &str) {
        tracing::error!(page = self.cursor, error = %reason, "batch failed");
        self.loading = false;
    }
}

/// Fetches one page of summary references, then resolves every reference
/// concurrently. A failed detail request is logged and leaves a gap; only
/// a failed page request fails the batch.
async fn fetch_batch(catalog: &dyn Catalog, request: BatchRequest) -> Result<Vec<CatalogEntry>> {
    let refs = catalog.list(request.offset, request.limit).await?;

    let settled = join_all(refs.iter().map(|r| catalog.detail(&r.url))).await;

    let mut entries = Vec::with_capacity(settled.len());
    for (summary, result) in refs.iter().zip(settled) {
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(name = %summary.name, url = %summary.url, error = %e, "skipping entry");
            }
        }
    }

    Ok(entries)
}
