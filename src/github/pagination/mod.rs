//! Pagination state and the shared page-fetch engine.
//!
//! Every model exposes its collection through one or both capabilities:
//!
//! - [`Paginator`]: bulk mode, one request per call returning a page of
//!   records plus a total count.
//! - [`StreamSource`]: stream mode, a lazily produced sequence spanning all
//!   pages, driven by [`PageStream`].
//!
//! Streams publish the number of records they yielded to a [`TotalCount`]
//! once they are exhausted. The count is never updated mid-stream.

mod page_stream;

pub use page_stream::PageStream;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use tokio::sync::watch;

use super::error::ModelError;

/// Stream of records from one logical listing. An `Err` item ends it.
pub type RecordStream<T> = BoxStream<'static, Result<T, ModelError>>;

/// Number of records requested per list call, within GitHub's `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(u8);

impl PageSize {
    /// GitHub's default page size.
    pub const DEFAULT: Self = Self(30);
    /// The largest page GitHub serves.
    pub const MAX: Self = Self(100);

    /// Validates a page size.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPagination`] for zero or values above 100.
    pub fn new(value: u8) -> Result<Self, ModelError> {
        if value == 0 {
            return Err(ModelError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if value > Self::MAX.0 {
            return Err(ModelError::InvalidPagination {
                message: "per_page must not exceed 100".to_owned(),
            });
        }

        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns true when a page of `len` raw records cannot be followed by
    /// another page.
    #[must_use]
    pub fn is_short(self, len: usize) -> bool {
        len < usize::from(self.0)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Current page state for bulk-mode results.
///
/// # Example
///
/// ```
/// use octostore::github::pagination::{PageInfo, PageSize};
///
/// let info = PageInfo::new(2, PageSize::DEFAULT).with_total_count(Some(75));
/// assert!(!info.is_first_page());
/// assert_eq!(info.total_pages(), Some(3));
/// assert!(info.has_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based).
    current_page: u32,
    /// Items per page.
    per_page: PageSize,
    /// Total number of records if known.
    total_count: Option<u64>,
}

impl PageInfo {
    /// Creates a new page info instance with an unknown total.
    #[must_use]
    pub const fn new(current_page: u32, per_page: PageSize) -> Self {
        Self {
            current_page,
            per_page,
            total_count: None,
        }
    }

    /// Sets the total number of records.
    #[must_use]
    pub const fn with_total_count(mut self, total_count: Option<u64>) -> Self {
        self.total_count = total_count;
        self
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> PageSize {
        self.per_page
    }

    /// Returns the total number of records if known.
    #[must_use]
    pub const fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns the total number of pages if the record total is known.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total_count
            .map(|total| total.div_ceil(u64::from(self.per_page.get())))
    }

    /// Returns true if more pages are known to exist after the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.total_pages()
            .is_some_and(|pages| u64::from(self.current_page) < pages)
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }
}

/// One bulk-mode page: its records and the collection's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Pagination state, including the total when the endpoint reports one.
    pub page_info: PageInfo,
}

impl<T> PageData<T> {
    /// Total record count of the collection, when known.
    #[must_use]
    pub const fn total_count(&self) -> Option<u64> {
        self.page_info.total_count()
    }
}

/// Side channel holding a model's last known total.
///
/// Clones share one value. Streams publish into it once exhausted;
/// subscribers are woken on every publication.
#[derive(Debug, Clone)]
pub struct TotalCount {
    sender: Arc<watch::Sender<Option<u64>>>,
}

impl TotalCount {
    /// Creates an empty side channel.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Last published total, if any stream or page has completed.
    #[must_use]
    pub fn get(&self) -> Option<u64> {
        *self.sender.borrow()
    }

    /// Subscribes to future publications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.sender.subscribe()
    }

    /// Replaces the published total.
    pub fn publish(&self, total: u64) {
        self.sender.send_replace(Some(total));
    }
}

impl Default for TotalCount {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps `inner` so that the number of records it yields is published to
/// `total` when it ends without error.
#[must_use]
pub fn counted<T: Send + 'static>(inner: RecordStream<T>, total: TotalCount) -> RecordStream<T> {
    stream::try_unfold(
        (inner, 0_u64, total),
        |(mut inner, yielded, total)| async move {
            if let Some(record) = inner.try_next().await? {
                return Ok(Some((record, (inner, yielded.saturating_add(1), total))));
            }
            tracing::debug!("stream exhausted after {yielded} records");
            total.publish(yielded);
            Ok(None)
        },
    )
    .boxed()
}

/// Bulk-mode capability: load one page at a time.
#[async_trait]
pub trait Paginator: Send + Sync {
    /// Record type of the collection.
    type Item: Send;
    /// Filter applied to every page request.
    type Filter: Send + Sync;

    /// Page size used by [`Paginator::load_all`].
    fn page_size(&self) -> PageSize;

    /// Fetch page `page` (1-based) of `per_page` records.
    async fn load_page(
        &self,
        page: u32,
        per_page: PageSize,
        filter: &Self::Filter,
    ) -> Result<PageData<Self::Item>, ModelError>;

    /// Fetch every page, stopping at the first empty or short page, or once
    /// the reported total has been collected.
    async fn load_all(&self, filter: &Self::Filter) -> Result<Vec<Self::Item>, ModelError> {
        let per_page = self.page_size();
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let data = self.load_page(page, per_page, filter).await?;
            let total = data.total_count();
            let received = data.items.len();
            items.extend(data.items);

            let collected_all = total.is_some_and(|count| items.len() as u64 >= count);
            if received == 0 || per_page.is_short(received) || collected_all {
                return Ok(items);
            }
            page = page.saturating_add(1);
        }
    }
}

/// Stream-mode capability: iterate a whole collection lazily.
pub trait StreamSource {
    /// Record type of the collection.
    type Item: Send + 'static;
    /// Filter applied to every page request.
    type Filter;

    /// Opens a new stream. Each call restarts from the first page.
    fn open_stream(&self, filter: &Self::Filter) -> RecordStream<Self::Item>;

    /// Total published by the last stream that ran to completion.
    fn total_count(&self) -> Option<u64>;

    /// Drains a fresh stream into a vector.
    fn get_all(
        &self,
        filter: &Self::Filter,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ModelError>> + Send {
        self.open_stream(filter).try_collect()
    }
}
