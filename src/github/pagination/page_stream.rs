//! Cursor-driven page-fetch loop shared by every stream-mode model.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

use super::{PageSize, RecordStream, TotalCount, counted};
use crate::github::query::QueryParams;
use crate::github::transport::GitHubClient;

/// Position of a stream between two page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Next { page: u32, since: Option<u64> },
    Exhausted,
}

/// Builder for a lazily paged listing of `T` records.
///
/// Each page request merges the configured query with `per_page`, `page`
/// and, for watermarked listings, `since`. The stream ends after the first
/// page whose raw length is zero or below the page size. Pages are fetched
/// strictly one after another, and only when the consumer polls past the
/// records already delivered.
///
/// # Example
///
/// ```no_run
/// # use octostore::github::{GitHubClient, pagination::{PageSize, PageStream, TotalCount}};
/// # use octostore::github::records::Issue;
/// # fn demo(client: GitHubClient) {
/// let total = TotalCount::new();
/// let issues = PageStream::<Issue>::new(client, "/repos/octo/repo/issues", PageSize::DEFAULT)
///     .keep(|issue| issue.pull_request.is_none())
///     .open(&total);
/// # drop(issues);
/// # }
/// ```
pub struct PageStream<T> {
    client: GitHubClient,
    route: String,
    page_size: PageSize,
    query: QueryParams,
    first_page: u32,
    watermark: Option<fn(&T) -> u64>,
    keep: Option<fn(&T) -> bool>,
}

impl<T> PageStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Starts a listing of `route` with pages of `page_size` records.
    #[must_use]
    pub fn new(client: GitHubClient, route: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            client,
            route: route.into(),
            page_size,
            query: QueryParams::new(),
            first_page: 1,
            watermark: None,
            keep: None,
        }
    }

    /// Adds filter parameters to every page request.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = self.query.merge(query);
        self
    }

    /// Sets the index of the first page; most endpoints start at 1.
    #[must_use]
    pub const fn first_page(mut self, first_page: u32) -> Self {
        self.first_page = first_page;
        self
    }

    /// Advances a `since` watermark to `id(last raw record)` after each page.
    #[must_use]
    pub fn watermark(mut self, id: fn(&T) -> u64) -> Self {
        self.watermark = Some(id);
        self
    }

    /// Drops records failing `predicate` after the stop condition has been
    /// evaluated on the raw page.
    #[must_use]
    pub fn keep(mut self, predicate: fn(&T) -> bool) -> Self {
        self.keep = Some(predicate);
        self
    }

    /// Opens the stream without publishing a total.
    #[must_use]
    pub fn records(self) -> RecordStream<T> {
        let start = Cursor::Next {
            page: self.first_page,
            since: None,
        };

        stream::try_unfold((self, start), |(listing, cursor)| async move {
            let Cursor::Next { page, since } = cursor else {
                return Ok(None);
            };

            let query = listing
                .query
                .clone()
                .with("per_page", listing.page_size.get())
                .with("page", page)
                .with_opt("since", since);
            let raw: Vec<T> = listing.client.get(&listing.route, &query).await?;
            tracing::debug!(
                route = %listing.route,
                page,
                received = raw.len(),
                "fetched page"
            );

            let next = if raw.is_empty() || listing.page_size.is_short(raw.len()) {
                Cursor::Exhausted
            } else {
                Cursor::Next {
                    page: page.saturating_add(1),
                    since: listing
                        .watermark
                        .and_then(|id| raw.last().map(id))
                        .or(since),
                }
            };

            let records: Vec<T> = raw
                .into_iter()
                .filter(|record| listing.keep.is_none_or(|predicate| predicate(record)))
                .collect();
            Ok(Some((records, (listing, next))))
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    /// Opens the stream and publishes the yielded count to `total` once it
    /// is exhausted.
    #[must_use]
    pub fn open(self, total: &TotalCount) -> RecordStream<T> {
        counted(self.records(), total.clone())
    }
}
