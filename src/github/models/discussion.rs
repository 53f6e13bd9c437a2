//! Discussion and discussion comment models.

use futures::stream::{self, StreamExt, TryStreamExt};

use super::ListFilter;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::{
    PageSize, PageStream, RecordStream, StreamSource, TotalCount, counted,
};
use crate::github::query::{QueryParams, ToQuery};
use crate::github::records::{Discussion, DiscussionComment};
use crate::github::transport::GitHubClient;

/// Discussions of one repository.
pub struct DiscussionModel {
    client: GitHubClient,
    repository: RepositoryRef,
    page_size: PageSize,
    total: TotalCount,
}

impl DiscussionModel {
    /// Creates a model for `repository`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: RepositoryRef) -> Self {
        Self {
            client,
            repository,
            page_size: PageSize::default(),
            total: TotalCount::new(),
        }
    }

    /// Sets the page size used by streams.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl StreamSource for DiscussionModel {
    type Item = Discussion;
    type Filter = ListFilter;

    fn open_stream(&self, filter: &ListFilter) -> RecordStream<Discussion> {
        PageStream::new(
            self.client.clone(),
            self.repository.route_to("discussions"),
            self.page_size,
        )
        .query(filter.to_query())
        .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}

/// Comments of one discussion.
///
/// Each stream first reads the parent discussion and skips listing entirely
/// when it reports no comments.
pub struct DiscussionCommentModel {
    client: GitHubClient,
    discussion_route: String,
    page_size: PageSize,
    total: TotalCount,
}

impl DiscussionCommentModel {
    /// Creates a model for the comments of discussion `number`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: &RepositoryRef, number: u64) -> Self {
        Self {
            client,
            discussion_route: repository.route_to(&format!("discussions/{number}")),
            page_size: PageSize::default(),
            total: TotalCount::new(),
        }
    }

    /// Sets the page size used by streams.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl StreamSource for DiscussionCommentModel {
    type Item = DiscussionComment;
    type Filter = ListFilter;

    fn open_stream(&self, filter: &ListFilter) -> RecordStream<DiscussionComment> {
        let client = self.client.clone();
        let discussion_route = self.discussion_route.clone();
        let comments_route = format!("{discussion_route}/comments");
        let page_size = self.page_size;
        let query = filter.to_query();

        let parent = stream::once(async move {
            client
                .get::<Discussion>(&discussion_route, &QueryParams::new())
                .await
                .map(|discussion| (client, discussion))
        });

        let comments = parent
            .map_ok(move |(client, discussion)| {
                if discussion.comments == 0 {
                    tracing::debug!(route = %comments_route, "discussion has no comments");
                    return stream::empty().boxed();
                }
                PageStream::new(client, comments_route.clone(), page_size)
                    .query(query.clone())
                    .records()
            })
            .try_flatten()
            .boxed();

        counted(comments, self.total.clone())
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}
