//! Pull request model.

use crate::github::locator::RepositoryRef;
use crate::github::pagination::{PageSize, PageStream, RecordStream, StreamSource, TotalCount};
use crate::github::query::{Direction, QueryParams, StateFilter, ToQuery};
use crate::github::records::PullRequest;
use crate::github::transport::GitHubClient;

/// Sort key for pull request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestSort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Reaction and comment activity.
    Popularity,
    /// Age weighted by activity.
    LongRunning,
}

impl PullRequestSort {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Popularity => "popularity",
            Self::LongRunning => "long-running",
        }
    }
}

/// Filter for pull request listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
    /// State; open by default.
    pub state: StateFilter,
    /// Sort key.
    pub sort: Option<PullRequestSort>,
    /// Sort direction.
    pub direction: Option<Direction>,
    /// Only pull requests from this `user:branch`.
    pub head: Option<String>,
    /// Only pull requests targeting this branch.
    pub base: Option<String>,
}

impl ToQuery for PullRequestFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("state", self.state.as_str())
            .with_opt("sort", self.sort.map(|sort| sort.as_str()))
            .with_opt("direction", self.direction.map(|direction| direction.as_str()))
            .with_opt("head", self.head.as_deref())
            .with_opt("base", self.base.as_deref())
    }
}

/// Pull requests of one repository.
pub struct PullRequestModel {
    client: GitHubClient,
    repository: RepositoryRef,
    page_size: PageSize,
    total: TotalCount,
}

impl PullRequestModel {
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

impl StreamSource for PullRequestModel {
    type Item = PullRequest;
    type Filter = PullRequestFilter;

    fn open_stream(&self, filter: &PullRequestFilter) -> RecordStream<PullRequest> {
        PageStream::new(
            self.client.clone(),
            self.repository.route_to("pulls"),
            self.page_size,
        )
        .query(filter.to_query())
        .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}
