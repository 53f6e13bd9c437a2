//! Contributor model.

use crate::github::locator::RepositoryRef;
use crate::github::pagination::{PageSize, PageStream, RecordStream, StreamSource, TotalCount};
use crate::github::query::{QueryParams, ToQuery};
use crate::github::records::Contributor;
use crate::github::transport::GitHubClient;

/// Affiliation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affiliation {
    /// Outside collaborators only.
    Outside,
    /// Direct collaborators only.
    Direct,
    /// Everyone with access.
    All,
}

impl Affiliation {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outside => "outside",
            Self::Direct => "direct",
            Self::All => "all",
        }
    }
}

/// Permission filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Read access.
    Pull,
    /// Triage access.
    Triage,
    /// Write access.
    Push,
    /// Maintain access.
    Maintain,
    /// Admin access.
    Admin,
}

impl Permission {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Triage => "triage",
            Self::Push => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

/// Filter for contributor listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributorFilter {
    /// Affiliation filter.
    pub affiliation: Option<Affiliation>,
    /// Permission filter.
    pub permission: Option<Permission>,
}

impl ToQuery for ContributorFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("affiliation", self.affiliation.map(|value| value.as_str()))
            .with_opt("permission", self.permission.map(|value| value.as_str()))
    }
}

/// Contributors of one repository, in GitHub's order.
pub struct ContributorModel {
    client: GitHubClient,
    repository: RepositoryRef,
    page_size: PageSize,
    total: TotalCount,
}

impl ContributorModel {
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

impl StreamSource for ContributorModel {
    type Item = Contributor;
    type Filter = ContributorFilter;

    fn open_stream(&self, filter: &ContributorFilter) -> RecordStream<Contributor> {
        PageStream::new(
            self.client.clone(),
            self.repository.route_to("contributors"),
            self.page_size,
        )
        .query(filter.to_query())
        .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}
