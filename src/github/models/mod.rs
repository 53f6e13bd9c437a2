//! Resource models over the GitHub REST API.
//!
//! Each model owns a [`GitHubClient`](crate::github::GitHubClient) handle, the
//! route of its collection and a page size. Stream-mode models implement
//! [`StreamSource`](crate::github::pagination::StreamSource) by configuring a
//! [`PageStream`](crate::github::pagination::PageStream); bulk-mode models
//! implement [`Paginator`](crate::github::pagination::Paginator) directly.

mod actions;
mod content;
mod contributor;
mod discussion;
mod issue;
mod organization;
mod pull_request;
mod repository;
mod user;

pub use actions::{
    CheckRunFilter, CheckRunModel, CheckRunScope, WorkflowRunFilter, WorkflowRunModel,
};
pub use content::{ContentFilter, ContentModel, sanitize_path};
pub use contributor::{Affiliation, ContributorFilter, ContributorModel, Permission};
pub use discussion::{DiscussionCommentModel, DiscussionModel};
pub use issue::{IssueCommentModel, IssueFilter, IssueModel, IssueSort, NewIssue};
pub use organization::OrganizationModel;
pub use pull_request::{PullRequestFilter, PullRequestModel, PullRequestSort};
pub use repository::{RepositoryFilter, RepositoryModel, RepositoryScope};
pub use user::{Session, UserModel};

use chrono::{DateTime, SecondsFormat, Utc};

use super::query::{Direction, QueryParams, ToQuery};

/// Filter shared by comment and discussion listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Sort direction.
    pub direction: Option<Direction>,
    /// Only records updated at or after this time.
    pub since: Option<DateTime<Utc>>,
}

impl ToQuery for ListFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("direction", self.direction.map(|direction| direction.as_str()))
            .with_opt("since", self.since.map(timestamp))
    }
}

/// Formats a timestamp the way GitHub's `since` parameters expect.
fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests;
