//! Issue, issue comment and pull request records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Account;

/// Issue label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex colour without `#`.
    #[serde(default)]
    pub color: Option<String>,
    /// Label description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Issue from the issues listing.
///
/// The listing also returns pull requests; those carry a `pull_request`
/// object and are dropped by the issue stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue identifier.
    pub id: u64,
    /// Repository-scoped number.
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: String,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<Account>,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<Account>,
    /// Comment count.
    #[serde(default)]
    pub comments: u64,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Present when the record is actually a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Close time.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Returns true when the record is a pull request listed as an issue.
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Comment on an issue or pull request conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<Account>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Branch pointer of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    /// `owner:branch` label.
    #[serde(default)]
    pub label: Option<String>,
    /// Branch name.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA.
    pub sha: String,
}

/// Pull request from the pulls listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request identifier.
    pub id: u64,
    /// Repository-scoped number.
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: String,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<Account>,
    /// Whether the pull request is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Source branch.
    #[serde(default)]
    pub head: Option<GitRef>,
    /// Target branch.
    #[serde(default)]
    pub base: Option<GitRef>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Merge time, if merged.
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Pull request that closes an issue, as reported by GraphQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPullRequest {
    /// Web URL.
    pub url: String,
    /// Repository-scoped number.
    pub number: u64,
    /// Source branch name.
    pub head_ref_name: String,
    /// Whether the pull request was merged.
    pub merged: bool,
}
