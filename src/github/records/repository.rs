//! Repository, account and contributor records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Issue;

/// User or organization summary embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Login name.
    pub login: String,
    /// Account identifier.
    #[serde(default)]
    pub id: u64,
    /// `User`, `Organization` or `Bot`.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Repository as returned by the repository list and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository identifier.
    pub id: u64,
    /// Repository name without owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Owning account.
    #[serde(default)]
    pub owner: Option<Account>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Default branch name.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Dominant language as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    /// Topic tags.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issue and pull request count.
    #[serde(default)]
    pub open_issues_count: u64,
    /// Time of the last push.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    /// Time of the last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository merged with the relations requested for it.
///
/// Relation fields stay `None` unless the relation was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    /// The repository itself.
    #[serde(flatten)]
    pub repository: Repository,
    /// Contributors, most contributions first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Contributor>>,
    /// Open issues, pull requests excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    /// Languages at or above the mean byte count, largest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

/// Repository contributor with a contribution count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Login name; empty for anonymous contributors.
    #[serde(default)]
    pub login: String,
    /// Account identifier.
    #[serde(default)]
    pub id: u64,
    /// `User`, `Bot` or `Anonymous`.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// Number of commits attributed to the contributor.
    pub contributions: u64,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Organization profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization login.
    pub login: String,
    /// Organization identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Number of public repositories; only present on the detail endpoint.
    #[serde(default)]
    pub public_repos: Option<u64>,
}

/// User profile, including private counts for the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    pub login: String,
    /// User identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Number of public repositories.
    #[serde(default)]
    pub public_repos: u64,
    /// Number of private repositories; only visible to the user themselves.
    #[serde(default)]
    pub total_private_repos: Option<u64>,
}
