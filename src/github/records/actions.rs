//! GitHub Actions records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;

/// Workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Run identifier.
    pub id: u64,
    /// Workflow name.
    #[serde(default)]
    pub name: Option<String>,
    /// Branch the run was triggered on.
    #[serde(default)]
    pub head_branch: Option<String>,
    /// Commit the run was triggered on.
    #[serde(default)]
    pub head_sha: Option<String>,
    /// Triggering event, e.g. `push`.
    #[serde(default)]
    pub event: Option<String>,
    /// `queued`, `in_progress` or `completed`.
    #[serde(default)]
    pub status: Option<String>,
    /// Outcome once completed.
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Sequential run number.
    #[serde(default)]
    pub run_number: u64,
    /// User who triggered the run.
    #[serde(default)]
    pub actor: Option<Account>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time; used for client-side ordering.
    pub created_at: DateTime<Utc>,
}

/// Check run attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run identifier.
    pub id: u64,
    /// Check name.
    pub name: String,
    /// Commit the check ran against.
    #[serde(default)]
    pub head_sha: Option<String>,
    /// `queued`, `in_progress` or `completed`.
    #[serde(default)]
    pub status: Option<String>,
    /// Outcome once completed.
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Start time.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Completion time.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
