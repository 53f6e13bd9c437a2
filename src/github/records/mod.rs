//! Serde records for the GitHub resources the models list.
//!
//! Records keep the field names GitHub uses so that list responses decode
//! directly. Only the fields the models read or callers commonly display are
//! declared; everything else in a response is ignored.

mod actions;
mod content;
mod discussion;
mod issue;
mod repository;

pub use actions::{CheckRun, WorkflowRun};
pub use content::{Content, ContentKind};
pub use discussion::{Discussion, DiscussionComment};
pub use issue::{GitRef, Issue, IssueComment, Label, LinkedPullRequest, PullRequest};
pub use repository::{Account, Contributor, GitRepository, Organization, Repository, User};
