//! Workflow run and check run models.
//!
//! Both endpoints wrap their records in an envelope carrying `total_count`,
//! so they are served page by page through [`Paginator`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::github::error::ModelError;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::{PageData, PageInfo, PageSize, Paginator};
use crate::github::query::{Direction, QueryParams, ToQuery};
use crate::github::records::{CheckRun, WorkflowRun};
use crate::github::transport::GitHubClient;

#[derive(Deserialize)]
struct WorkflowRunEnvelope {
    total_count: u64,
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Deserialize)]
struct CheckRunEnvelope {
    total_count: u64,
    check_runs: Vec<CheckRun>,
}

/// Filter for workflow run listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowRunFilter {
    /// Only runs on this branch.
    pub branch: Option<String>,
    /// Only runs triggered by this login.
    pub actor: Option<String>,
    /// Reorders each page by `created_at`; GitHub's order is kept when unset.
    pub direction: Option<Direction>,
}

impl ToQuery for WorkflowRunFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("branch", self.branch.as_deref())
            .with_opt("actor", self.actor.as_deref())
    }
}

/// Workflow runs of one repository.
pub struct WorkflowRunModel {
    client: GitHubClient,
    repository: RepositoryRef,
    page_size: PageSize,
}

impl WorkflowRunModel {
    /// Creates a model for `repository`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: RepositoryRef) -> Self {
        Self {
            client,
            repository,
            page_size: PageSize::default(),
        }
    }

    /// Sets the page size used by [`Paginator::load_all`].
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl Paginator for WorkflowRunModel {
    type Item = WorkflowRun;
    type Filter = WorkflowRunFilter;

    fn page_size(&self) -> PageSize {
        self.page_size
    }

    async fn load_page(
        &self,
        page: u32,
        per_page: PageSize,
        filter: &WorkflowRunFilter,
    ) -> Result<PageData<WorkflowRun>, ModelError> {
        let query = filter
            .to_query()
            .with("per_page", per_page.get())
            .with("page", page);
        let envelope: WorkflowRunEnvelope = self
            .client
            .get(&self.repository.route_to("actions/runs"), &query)
            .await?;

        let mut items = envelope.workflow_runs;
        match filter.direction {
            Some(Direction::Asc) => items.sort_by_key(|run| run.created_at),
            Some(Direction::Desc) => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            None => {}
        }

        Ok(PageData {
            items,
            page_info: PageInfo::new(page, per_page).with_total_count(Some(envelope.total_count)),
        })
    }
}

/// Which check runs of a ref to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckRunScope {
    /// Only the most recent run of each check.
    #[default]
    Latest,
    /// Every run.
    All,
}

impl CheckRunScope {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::All => "all",
        }
    }
}

/// Filter for check run listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRunFilter {
    /// Only checks with this name.
    pub check_name: Option<String>,
    /// Latest runs only, unless set to [`CheckRunScope::All`].
    pub filter: CheckRunScope,
}

impl ToQuery for CheckRunFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("check_name", self.check_name.as_deref())
            .with("filter", self.filter.as_str())
    }
}

/// Check runs of one commit, branch or tag.
pub struct CheckRunModel {
    client: GitHubClient,
    route: String,
    page_size: PageSize,
}

impl CheckRunModel {
    /// Creates a model for the check runs of `git_ref` in `repository`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: &RepositoryRef, git_ref: &str) -> Self {
        Self {
            client,
            route: repository.route_to(&format!("commits/{git_ref}/check-runs")),
            page_size: PageSize::default(),
        }
    }

    /// Sets the page size used by [`Paginator::load_all`].
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl Paginator for CheckRunModel {
    type Item = CheckRun;
    type Filter = CheckRunFilter;

    fn page_size(&self) -> PageSize {
        self.page_size
    }

    async fn load_page(
        &self,
        page: u32,
        per_page: PageSize,
        filter: &CheckRunFilter,
    ) -> Result<PageData<CheckRun>, ModelError> {
        let query = filter
            .to_query()
            .with("per_page", per_page.get())
            .with("page", page);
        let envelope: CheckRunEnvelope = self.client.get(&self.route, &query).await?;

        Ok(PageData {
            items: envelope.check_runs,
            page_info: PageInfo::new(page, per_page).with_total_count(Some(envelope.total_count)),
        })
    }
}
