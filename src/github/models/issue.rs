//! Issue and issue comment models.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ListFilter, timestamp};
use crate::github::error::ModelError;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::{PageSize, PageStream, RecordStream, StreamSource, TotalCount};
use crate::github::query::{Direction, QueryParams, StateFilter, ToQuery};
use crate::github::records::{Issue, IssueComment, LinkedPullRequest};
use crate::github::transport::GitHubClient;

const CLOSING_PULL_REQUESTS_QUERY: &str = r"
query ($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) {
      closedByPullRequestsReferences(first: 10) {
        nodes { url number headRefName merged }
      }
    }
  }
}";

const ASSIGNABLE_ACTORS_QUERY: &str = r"
query ($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) { id }
    suggestedActors(capabilities: [CAN_BE_ASSIGNED], first: 100) {
      nodes {
        login
        ... on Bot { id }
        ... on User { id }
      }
    }
  }
}";

const REPLACE_ACTORS_MUTATION: &str = r"
mutation ($assignableId: ID!, $actorIds: [ID!]!) {
  replaceActorsForAssignable(input: { assignableId: $assignableId, actorIds: $actorIds }) {
    assignable {
      ... on Issue {
        assignees(first: 100) { nodes { login } }
      }
    }
  }
}";

/// Sort key for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Comment count.
    Comments,
}

impl IssueSort {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Comments => "comments",
        }
    }
}

/// Filter for issue listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Issue state; open by default.
    pub state: StateFilter,
    /// Only issues carrying every one of these labels.
    pub labels: Vec<String>,
    /// Sort key.
    pub sort: Option<IssueSort>,
    /// Sort direction.
    pub direction: Option<Direction>,
    /// Only issues assigned to this login.
    pub assignee: Option<String>,
    /// Only issues opened by this login.
    pub creator: Option<String>,
    /// Only issues updated at or after this time.
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}

impl ToQuery for IssueFilter {
    fn to_query(&self) -> QueryParams {
        let labels = (!self.labels.is_empty()).then(|| self.labels.join(","));
        QueryParams::new()
            .with("state", self.state.as_str())
            .with_opt("labels", labels)
            .with_opt("sort", self.sort.map(|sort| sort.as_str()))
            .with_opt("direction", self.direction.map(|direction| direction.as_str()))
            .with_opt("assignee", self.assignee.as_deref())
            .with_opt("creator", self.creator.as_deref())
            .with_opt("since", self.since.map(timestamp))
    }
}

/// Body of a new issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    /// Title.
    pub title: String,
    /// Markdown body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Logins to assign.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    /// Label names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Issues of one repository.
///
/// The issues endpoint also lists pull requests; the stream drops them while
/// still paging on the raw page length.
pub struct IssueModel {
    client: GitHubClient,
    repository: RepositoryRef,
    page_size: PageSize,
    total: TotalCount,
}

impl IssueModel {
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

    /// Side channel holding the last stream total.
    #[must_use]
    pub const fn total(&self) -> &TotalCount {
        &self.total
    }

    /// Opens a new issue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Encode`] when the issue cannot be serialised and
    /// propagates transport and decoding failures.
    pub async fn create_one(&self, issue: &NewIssue) -> Result<Issue, ModelError> {
        let body = serde_json::to_value(issue)
            .map_err(|error| ModelError::encode("new issue", &error))?;
        self.client
            .post(&self.repository.route_to("issues"), body)
            .await
    }

    /// Comments on issue `number`.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures.
    pub async fn create_comment(
        &self,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, ModelError> {
        self.client
            .post(
                &self.repository.route_to(&format!("issues/{number}/comments")),
                json!({ "body": body }),
            )
            .await
    }

    /// Pull requests that will close issue `number` when merged.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::GraphQl`] when the query is rejected.
    pub async fn get_pull_requests(
        &self,
        number: u64,
    ) -> Result<Vec<LinkedPullRequest>, ModelError> {
        let data: ClosingData = self
            .client
            .graphql(CLOSING_PULL_REQUESTS_QUERY, self.issue_variables(number))
            .await?;
        Ok(data
            .repository
            .issue
            .closed_by_pull_requests_references
            .nodes)
    }

    /// Replaces the assignees of issue `number` with the named actors.
    ///
    /// Bots such as coding agents can only be assigned through GraphQL, so
    /// logins are resolved against the repository's suggested actors first.
    /// Returns the assignee logins reported after the mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownActor`] when a login is not assignable,
    /// and propagates GraphQL failures.
    pub async fn assign_actors(
        &self,
        number: u64,
        logins: &[&str],
    ) -> Result<Vec<String>, ModelError> {
        let data: ActorsData = self
            .client
            .graphql(ASSIGNABLE_ACTORS_QUERY, self.issue_variables(number))
            .await?;

        let actor_ids = logins
            .iter()
            .map(|login| {
                data.repository
                    .suggested_actors
                    .nodes
                    .iter()
                    .find(|actor| actor.login.eq_ignore_ascii_case(login))
                    .and_then(|actor| actor.id.clone())
                    .ok_or_else(|| ModelError::UnknownActor {
                        login: (*login).to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let replaced: ReplaceData = self
            .client
            .graphql(
                REPLACE_ACTORS_MUTATION,
                json!({ "assignableId": data.repository.issue.id, "actorIds": actor_ids }),
            )
            .await?;
        tracing::debug!(issue = number, "replaced assignees of {}", self.repository);

        Ok(replaced
            .replace_actors_for_assignable
            .assignable
            .assignees
            .nodes
            .into_iter()
            .map(|node| node.login)
            .collect())
    }

    fn issue_variables(&self, number: u64) -> serde_json::Value {
        json!({
            "owner": self.repository.owner().as_str(),
            "name": self.repository.repository().as_str(),
            "number": number,
        })
    }
}

impl StreamSource for IssueModel {
    type Item = Issue;
    type Filter = IssueFilter;

    fn open_stream(&self, filter: &IssueFilter) -> RecordStream<Issue> {
        PageStream::<Issue>::new(
            self.client.clone(),
            self.repository.route_to("issues"),
            self.page_size,
        )
        .query(filter.to_query())
        .keep(|issue| !issue.is_pull_request())
        .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}

/// Conversation comments of one issue or pull request.
pub struct IssueCommentModel {
    client: GitHubClient,
    route: String,
    page_size: PageSize,
    total: TotalCount,
}

impl IssueCommentModel {
    /// Creates a model for the comments of issue `number`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: &RepositoryRef, number: u64) -> Self {
        Self {
            client,
            route: repository.route_to(&format!("issues/{number}/comments")),
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

impl StreamSource for IssueCommentModel {
    type Item = IssueComment;
    type Filter = ListFilter;

    fn open_stream(&self, filter: &ListFilter) -> RecordStream<IssueComment> {
        PageStream::new(self.client.clone(), self.route.clone(), self.page_size)
            .query(filter.to_query())
            .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}

#[derive(Deserialize)]
struct ClosingData {
    repository: ClosingRepository,
}

#[derive(Deserialize)]
struct ClosingRepository {
    issue: ClosingIssue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClosingIssue {
    closed_by_pull_requests_references: Nodes<LinkedPullRequest>,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct ActorsData {
    repository: ActorsRepository,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorsRepository {
    issue: IssueId,
    suggested_actors: Nodes<Actor>,
}

#[derive(Deserialize)]
struct IssueId {
    id: String,
}

#[derive(Deserialize)]
struct Actor {
    login: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceData {
    replace_actors_for_assignable: ReplacePayload,
}

#[derive(Deserialize)]
struct ReplacePayload {
    assignable: Assignable,
}

#[derive(Deserialize)]
struct Assignable {
    assignees: Nodes<Assignee>,
}

#[derive(Deserialize)]
struct Assignee {
    login: String,
}
