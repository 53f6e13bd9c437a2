//! Repository model with relation decoration.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::OnceCell;

use super::OrganizationModel;
use crate::github::error::ModelError;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::{PageData, PageInfo, PageSize, Paginator};
use crate::github::query::QueryParams;
use crate::github::records::{Contributor, GitRepository, Repository, User};
use crate::github::relation::{
    RelationBundle, RelationKind, RepositoryRelations, sort_by_contributions,
};
use crate::github::transport::GitHubClient;

/// Whose repositories a [`RepositoryModel`] lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryScope {
    /// Repositories owned by the authenticated user.
    User,
    /// Public repositories of an organization.
    Organization(String),
}

impl RepositoryScope {
    fn route(&self) -> String {
        match self {
            Self::User => "/user/repos".to_owned(),
            Self::Organization(login) => format!("/orgs/{login}/repos"),
        }
    }

    const fn listing_type(&self) -> &'static str {
        match self {
            Self::User => "owner",
            Self::Organization(_) => "public",
        }
    }
}

/// Filter for repository listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFilter {
    /// Relations to merge into every listed repository.
    pub relations: Vec<RelationKind>,
}

/// Repositories of the authenticated user or an organization.
///
/// Pages are ordered by last push. Every repository on a page is decorated
/// with the requested relations concurrently; one failing relation fails the
/// page. The collection total is looked up once and reused.
pub struct RepositoryModel {
    client: GitHubClient,
    scope: RepositoryScope,
    page_size: PageSize,
    relations: RepositoryRelations,
    organizations: OrganizationModel,
    total: OnceCell<Option<u64>>,
}

impl RepositoryModel {
    /// Creates a model listing `scope`.
    #[must_use]
    pub fn new(client: GitHubClient, scope: RepositoryScope) -> Self {
        Self {
            relations: RepositoryRelations::new(client.clone()),
            organizations: OrganizationModel::new(client.clone()),
            client,
            scope,
            page_size: PageSize::default(),
            total: OnceCell::new(),
        }
    }

    /// Sets the page size used by [`Paginator::load_all`].
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// The relation resolver, for explicit invalidation.
    #[must_use]
    pub const fn relations(&self) -> &RepositoryRelations {
        &self.relations
    }

    /// Resolves `relations` of `repository` without fetching the repository.
    ///
    /// # Errors
    ///
    /// Fails when any requested relation fails.
    pub async fn get_one_relation(
        &self,
        repository: &RepositoryRef,
        relations: &[RelationKind],
    ) -> Result<RelationBundle, ModelError> {
        self.relations.resolve(repository, relations).await
    }

    /// Fetches `repository` merged with `relations`.
    ///
    /// # Errors
    ///
    /// Fails when the repository or any requested relation cannot be fetched.
    pub async fn get_one(
        &self,
        repository: &RepositoryRef,
        relations: &[RelationKind],
    ) -> Result<GitRepository, ModelError> {
        let route = repository.route();
        let query = QueryParams::new();
        let (record, bundle) = futures::try_join!(
            self.client.get::<Repository>(&route, &query),
            self.relations.resolve(repository, relations),
        )?;
        Ok(bundle.merge_into(record))
    }

    /// Contributors across every listed repository that is neither archived
    /// nor a fork.
    ///
    /// Only `User` accounts are kept. Contributions of the same login are
    /// summed, keeping the first record's other fields, and the result is
    /// ordered by total contributions, largest first.
    ///
    /// # Errors
    ///
    /// Fails when any page or contributor list cannot be fetched.
    pub async fn get_all_contributors(&self) -> Result<Vec<Contributor>, ModelError> {
        let filter = RepositoryFilter {
            relations: vec![RelationKind::Contributors],
        };
        let repositories = self.load_all(&filter).await?;

        let mut merged: Vec<Contributor> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let contributors = repositories
            .into_iter()
            .filter(|repo| !repo.repository.archived && !repo.repository.fork)
            .flat_map(|repo| repo.contributors.unwrap_or_default())
            .filter(|contributor| contributor.account_type == "User");

        for contributor in contributors {
            if let Some(existing) = positions
                .get(&contributor.login)
                .and_then(|&position| merged.get_mut(position))
            {
                existing.contributions = existing
                    .contributions
                    .saturating_add(contributor.contributions);
                continue;
            }
            positions.insert(contributor.login.clone(), merged.len());
            merged.push(contributor);
        }

        sort_by_contributions(&mut merged);
        Ok(merged)
    }

    async fn lookup_total(&self) -> Result<Option<u64>, ModelError> {
        self.total
            .get_or_try_init(|| async {
                let total = match &self.scope {
                    RepositoryScope::Organization(login) => {
                        self.organizations.get_one(login).await?.public_repos
                    }
                    RepositoryScope::User => {
                        let user: User = self.client.get("/user", &QueryParams::new()).await?;
                        Some(
                            user.public_repos
                                .saturating_add(user.total_private_repos.unwrap_or(0)),
                        )
                    }
                };
                tracing::debug!(scope = ?self.scope, ?total, "looked up repository total");
                Ok::<_, ModelError>(total)
            })
            .await
            .copied()
    }
}

#[async_trait]
impl Paginator for RepositoryModel {
    type Item = GitRepository;
    type Filter = RepositoryFilter;

    fn page_size(&self) -> PageSize {
        self.page_size
    }

    async fn load_page(
        &self,
        page: u32,
        per_page: PageSize,
        filter: &RepositoryFilter,
    ) -> Result<PageData<GitRepository>, ModelError> {
        let query = QueryParams::new()
            .with("type", self.scope.listing_type())
            .with("sort", "pushed")
            .with("per_page", per_page.get())
            .with("page", page);
        let listed: Vec<Repository> = self.client.get(&self.scope.route(), &query).await?;

        let decorated = listed.into_iter().map(|repository| async move {
            let reference = RepositoryRef::parse(&repository.full_name)?;
            let bundle = self.relations.resolve(&reference, &filter.relations).await?;
            Ok::<_, ModelError>(bundle.merge_into(repository))
        });
        let items = try_join_all(decorated).await?;
        let total = self.lookup_total().await?;

        Ok(PageData {
            items,
            page_info: PageInfo::new(page, per_page).with_total_count(total),
        })
    }
}
