//! Memoized repository relations.
//!
//! A relation is data about a repository that takes its own request:
//! contributors, open issues and primary languages. Requested relations are
//! fetched concurrently and joined all-or-nothing; each one is memoized per
//! repository reference for the lifetime of the owning
//! [`RepositoryRelations`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use futures::future::try_join_all;

use super::error::ModelError;
use super::locator::RepositoryRef;
use super::memo::Memo;
use super::models::{ContributorFilter, ContributorModel, IssueFilter, IssueModel};
use super::pagination::{PageSize, StreamSource};
use super::query::QueryParams;
use super::records::{Contributor, GitRepository, Issue, Repository};
use super::transport::GitHubClient;

/// Name of a relation that can be merged into a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// All contributors, most contributions first.
    Contributors,
    /// All open issues, pull requests excluded.
    Issues,
    /// Languages at or above the mean byte count, largest first.
    Languages,
}

impl RelationKind {
    /// Every relation kind.
    pub const ALL: [Self; 3] = [Self::Contributors, Self::Issues, Self::Languages];

    /// Returns the relation's field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contributors => "contributors",
            Self::Issues => "issues",
            Self::Languages => "languages",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::Configuration {
                message: format!("unknown relation `{s}`"),
            })
    }
}

/// Resolved relations of one repository; unrequested ones stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationBundle {
    /// Contributors, if requested.
    pub contributors: Option<Vec<Contributor>>,
    /// Open issues, if requested.
    pub issues: Option<Vec<Issue>>,
    /// Primary languages, if requested.
    pub languages: Option<Vec<String>>,
}

impl RelationBundle {
    /// Merges the bundle into `repository`.
    #[must_use]
    pub fn merge_into(self, repository: Repository) -> GitRepository {
        GitRepository {
            repository,
            contributors: self.contributors,
            issues: self.issues,
            languages: self.languages,
        }
    }
}

enum Resolved {
    Contributors(Vec<Contributor>),
    Issues(Vec<Issue>),
    Languages(Vec<String>),
}

/// Keeps languages whose byte count is at least the arithmetic mean, ordered
/// by byte count, largest first. Equal counts keep their input order.
///
/// ```
/// use std::collections::BTreeMap;
/// use octostore::github::relation::primary_languages;
///
/// let counts = BTreeMap::from([
///     ("TypeScript".to_owned(), 800),
///     ("HTML".to_owned(), 100),
///     ("CSS".to_owned(), 100),
/// ]);
/// assert_eq!(primary_languages(&counts), vec!["TypeScript"]);
/// ```
#[must_use]
pub fn primary_languages(counts: &BTreeMap<String, u64>) -> Vec<String> {
    let languages = counts.len() as u128;
    let sum: u128 = counts.values().map(|&count| u128::from(count)).sum();

    let mut kept: Vec<(&String, u64)> = counts
        .iter()
        .filter(|&(_, &count)| u128::from(count) * languages >= sum)
        .map(|(name, &count)| (name, count))
        .collect();
    kept.sort_by(|a, b| b.1.cmp(&a.1));
    kept.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Sorts contributors by contribution count, largest first, keeping the
/// input order of equal counts.
pub fn sort_by_contributions(contributors: &mut [Contributor]) {
    contributors.sort_by(|a, b| b.contributions.cmp(&a.contributions));
}

/// Relation resolver with one memo table per relation kind.
pub struct RepositoryRelations {
    client: GitHubClient,
    contributors: Memo<Vec<Contributor>>,
    issues: Memo<Vec<Issue>>,
    languages: Memo<Vec<String>>,
}

impl RepositoryRelations {
    /// Page size used when streaming relation collections.
    pub const PAGE_SIZE: PageSize = PageSize::MAX;

    /// Creates a resolver with empty memo tables.
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            contributors: Memo::new(),
            issues: Memo::new(),
            languages: Memo::new(),
        }
    }

    /// All contributors of `repository`, most contributions first.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures.
    pub async fn contributors(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Contributor>, ModelError> {
        self.contributors
            .get_or_try_init(&repository.to_string(), || async {
                let mut contributors =
                    ContributorModel::new(self.client.clone(), repository.clone())
                        .with_page_size(Self::PAGE_SIZE)
                        .get_all(&ContributorFilter::default())
                        .await?;
                sort_by_contributions(&mut contributors);
                Ok::<_, ModelError>(contributors)
            })
            .await
    }

    /// All open issues of `repository`, pull requests excluded.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures.
    pub async fn issues(&self, repository: &RepositoryRef) -> Result<Vec<Issue>, ModelError> {
        self.issues
            .get_or_try_init(&repository.to_string(), || async {
                IssueModel::new(self.client.clone(), repository.clone())
                    .with_page_size(Self::PAGE_SIZE)
                    .get_all(&IssueFilter::default())
                    .await
            })
            .await
    }

    /// Primary languages of `repository`; see [`primary_languages`].
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures.
    pub async fn languages(&self, repository: &RepositoryRef) -> Result<Vec<String>, ModelError> {
        self.languages
            .get_or_try_init(&repository.to_string(), || async {
                let counts: BTreeMap<String, u64> = self
                    .client
                    .get(&repository.route_to("languages"), &QueryParams::new())
                    .await?;
                Ok::<_, ModelError>(primary_languages(&counts))
            })
            .await
    }

    /// Resolves every relation in `kinds` concurrently.
    ///
    /// # Errors
    ///
    /// Fails with the first relation error; no partial bundle is returned.
    pub async fn resolve(
        &self,
        repository: &RepositoryRef,
        kinds: &[RelationKind],
    ) -> Result<RelationBundle, ModelError> {
        let resolved =
            try_join_all(kinds.iter().map(|kind| self.resolve_one(repository, *kind))).await?;

        Ok(resolved
            .into_iter()
            .fold(RelationBundle::default(), |mut bundle, value| {
                match value {
                    Resolved::Contributors(contributors) => {
                        bundle.contributors = Some(contributors);
                    }
                    Resolved::Issues(issues) => bundle.issues = Some(issues),
                    Resolved::Languages(languages) => bundle.languages = Some(languages),
                }
                bundle
            }))
    }

    async fn resolve_one(
        &self,
        repository: &RepositoryRef,
        kind: RelationKind,
    ) -> Result<Resolved, ModelError> {
        match kind {
            RelationKind::Contributors => self
                .contributors(repository)
                .await
                .map(Resolved::Contributors),
            RelationKind::Issues => self.issues(repository).await.map(Resolved::Issues),
            RelationKind::Languages => self.languages(repository).await.map(Resolved::Languages),
        }
    }

    /// Forgets every relation memoized for `repository`.
    pub fn invalidate(&self, repository: &RepositoryRef) {
        let key = repository.to_string();
        self.contributors.invalidate(&key);
        self.issues.invalidate(&key);
        self.languages.invalidate(&key);
        tracing::debug!(%repository, "invalidated memoized relations");
    }

    /// Forgets every memoized relation.
    pub fn clear(&self) {
        self.contributors.clear();
        self.issues.clear();
        self.languages.clear();
    }
}
