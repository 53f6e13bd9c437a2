//! Identity wrappers for repositories and tokens.

use std::fmt;
use std::str::FromStr;

use url::Url;

use super::error::ModelError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is a single non-empty path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidReference`] for empty values or values
    /// containing `/`.
    pub fn new(value: &str) -> Result<Self, ModelError> {
        validate_segment(value).map(|()| Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is a single non-empty path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidReference`] for empty values or values
    /// containing `/`.
    pub fn new(value: &str) -> Result<Self, ModelError> {
        validate_segment(value).map(|()| Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn validate_segment(value: &str) -> Result<(), ModelError> {
    if value.is_empty() || value.contains('/') {
        return Err(ModelError::InvalidReference {
            reference: value.to_owned(),
        });
    }
    Ok(())
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ModelError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ModelError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Unique `owner/repo` reference of a repository.
///
/// This is the key under which repository relations are memoized and the
/// prefix of every repository-scoped route.
///
/// # Example
///
/// ```
/// use octostore::RepositoryRef;
///
/// let reference = RepositoryRef::parse("octo/repo").expect("should parse");
/// assert_eq!(reference.owner().as_str(), "octo");
/// assert_eq!(reference.to_string(), "octo/repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryRef {
    /// Creates a reference from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidReference` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, ModelError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses either `owner/repo` or a repository URL such as
    /// `https://github.com/owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidUrl` when a URL cannot be parsed and
    /// `ModelError::InvalidReference` when the path is not `owner/repo`.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        if input.contains("://") {
            return Self::parse_url(input);
        }

        let mut segments = input.trim_matches('/').split('/');
        let (Some(owner), Some(repo), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(ModelError::InvalidReference {
                reference: input.to_owned(),
            });
        };
        Self::from_owner_repo(owner, repo)
    }

    fn parse_url(input: &str) -> Result<Self, ModelError> {
        let parsed =
            Url::parse(input).map_err(|error| ModelError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| ModelError::InvalidUrl("URL cannot carry a path".to_owned()))?;

        let missing = || ModelError::InvalidReference {
            reference: input.to_owned(),
        };
        let owner = segments.next().ok_or_else(missing)?;
        let repo = segments.next().ok_or_else(missing)?;

        Self::from_owner_repo(owner, repo.trim_end_matches(".git"))
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Route of the repository itself, e.g. `/repos/octo/repo`.
    #[must_use]
    pub fn route(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// Route of a sub-resource, e.g. `/repos/octo/repo/issues`.
    #[must_use]
    pub fn route_to(&self, resource: &str) -> String {
        format!("{}/{}", self.route(), resource.trim_start_matches('/'))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner.as_str(), self.repository.as_str())
    }
}

impl FromStr for RepositoryRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
