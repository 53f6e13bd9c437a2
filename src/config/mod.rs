//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach. From lowest to
//! highest precedence:
//!
//! 1. **Defaults** – built-in application defaults
//! 2. **Configuration file** – `.octostore.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `OCTOSTORE_TOKEN`, `OCTOSTORE_OWNER`, and
//!    so on; the token also falls back to `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--owner`/`-o`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! owner = "octocat"
//! repo = "hello-world"
//! resource = "contents"
//! path = "docs"
//! page_size = 100
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::ModelError;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::PageSize;

/// GitHub's public REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Collection the CLI streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resource {
    /// Issues, pull requests excluded.
    #[default]
    Issues,
    /// Pull requests.
    Pulls,
    /// Contributors.
    Contributors,
    /// Repository contents, walked as a tree.
    Contents,
    /// Primary languages.
    Languages,
}

impl Resource {
    const ALL: [Self; 5] = [
        Self::Issues,
        Self::Pulls,
        Self::Contributors,
        Self::Contents,
        Self::Languages,
    ];

    /// Returns the configuration value naming this resource.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Pulls => "pulls",
            Self::Contributors => "contributors",
            Self::Contents => "contents",
            Self::Languages => "languages",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::Configuration {
                message: format!(
                    "unknown resource `{s}` (expected one of {})",
                    Self::ALL.map(|resource| resource.as_str()).join(", ")
                ),
            })
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use octostore::OctostoreConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = OctostoreConfig::load().expect("failed to load configuration");
/// let repository = config.require_repository_info().expect("owner/repo required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "OCTOSTORE",
    discovery(
        dotfile_name = ".octostore.toml",
        config_file_name = "octostore.toml",
        app_name = "octostore"
    )
)]
pub struct OctostoreConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `OCTOSTORE_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// REST API base URL; change it for GitHub Enterprise.
    #[ortho_config()]
    pub api_base: String,

    /// Records requested per list call, `1..=100`.
    #[ortho_config()]
    pub page_size: u8,

    /// Repository owner (e.g., "octocat").
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Collection to stream: `issues`, `pulls`, `contributors`, `contents`
    /// or `languages`. Defaults to `issues`.
    #[ortho_config()]
    pub resource: Option<String>,

    /// Directory whose direct children are listed when streaming contents.
    /// The whole tree is walked when unset.
    #[ortho_config(cli_short = 'd')]
    pub path: Option<String>,
}

const DEFAULT_PAGE_SIZE: u8 = 30;

impl Default for OctostoreConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            owner: None,
            repo: None,
            resource: None,
            path: None,
        }
    }
}

impl OctostoreConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ModelError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ModelError::MissingToken)
    }

    /// Returns the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] when owner or repo is missing,
    /// or [`ModelError::InvalidReference`] when either is malformed.
    pub fn require_repository_info(&self) -> Result<RepositoryRef, ModelError> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => RepositoryRef::from_owner_repo(owner, repo),
            (None, _) => Err(ModelError::Configuration {
                message: "repository owner is required (use --owner or -o)".to_owned(),
            }),
            (_, None) => Err(ModelError::Configuration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            }),
        }
    }

    /// Returns the validated page size.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPagination`] outside `1..=100`.
    pub fn page_size(&self) -> Result<PageSize, ModelError> {
        PageSize::new(self.page_size)
    }

    /// Returns the collection to stream.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] for unknown names.
    pub fn resource(&self) -> Result<Resource, ModelError> {
        self.resource
            .as_deref()
            .map_or(Ok(Resource::default()), str::parse)
    }
}

#[cfg(test)]
mod tests;
