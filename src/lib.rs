//! Octostore library crate: typed GitHub records and models.
//!
//! The library wraps Octocrab behind a small transport seam and exposes
//! models for issues, pull requests, discussions, contributors,
//! organizations, workflow runs, check runs, repository contents and
//! repositories. List endpoints stream lazily with an observable total
//! count; repository contents can be walked as a tree.

pub mod config;
pub mod github;

pub use config::OctostoreConfig;
pub use github::{
    GitHubClient, ModelError, OctocrabTransport, PersonalAccessToken, RepositoryRef, StreamSource,
};
