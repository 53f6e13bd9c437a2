//! Typed models over the GitHub REST and GraphQL APIs.
//!
//! Every model is built from an injected [`GitHubClient`], which wraps a
//! [`Transport`]. Production code uses [`OctocrabTransport`]; tests swap in
//! a fake. List endpoints are served either as lazy record streams
//! ([`pagination::StreamSource`]) or page by page
//! ([`pagination::Paginator`]). Repositories can be decorated with memoized
//! relations through [`relation::RepositoryRelations`].

pub mod error;
mod graphql;
pub mod locator;
pub mod memo;
pub mod models;
pub mod pagination;
pub mod query;
pub mod records;
pub mod relation;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::ModelError;
pub use locator::{PersonalAccessToken, RepositoryName, RepositoryOwner, RepositoryRef};
pub use pagination::{PageData, PageInfo, PageSize, Paginator, RecordStream, StreamSource};
pub use transport::{GitHubClient, OctocrabTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
