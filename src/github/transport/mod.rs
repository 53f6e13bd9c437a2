//! Transport seam between the models and the HTTP client.
//!
//! Models never talk to Octocrab directly. They hold a [`GitHubClient`]
//! wrapping an injected [`Transport`], which keeps the paging and traversal
//! logic testable without a network and lets one client be shared by every
//! model built at process start.

mod error_mapping;
mod octocrab_transport;

pub use octocrab_transport::OctocrabTransport;

use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ModelError;
use super::query::QueryParams;

/// Executes one request against the GitHub API and returns the decoded JSON
/// body. Failures are surfaced unmodified; no retry happens at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method` against `route` with the given query pairs and optional
    /// JSON body.
    async fn request(
        &self,
        method: Method,
        route: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ModelError>;
}

/// Cloneable handle over a shared [`Transport`] with typed helpers.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
}

impl GitHubClient {
    /// Wraps an already shared transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Wraps an owned transport.
    #[must_use]
    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self::new(Arc::new(transport))
    }

    /// `GET` a route and decode the body.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and returns [`ModelError::Decode`] when
    /// the body does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &QueryParams,
    ) -> Result<T, ModelError> {
        let body = self
            .transport
            .request(Method::GET, route, query.pairs(), None)
            .await?;
        decode(route, body)
    }

    /// `POST` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and returns [`ModelError::Decode`] when
    /// the body does not match `T`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        route: &str,
        body: Value,
    ) -> Result<T, ModelError> {
        let response = self
            .transport
            .request(Method::POST, route, &[], Some(body))
            .await?;
        decode(route, response)
    }

    /// `PUT` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and returns [`ModelError::Decode`] when
    /// the body does not match `T`.
    pub async fn put<T: DeserializeOwned>(
        &self,
        route: &str,
        body: Value,
    ) -> Result<T, ModelError> {
        let response = self
            .transport
            .request(Method::PUT, route, &[], Some(body))
            .await?;
        decode(route, response)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(route: &str, body: Value) -> Result<T, ModelError> {
    serde_json::from_value(body).map_err(|error| ModelError::decode(route, &error))
}
