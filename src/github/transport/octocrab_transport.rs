//! Octocrab-backed [`Transport`](super::Transport) implementation.

use async_trait::async_trait;
use http::{Method, Uri};
use octocrab::Octocrab;
use serde_json::Value;

use crate::github::error::ModelError;
use crate::github::locator::PersonalAccessToken;

use super::Transport;
use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ModelError::InvalidUrl` when the base URI cannot be parsed or
/// `ModelError::Api` when Octocrab fails to construct a client.
fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ModelError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ModelError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| ModelError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Transport that sends every request through one Octocrab client.
pub struct OctocrabTransport {
    client: Octocrab,
}

impl OctocrabTransport {
    /// Creates a transport from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an authenticated client for `api_base`
    /// (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if the Octocrab client cannot be built.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, ModelError> {
        build_octocrab_client(token, api_base).map(Self::new)
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn request(
        &self,
        method: Method,
        route: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ModelError> {
        let operation = format!("{method} {route}");
        tracing::trace!("{operation} with {} query parameters", query.len());

        let result = match method {
            Method::GET if query.is_empty() => self.client.get(route, None::<&()>).await,
            Method::GET => self.client.get(route, Some(query)).await,
            Method::POST => self.client.post(route, body.as_ref()).await,
            Method::PUT => self.client.put(route, body.as_ref()).await,
            Method::PATCH => self.client.patch(route, body.as_ref()).await,
            other => {
                return Err(ModelError::Api {
                    message: format!("{other} is not supported by the transport"),
                });
            }
        };

        result.map_err(|error| map_octocrab_error(&operation, &error))
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabTransport;
    use crate::github::error::ModelError;
    use crate::github::locator::PersonalAccessToken;
    use crate::github::transport::Transport;

    fn transport_for(server: &MockServer) -> OctocrabTransport {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        OctocrabTransport::for_token(&token, &server.uri()).expect("should create transport")
    }

    #[tokio::test]
    async fn get_sends_query_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/issues"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let body = transport_for(&server)
            .request(
                Method::GET,
                "/repos/octo/repo/issues",
                &[
                    ("page".to_owned(), "2".to_owned()),
                    ("per_page".to_owned(), "10".to_owned()),
                ],
                None,
            )
            .await
            .expect("request should succeed");

        assert_eq!(body, json!([{ "id": 1 }]));
    }

    #[tokio::test]
    async fn put_sends_json_body() {
        let server = MockServer::start().await;
        let payload = json!({ "message": "update", "content": "aGk=" });
        Mock::given(method("PUT"))
            .and(path("/repos/octo/repo/contents/README.md"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let body = transport_for(&server)
            .request(
                Method::PUT,
                "/repos/octo/repo/contents/README.md",
                &[],
                Some(payload),
            )
            .await
            .expect("request should succeed");

        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn not_found_responses_map_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/contents/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let error = transport_for(&server)
            .request(Method::GET, "/repos/octo/repo/contents/missing", &[], None)
            .await
            .expect_err("request should fail");

        assert!(error.is_not_found(), "expected NotFound, got {error:?}");
    }

    #[tokio::test]
    async fn unauthorised_responses_map_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let error = transport_for(&server)
            .request(Method::GET, "/user", &[], None)
            .await
            .expect_err("request should fail");

        assert!(
            matches!(error, ModelError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[tokio::test]
    async fn unsupported_methods_are_rejected() {
        let server = MockServer::start().await;
        let error = transport_for(&server)
            .request(Method::DELETE, "/user", &[], None)
            .await
            .expect_err("DELETE should be rejected");

        assert!(
            matches!(error, ModelError::Api { .. }),
            "expected Api, got {error:?}"
        );
    }
}
