//! GraphQL request envelope and response decoding.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::ModelError;
use super::transport::{GitHubClient, decode};

const ROUTE: &str = "/graphql";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GitHubClient {
    /// Posts `{query, variables}` to the GraphQL endpoint and decodes `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::GraphQl`] when the response carries `errors` or
    /// no `data`, and [`ModelError::Decode`] when `data` does not match `T`.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ModelError> {
        let response: GraphQlResponse = self
            .post(ROUTE, json!({ "query": query, "variables": variables }))
            .await?;

        if !response.errors.is_empty() {
            let messages: Vec<&str> = response
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect();
            return Err(ModelError::GraphQl {
                message: messages.join("; "),
            });
        }

        let data = response.data.ok_or_else(|| ModelError::GraphQl {
            message: "response carried no data".to_owned(),
        })?;
        decode(ROUTE, data)
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde::Deserialize;
    use serde_json::json;

    use crate::github::error::ModelError;
    use crate::github::test_support::FakeTransport;

    #[derive(Debug, Deserialize)]
    struct Viewer {
        viewer: Login,
    }

    #[derive(Debug, Deserialize)]
    struct Login {
        login: String,
    }

    #[tokio::test]
    async fn sends_envelope_and_decodes_data() {
        let transport = FakeTransport::new();
        transport.on(Method::POST, "/graphql", |_| {
            Ok(json!({ "data": { "viewer": { "login": "octocat" } } }))
        });

        let viewer: Viewer = transport
            .client()
            .graphql("query { viewer { login } }", json!({ "first": 1 }))
            .await
            .expect("query should succeed");

        assert_eq!(viewer.viewer.login, "octocat");
        let sent = transport.requests_to("/graphql");
        assert_eq!(
            sent.first().and_then(|request| request.body.clone()),
            Some(json!({
                "query": "query { viewer { login } }",
                "variables": { "first": 1 }
            }))
        );
    }

    #[tokio::test]
    async fn errors_array_becomes_graphql_error() {
        let transport = FakeTransport::new();
        transport.on(Method::POST, "/graphql", |_| {
            Ok(json!({
                "data": null,
                "errors": [{ "message": "Field 'x' missing" }, { "message": "denied" }]
            }))
        });

        let error = transport
            .client()
            .graphql::<Viewer>("query { x }", json!({}))
            .await
            .expect_err("query should fail");

        assert_eq!(
            error,
            ModelError::GraphQl {
                message: "Field 'x' missing; denied".to_owned()
            }
        );
    }
}
