//! Error types exposed by the GitHub model layer.

use thiserror::Error;

/// Errors surfaced while building requests or communicating with GitHub.
///
/// Every error is local to the call that produced it. Streams yield the error
/// as their final item; records yielded before it remain valid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The provided URL could not be parsed.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// A repository reference did not have the `owner/repo` shape.
    #[error("repository reference must match owner/repo: {reference}")]
    InvalidReference {
        /// The rejected reference.
        reference: String,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("GitHub resource not found: {message}")]
    NotFound {
        /// Operation and response detail.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("unexpected response shape: {message}")]
    Decode {
        /// Route and deserialisation detail.
        message: String,
    },

    /// A value could not be serialised to JSON.
    #[error("could not encode {message}")]
    Encode {
        /// What was being encoded and the serialiser's detail.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The GraphQL endpoint answered with an `errors` array or no data.
    #[error("GraphQL query failed: {message}")]
    GraphQl {
        /// Joined error messages.
        message: String,
    },

    /// An actor login could not be matched to an assignable actor.
    #[error("no assignable actor named {login}")]
    UnknownActor {
        /// The login that could not be resolved.
        login: String,
    },

    /// A content name filter was not a valid regular expression.
    #[error("invalid name pattern: {message}")]
    InvalidPattern {
        /// Regex compiler message.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl ModelError {
    /// Returns true when GitHub reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn decode(route: &str, error: &serde_json::Error) -> Self {
        Self::Decode {
            message: format!("{route}: {error}"),
        }
    }

    /// Wraps a serialisation failure for `subject`.
    #[must_use]
    pub fn encode(subject: &str, error: &serde_json::Error) -> Self {
        Self::Encode {
            message: format!("{subject}: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::ModelError;

    #[test]
    fn serialisation_failures_are_not_reported_as_response_shape() {
        let unencodable = BTreeMap::from([((1_u8, 2_u8), "pair keys")]);
        let failure = serde_json::to_string(&unencodable).expect_err("tuple keys cannot encode");

        let error = ModelError::encode("record", &failure);

        assert!(
            matches!(&error, ModelError::Encode { message } if message.starts_with("record: ")),
            "expected Encode, got {error:?}"
        );
        assert!(error.to_string().starts_with("could not encode record"));
    }
}
