//! Error mapping helpers for the Octocrab transport.

use http::StatusCode;

use crate::github::error::ModelError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks if an octocrab error came from decoding the response body.
const fn is_decode_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ModelError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_status(operation, source.status_code, &source.message);
    }

    if is_network_error(error) {
        return ModelError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    if is_decode_error(error) {
        return ModelError::Decode {
            message: format!("{operation}: {error}"),
        };
    }

    ModelError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_status(operation: &str, status: StatusCode, message: &str) -> ModelError {
    if is_auth_failure(status) {
        ModelError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else if status == StatusCode::NOT_FOUND {
        ModelError::NotFound {
            message: format!("{operation}: {message}"),
        }
    } else {
        ModelError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
