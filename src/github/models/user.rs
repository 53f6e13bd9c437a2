//! Authenticated user session.

use tokio::sync::OnceCell;

use super::OrganizationModel;
use crate::github::error::ModelError;
use crate::github::pagination::StreamSource;
use crate::github::query::QueryParams;
use crate::github::records::{Organization, User};
use crate::github::transport::GitHubClient;

/// Authenticated user together with their organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user.
    pub user: User,
    /// Organizations the user belongs to.
    pub organizations: Vec<Organization>,
}

impl Session {
    /// Logins repositories can be listed under: the user first, then each
    /// organization.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        std::iter::once(self.user.login.as_str())
            .chain(self.organizations.iter().map(|org| org.login.as_str()))
            .collect()
    }
}

/// Loads the session of the token's owner once per model.
pub struct UserModel {
    client: GitHubClient,
    session: OnceCell<Session>,
}

impl UserModel {
    /// Creates a model with no session loaded.
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            session: OnceCell::new(),
        }
    }

    /// Returns the session, loading the user and their organizations on
    /// first use.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures; a failed load is retried
    /// on the next call.
    pub async fn get_session(&self) -> Result<&Session, ModelError> {
        self.session
            .get_or_try_init(|| async {
                let user: User = self.client.get("/user", &QueryParams::new()).await?;
                let organizations = OrganizationModel::for_user(self.client.clone(), &user.login)
                    .get_all(&())
                    .await?;
                tracing::debug!(
                    login = %user.login,
                    organizations = organizations.len(),
                    "loaded session"
                );
                Ok::<_, ModelError>(Session {
                    user,
                    organizations,
                })
            })
            .await
    }
}
