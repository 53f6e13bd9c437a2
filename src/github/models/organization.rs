//! Organization model.

use std::sync::{Mutex, PoisonError};

use crate::github::error::ModelError;
use crate::github::pagination::{PageSize, PageStream, RecordStream, StreamSource, TotalCount};
use crate::github::query::QueryParams;
use crate::github::records::Organization;
use crate::github::transport::GitHubClient;

/// Organizations of the authenticated user or of a named user.
///
/// Listings start at page 0 and carry a `since` watermark of the last
/// organization id seen, so organizations created mid-stream do not shift
/// later pages.
pub struct OrganizationModel {
    client: GitHubClient,
    route: String,
    page_size: PageSize,
    total: TotalCount,
    current: Mutex<Option<Organization>>,
}

impl OrganizationModel {
    /// Organizations of the authenticated user.
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self::with_route(client, "/user/orgs".to_owned())
    }

    /// Public organizations of `login`.
    #[must_use]
    pub fn for_user(client: GitHubClient, login: &str) -> Self {
        Self::with_route(client, format!("/users/{login}/orgs"))
    }

    fn with_route(client: GitHubClient, route: String) -> Self {
        Self {
            client,
            route,
            page_size: PageSize::default(),
            total: TotalCount::new(),
            current: Mutex::new(None),
        }
    }

    /// Sets the page size used by streams.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetches organization `login`, reusing the last fetched organization
    /// when it has the same login.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding failures.
    pub async fn get_one(&self, login: &str) -> Result<Organization, ModelError> {
        if let Some(current) = self.current().filter(|current| current.login == login) {
            return Ok(current);
        }

        let organization: Organization = self
            .client
            .get(&format!("/orgs/{login}"), &QueryParams::new())
            .await?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(organization.clone());
        Ok(organization)
    }

    /// The last organization fetched by [`OrganizationModel::get_one`].
    #[must_use]
    pub fn current(&self) -> Option<Organization> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StreamSource for OrganizationModel {
    type Item = Organization;
    type Filter = ();

    fn open_stream(&self, _filter: &()) -> RecordStream<Organization> {
        PageStream::new(self.client.clone(), self.route.clone(), self.page_size)
            .first_page(0)
            .watermark(|organization: &Organization| organization.id)
            .open(&self.total)
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}
