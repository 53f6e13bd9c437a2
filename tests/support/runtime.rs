//! Tokio runtime and mock GitHub server shared by the record stream steps.

use std::future::Future;
use std::io;
use std::rc::Rc;

use octostore::{GitHubClient, ModelError, OctocrabTransport, PersonalAccessToken};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime handle cheap enough to clone out of an `rstest-bdd` slot.
#[derive(Clone)]
pub struct StepRuntime(Rc<Runtime>);

impl StepRuntime {
    fn start() -> io::Result<Self> {
        Runtime::new().map(|runtime| Self(Rc::new(runtime)))
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }

    /// Builds an Octocrab-backed client aimed at `base_url`.
    ///
    /// Octocrab spawns its request buffer on construction, so the transport
    /// is built with this runtime entered.
    pub fn octocrab_client(&self, base_url: &str) -> Result<GitHubClient, ModelError> {
        let _entered = self.0.enter();
        let token = PersonalAccessToken::new("valid-token")?;
        OctocrabTransport::for_token(&token, base_url).map(GitHubClient::from_transport)
    }
}

/// Starts the runtime and the mock server on first use and returns the
/// runtime.
///
/// # Errors
///
/// Returns an error when the runtime cannot be built.
pub fn runtime_with_server(
    runtime: &Slot<StepRuntime>,
    server: &Slot<MockServer>,
) -> io::Result<StepRuntime> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(StepRuntime::start()?);
    }
    let step_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime slot is empty"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(step_runtime.block_on(MockServer::start()));
    }

    Ok(step_runtime)
}
