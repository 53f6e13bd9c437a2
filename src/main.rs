//! Octostore CLI entrypoint: streams one repository collection as JSON lines.

use std::io::{self, Write};
use std::process::ExitCode;

use futures::TryStreamExt;
use octostore::config::Resource;
use octostore::github::models::{
    ContentFilter, ContentModel, ContributorFilter, ContributorModel, IssueFilter, IssueModel,
    PullRequestFilter, PullRequestModel,
};
use octostore::github::relation::RepositoryRelations;
use octostore::{
    GitHubClient, ModelError, OctocrabTransport, OctostoreConfig, PersonalAccessToken,
    StreamSource,
};
use ortho_config::OrthoConfig;
use serde::Serialize;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ModelError> {
    let config = load_config()?;

    let repository = config.require_repository_info()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let page_size = config.page_size()?;
    let resource = config.resource()?;

    let transport = OctocrabTransport::for_token(&token, &config.api_base)?;
    let client = GitHubClient::from_transport(transport);
    tracing::debug!(%repository, %resource, "streaming resource");

    match resource {
        Resource::Issues => {
            let model = IssueModel::new(client, repository).with_page_size(page_size);
            emit(&model, &IssueFilter::default()).await
        }
        Resource::Pulls => {
            let model = PullRequestModel::new(client, repository).with_page_size(page_size);
            emit(&model, &PullRequestFilter::default()).await
        }
        Resource::Contributors => {
            let model = ContributorModel::new(client, repository).with_page_size(page_size);
            emit(&model, &ContributorFilter::default()).await
        }
        Resource::Contents => {
            let model = ContentModel::new(client, repository);
            let filter = ContentFilter {
                path: config.path.clone(),
                name: None,
            };
            emit(&model, &filter).await
        }
        Resource::Languages => {
            let languages = RepositoryRelations::new(client)
                .languages(&repository)
                .await?;
            for language in &languages {
                write_record(language)?;
            }
            report_total(languages.len() as u64)
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ModelError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<OctostoreConfig, ModelError> {
    OctostoreConfig::load().map_err(|error| ModelError::Configuration {
        message: error.to_string(),
    })
}

async fn emit<S>(source: &S, filter: &S::Filter) -> Result<(), ModelError>
where
    S: StreamSource,
    S::Item: Serialize,
{
    let mut records = source.open_stream(filter);
    while let Some(record) = records.try_next().await? {
        write_record(&record)?;
    }

    let total = source.total_count().unwrap_or_default();
    report_total(total)
}

fn write_record<T: Serialize + ?Sized>(record: &T) -> Result<(), ModelError> {
    let line =
        serde_json::to_string(record).map_err(|error| ModelError::encode("record", &error))?;
    writeln!(io::stdout().lock(), "{line}").map_err(|error| ModelError::Io {
        message: error.to_string(),
    })
}

fn report_total(total: u64) -> Result<(), ModelError> {
    writeln!(io::stderr().lock(), "{total} records").map_err(|error| ModelError::Io {
        message: error.to_string(),
    })
}
