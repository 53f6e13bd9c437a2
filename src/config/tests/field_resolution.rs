//! Tests for `resolve_token`, `require_repository_info`, `page_size` and
//! `resource`.

use rstest::rstest;

use crate::OctostoreConfig;
use crate::config::Resource;
use crate::github::error::ModelError;

#[rstest]
fn resolve_token_returns_value_when_present() {
    let config = OctostoreConfig {
        token: Some("my-token".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.resolve_token().ok(), Some("my-token".to_owned()));
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);
    let config = OctostoreConfig::default();

    assert_eq!(config.resolve_token().ok(), Some("legacy-token".to_owned()));
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = OctostoreConfig::default();

    assert_eq!(config.resolve_token(), Err(ModelError::MissingToken));
}

#[rstest]
fn require_repository_info_builds_reference() {
    let config = OctostoreConfig {
        owner: Some("octocat".to_owned()),
        repo: Some("hello-world".to_owned()),
        ..Default::default()
    };

    let repository = config
        .require_repository_info()
        .expect("repository should resolve");

    assert_eq!(repository.to_string(), "octocat/hello-world");
}

#[rstest]
#[case::missing_owner(None, Some("repo"), "owner")]
#[case::missing_repo(Some("owner"), None, "name")]
fn require_repository_info_reports_missing_part(
    #[case] owner: Option<&str>,
    #[case] repo: Option<&str>,
    #[case] mentioned: &str,
) {
    let config = OctostoreConfig {
        owner: owner.map(str::to_owned),
        repo: repo.map(str::to_owned),
        ..Default::default()
    };

    let error = config
        .require_repository_info()
        .expect_err("incomplete repository should fail");

    assert!(
        matches!(&error, ModelError::Configuration { message } if message.contains(mentioned)),
        "unexpected error: {error:?}"
    );
}

#[rstest]
#[case::zero(0)]
#[case::too_large(101)]
fn page_size_outside_github_range_is_rejected(#[case] value: u8) {
    let config = OctostoreConfig {
        page_size: value,
        ..Default::default()
    };

    assert!(matches!(
        config.page_size(),
        Err(ModelError::InvalidPagination { .. })
    ));
}

#[rstest]
#[case::default(None, Resource::Issues)]
#[case::pulls(Some("pulls"), Resource::Pulls)]
#[case::case_insensitive(Some("Contents"), Resource::Contents)]
#[case::languages(Some("languages"), Resource::Languages)]
fn resource_is_parsed(#[case] value: Option<&str>, #[case] expected: Resource) {
    let config = OctostoreConfig {
        resource: value.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(config.resource(), Ok(expected));
}

#[rstest]
fn unknown_resource_is_rejected() {
    let config = OctostoreConfig {
        resource: Some("gists".to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.resource(),
        Err(ModelError::Configuration { .. })
    ));
}
