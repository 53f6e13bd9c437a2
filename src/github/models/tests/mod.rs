//! Unit tests for the resource models, served by [`FakeTransport`].

mod actions;

use rstest::fixture;
use serde_json::{Value, json};

use crate::github::locator::RepositoryRef;
use crate::github::pagination::PageSize;
use crate::github::test_support::FakeTransport;

#[fixture]
fn transport() -> FakeTransport {
    FakeTransport::new()
}

#[fixture]
fn octo_repo() -> RepositoryRef {
    RepositoryRef::from_owner_repo("octo", "repo").expect("sample reference should be valid")
}

fn page_size(value: u8) -> PageSize {
    PageSize::new(value).expect("page size should be valid")
}

fn issue_json(number: u64) -> Value {
    json!({ "id": number + 1000, "number": number, "title": format!("Issue {number}") })
}

fn pull_request_as_issue_json(number: u64) -> Value {
    json!({
        "id": number + 1000,
        "number": number,
        "title": format!("PR {number}"),
        "pull_request": { "url": format!("https://api.github.com/repos/octo/repo/pulls/{number}") }
    })
}

fn contributor_json(login: &str, contributions: u64) -> Value {
    json!({ "login": login, "id": 1, "type": "User", "contributions": contributions })
}
