//! Behavioural tests for record streams served through Octocrab.

#[path = "support/runtime.rs"]
mod runtime;

use futures::StreamExt;
use octostore::github::models::{ContentFilter, ContentModel, IssueFilter, IssueModel};
use octostore::{GitHubClient, ModelError, RepositoryRef, StreamSource};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use runtime::{StepRuntime, runtime_with_server};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENTS: &str = "/repos/octo/repo/contents";

#[derive(ScenarioState, Default)]
struct StreamState {
    runtime: Slot<StepRuntime>,
    server: Slot<MockServer>,
    names: Slot<Vec<String>>,
    error: Slot<ModelError>,
    total: Slot<Option<u64>>,
}

#[fixture]
fn stream_state() -> StreamState {
    StreamState::default()
}

fn runtime_for(stream_state: &StreamState) -> StepRuntime {
    runtime_with_server(&stream_state.runtime, &stream_state.server)
        .unwrap_or_else(|error| panic!("failed to initialise runtime: {error}"))
}

fn mount_get(stream_state: &StreamState, route: &str, response: ResponseTemplate) {
    let runtime = runtime_for(stream_state);
    let mock = Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response);

    stream_state
        .server
        .with_ref(|server| {
            runtime.block_on(mock.mount(server));
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

fn client_for(stream_state: &StreamState) -> GitHubClient {
    let server_url = stream_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"));
    runtime_for(stream_state)
        .octocrab_client(&server_url)
        .unwrap_or_else(|error| panic!("client should build: {error}"))
}

fn octo_repo() -> RepositoryRef {
    RepositoryRef::from_owner_repo("octo", "repo")
        .unwrap_or_else(|error| panic!("sample reference should be valid: {error}"))
}

fn entry(path: &str, kind: &str) -> Value {
    let name = path.rsplit('/').next().unwrap_or(path);
    json!({ "name": name, "path": path, "type": kind, "sha": format!("sha-{path}") })
}

fn drain<S: StreamSource>(
    stream_state: &StreamState,
    source: &S,
    filter: &S::Filter,
    name: fn(&S::Item) -> String,
) {
    let runtime = runtime_for(stream_state);
    let outcomes: Vec<Result<S::Item, ModelError>> =
        runtime.block_on(source.open_stream(filter).collect());

    let mut names = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(item) => names.push(name(&item)),
            Err(error) => stream_state.error.set(error),
        }
    }
    stream_state.names.set(names);
    stream_state.total.set(source.total_count());
}

#[given("a repository tree with a docs directory holding {count:usize} files")]
fn seed_tree(stream_state: &StreamState, count: usize) {
    mount_get(
        stream_state,
        CONTENTS,
        ResponseTemplate::new(200).set_body_json(json!([
            entry("docs", "dir"),
            entry("README.md", "file")
        ])),
    );
    let files: Vec<Value> = (1..=count)
        .map(|index| entry(&format!("docs/file{index}.md"), "file"))
        .collect();
    mount_get(
        stream_state,
        &format!("{CONTENTS}/docs"),
        ResponseTemplate::new(200).set_body_json(files),
    );
}

#[given("a repository tree whose docs directory cannot be listed")]
fn seed_broken_tree(stream_state: &StreamState) {
    mount_get(
        stream_state,
        CONTENTS,
        ResponseTemplate::new(200).set_body_json(json!([
            entry("docs", "dir"),
            entry("README.md", "file")
        ])),
    );
    mount_get(
        stream_state,
        &format!("{CONTENTS}/docs"),
        ResponseTemplate::new(422).set_body_json(json!({
            "message": "Listing unavailable",
            "documentation_url": "https://docs.github.com/rest"
        })),
    );
}

#[given("a repository with {issues:u64} issues and {pulls:u64} pull requests")]
fn seed_issues(stream_state: &StreamState, issues: u64, pulls: u64) {
    let records: Vec<Value> = (1..=issues.saturating_add(pulls))
        .map(|number| {
            if number > issues {
                json!({
                    "id": number,
                    "number": number,
                    "title": format!("PR {number}"),
                    "pull_request": {
                        "url": format!("https://api.github.com/repos/octo/repo/pulls/{number}")
                    }
                })
            } else {
                json!({ "id": number, "number": number, "title": format!("Issue {number}") })
            }
        })
        .collect();
    mount_get(
        stream_state,
        "/repos/octo/repo/issues",
        ResponseTemplate::new(200).set_body_json(records),
    );
}

#[when("the client walks the repository contents")]
fn walk_contents(stream_state: &StreamState) {
    let model = ContentModel::new(client_for(stream_state), octo_repo());
    drain(stream_state, &model, &ContentFilter::default(), |content| {
        content.path.clone()
    });
}

#[when("the client streams the open issues")]
fn stream_issues(stream_state: &StreamState) {
    let model = IssueModel::new(client_for(stream_state), octo_repo());
    drain(stream_state, &model, &IssueFilter::default(), |issue| {
        issue.title.clone()
    });
}

#[then("the entries are {expected}")]
fn assert_entries(stream_state: &StreamState, expected: String) {
    let names = stream_state
        .names
        .with_ref(Clone::clone)
        .unwrap_or_else(|| panic!("stream was not drained"));

    assert_eq!(names.join(", "), expected, "traversal order mismatch");
    assert!(
        stream_state.error.with_ref(|_| ()).is_none(),
        "expected no error"
    );
}

#[then("{count:usize} records are yielded")]
fn assert_record_count(stream_state: &StreamState, count: usize) {
    let actual = stream_state
        .names
        .with_ref(Vec::len)
        .unwrap_or_else(|| panic!("stream was not drained"));

    assert_eq!(actual, count, "record count mismatch");
}

#[then("the walk fails after {count:usize} entries")]
fn assert_failure(stream_state: &StreamState, count: usize) {
    let error = stream_state
        .error
        .with_ref(Clone::clone)
        .unwrap_or_else(|| panic!("expected the walk to fail"));
    let yielded = stream_state.names.with_ref(Vec::len).unwrap_or_default();

    assert!(
        matches!(error, ModelError::Api { .. }),
        "expected an API error, got {error:?}"
    );
    assert_eq!(yielded, count, "entries before the failure");
}

#[then("the published total is {expected:u64}")]
fn assert_total(stream_state: &StreamState, expected: u64) {
    let total = stream_state.total.with_ref(|total| *total).flatten();

    assert_eq!(total, Some(expected), "published total mismatch");
}

#[then("no total is published")]
fn assert_no_total(stream_state: &StreamState) {
    let total = stream_state.total.with_ref(|total| *total).flatten();

    assert_eq!(total, None, "failed streams publish no total");
}

#[scenario(path = "tests/features/record_streams.feature", index = 0)]
fn walk_tree_in_pre_order(stream_state: StreamState) {
    let _ = stream_state;
}

#[scenario(path = "tests/features/record_streams.feature", index = 1)]
fn failing_directory_aborts_walk(stream_state: StreamState) {
    let _ = stream_state;
}

#[scenario(path = "tests/features/record_streams.feature", index = 2)]
fn issue_stream_skips_pull_requests(stream_state: StreamState) {
    let _ = stream_state;
}
