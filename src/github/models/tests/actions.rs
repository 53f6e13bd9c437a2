//! Workflow run and check run model tests.

use rstest::rstest;
use serde_json::json;

use super::{octo_repo, page_size, transport};
use crate::github::locator::RepositoryRef;
use crate::github::models::{
    CheckRunFilter, CheckRunModel, CheckRunScope, WorkflowRunFilter, WorkflowRunModel,
};
use crate::github::pagination::Paginator;
use crate::github::query::Direction;
use crate::github::test_support::FakeTransport;

const RUNS: &str = "/repos/octo/repo/actions/runs";

fn runs_envelope() -> serde_json::Value {
    json!({
        "total_count": 42,
        "workflow_runs": [
            { "id": 1, "created_at": "2024-03-02T00:00:00Z" },
            { "id": 2, "created_at": "2024-03-01T00:00:00Z" },
            { "id": 3, "created_at": "2024-03-03T00:00:00Z" }
        ]
    })
}

#[rstest]
#[case::ascending(Some(Direction::Asc), vec![2, 1, 3])]
#[case::descending(Some(Direction::Desc), vec![3, 1, 2])]
#[case::server_order(None, vec![1, 2, 3])]
#[tokio::test]
async fn workflow_runs_are_reordered_by_creation_time(
    transport: FakeTransport,
    octo_repo: RepositoryRef,
    #[case] direction: Option<Direction>,
    #[case] expected: Vec<u64>,
) {
    transport.respond(RUNS, runs_envelope());
    let model = WorkflowRunModel::new(transport.client(), octo_repo);
    let filter = WorkflowRunFilter {
        branch: Some("main".to_owned()),
        direction,
        ..WorkflowRunFilter::default()
    };

    let page = model
        .load_page(2, page_size(3), &filter)
        .await
        .expect("page should load");

    let ids: Vec<u64> = page.items.iter().map(|run| run.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(page.total_count(), Some(42));
    let requests = transport.requests_to(RUNS);
    let request = requests.first().expect("request expected");
    assert_eq!(request.param("branch"), Some("main"));
    assert_eq!(request.param("page"), Some("2"));
    assert_eq!(request.param("direction"), None, "direction is applied locally");
}

#[rstest]
#[tokio::test]
async fn check_runs_default_to_latest(transport: FakeTransport, octo_repo: RepositoryRef) {
    let route = "/repos/octo/repo/commits/main/check-runs";
    transport.respond(
        route,
        json!({ "total_count": 1, "check_runs": [{ "id": 5, "name": "ci" }] }),
    );
    let model = CheckRunModel::new(transport.client(), &octo_repo, "main");

    let runs = model
        .load_all(&CheckRunFilter::default())
        .await
        .expect("runs should load");

    assert_eq!(runs.len(), 1);
    let requests = transport.requests_to(route);
    assert_eq!(requests.len(), 1, "collected total ends paging");
    let request = requests.first().expect("request expected");
    assert_eq!(request.param("filter"), Some(CheckRunScope::Latest.as_str()));
    assert_eq!(request.param("check_name"), None);
}
