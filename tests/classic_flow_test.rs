//! End-to-end flow against a classic column/card board.
//!
//! The classic model groups cards into per-repository columns, so the first
//! issue from a repository also creates that repository's column.

mod common;

use common::{mock_auth, mock_repos, widget_issue_body, widget_repo_body, TestEnv};
use mockito::Matcher;
use predicates::prelude::*;

#[test]
fn test_classic_board_creates_column_and_card() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();

    let _auth = mock_auth(&mut server);
    let _projects = server
        .mock("GET", "/orgs/acme/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 900, "number": 1, "name": "Tracker"}]"#)
        .create();
    let _repos = mock_repos(&mut server, widget_repo_body());
    let _issues = server
        .mock("GET", "/repos/acme/widget/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(widget_issue_body(&server.url()))
        .create();
    // No columns yet: the membership scan sees an empty board and the add
    // path creates the repository's column first.
    let _columns = server
        .mock("GET", "/projects/900/columns")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();
    let create_column = server
        .mock("POST", "/projects/900/columns")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 77, "name": "widget"}"#)
        .expect(1)
        .create();
    let create_card = server
        .mock("POST", "/projects/columns/77/cards")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 5001}"#)
        .expect(1)
        .create();

    env.sync_cmd(&server.url())
        .args(["--project-model", "classic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"issues_added\":1"))
        .stderr(predicate::str::contains("creating project column"));

    create_column.assert();
    create_card.assert();
}

#[test]
fn test_classic_board_skips_card_already_on_board() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();

    let _auth = mock_auth(&mut server);
    let _projects = server
        .mock("GET", "/orgs/acme/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 900, "number": 1, "name": "Tracker"}]"#)
        .create();
    let _repos = mock_repos(&mut server, widget_repo_body());
    let _issues = server
        .mock("GET", "/repos/acme/widget/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(widget_issue_body(&server.url()))
        .create();
    let _columns = server
        .mock("GET", "/projects/900/columns")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 77, "name": "widget"}]"#)
        .create();
    let _cards = server
        .mock("GET", "/projects/columns/77/cards")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"[{{"id": 5001, "content_url": "{}/repos/acme/widget/issues/7"}}]"#,
            server.url()
        ))
        .create();
    let create_card = server
        .mock("POST", "/projects/columns/77/cards")
        .expect(0)
        .create();

    env.sync_cmd(&server.url())
        .args(["--project-model", "classic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"issues_already_tracked\":1"))
        .stdout(predicate::str::contains("\"issues_added\":0"));

    create_card.assert();
}

#[test]
fn test_classic_project_number_not_found_is_setup_fatal() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();

    let _auth = mock_auth(&mut server);
    let _projects = server
        .mock("GET", "/orgs/acme/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 900, "number": 4, "name": "Other"}]"#)
        .create();

    env.sync_cmd(&server.url())
        .args(["--project-model", "classic"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}
