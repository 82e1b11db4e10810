//! E2E tests for the Databricks catalog check.

use std::time::Duration;

use mockito::Matcher;
use tickstat_core::{DatabricksClient, DatabricksConfig, FetchError, Integration};

fn client(host: &str) -> DatabricksClient {
    DatabricksClient::new(
        DatabricksConfig {
            host: host.to_string(),
            token: "dapi-test".into(),
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Test: catalogs are collected across pages with a bearer token.
#[test]
fn test_databricks_list_catalogs_pages() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .match_header("authorization", "Bearer dapi-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"catalogs":[{"name":"main"},{"name":"samples"}],"next_page_token":"p2"}"#)
        .create();
    let second = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .match_query(Matcher::UrlEncoded("page_token".into(), "p2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"catalogs":[{"name":"system"}]}"#)
        .create();

    let catalogs = client(&server.url()).list_catalogs().unwrap();

    first.assert();
    second.assert();
    assert_eq!(catalogs, ["main", "samples", "system"]);
}

/// Test: a repeated page token ends pagination instead of looping.
#[test]
fn test_databricks_repeated_page_token_stops() {
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"catalogs":[{"name":"main"}],"next_page_token":"stuck"}"#)
        .expect(1)
        .create();
    let again = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .match_query(Matcher::UrlEncoded("page_token".into(), "stuck".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"catalogs":[{"name":"samples"}],"next_page_token":"stuck"}"#)
        .expect(1)
        .create();

    let catalogs = client(&server.url()).list_catalogs().unwrap();

    first.assert();
    again.assert();
    assert_eq!(catalogs, ["main", "samples"]);
}

/// Test: a workspace with no catalogs is still a successful connection.
#[test]
fn test_databricks_empty_workspace() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();

    let client = client(&server.url());
    assert!(client.list_catalogs().unwrap().is_empty());
    assert!(client.verify().is_ok());
}

/// Test: rejected token surfaces as Unauthorized.
#[test]
fn test_databricks_rejected_token() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/2.1/unity-catalog/catalogs")
        .with_status(403)
        .with_body(r#"{"error_code":"PERMISSION_DENIED"}"#)
        .create();

    assert!(matches!(
        client(&server.url()).verify(),
        Err(FetchError::Unauthorized { .. })
    ));
}
