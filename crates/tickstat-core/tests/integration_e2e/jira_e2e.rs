//! E2E tests for the Jira client and the report built on top of it.

use super::test_helpers::jira_config;
use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use tickstat_core::integrations::jira::project_window_jql;
use tickstat_core::{
    ActivityReport, ChangelogProvider, EmailDirectory, FetchError, FixedClock, Integration,
    IntervalAccumulator, JiraClient, ReportContext, ReportingWindow,
};

fn march() -> ReportingWindow {
    ReportingWindow::new(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    )
    .unwrap()
}

fn issue_json(key: &str, assignee: Option<(&str, &str)>, points: f64) -> serde_json::Value {
    json!({
        "key": key,
        "fields": {
            "summary": format!("Work on {key}"),
            "status": { "name": "Done" },
            "assignee": assignee.map(|(name, id)| json!({ "displayName": name, "accountId": id })),
            "customfield_10016": points,
            "updated": "2025-03-20T10:00:00.000+0000",
            "comment": { "comments": [] }
        }
    })
}

/// Test: verify succeeds on 200 and sends basic auth.
#[test]
fn test_jira_verify_ok() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/rest/api/3/myself")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accountId":"acc-1","displayName":"Ada"}"#)
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    assert!(client.verify().is_ok());
    mock.assert();
}

/// Test: 401 maps to Unauthorized, other failures to Http.
#[test]
fn test_jira_verify_failures() {
    let mut server = mockito::Server::new();
    let _unauthorized = server
        .mock("GET", "/rest/api/3/myself")
        .with_status(401)
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    assert!(matches!(
        client.verify(),
        Err(FetchError::Unauthorized { .. })
    ));

    let _unavailable = server
        .mock("GET", "/rest/api/3/project")
        .with_status(503)
        .create();
    assert!(matches!(
        client.list_projects("ASA"),
        Err(FetchError::Http { status: 503, .. })
    ));
}

/// Test: unreachable host is a transport error, not a panic.
#[test]
fn test_jira_unreachable_host() {
    let client = JiraClient::new(jira_config("http://127.0.0.1:9")).unwrap();
    assert!(matches!(
        client.verify(),
        Err(FetchError::Transport { .. })
    ));
}

/// Test: project listing keeps only keys with the configured prefix.
#[test]
fn test_jira_list_projects_filters_prefix() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/rest/api/3/project")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "key": "ASA", "name": "Analytics" },
                { "key": "OPS", "name": "Operations" },
                { "key": "ASAPP", "name": "Analytics App" }
            ])
            .to_string(),
        )
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    let projects = client.list_projects("ASA").unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects["ASA"], "Analytics");
    assert_eq!(projects["ASAPP"], "Analytics App");
}

/// Test: changelog provider yields ordered status events only.
#[test]
fn test_jira_fetch_changelog() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/rest/api/3/issue/ASA-1")
        .match_query(Matcher::UrlEncoded("expand".into(), "changelog".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "key": "ASA-1",
                "changelog": { "histories": [
                    { "created": "2025-03-05T09:00:00.000+0000",
                      "items": [{ "field": "status", "toString": "In Progress" }] },
                    { "created": "2025-03-07T09:00:00.000+0000",
                      "items": [{ "field": "priority", "toString": "High" }] },
                    { "created": "2025-03-10T09:00:00.000+0000",
                      "items": [{ "field": "status", "toString": "Done" }] }
                ]}
            })
            .to_string(),
        )
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    let events = client.fetch_changelog("ASA-1").unwrap();
    mock.assert();

    let statuses: Vec<&str> = events.iter().map(|e| e.to_value.as_str()).collect();
    assert_eq!(statuses, ["In Progress", "Done"]);

    let now = NaiveDate::from_ymd_opt(2025, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(
        IntervalAccumulator::new("In Progress").compute(&events, &march(), now),
        6
    );
}

/// Test: search pages through results using startAt.
#[test]
fn test_jira_search_pages() {
    let mut server = mockito::Server::new();
    let first: Vec<_> = (0..100)
        .map(|i| issue_json(&format!("ASA-{i}"), None, 1.0))
        .collect();
    let second: Vec<_> = (100..150)
        .map(|i| issue_json(&format!("ASA-{i}"), None, 1.0))
        .collect();

    let page_one = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startAt".into(), "0".into()),
            Matcher::UrlEncoded("maxResults".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "total": 150, "issues": first }).to_string())
        .create();
    let page_two = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded("startAt".into(), "100".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "total": 150, "issues": second }).to_string())
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    let issues = client.fetch_project_issues("ASA", &march()).unwrap();

    page_one.assert();
    page_two.assert();
    assert_eq!(issues.len(), 150);
    assert_eq!(issues[149].key, "ASA-149");
}

/// Test: email lookup goes through an assigned issue, then the user API.
#[test]
fn test_jira_lookup_email_via_assignee() {
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded(
            "jql".into(),
            r#"assignee = "Ada" ORDER BY updated DESC"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "total": 1, "issues": [issue_json("ASA-1", Some(("Ada", "acc-ada")), 0.0)] })
                .to_string(),
        )
        .create();
    let user = server
        .mock("GET", "/rest/api/3/user")
        .match_query(Matcher::UrlEncoded("accountId".into(), "acc-ada".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accountId":"acc-ada","emailAddress":"ada@example.com"}"#)
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    assert_eq!(
        client.lookup_email("Ada").unwrap().as_deref(),
        Some("ada@example.com")
    );
    user.assert();
}

/// Test: email lookup falls back to comment authors.
#[test]
fn test_jira_lookup_email_via_comment() {
    let mut server = mockito::Server::new();
    let _assigned = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded(
            "jql".into(),
            r#"assignee = "Grace" ORDER BY updated DESC"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total":0,"issues":[]}"#)
        .create();
    let _commented = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded(
            "jql".into(),
            r#"comment ~ "Grace" ORDER BY updated DESC"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "total": 1, "issues": [issue_json("ASA-9", None, 0.0)] }).to_string())
        .create();
    let _comments = server
        .mock("GET", "/rest/api/3/issue/ASA-9/comment")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "comments": [
                { "author": { "displayName": "Linus", "accountId": "acc-linus" } },
                { "author": { "displayName": "Grace", "accountId": "acc-grace" } }
            ]})
            .to_string(),
        )
        .create();
    let _user = server
        .mock("GET", "/rest/api/3/user")
        .match_query(Matcher::UrlEncoded("accountId".into(), "acc-grace".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accountId":"acc-grace","emailAddress":"grace@example.com"}"#)
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    assert_eq!(
        client.lookup_email("Grace").unwrap().as_deref(),
        Some("grace@example.com")
    );
}

/// Test: a full report survives a failing project and a failing changelog.
#[test]
fn test_jira_report_isolates_failures() {
    let mut server = mockito::Server::new();
    let window = march();

    let _projects = server
        .mock("GET", "/rest/api/3/project")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{ "key": "ASA", "name": "Analytics" }, { "key": "ASAPP", "name": "App" }])
                .to_string(),
        )
        .create();
    let _search_ok = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded(
            "jql".into(),
            project_window_jql("ASA", &window),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "total": 2, "issues": [
                issue_json("ASA-1", Some(("Ada", "acc-ada")), 3.0),
                issue_json("ASA-2", Some(("Ada", "acc-ada")), 5.0)
            ]})
            .to_string(),
        )
        .create();
    let _search_broken = server
        .mock("GET", "/rest/api/3/search")
        .match_query(Matcher::UrlEncoded(
            "jql".into(),
            project_window_jql("ASAPP", &window),
        ))
        .with_status(500)
        .create();
    let _changelog_ok = server
        .mock("GET", "/rest/api/3/issue/ASA-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "changelog": { "histories": [
                { "created": "2025-03-05T09:00:00.000+0000",
                  "items": [{ "field": "status", "toString": "In Progress" }] },
                { "created": "2025-03-10T18:00:00.000+0000",
                  "items": [{ "field": "status", "toString": "Done" }] }
            ]}})
            .to_string(),
        )
        .create();
    let _changelog_broken = server
        .mock("GET", "/rest/api/3/issue/ASA-2")
        .match_query(Matcher::Any)
        .with_status(404)
        .create();

    let client = JiraClient::new(jira_config(&server.url())).unwrap();
    let keys: Vec<String> = client.list_projects("ASA").unwrap().into_keys().collect();
    let (issues, warnings) = client.fetch_all_issues(&keys, &window);
    assert_eq!(issues.len(), 2);
    assert_eq!(warnings.len(), 1);

    let clock = FixedClock(
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    );
    let ctx = ReportContext {
        window,
        accumulator: IntervalAccumulator::new("In Progress"),
        changelogs: &client,
        emails: None,
        clock: &clock,
        base_url: client.base_url(),
    };
    let report = ActivityReport::build(&ctx, &issues, warnings);

    assert_eq!(report.tickets[0].days_in_progress, 6);
    assert_eq!(report.tickets[1].days_in_progress, 0);
    assert_eq!(report.totals.total_story_points, 8.0);
    assert_eq!(report.people.len(), 1);
    assert_eq!(report.people[0].days_in_progress, 6);
    assert_eq!(report.people[0].email, None);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().any(|w| w.contains("ASAPP")));
    assert!(report.warnings.iter().any(|w| w.contains("ASA-2")));
}
