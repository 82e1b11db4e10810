//! Jira Cloud integration -- projects, issue search, changelogs and user
//! lookup through the REST API v3.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::activity::{Changelog, ReportingWindow, StatusChangeEvent};
use crate::error::FetchError;
use crate::integrations::traits::{ChangelogProvider, EmailDirectory, Integration};

const SERVICE: &str = "jira";

/// Search pages are requested in chunks of at most this many issues.
const PAGE_SIZE: u32 = 100;

/// Everything needed to talk to one Jira site.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub story_points_field: String,
    pub max_results: u32,
    pub timeout_secs: u64,
}

/// A Jira user as it appears on issues and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub display_name: String,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author: Person,
}

/// The subset of an issue the activity report needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<Person>,
    pub story_points: f64,
    pub updated: String,
    pub comments: Vec<Comment>,
}

impl Person {
    fn from_json(value: &Value) -> Option<Self> {
        let display_name = value["displayName"].as_str()?.to_string();
        let account_id = value["accountId"].as_str().map(str::to_string);
        Some(Self {
            display_name,
            account_id,
        })
    }
}

impl Issue {
    /// Build from one element of a search response's `issues` array.
    pub fn from_json(value: &Value, story_points_field: &str) -> Self {
        let fields = &value["fields"];

        let key = value["key"].as_str().unwrap_or("UNKNOWN").to_string();

        let summary = fields["summary"]
            .as_str()
            .unwrap_or("(No summary)")
            .to_string();

        let status = fields["status"]["name"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string();

        let story_points = fields[story_points_field].as_f64().unwrap_or(0.0);

        let updated = fields["updated"].as_str().unwrap_or("").to_string();

        Self {
            key,
            summary,
            status,
            assignee: Person::from_json(&fields["assignee"]),
            story_points,
            updated,
            comments: parse_comments(&fields["comment"]["comments"]),
        }
    }
}

fn parse_comments(value: &Value) -> Vec<Comment> {
    value
        .as_array()
        .map(|comments| {
            comments
                .iter()
                .filter_map(|c| Person::from_json(&c["author"]))
                .map(|author| Comment { author })
                .collect()
        })
        .unwrap_or_default()
}

/// Quote a value for use inside a JQL string literal.
fn jql_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// JQL selecting a project's issues updated inside the window, newest first.
pub fn project_window_jql(project_key: &str, window: &ReportingWindow) -> String {
    format!(
        "project = {project_key} AND updated >= {} AND updated <= {} ORDER BY updated DESC",
        jql_date(window.start()),
        jql_date(window.end()),
    )
}

fn jql_date(date: NaiveDate) -> String {
    jql_quote(&date.format("%Y-%m-%d").to_string())
}

pub struct JiraClient {
    config: JiraConfig,
    base_url: String,
    http: Client,
}

impl JiraClient {
    /// Build a client; the base URL must be an absolute http(s) URL.
    pub fn new(config: JiraConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        for (what, value) in [
            ("base_url", base_url.as_str()),
            ("email", config.email.as_str()),
            ("api_token", config.api_token.as_str()),
        ] {
            if value.is_empty() {
                return Err(FetchError::NotConfigured {
                    service: SERVICE.into(),
                    what: what.into(),
                });
            }
        }

        match url::Url::parse(&base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(FetchError::NotConfigured {
                    service: SERVICE.into(),
                    what: format!("a valid base_url (got '{base_url}')"),
                })
            }
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::transport(SERVICE, e))?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "jira request");

        let mut request = self
            .http
            .get(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        let resp = request
            .send()
            .map_err(|e| FetchError::transport(SERVICE, e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized {
                service: SERVICE.into(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                service: SERVICE.into(),
                status: status.as_u16(),
                url,
            });
        }

        resp.json::<Value>()
            .map_err(|e| FetchError::decode(SERVICE, e.to_string()))
    }

    /// Projects whose key starts with `prefix`, keyed by project key.
    pub fn list_projects(&self, prefix: &str) -> Result<BTreeMap<String, String>, FetchError> {
        let data = self.get_json("/rest/api/3/project", &[])?;
        let projects = data
            .as_array()
            .ok_or_else(|| FetchError::decode(SERVICE, "project list is not an array"))?;

        Ok(projects
            .iter()
            .filter_map(|p| {
                let key = p["key"].as_str()?;
                let name = p["name"].as_str().unwrap_or(key);
                Some((key.to_string(), name.to_string()))
            })
            .filter(|(key, _)| key.starts_with(prefix))
            .collect())
    }

    /// Run a JQL search, paging until `limit` issues or the result set is
    /// exhausted.
    pub fn search_issues(&self, jql: &str, limit: u32) -> Result<Vec<Issue>, FetchError> {
        let fields = format!(
            "summary,status,assignee,comment,updated,{}",
            self.config.story_points_field
        );

        let mut issues = Vec::new();
        while (issues.len() as u32) < limit {
            let page_size = PAGE_SIZE.min(limit - issues.len() as u32);
            let data = self.get_json(
                "/rest/api/3/search",
                &[
                    ("jql", jql.to_string()),
                    ("startAt", issues.len().to_string()),
                    ("maxResults", page_size.to_string()),
                    ("fields", fields.clone()),
                ],
            )?;

            let page = data["issues"]
                .as_array()
                .ok_or_else(|| FetchError::decode(SERVICE, "search response has no issues"))?;
            if page.is_empty() {
                break;
            }
            issues.extend(
                page.iter()
                    .map(|v| Issue::from_json(v, &self.config.story_points_field)),
            );

            let total = data["total"].as_u64().unwrap_or(0);
            if issues.len() as u64 >= total {
                break;
            }
        }
        issues.truncate(limit as usize);
        Ok(issues)
    }

    /// Issues of one project updated inside the window.
    pub fn fetch_project_issues(
        &self,
        project_key: &str,
        window: &ReportingWindow,
    ) -> Result<Vec<Issue>, FetchError> {
        self.search_issues(
            &project_window_jql(project_key, window),
            self.config.max_results,
        )
    }

    /// Issues of every listed project. A project whose search fails is
    /// skipped and reported in the returned warnings.
    pub fn fetch_all_issues(
        &self,
        project_keys: &[String],
        window: &ReportingWindow,
    ) -> (Vec<Issue>, Vec<String>) {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();
        for key in project_keys {
            match self.fetch_project_issues(key, window) {
                Ok(found) => issues.extend(found),
                Err(e) => {
                    tracing::warn!(project = %key, "failed to fetch tickets: {e}");
                    warnings.push(format!("Failed to fetch tickets for project {key}: {e}"));
                }
            }
        }
        (issues, warnings)
    }

    /// Raw changelog of one issue.
    pub fn issue_changelog(&self, key: &str) -> Result<Changelog, FetchError> {
        let path = format!("/rest/api/3/issue/{}", urlencoding::encode(key));
        let data = self.get_json(&path, &[("expand", "changelog".to_string())])?;
        serde_json::from_value(data["changelog"].clone())
            .map_err(|e| FetchError::decode(SERVICE, format!("changelog of {key}: {e}")))
    }

    /// All comments on one issue.
    pub fn issue_comments(&self, key: &str) -> Result<Vec<Comment>, FetchError> {
        let path = format!("/rest/api/3/issue/{}/comment", urlencoding::encode(key));
        let data = self.get_json(&path, &[])?;
        Ok(parse_comments(&data["comments"]))
    }

    /// Email of an account; `None` when the profile hides it.
    pub fn user_email(&self, account_id: &str) -> Result<Option<String>, FetchError> {
        let data = self.get_json("/rest/api/3/user", &[("accountId", account_id.to_string())])?;
        Ok(data["emailAddress"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }
}

impl Integration for JiraClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn display_name(&self) -> &str {
        "Jira"
    }

    fn verify(&self) -> Result<(), FetchError> {
        self.get_json("/rest/api/3/myself", &[]).map(|_| ())
    }
}

impl ChangelogProvider for JiraClient {
    fn fetch_changelog(&self, item_key: &str) -> Result<Vec<StatusChangeEvent>, FetchError> {
        Ok(self.issue_changelog(item_key)?.status_events())
    }
}

impl EmailDirectory for JiraClient {
    fn lookup_email(&self, display_name: &str) -> Result<Option<String>, FetchError> {
        // User search by name is blocked under GDPR strict mode, so go
        // through an issue the person is assigned to.
        let jql = format!("assignee = {} ORDER BY updated DESC", jql_quote(display_name));
        if let Some(issue) = self.search_issues(&jql, 1)?.into_iter().next() {
            if let Some(account_id) = issue.assignee.and_then(|a| a.account_id) {
                return self.user_email(&account_id);
            }
        }

        // Fall back to an issue they commented on.
        let jql = format!("comment ~ {} ORDER BY updated DESC", jql_quote(display_name));
        if let Some(issue) = self.search_issues(&jql, 1)?.into_iter().next() {
            let author = self
                .issue_comments(&issue.key)?
                .into_iter()
                .map(|c| c.author)
                .find(|a| a.display_name == display_name);
            if let Some(account_id) = author.and_then(|a| a.account_id) {
                return self.user_email(&account_id);
            }
        }

        Ok(None)
    }
}
