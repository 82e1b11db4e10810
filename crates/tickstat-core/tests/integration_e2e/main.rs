//! E2E tests for the remote collaborators.
//!
//! Tests run the real blocking clients against mockito servers, so no
//! credentials or network access are needed.
//!
//! Test matrix coverage:
//! | Service    | verify      | listing           | per-item fetch  | failure isolation |
//! |------------|-------------|-------------------|-----------------|-------------------|
//! | Jira       | /myself     | projects, search  | changelog, user | project, issue    |
//! | Databricks | catalogs    | paged catalogs    | -               | -                 |

mod databricks_e2e;
mod jira_e2e;

pub mod test_helpers {
    use tickstat_core::JiraConfig;

    pub fn jira_config(base_url: &str) -> JiraConfig {
        JiraConfig {
            base_url: base_url.to_string(),
            email: "ada@example.com".into(),
            api_token: "api-token".into(),
            story_points_field: "customfield_10016".into(),
            max_results: 1000,
            timeout_secs: 5,
        }
    }
}
