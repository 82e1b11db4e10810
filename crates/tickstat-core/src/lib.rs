//! # tickstat Core Library
//!
//! Business logic behind the `tickstat` CLI: measuring how long tickets sit
//! in a workflow status and folding that into per-person activity reports.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Activity**: changelog flattening and the pure in-status day counter
//! - **Report**: ticket rows, totals and per-person summaries
//! - **Integrations**: blocking HTTP clients for Jira and Databricks, exposed
//!   to the report through small collaborator traits
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`IntervalAccumulator`]: days spent in one status within a window
//! - [`ActivityReport`]: the aggregated report
//! - [`JiraClient`]: changelog, search and user lookups
//! - [`Config`]: application configuration management

pub mod activity;
pub mod error;
pub mod integrations;
pub mod report;
pub mod storage;

pub use activity::{
    compute, Clock, DurationDays, FixedClock, IntervalAccumulator, ReportingWindow,
    StatusChangeEvent, SystemClock,
};
pub use error::{ConfigError, CoreError, FetchError, ParseError, ValidationError};
pub use integrations::{
    ChangelogProvider, DatabricksClient, DatabricksConfig, EmailDirectory, Integration, Issue,
    JiraClient, JiraConfig,
};
pub use report::{ActivityReport, PersonSummary, ReportContext, TicketRow, TicketTotals};
pub use storage::Config;
