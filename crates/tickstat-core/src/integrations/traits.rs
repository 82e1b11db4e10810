use crate::activity::StatusChangeEvent;
use crate::error::FetchError;

/// Every remote service the tool talks to implements this trait.
/// Clients are built from an explicit config and refuse to construct without
/// complete credentials; nothing is read from the environment here.
pub trait Integration {
    /// Unique identifier (e.g. "jira", "databricks").
    fn name(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    /// Make one cheap authenticated call to prove the credentials work.
    fn verify(&self) -> Result<(), FetchError>;
}

/// Supplies the status history of a single work item.
pub trait ChangelogProvider {
    /// Status-field events for `item_key`, oldest first.
    fn fetch_changelog(&self, item_key: &str) -> Result<Vec<StatusChangeEvent>, FetchError>;
}

/// Resolves a person's display name to an email address.
pub trait EmailDirectory {
    /// `Ok(None)` when the person cannot be found or hides their address.
    fn lookup_email(&self, display_name: &str) -> Result<Option<String>, FetchError>;
}
