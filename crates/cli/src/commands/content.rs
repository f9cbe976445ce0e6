//! Marketing content checks.

use std::path::Path;

use aurelle_storefront::content::ContentStore;

use super::{CliError, out};

/// Check every page and report problems.
pub fn check(dir: &Path) -> Result<(), CliError> {
    tracing::info!("Checking content in {}", dir.display());

    let issues = ContentStore::check(dir)?;
    if issues.is_empty() {
        let store = ContentStore::load(dir)?;
        out(format!("{} page(s) OK", store.len()));
        return Ok(());
    }

    for issue in &issues {
        out(issue);
    }
    Err(CliError::ContentIssues(issues.len()))
}
