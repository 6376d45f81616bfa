//! Update commands: apply CSV edits back to the server.

use crate::client::TeamCityApi;
use crate::io::{BUILD_ASSIGN_SCHEMA, PROJECT_UPDATE_SCHEMA, read_rows_from_path};
use crate::services::{ImportTally, apply_build_assignments, apply_project_updates};
use crate::Result;
use std::path::Path;

/// Patches VCS root properties from a projects-mode CSV.
///
/// # Errors
///
/// Returns an error if the CSV cannot be opened or its header lacks
/// required columns. Per-row failures are counted in the tally instead.
pub fn cmd_update_projects(api: &dyn TeamCityApi, input: &Path) -> Result<ImportTally> {
    let rows = read_rows_from_path(input, &PROJECT_UPDATE_SCHEMA)?;
    tracing::info!(rows = rows.len(), input = %input.display(), "Applying VCS root updates");
    Ok(apply_project_updates(api, &rows))
}

/// Attaches VCS roots to build configurations from a builds-mode CSV.
///
/// # Errors
///
/// Returns an error if the CSV cannot be opened or its header lacks
/// required columns. Per-row failures are counted in the tally instead.
pub fn cmd_update_builds(api: &dyn TeamCityApi, input: &Path) -> Result<ImportTally> {
    let rows = read_rows_from_path(input, &BUILD_ASSIGN_SCHEMA)?;
    tracing::info!(rows = rows.len(), input = %input.display(), "Applying VCS root assignments");
    Ok(apply_build_assignments(api, &rows))
}
