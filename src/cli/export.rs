//! Export commands: sorted CSV reports on stdout.

use crate::client::TeamCityApi;
use crate::io::{write_build_report, write_project_report};
use crate::services::{collect_build_rows, collect_project_rows};
use crate::Result;

/// Exports one row per build configuration and attached VCS root.
///
/// # Errors
///
/// Returns an error only if writing the CSV fails; lookup failures are
/// logged and produce partial results.
pub fn cmd_list_builds(api: &dyn TeamCityApi) -> Result<()> {
    let rows = collect_build_rows(api);
    tracing::info!(rows = rows.len(), "Writing builds report");
    write_build_report(std::io::stdout().lock(), &rows)
}

/// Exports one row per project and attached VCS root.
///
/// # Errors
///
/// Returns an error only if writing the CSV fails; lookup failures are
/// logged and produce partial results.
pub fn cmd_list_projects(api: &dyn TeamCityApi) -> Result<()> {
    let rows = collect_project_rows(api);
    tracing::info!(rows = rows.len(), "Writing projects report");
    write_project_report(std::io::stdout().lock(), &rows)
}
