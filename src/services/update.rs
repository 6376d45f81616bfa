//! CSV-driven mutations: VCS root property updates and attachments.
//!
//! The bulk appliers process every row regardless of individual failures;
//! per-row progress goes to the log and the caller gets a tally.

use crate::client::TeamCityApi;
use crate::io::{COL_BUILD_ID, COL_DEFAULT_BRANCH, COL_FETCH_URL, COL_VCS_ROOT_ID, CsvRow, field};
use crate::models::{PROP_DEFAULT_BRANCH, PROP_FETCH_URL};
use crate::{Error, Result};

/// Outcome of a property update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Properties were written back to the server.
    Updated,
    /// Both new values were unset; nothing was written.
    NothingToDo,
}

/// Outcome of an attachment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    /// A new VCS root entry was created.
    Attached,
    /// The root was already attached; no write was issued.
    AlreadyAttached,
}

/// Success/failure counts of a bulk import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportTally {
    /// Rows applied successfully (including idempotent no-ops).
    pub succeeded: usize,
    /// Rows that failed and were skipped.
    pub failed: usize,
}

impl ImportTally {
    /// Returns true if no row failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Patches the `url` and/or `branch` properties of a VCS root.
///
/// With both values unset this is a successful no-op. Otherwise the
/// current property list is fetched, the two well-known keys are updated
/// in place or appended, and the full list is PUT back. Other properties
/// are never removed.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the VCS root does not exist, or
/// [`Error::OperationFailed`] on transport failures.
pub fn update_vcs_root_properties(
    api: &dyn TeamCityApi,
    vcs_root_id: &str,
    fetch_url: Option<&str>,
    default_branch: Option<&str>,
) -> Result<UpdateOutcome> {
    if fetch_url.is_none() && default_branch.is_none() {
        tracing::debug!(vcs_root = %vcs_root_id, "No property values given; nothing to update");
        return Ok(UpdateOutcome::NothingToDo);
    }

    let root = api
        .vcs_root(vcs_root_id)?
        .ok_or_else(|| Error::NotFound(format!("VCS root '{vcs_root_id}'")))?;

    let mut properties = root.properties;
    if let Some(url) = fetch_url {
        properties.set(PROP_FETCH_URL, url);
    }
    if let Some(branch) = default_branch {
        properties.set(PROP_DEFAULT_BRANCH, branch);
    }

    api.set_vcs_root_properties(vcs_root_id, &properties)?;
    tracing::info!(vcs_root = %vcs_root_id, "Updated VCS root properties");
    Ok(UpdateOutcome::Updated)
}

/// Attaches a VCS root to a build configuration, idempotently.
///
/// Both sides are verified to exist first. An existing attachment to the
/// same root is a success without a write. Other roots already attached
/// to the build are left alone; a build may end up with several.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the build configuration or the VCS root
/// does not exist, or [`Error::OperationFailed`] on transport failures.
pub fn assign_vcs_root_to_build(
    api: &dyn TeamCityApi,
    build_type_id: &str,
    vcs_root_id: &str,
) -> Result<AssignOutcome> {
    api.build_type(build_type_id)?
        .ok_or_else(|| Error::NotFound(format!("build configuration '{build_type_id}'")))?;
    api.vcs_root(vcs_root_id)?
        .ok_or_else(|| Error::NotFound(format!("VCS root '{vcs_root_id}'")))?;

    let entries = api.vcs_root_entries(build_type_id)?;
    if entries
        .iter()
        .any(|entry| entry.vcs_root_id() == Some(vcs_root_id))
    {
        tracing::info!(
            build_type = %build_type_id,
            vcs_root = %vcs_root_id,
            "VCS root already attached"
        );
        return Ok(AssignOutcome::AlreadyAttached);
    }

    api.attach_vcs_root(build_type_id, vcs_root_id)?;
    tracing::info!(
        build_type = %build_type_id,
        vcs_root = %vcs_root_id,
        "Attached VCS root"
    );
    Ok(AssignOutcome::Attached)
}

/// Applies VCS root property updates from validated project-update rows.
pub fn apply_project_updates(api: &dyn TeamCityApi, rows: &[CsvRow]) -> ImportTally {
    let mut tally = ImportTally::default();

    for row in rows {
        // The reader guarantees identifiers are present in validated rows
        let Some(vcs_root_id) = field(row, COL_VCS_ROOT_ID) else {
            tracing::warn!("Skipping row without a VCS root id");
            continue;
        };
        let fetch_url = field(row, COL_FETCH_URL);
        let default_branch = field(row, COL_DEFAULT_BRANCH);

        match update_vcs_root_properties(api, vcs_root_id, fetch_url, default_branch) {
            Ok(outcome) => {
                tracing::info!(vcs_root = %vcs_root_id, outcome = ?outcome, "Row applied");
                tally.succeeded += 1;
            },
            Err(e) => {
                tracing::error!(vcs_root = %vcs_root_id, error = %e, "Row failed");
                tally.failed += 1;
            },
        }
    }

    tally
}

/// Applies VCS root attachments from validated build-assign rows.
pub fn apply_build_assignments(api: &dyn TeamCityApi, rows: &[CsvRow]) -> ImportTally {
    let mut tally = ImportTally::default();

    for row in rows {
        let (Some(build_type_id), Some(vcs_root_id)) =
            (field(row, COL_BUILD_ID), field(row, COL_VCS_ROOT_ID))
        else {
            tracing::warn!("Skipping row without build and VCS root ids");
            continue;
        };

        match assign_vcs_root_to_build(api, build_type_id, vcs_root_id) {
            Ok(outcome) => {
                tracing::info!(
                    build_type = %build_type_id,
                    vcs_root = %vcs_root_id,
                    outcome = ?outcome,
                    "Row applied"
                );
                tally.succeeded += 1;
            },
            Err(e) => {
                tracing::error!(
                    build_type = %build_type_id,
                    vcs_root = %vcs_root_id,
                    error = %e,
                    "Row failed"
                );
                tally.failed += 1;
            },
        }
    }

    tally
}
