//! Report aggregation over the project hierarchy.
//!
//! Both collectors accumulate into a `BTreeSet`, which gives set semantics
//! (rows identical in every field collapse to one) and the lexicographic
//! field-by-field output ordering in a single container. Lookup failures
//! are downgraded to warnings; the failing unit is skipped and the walk
//! continues with partial results.

use crate::client::TeamCityApi;
use crate::models::{BuildRow, ProjectRow};
use std::collections::BTreeSet;

/// Collects one row per (build configuration, attached VCS root).
///
/// A build configuration with no VCS root entries contributes exactly one
/// sentinel row ("No VCS Root" / "None"). Entries whose root cannot be
/// resolved contribute nothing.
pub fn collect_build_rows(api: &dyn TeamCityApi) -> BTreeSet<BuildRow> {
    let mut rows = BTreeSet::new();

    let projects = match api.projects() {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch project list");
            return rows;
        },
    };

    for project in projects {
        let build_types = match api.build_types(&project.id) {
            Ok(build_types) => build_types,
            Err(e) => {
                tracing::warn!(project = %project.name, error = %e, "Skipping project");
                continue;
            },
        };

        for build_type in build_types {
            let entries = match api.vcs_root_entries(&build_type.id) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        build_type = %build_type.id,
                        error = %e,
                        "Skipping build configuration"
                    );
                    continue;
                },
            };

            if entries.is_empty() {
                rows.insert(BuildRow::no_vcs_root(&build_type.id, &build_type.name));
                continue;
            }

            for entry in entries {
                let Some(vcs_root_id) = entry.vcs_root_id() else {
                    continue;
                };
                match api.vcs_root(vcs_root_id) {
                    Ok(Some(root)) => {
                        rows.insert(BuildRow {
                            build_id: build_type.id.clone(),
                            build_name: build_type.name.clone(),
                            vcs_root_name: root.name,
                            vcs_root_id: root.id,
                        });
                    },
                    Ok(None) => {
                        tracing::warn!(vcs_root = %vcs_root_id, "VCS root not found");
                    },
                    Err(e) => {
                        tracing::warn!(vcs_root = %vcs_root_id, error = %e, "Skipping VCS root");
                    },
                }
            }
        }
    }

    rows
}

/// Collects one row per (project, attached VCS root), with URL and branch.
///
/// The "has VCS roots" flag is project-wide: the first resolved entry in
/// any build configuration sets it, and sibling build configurations
/// without entries then contribute no sentinel of their own. A project
/// where nothing resolves contributes exactly one sentinel row. This
/// intentionally differs from the per-build sentinel rule of
/// [`collect_build_rows`].
pub fn collect_project_rows(api: &dyn TeamCityApi) -> BTreeSet<ProjectRow> {
    let mut rows = BTreeSet::new();

    let projects = match api.projects() {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch project list");
            return rows;
        },
    };

    for project in projects {
        let build_types = match api.build_types(&project.id) {
            Ok(build_types) => build_types,
            Err(e) => {
                tracing::warn!(project = %project.name, error = %e, "Skipping project");
                continue;
            },
        };

        let mut has_vcs_roots = false;

        for build_type in build_types {
            let entries = match api.vcs_root_entries(&build_type.id) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        build_type = %build_type.id,
                        error = %e,
                        "Skipping build configuration"
                    );
                    continue;
                },
            };

            for entry in entries {
                let Some(vcs_root_id) = entry.vcs_root_id() else {
                    continue;
                };
                match api.vcs_root(vcs_root_id) {
                    Ok(Some(root)) => {
                        rows.insert(ProjectRow::resolved(&project.id, &project.name, &root));
                        has_vcs_roots = true;
                    },
                    Ok(None) => {
                        tracing::warn!(vcs_root = %vcs_root_id, "VCS root not found");
                    },
                    Err(e) => {
                        tracing::warn!(vcs_root = %vcs_root_id, error = %e, "Skipping VCS root");
                    },
                }
            }
        }

        if !has_vcs_roots {
            rows.insert(ProjectRow::no_vcs_root(&project.id, &project.name));
        }
    }

    rows
}
