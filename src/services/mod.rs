//! Aggregation and mutation services.
//!
//! `report` walks the project hierarchy into deduplicated, ordered report
//! rows; `update` applies CSV-driven edits back to the server.

mod report;
mod update;

pub use report::{collect_build_rows, collect_project_rows};
pub use update::{
    AssignOutcome, ImportTally, UpdateOutcome, apply_build_assignments, apply_project_updates,
    assign_vcs_root_to_build, update_vcs_root_properties,
};
