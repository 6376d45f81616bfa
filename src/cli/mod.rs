//! CLI command implementations.
//!
//! One handler per mode, called by the binary:
//!
//! | Mode | Handler | Description |
//! |------|---------|-------------|
//! | `--builds` | [`cmd_list_builds`] | Export builds → VCS roots CSV (default) |
//! | `--projects` | [`cmd_list_projects`] | Export projects → VCS roots CSV |
//! | `--update-projects` | [`cmd_update_projects`] | Patch VCS root properties from CSV |
//! | `--update-builds` | [`cmd_update_builds`] | Attach VCS roots to builds from CSV |

mod export;
mod update;

pub use export::{cmd_list_builds, cmd_list_projects};
pub use update::{cmd_update_builds, cmd_update_projects};
