//! # teamcity-vcs
//!
//! Audits TeamCity build configurations and their VCS root attachments.
//!
//! The tool walks the project → build configuration → VCS root entry
//! hierarchy over the TeamCity REST API and exports the result as CSV.
//! Edited CSVs can be fed back to patch VCS root properties (fetch URL,
//! default branch) or to attach VCS roots to build configurations.
//!
//! ## Example
//!
//! ```rust,ignore
//! use teamcity_vcs::{TeamCityClient, TeamCityConfig, services};
//!
//! let config = TeamCityConfig::from_env()?;
//! let client = TeamCityClient::new(&config);
//! let rows = services::collect_build_rows(&client);
//! teamcity_vcs::io::write_build_report(std::io::stdout().lock(), &rows)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod client;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use client::{HttpConfig, TeamCityApi, TeamCityClient};
pub use config::TeamCityConfig;
pub use models::{BuildRow, BuildType, Project, ProjectRow, Properties, Property, VcsRoot, VcsRootEntry};
pub use services::{ImportTally, collect_build_rows, collect_project_rows};

/// Error type for teamcity-vcs operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing access token, input CSV with missing required columns |
/// | `NotFound` | A mutation targets a build configuration or VCS root the server 404s on |
/// | `OperationFailed` | Transport errors, non-2xx responses, CSV/JSON (de)serialization failures |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - `TEAMCITY_ACCESS_TOKEN` is not set at startup
    /// - An update mode is invoked without an input file
    /// - The input CSV header lacks required columns
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced resource does not exist on the server.
    ///
    /// Raised when a mutation's initial lookup returns 404 for the
    /// targeted VCS root or build configuration. Lookups inside the
    /// export aggregation never raise this; absence is an `Option` there.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - An HTTP request fails at the transport level
    /// - The server answers with an unexpected non-2xx status
    /// - A response body cannot be deserialized
    /// - CSV reading or writing fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for teamcity-vcs operations.
pub type Result<T> = std::result::Result<T, Error>;
