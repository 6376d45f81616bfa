//! Binary entry point for teamcity-vcs.
//!
//! Exports TeamCity build/project → VCS root reports as CSV on stdout,
//! and applies edited CSVs back to the server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow prints in the main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use teamcity_vcs::services::ImportTally;
use teamcity_vcs::{Error, TeamCityClient, TeamCityConfig, cli, observability};

/// Audit and edit TeamCity VCS root attachments via CSV.
#[derive(Parser)]
#[command(name = "teamcity-vcs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Export one row per build configuration and attached VCS root (default).
    #[arg(long, group = "mode")]
    builds: bool,

    /// Export one row per project and attached VCS root.
    #[arg(long, group = "mode")]
    projects: bool,

    /// Patch VCS root properties from a projects-mode CSV.
    #[arg(long, group = "mode", requires = "input_file")]
    update_projects: bool,

    /// Attach VCS roots to build configurations from a builds-mode CSV.
    #[arg(long, group = "mode", requires = "input_file")]
    update_builds: bool,

    /// CSV file consumed by the update modes.
    #[arg(long, value_name = "FILE")]
    input_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Returns the input file, which clap guarantees for update modes.
    fn required_input(&self) -> Result<&Path, Error> {
        self.input_file.as_deref().ok_or_else(|| {
            Error::InvalidInput("--input-file is required with the update modes".to_string())
        })
    }
}

/// Main entry point.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = observability::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match TeamCityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        },
    };

    let client = TeamCityClient::new(&config);

    match run_mode(&cli, &client) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected mode.
fn run_mode(cli: &Cli, client: &TeamCityClient) -> Result<ExitCode, Error> {
    if cli.update_projects {
        let tally = cli::cmd_update_projects(client, cli.required_input()?)?;
        println!(
            "VCS root updates: {} succeeded, {} failed",
            tally.succeeded, tally.failed
        );
        return Ok(tally_exit_code(tally));
    }

    if cli.update_builds {
        let tally = cli::cmd_update_builds(client, cli.required_input()?)?;
        println!(
            "VCS root assignments: {} succeeded, {} failed",
            tally.succeeded, tally.failed
        );
        return Ok(tally_exit_code(tally));
    }

    if cli.projects {
        cli::cmd_list_projects(client)?;
        return Ok(ExitCode::SUCCESS);
    }

    cli::cmd_list_builds(client)?;
    Ok(ExitCode::SUCCESS)
}

/// Maps a bulk-import tally to the process exit code.
///
/// Every row is always processed; a nonzero failure count still surfaces
/// as a nonzero exit so CI wrappers can notice partial failures.
fn tally_exit_code(tally: ImportTally) -> ExitCode {
    if tally.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
