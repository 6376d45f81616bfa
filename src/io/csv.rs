//! CSV reading, validation, and report writing.
//!
//! Import rows are returned as plain string field mappings keyed by header
//! name; no type coercion happens here. Header validation fails fast and
//! reports every missing required column at once.

use crate::models::{BuildRow, ProjectRow};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// `Project ID` column.
pub const COL_PROJECT_ID: &str = "Project ID";
/// `Project Name` column.
pub const COL_PROJECT_NAME: &str = "Project Name";
/// `Build ID` column.
pub const COL_BUILD_ID: &str = "Build ID";
/// `Build Name` column.
pub const COL_BUILD_NAME: &str = "Build Name";
/// `VCS Root ID` column.
pub const COL_VCS_ROOT_ID: &str = "VCS Root ID";
/// `VCS Root Name` column.
pub const COL_VCS_ROOT_NAME: &str = "VCS Root Name";
/// `Fetch URL` column.
pub const COL_FETCH_URL: &str = "Fetch URL";
/// `Default Branch` column.
pub const COL_DEFAULT_BRANCH: &str = "Default Branch";

/// Column requirements for one import target.
#[derive(Debug, Clone, Copy)]
pub struct CsvSchema {
    /// Columns that must appear in the header.
    pub required: &'static [&'static str],
    /// Columns whose value must be non-empty for a row to be usable.
    pub identifiers: &'static [&'static str],
}

/// Schema for the project-update import (VCS root property patches).
///
/// `Fetch URL` and `Default Branch` must exist as columns but may be
/// empty per row; an empty value leaves that property untouched.
pub const PROJECT_UPDATE_SCHEMA: CsvSchema = CsvSchema {
    required: &[
        COL_PROJECT_ID,
        COL_VCS_ROOT_ID,
        COL_FETCH_URL,
        COL_DEFAULT_BRANCH,
    ],
    identifiers: &[COL_PROJECT_ID, COL_VCS_ROOT_ID],
};

/// Schema for the build-assign import (VCS root attachments).
pub const BUILD_ASSIGN_SCHEMA: CsvSchema = CsvSchema {
    required: &[COL_BUILD_ID, COL_VCS_ROOT_ID],
    identifiers: &[COL_BUILD_ID, COL_VCS_ROOT_ID],
};

/// One import row, keyed by header name.
pub type CsvRow = BTreeMap<String, String>;

/// Returns a non-empty field value from a row, if present.
#[must_use]
pub fn field<'a>(row: &'a CsvRow, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Reads and validates import rows from a reader.
///
/// All-empty rows are silently dropped. Rows with an empty identifier
/// column and rows the CSV parser rejects are dropped with a warning.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] listing every missing required column,
/// or [`Error::OperationFailed`] if the header itself cannot be read.
pub fn read_rows<R: Read>(reader: R, schema: &CsvSchema) -> Result<Vec<CsvRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::OperationFailed {
            operation: "read_csv_headers".to_string(),
            cause: e.to_string(),
        })?
        .clone();

    let missing: Vec<&str> = schema
        .required
        .iter()
        .copied()
        .filter(|&column| !headers.iter().any(|header| header == column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::InvalidInput(format!(
            "input CSV is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed CSV row");
                continue;
            },
        };

        let line = record.position().map_or(0, |pos| pos.line());
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.trim().to_string()))
            .collect();

        // A fully blank row is padding, not data
        if row.values().all(|value| value.is_empty()) {
            continue;
        }

        if let Some(blank) = schema
            .identifiers
            .iter()
            .copied()
            .find(|&column| field(&row, column).is_none())
        {
            tracing::warn!(line = line, column = blank, "Skipping row with empty identifier");
            continue;
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Reads and validates import rows from a file.
///
/// # Errors
///
/// As [`read_rows`], plus [`Error::OperationFailed`] if the file cannot
/// be opened.
pub fn read_rows_from_path(path: &Path, schema: &CsvSchema) -> Result<Vec<CsvRow>> {
    let file = std::fs::File::open(path).map_err(|e| Error::OperationFailed {
        operation: "open_input_csv".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    read_rows(std::io::BufReader::new(file), schema)
}

fn write_error(e: csv::Error) -> Error {
    Error::OperationFailed {
        operation: "write_csv".to_string(),
        cause: e.to_string(),
    }
}

/// Writes the builds report with its header row.
///
/// Rows are written in iteration order; callers pass an ordered set.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if writing fails.
pub fn write_build_report<'a, W, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a BuildRow>,
{
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer
        .write_record([COL_BUILD_ID, COL_BUILD_NAME, COL_VCS_ROOT_ID, COL_VCS_ROOT_NAME])
        .map_err(write_error)?;
    for row in rows {
        csv_writer.write_record(row.record()).map_err(write_error)?;
    }
    csv_writer.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })
}

/// Writes the projects report with its header row.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if writing fails.
pub fn write_project_report<'a, W, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ProjectRow>,
{
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer
        .write_record([
            COL_PROJECT_ID,
            COL_PROJECT_NAME,
            COL_VCS_ROOT_ID,
            COL_VCS_ROOT_NAME,
            COL_FETCH_URL,
            COL_DEFAULT_BRANCH,
        ])
        .map_err(write_error)?;
    for row in rows {
        csv_writer.write_record(row.record()).map_err(write_error)?;
    }
    csv_writer.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })
}
