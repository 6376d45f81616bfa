//! CSV input and output.

mod csv;

pub use csv::{
    BUILD_ASSIGN_SCHEMA, COL_BUILD_ID, COL_BUILD_NAME, COL_DEFAULT_BRANCH, COL_FETCH_URL,
    COL_PROJECT_ID, COL_PROJECT_NAME, COL_VCS_ROOT_ID, COL_VCS_ROOT_NAME, CsvRow, CsvSchema,
    PROJECT_UPDATE_SCHEMA, field, read_rows, read_rows_from_path, write_build_report,
    write_project_report,
};
