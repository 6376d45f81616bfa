//! Integration tests for the CSV-driven update and assign paths.
//!
//! A mutating in-memory fake records every PUT/POST so idempotency can be
//! asserted as "exactly one write happened".
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write as _;
use teamcity_vcs::models::{
    BuildType, Project, Properties, Property, VcsRoot, VcsRootEntry, VcsRootRef,
};
use teamcity_vcs::services::{
    AssignOutcome, UpdateOutcome, apply_build_assignments, apply_project_updates,
    assign_vcs_root_to_build, update_vcs_root_properties,
};
use teamcity_vcs::{Error, TeamCityApi, cli};

/// Mutable in-memory stand-in for the TeamCity server.
#[derive(Default)]
struct FakeTeamCity {
    build_types: HashMap<String, BuildType>,
    roots: RefCell<HashMap<String, VcsRoot>>,
    entries: RefCell<HashMap<String, Vec<VcsRootEntry>>>,
    put_calls: RefCell<Vec<(String, Properties)>>,
    post_calls: RefCell<Vec<(String, String)>>,
}

impl FakeTeamCity {
    fn with_build(mut self, id: &str, name: &str) -> Self {
        self.build_types.insert(
            id.to_string(),
            BuildType {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    fn with_root(self, id: &str, name: &str, properties: &[(&str, &str)]) -> Self {
        self.roots.borrow_mut().insert(
            id.to_string(),
            VcsRoot {
                id: id.to_string(),
                name: name.to_string(),
                properties: Properties {
                    count: properties.len(),
                    property: properties
                        .iter()
                        .map(|(name, value)| Property {
                            name: (*name).to_string(),
                            value: (*value).to_string(),
                        })
                        .collect(),
                },
            },
        );
        self
    }

    fn with_attachment(self, build_type_id: &str, vcs_root_id: &str) -> Self {
        self.entries
            .borrow_mut()
            .entry(build_type_id.to_string())
            .or_default()
            .push(VcsRootEntry {
                vcs_root: Some(VcsRootRef {
                    id: Some(vcs_root_id.to_string()),
                }),
            });
        self
    }
}

impl TeamCityApi for FakeTeamCity {
    fn projects(&self) -> teamcity_vcs::Result<Vec<Project>> {
        Ok(Vec::new())
    }

    fn build_types(&self, _project_id: &str) -> teamcity_vcs::Result<Vec<BuildType>> {
        Ok(Vec::new())
    }

    fn build_type(&self, build_type_id: &str) -> teamcity_vcs::Result<Option<BuildType>> {
        Ok(self.build_types.get(build_type_id).cloned())
    }

    fn vcs_root_entries(&self, build_type_id: &str) -> teamcity_vcs::Result<Vec<VcsRootEntry>> {
        Ok(self
            .entries
            .borrow()
            .get(build_type_id)
            .cloned()
            .unwrap_or_default())
    }

    fn vcs_root(&self, vcs_root_id: &str) -> teamcity_vcs::Result<Option<VcsRoot>> {
        Ok(self.roots.borrow().get(vcs_root_id).cloned())
    }

    fn set_vcs_root_properties(
        &self,
        vcs_root_id: &str,
        properties: &Properties,
    ) -> teamcity_vcs::Result<()> {
        let mut roots = self.roots.borrow_mut();
        let root = roots
            .get_mut(vcs_root_id)
            .ok_or_else(|| Error::NotFound(format!("VCS root '{vcs_root_id}'")))?;
        root.properties = properties.clone();
        self.put_calls
            .borrow_mut()
            .push((vcs_root_id.to_string(), properties.clone()));
        Ok(())
    }

    fn attach_vcs_root(&self, build_type_id: &str, vcs_root_id: &str) -> teamcity_vcs::Result<()> {
        self.entries
            .borrow_mut()
            .entry(build_type_id.to_string())
            .or_default()
            .push(VcsRootEntry {
                vcs_root: Some(VcsRootRef {
                    id: Some(vcs_root_id.to_string()),
                }),
            });
        self.post_calls
            .borrow_mut()
            .push((build_type_id.to_string(), vcs_root_id.to_string()));
        Ok(())
    }
}

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Property updates
// ============================================================================

#[test]
fn test_update_with_no_values_is_a_silent_success() {
    let fake = FakeTeamCity::default().with_root("V1", "RepoA", &[("url", "git://old")]);

    let outcome = update_vcs_root_properties(&fake, "V1", None, None).unwrap();
    assert_eq!(outcome, UpdateOutcome::NothingToDo);
    assert!(fake.put_calls.borrow().is_empty());
}

#[test]
fn test_update_patches_existing_url_in_place() {
    let fake = FakeTeamCity::default().with_root(
        "V1",
        "RepoA",
        &[("url", "git://old"), ("authMethod", "PASSWORD")],
    );

    let outcome = update_vcs_root_properties(&fake, "V1", Some("git://new"), None).unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let puts = fake.put_calls.borrow();
    assert_eq!(puts.len(), 1);
    let (id, properties) = &puts[0];
    assert_eq!(id, "V1");
    assert_eq!(properties.get("url"), Some("git://new"));
    // Unrelated properties survive the full-list PUT
    assert_eq!(properties.get("authMethod"), Some("PASSWORD"));
    assert_eq!(properties.count, 2);
}

#[test]
fn test_update_appends_missing_branch_property() {
    let fake = FakeTeamCity::default().with_root("V1", "RepoA", &[("url", "git://repo")]);

    update_vcs_root_properties(&fake, "V1", None, Some("refs/heads/main")).unwrap();

    let roots = fake.roots.borrow();
    let properties = &roots.get("V1").unwrap().properties;
    assert_eq!(properties.get("branch"), Some("refs/heads/main"));
    assert_eq!(properties.get("url"), Some("git://repo"));
    assert_eq!(properties.count, 2);
}

#[test]
fn test_update_of_missing_root_is_not_found() {
    let fake = FakeTeamCity::default();

    let err = update_vcs_root_properties(&fake, "V9", Some("git://new"), None).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(fake.put_calls.borrow().is_empty());
}

#[test]
fn test_apply_project_updates_counts_and_continues_past_failures() {
    let fake = FakeTeamCity::default().with_root("V2", "RepoB", &[]);
    let file = csv_file(
        "Project ID,VCS Root ID,Fetch URL,Default Branch\n\
         P1,V9,git://a,main\n\
         P1,V2,git://b,develop\n",
    );

    let tally = cli::cmd_update_projects(&fake, file.path()).unwrap();
    assert_eq!(tally.succeeded, 1);
    assert_eq!(tally.failed, 1);
    assert!(!tally.is_clean());
    // The second row was still applied after the first failed
    assert_eq!(
        fake.roots.borrow().get("V2").unwrap().properties.get("url"),
        Some("git://b")
    );
}

#[test]
fn test_update_rows_with_blank_values_apply_as_no_ops() {
    let fake = FakeTeamCity::default().with_root("V1", "RepoA", &[("url", "git://keep")]);
    let file = csv_file(
        "Project ID,VCS Root ID,Fetch URL,Default Branch\n\
         P1,V1,,\n",
    );

    let tally = cli::cmd_update_projects(&fake, file.path()).unwrap();
    assert_eq!(tally.succeeded, 1);
    assert!(fake.put_calls.borrow().is_empty());
    assert_eq!(
        fake.roots.borrow().get("V1").unwrap().properties.get("url"),
        Some("git://keep")
    );
}

#[test]
fn test_update_import_rejects_missing_columns() {
    let fake = FakeTeamCity::default();
    let file = csv_file("Project ID,VCS Root Name\nP1,RepoA\n");

    let err = cli::cmd_update_projects(&fake, file.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("VCS Root ID"));
    assert!(message.contains("Fetch URL"));
    assert!(message.contains("Default Branch"));
}

// ============================================================================
// Build assignments
// ============================================================================

#[test]
fn test_assign_attaches_and_is_idempotent() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[]);

    let first = assign_vcs_root_to_build(&fake, "B1", "V1").unwrap();
    assert_eq!(first, AssignOutcome::Attached);

    let second = assign_vcs_root_to_build(&fake, "B1", "V1").unwrap();
    assert_eq!(second, AssignOutcome::AlreadyAttached);

    // Two calls, exactly one attachment write
    assert_eq!(fake.post_calls.borrow().len(), 1);
    assert_eq!(fake.entries.borrow().get("B1").unwrap().len(), 1);
}

#[test]
fn test_assign_keeps_existing_different_root() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[])
        .with_root("V2", "RepoB", &[])
        .with_attachment("B1", "V2");

    let outcome = assign_vcs_root_to_build(&fake, "B1", "V1").unwrap();
    assert_eq!(outcome, AssignOutcome::Attached);
    // Both roots remain attached; nothing was detached or replaced
    assert_eq!(fake.entries.borrow().get("B1").unwrap().len(), 2);
}

#[test]
fn test_assign_fails_on_missing_build_or_root() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[]);

    let err = assign_vcs_root_to_build(&fake, "B9", "V1").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = assign_vcs_root_to_build(&fake, "B1", "V9").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    assert!(fake.post_calls.borrow().is_empty());
}

#[test]
fn test_apply_build_assignments_tally() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_build("B2", "Second")
        .with_root("V1", "RepoA", &[]);
    let file = csv_file(
        "Build ID,VCS Root ID\n\
         B1,V1\n\
         B2,V1\n\
         B9,V1\n",
    );

    let tally = cli::cmd_update_builds(&fake, file.path()).unwrap();
    assert_eq!(tally.succeeded, 2);
    assert_eq!(tally.failed, 1);
    assert_eq!(fake.post_calls.borrow().len(), 2);
}

#[test]
fn test_assign_rows_missing_identifiers_are_dropped_before_apply() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[]);
    let file = csv_file(
        "Build ID,VCS Root ID\n\
         ,V1\n\
         ,\n\
         B1,V1\n",
    );

    // Only the complete row reaches the server; the others are skipped,
    // not counted as failures
    let tally = cli::cmd_update_builds(&fake, file.path()).unwrap();
    assert_eq!(tally.succeeded, 1);
    assert_eq!(tally.failed, 0);
    assert_eq!(fake.post_calls.borrow().len(), 1);
}

#[test]
fn test_applying_an_exported_report_back_is_idempotent() {
    // Round trip: export rows for an attached root, feed them back as an
    // assignment CSV; nothing new is written.
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[])
        .with_attachment("B1", "V1");

    let row = teamcity_vcs::BuildRow {
        build_id: "B1".to_string(),
        build_name: "Build".to_string(),
        vcs_root_name: "RepoA".to_string(),
        vcs_root_id: "V1".to_string(),
    };
    let mut exported = Vec::new();
    teamcity_vcs::io::write_build_report(&mut exported, std::iter::once(&row)).unwrap();
    let file = csv_file(&String::from_utf8(exported).unwrap());

    let tally = cli::cmd_update_builds(&fake, file.path()).unwrap();
    assert_eq!(tally.succeeded, 1);
    assert!(fake.post_calls.borrow().is_empty());
}

#[test]
fn test_direct_apply_helpers_accept_prevalidated_rows() {
    let fake = FakeTeamCity::default()
        .with_build("B1", "Build")
        .with_root("V1", "RepoA", &[]);

    let rows = teamcity_vcs::io::read_rows(
        std::io::Cursor::new("Build ID,VCS Root ID\nB1,V1\n"),
        &teamcity_vcs::io::BUILD_ASSIGN_SCHEMA,
    )
    .unwrap();
    let tally = apply_build_assignments(&fake, &rows);
    assert_eq!(tally.succeeded, 1);

    let rows = teamcity_vcs::io::read_rows(
        std::io::Cursor::new(
            "Project ID,VCS Root ID,Fetch URL,Default Branch\nP1,V1,git://new,main\n",
        ),
        &teamcity_vcs::io::PROJECT_UPDATE_SCHEMA,
    )
    .unwrap();
    let tally = apply_project_updates(&fake, &rows);
    assert_eq!(tally.succeeded, 1);
    assert_eq!(
        fake.roots.borrow().get("V1").unwrap().properties.get("url"),
        Some("git://new")
    );
}
