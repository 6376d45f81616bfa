//! Wire types for the TeamCity REST API and report row types.
//!
//! The list wrappers mirror TeamCity's JSON envelope shape
//! (`{"count": N, "project": [...]}` and friends); arrays are defaulted so
//! an empty or partial envelope deserializes to an empty list.

use serde::{Deserialize, Serialize};

/// VCS root name used in sentinel rows for units without attachments.
pub const NO_VCS_ROOT: &str = "No VCS Root";

/// Placeholder value used in sentinel rows and for absent properties.
pub const NONE_VALUE: &str = "None";

/// Well-known VCS root property holding the fetch URL.
pub const PROP_FETCH_URL: &str = "url";

/// Well-known VCS root property holding the default branch.
pub const PROP_DEFAULT_BRANCH: &str = "branch";

/// A TeamCity project.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub id: String,
    /// Human-readable project name.
    pub name: String,
}

/// Envelope for `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectList {
    /// Flat list of all projects.
    #[serde(default, rename = "project")]
    pub projects: Vec<Project>,
}

/// A build configuration owned by a project.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildType {
    /// Build configuration identifier.
    pub id: String,
    /// Human-readable build configuration name.
    pub name: String,
}

/// Envelope for `GET /projects/id:{id}/buildTypes`.
#[derive(Debug, Default, Deserialize)]
pub struct BuildTypeList {
    /// Build configurations of the project.
    #[serde(default, rename = "buildType")]
    pub build_types: Vec<BuildType>,
}

/// Reference to a VCS root inside an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VcsRootRef {
    /// Referenced VCS root identifier; TeamCity may omit it.
    #[serde(default)]
    pub id: Option<String>,
}

/// Attachment record linking a build configuration to a VCS root.
#[derive(Debug, Clone, Deserialize)]
pub struct VcsRootEntry {
    /// The referenced VCS root, if the entry carries one.
    #[serde(default, rename = "vcs-root")]
    pub vcs_root: Option<VcsRootRef>,
}

impl VcsRootEntry {
    /// Returns the referenced VCS root id, if present.
    #[must_use]
    pub fn vcs_root_id(&self) -> Option<&str> {
        self.vcs_root.as_ref().and_then(|root| root.id.as_deref())
    }
}

/// Envelope for `GET /buildTypes/id:{id}/vcs-root-entries`.
#[derive(Debug, Default, Deserialize)]
pub struct VcsRootEntryList {
    /// Attachment records of the build configuration.
    #[serde(default, rename = "vcs-root-entry")]
    pub entries: Vec<VcsRootEntry>,
}

/// A single named property of a VCS root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property key.
    pub name: String,
    /// Property value.
    pub value: String,
}

/// Property list of a VCS root, in TeamCity's envelope shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Properties {
    /// Number of properties; recomputed before a PUT.
    #[serde(default)]
    pub count: usize,
    /// The properties themselves.
    #[serde(default, rename = "property")]
    pub property: Vec<Property>,
}

impl Properties {
    /// Returns the value of a property, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.property
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| prop.value.as_str())
    }

    /// Sets a property, updating it in place or appending a new one.
    ///
    /// Existing properties with other names are never touched or removed.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(prop) = self.property.iter_mut().find(|prop| prop.name == name) {
            prop.value = value.to_string();
        } else {
            self.property.push(Property {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        self.count = self.property.len();
    }
}

/// A VCS root with its full property list.
#[derive(Debug, Clone, Deserialize)]
pub struct VcsRoot {
    /// VCS root identifier.
    pub id: String,
    /// Human-readable VCS root name.
    pub name: String,
    /// All properties; only `url` and `branch` are interpreted.
    #[serde(default)]
    pub properties: Properties,
}

impl VcsRoot {
    /// Returns the fetch URL property, if set.
    #[must_use]
    pub fn fetch_url(&self) -> Option<&str> {
        self.properties.get(PROP_FETCH_URL)
    }

    /// Returns the default branch property, if set.
    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.properties.get(PROP_DEFAULT_BRANCH)
    }
}

/// Body for `POST /buildTypes/id:{id}/vcs-root-entries`.
#[derive(Debug, Serialize)]
pub struct NewVcsRootEntry {
    /// The VCS root to attach.
    #[serde(rename = "vcs-root")]
    pub vcs_root: VcsRootLocator,
}

/// Locator naming a VCS root by id in a request body.
#[derive(Debug, Serialize)]
pub struct VcsRootLocator {
    /// VCS root identifier.
    pub id: String,
}

impl NewVcsRootEntry {
    /// Creates an attachment body for the given VCS root id.
    #[must_use]
    pub fn new(vcs_root_id: &str) -> Self {
        Self {
            vcs_root: VcsRootLocator {
                id: vcs_root_id.to_string(),
            },
        }
    }
}

/// One row of the builds report.
///
/// Field declaration order doubles as the sort order of the export:
/// derived `Ord` compares (build id, build name, VCS root name, VCS root
/// id) lexicographically, field by field. The CSV column order differs
/// (id before name for the root); see [`BuildRow::record`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildRow {
    /// Build configuration identifier.
    pub build_id: String,
    /// Build configuration name.
    pub build_name: String,
    /// Resolved VCS root name, or the sentinel.
    pub vcs_root_name: String,
    /// Attached VCS root identifier, or the sentinel.
    pub vcs_root_id: String,
}

impl BuildRow {
    /// Creates the sentinel row for a build configuration with no
    /// VCS root entries.
    #[must_use]
    pub fn no_vcs_root(build_id: &str, build_name: &str) -> Self {
        Self {
            build_id: build_id.to_string(),
            build_name: build_name.to_string(),
            vcs_root_name: NO_VCS_ROOT.to_string(),
            vcs_root_id: NONE_VALUE.to_string(),
        }
    }

    /// Returns the row fields in CSV schema order.
    #[must_use]
    pub fn record(&self) -> [&str; 4] {
        [
            &self.build_id,
            &self.build_name,
            &self.vcs_root_id,
            &self.vcs_root_name,
        ]
    }
}

/// One row of the projects report.
///
/// As with [`BuildRow`], field declaration order is the sort order and
/// [`ProjectRow::record`] yields the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectRow {
    /// Project identifier.
    pub project_id: String,
    /// Project name.
    pub project_name: String,
    /// Resolved VCS root name, or the sentinel.
    pub vcs_root_name: String,
    /// Attached VCS root identifier, or the sentinel.
    pub vcs_root_id: String,
    /// Fetch URL of the root (`url` property), or "None".
    pub fetch_url: String,
    /// Default branch of the root (`branch` property), or "None".
    pub default_branch: String,
}

impl ProjectRow {
    /// Creates the sentinel row for a project where no build
    /// configuration yielded a VCS root.
    #[must_use]
    pub fn no_vcs_root(project_id: &str, project_name: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            vcs_root_name: NO_VCS_ROOT.to_string(),
            vcs_root_id: NONE_VALUE.to_string(),
            fetch_url: NONE_VALUE.to_string(),
            default_branch: NONE_VALUE.to_string(),
        }
    }

    /// Creates a row for a project with a resolved VCS root.
    #[must_use]
    pub fn resolved(project_id: &str, project_name: &str, root: &VcsRoot) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            vcs_root_name: root.name.clone(),
            vcs_root_id: root.id.clone(),
            fetch_url: root.fetch_url().unwrap_or(NONE_VALUE).to_string(),
            default_branch: root.default_branch().unwrap_or(NONE_VALUE).to_string(),
        }
    }

    /// Returns the row fields in CSV schema order.
    #[must_use]
    pub fn record(&self) -> [&str; 6] {
        [
            &self.project_id,
            &self.project_name,
            &self.vcs_root_id,
            &self.vcs_root_name,
            &self.fetch_url,
            &self.default_branch,
        ]
    }
}
