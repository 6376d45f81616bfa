//! Typed resource accessors over the TeamCity REST API.

use super::TeamCityClient;
use crate::Result;
use crate::models::{
    BuildType, BuildTypeList, NewVcsRootEntry, Project, ProjectList, Properties, VcsRoot,
    VcsRootEntry, VcsRootEntryList,
};

/// One method per REST resource the tool consumes or mutates.
///
/// 404 handling varies by site: detail lookups ([`Self::vcs_root`],
/// [`Self::build_type`]) report absence as `None`, while
/// [`Self::vcs_root_entries`] treats a 404 as an empty entry list.
/// Implemented for [`TeamCityClient`]; tests substitute in-memory fakes.
pub trait TeamCityApi {
    /// Fetches all projects as a flat list.
    fn projects(&self) -> Result<Vec<Project>>;

    /// Fetches the build configurations of a project.
    fn build_types(&self, project_id: &str) -> Result<Vec<BuildType>>;

    /// Looks up a single build configuration; `None` on 404.
    fn build_type(&self, build_type_id: &str) -> Result<Option<BuildType>>;

    /// Fetches the VCS root entries of a build configuration.
    ///
    /// A 404 yields an empty list, matching the server's behavior for
    /// build configurations without an entries collection.
    fn vcs_root_entries(&self, build_type_id: &str) -> Result<Vec<VcsRootEntry>>;

    /// Looks up a VCS root with its properties; `None` on 404.
    fn vcs_root(&self, vcs_root_id: &str) -> Result<Option<VcsRoot>>;

    /// Replaces the full property list of a VCS root.
    fn set_vcs_root_properties(&self, vcs_root_id: &str, properties: &Properties) -> Result<()>;

    /// Attaches a VCS root to a build configuration.
    fn attach_vcs_root(&self, build_type_id: &str, vcs_root_id: &str) -> Result<()>;
}

impl TeamCityApi for TeamCityClient {
    fn projects(&self) -> Result<Vec<Project>> {
        let list: ProjectList = self.get_json("get_projects", "projects")?;
        Ok(list.projects)
    }

    fn build_types(&self, project_id: &str) -> Result<Vec<BuildType>> {
        let path = format!("projects/id:{project_id}/buildTypes");
        let list: BuildTypeList = self.get_json("get_build_types", &path)?;
        Ok(list.build_types)
    }

    fn build_type(&self, build_type_id: &str) -> Result<Option<BuildType>> {
        let path = format!("buildTypes/id:{build_type_id}");
        self.get_json_optional("get_build_type", &path)
    }

    fn vcs_root_entries(&self, build_type_id: &str) -> Result<Vec<VcsRootEntry>> {
        let path = format!("buildTypes/id:{build_type_id}/vcs-root-entries");
        let list: Option<VcsRootEntryList> =
            self.get_json_optional("get_vcs_root_entries", &path)?;
        Ok(list.map(|list| list.entries).unwrap_or_default())
    }

    fn vcs_root(&self, vcs_root_id: &str) -> Result<Option<VcsRoot>> {
        let path = format!("vcs-roots/id:{vcs_root_id}");
        self.get_json_optional("get_vcs_root", &path)
    }

    fn set_vcs_root_properties(&self, vcs_root_id: &str, properties: &Properties) -> Result<()> {
        let path = format!("vcs-roots/id:{vcs_root_id}/properties");
        self.put_json("put_vcs_root_properties", &path, properties)
    }

    fn attach_vcs_root(&self, build_type_id: &str, vcs_root_id: &str) -> Result<()> {
        let path = format!("buildTypes/id:{build_type_id}/vcs-root-entries");
        let body = NewVcsRootEntry::new(vcs_root_id);
        self.post_json("post_vcs_root_entry", &path, &body)
    }
}
