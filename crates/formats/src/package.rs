use std::path::{Path, PathBuf};

use crate::hierarchy::{DocumentError, HierarchyDocument};

pub const HIERARCHY_FILE_NAME: &str = "hierarchy.json";
pub const PROJECTS_FILE_NAME: &str = "projects.json";
pub const ABOUT_FILE_NAME: &str = "about.json";

/// A directory holding the hierarchy description next to its content files.
///
/// Only the hierarchy is read eagerly. Content is loaded separately, since
/// the scene runs without it.
#[derive(Debug, Clone)]
pub struct AssetPackage {
    root: PathBuf,
    hierarchy: HierarchyDocument,
}

impl AssetPackage {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let root = root.as_ref().to_path_buf();
        let hierarchy = HierarchyDocument::load(root.join(HIERARCHY_FILE_NAME))?;
        Ok(Self { root, hierarchy })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hierarchy(&self) -> &HierarchyDocument {
        &self.hierarchy
    }

    pub fn projects_path(&self) -> PathBuf {
        self.root.join(PROJECTS_FILE_NAME)
    }

    pub fn about_path(&self) -> PathBuf {
        self.root.join(ABOUT_FILE_NAME)
    }
}
