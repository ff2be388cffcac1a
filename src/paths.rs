//! Per-project directory sets and the standard/custom resolution rule.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether custom path overrides are considered at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Mode {
    /// Always use the project's standard subfolders.
    Standard,
    /// Prefer per-project overrides where they are set.
    #[default]
    Custom,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Standard => f.write_str("Standard"),
            Mode::Custom => f.write_str("Custom"),
        }
    }
}

/// One directory per category, all populated.
///
/// Entries missing from a loaded file come back empty; see
/// [`PathSet::fill_missing`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSet {
    #[serde(rename = "DocumentsPath")]
    pub documents: PathBuf,
    #[serde(rename = "ImagesPath")]
    pub images: PathBuf,
    #[serde(rename = "VMDKPath")]
    pub vmdk: PathBuf,
    #[serde(rename = "AdobeProjectsPath")]
    pub adobe_projects: PathBuf,
    #[serde(rename = "CustomFoldersPath")]
    pub custom_folders: PathBuf,
    #[serde(rename = "OtherPath")]
    pub other: PathBuf,
}

impl PathSet {
    /// Derives the standard layout beneath a project root.
    ///
    /// ```
    /// use projorg::paths::PathSet;
    /// use std::path::Path;
    ///
    /// let paths = PathSet::standard_for(Path::new("/root/Trip"));
    /// assert_eq!(paths.adobe_projects, Path::new("/root/Trip/Adobe Projects"));
    /// ```
    pub fn standard_for(project_root: &Path) -> Self {
        Self {
            documents: project_root.join(Category::Documents.dir_name()),
            images: project_root.join(Category::Images.dir_name()),
            vmdk: project_root.join(Category::Vmdk.dir_name()),
            adobe_projects: project_root.join(Category::AdobeProjects.dir_name()),
            custom_folders: project_root.join(Category::CustomFolders.dir_name()),
            other: project_root.join(Category::Other.dir_name()),
        }
    }

    pub fn get(&self, category: Category) -> &Path {
        match category {
            Category::Documents => &self.documents,
            Category::Images => &self.images,
            Category::Vmdk => &self.vmdk,
            Category::AdobeProjects => &self.adobe_projects,
            Category::CustomFolders => &self.custom_folders,
            Category::Other => &self.other,
        }
    }

    /// Replaces every empty entry with its standard location beneath
    /// `project_root` and returns how many were replaced.
    pub fn fill_missing(&mut self, project_root: &Path) -> usize {
        let mut filled = 0;
        for category in Category::ALL {
            let path = self.get_mut(category);
            if path.as_os_str().is_empty() {
                *path = project_root.join(category.dir_name());
                filled += 1;
            }
        }
        filled
    }

    fn get_mut(&mut self, category: Category) -> &mut PathBuf {
        match category {
            Category::Documents => &mut self.documents,
            Category::Images => &mut self.images,
            Category::Vmdk => &mut self.vmdk,
            Category::AdobeProjects => &mut self.adobe_projects,
            Category::CustomFolders => &mut self.custom_folders,
            Category::Other => &mut self.other,
        }
    }
}

/// Optional per-category overrides.
///
/// A field holding `None` or an empty path counts as unset. Empty strings
/// show up in files written by older versions, so both forms are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPaths {
    #[serde(rename = "DocumentsPath", default)]
    pub documents: Option<PathBuf>,
    #[serde(rename = "ImagesPath", default)]
    pub images: Option<PathBuf>,
    #[serde(rename = "VMDKPath", default)]
    pub vmdk: Option<PathBuf>,
    #[serde(rename = "AdobeProjectsPath", default)]
    pub adobe_projects: Option<PathBuf>,
    #[serde(rename = "CustomFoldersPath", default)]
    pub custom_folders: Option<PathBuf>,
    #[serde(rename = "OtherPath", default)]
    pub other: Option<PathBuf>,
}

impl CustomPaths {
    /// Returns the override for a category, skipping empty entries.
    pub fn get(&self, category: Category) -> Option<&Path> {
        let slot = match category {
            Category::Documents => &self.documents,
            Category::Images => &self.images,
            Category::Vmdk => &self.vmdk,
            Category::AdobeProjects => &self.adobe_projects,
            Category::CustomFolders => &self.custom_folders,
            Category::Other => &self.other,
        };
        slot.as_deref().filter(|p| !p.as_os_str().is_empty())
    }

    /// Sets or clears the override for a category.
    pub fn set(&mut self, category: Category, path: Option<PathBuf>) {
        let slot = match category {
            Category::Documents => &mut self.documents,
            Category::Images => &mut self.images,
            Category::Vmdk => &mut self.vmdk,
            Category::AdobeProjects => &mut self.adobe_projects,
            Category::CustomFolders => &mut self.custom_folders,
            Category::Other => &mut self.other,
        };
        *slot = path.filter(|p| !p.as_os_str().is_empty());
    }

    /// True when at least one category has a non-empty override.
    pub fn has_any(&self) -> bool {
        Category::ALL.iter().any(|c| self.get(*c).is_some())
    }
}

/// Computes the effective directory for every category.
///
/// Resolution runs in two stages:
/// 1. Set-level gate: outside [`Mode::Custom`], or when `custom` is absent or
///    holds no override at all, the standard set is returned as is.
/// 2. Per-field fallback: each category takes its override when set and its
///    standard directory otherwise.
///
/// ```
/// use projorg::category::Category;
/// use projorg::paths::{CustomPaths, Mode, PathSet, resolve_paths};
/// use std::path::{Path, PathBuf};
///
/// let standard = PathSet::standard_for(Path::new("/root/Trip"));
/// let mut custom = CustomPaths::default();
/// custom.set(Category::Images, Some(PathBuf::from("/photos")));
///
/// let effective = resolve_paths(&standard, Some(&custom), Mode::Custom);
/// assert_eq!(effective.images, Path::new("/photos"));
/// assert_eq!(effective.documents, standard.documents);
///
/// let effective = resolve_paths(&standard, Some(&custom), Mode::Standard);
/// assert_eq!(effective, standard);
/// ```
pub fn resolve_paths(standard: &PathSet, custom: Option<&CustomPaths>, mode: Mode) -> PathSet {
    let overrides = match custom {
        Some(custom) if mode == Mode::Custom && custom.has_any() => custom,
        _ => return standard.clone(),
    };

    let mut effective = standard.clone();
    for category in Category::ALL {
        if let Some(path) = overrides.get(category) {
            *effective.get_mut(category) = path.to_path_buf();
        }
    }
    effective
}
