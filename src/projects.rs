//! Project lifecycle: creation, discovery under the global root, selection
//! and path overrides.
//!
//! Every function here mutates an [`AppConfig`] and is meant to run inside
//! [`ConfigStore::update`](crate::config::ConfigStore::update), so validation
//! failures leave the stored configuration untouched.

use crate::category::Category;
use crate::config::{AppConfig, Project};
use crate::error::{OrganizerError, Result, ValidationError};
use crate::paths::{CustomPaths, Mode};
use std::fs;
use std::path::{Path, PathBuf};

/// Creates a project directory with its six standard subfolders and
/// registers it as the active project.
///
/// Custom overrides are only kept when the configuration is in
/// [`Mode::Custom`].
///
/// # Errors
///
/// * `Validation(MissingProjectName)` when `name` is blank
/// * `Validation(DuplicateProject)` when the name is taken
/// * `Validation(GlobalPathNotSet)` when no global root is configured
/// * `DirectoryCreation` when a folder cannot be created
pub fn create_project(config: &mut AppConfig, name: &str, mut custom: CustomPaths) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingProjectName.into());
    }
    if config.projects.contains_key(name) {
        return Err(ValidationError::DuplicateProject(name.to_string()).into());
    }
    let root = config.root().ok_or(ValidationError::GlobalPathNotSet)?;

    let project_root = root.join(name);
    create_dir(&project_root)?;

    let mut project = Project::new(name, &project_root);
    for category in Category::ALL {
        create_dir(project.standard_paths.get(category))?;
    }

    if config.mode == Mode::Custom {
        for category in Category::ALL {
            let path = custom.get(category).map(absolute_path).transpose()?;
            custom.set(category, path);
        }
        project.custom_paths = custom;
    }

    log::info!("Created project '{}' at {}", name, project_root.display());
    config.projects.insert(name.to_string(), project);
    config.active_project = name.to_string();
    Ok(())
}

/// Empty paths stay empty so they keep meaning "unset".
fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Ok(PathBuf::new());
    }
    Ok(std::path::absolute(path)?)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| OrganizerError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// Reconciles the project map with the directories under the global root.
///
/// Unknown subdirectories become projects with the standard layout, and
/// projects whose directory is gone are dropped. When the root is unset or
/// missing nothing changes and an empty list is returned.
///
/// Returns the project names found on disk, sorted.
pub fn sync_with_root(config: &mut AppConfig) -> Result<Vec<String>> {
    let Some(root) = config.root().map(Path::to_path_buf) else {
        return Ok(Vec::new());
    };
    if !root.is_dir() {
        log::debug!("Global root {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&root)?.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_dir()
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();

    for name in &names {
        if !config.projects.contains_key(name) {
            log::info!("Discovered project '{}'", name);
            config
                .projects
                .insert(name.clone(), Project::new(name.as_str(), &root.join(name)));
        }
    }

    config.projects.retain(|name, _| {
        let keep = names.binary_search(name).is_ok();
        if !keep {
            log::info!("Dropping project '{}': directory is gone", name);
        }
        keep
    });

    Ok(names)
}

/// Makes `name` the drop target.
pub fn set_active(config: &mut AppConfig, name: &str) -> Result<()> {
    if !config.projects.contains_key(name) {
        return Err(ValidationError::UnknownProject(name.to_string()).into());
    }
    config.active_project = name.to_string();
    Ok(())
}

/// Sets or clears one custom override of a project.
pub fn set_custom_path(
    config: &mut AppConfig,
    name: &str,
    category: Category,
    path: Option<PathBuf>,
) -> Result<()> {
    let project = config
        .projects
        .get_mut(name)
        .ok_or_else(|| ValidationError::UnknownProject(name.to_string()))?;
    let path = path.as_deref().map(absolute_path).transpose()?;
    project.custom_paths.set(category, path);
    Ok(())
}

/// Stores `path` as the global root, made absolute against the current
/// directory.
pub fn set_root(config: &mut AppConfig, path: &Path) -> Result<()> {
    config.global_project_path = absolute_path(path)?.to_string_lossy().to_string();
    Ok(())
}

pub fn set_mode(config: &mut AppConfig, mode: Mode) {
    config.mode = mode;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_root(root: &Path) -> AppConfig {
        AppConfig {
            global_project_path: root.to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_project_builds_layout() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = config_with_root(temp_dir.path());

        create_project(&mut config, "  Trip ", CustomPaths::default()).unwrap();

        assert_eq!(config.active_project, "Trip");
        for category in Category::ALL {
            assert!(temp_dir.path().join("Trip").join(category.dir_name()).is_dir());
        }
        assert_eq!(
            config.projects["Trip"].standard_paths.images,
            temp_dir.path().join("Trip").join("Images")
        );
    }

    #[test]
    fn test_create_project_validation() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = config_with_root(temp_dir.path());

        let err = create_project(&mut config, "   ", CustomPaths::default()).unwrap_err();
        assert!(matches!(
            err,
            OrganizerError::Validation(ValidationError::MissingProjectName)
        ));

        create_project(&mut config, "Trip", CustomPaths::default()).unwrap();
        let err = create_project(&mut config, "Trip", CustomPaths::default()).unwrap_err();
        assert!(matches!(
            err,
            OrganizerError::Validation(ValidationError::DuplicateProject(_))
        ));

        let mut no_root = AppConfig::default();
        let err = create_project(&mut no_root, "Trip", CustomPaths::default()).unwrap_err();
        assert!(matches!(
            err,
            OrganizerError::Validation(ValidationError::GlobalPathNotSet)
        ));
    }

    #[test]
    fn test_custom_paths_dropped_in_standard_mode() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = config_with_root(temp_dir.path());
        config.mode = Mode::Standard;

        let mut custom = CustomPaths::default();
        custom.set(Category::Images, Some(PathBuf::from("/photos")));
        create_project(&mut config, "Trip", custom.clone()).unwrap();
        assert!(!config.projects["Trip"].custom_paths.has_any());

        config.mode = Mode::Custom;
        create_project(&mut config, "Hike", custom).unwrap();
        assert_eq!(
            config.projects["Hike"].custom_paths.get(Category::Images),
            Some(Path::new("/photos"))
        );
    }

    #[test]
    fn test_sync_adds_and_prunes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Alpha")).unwrap();
        fs::create_dir(temp_dir.path().join("Beta")).unwrap();
        fs::write(temp_dir.path().join("loose.txt"), "x").unwrap();

        let mut config = config_with_root(temp_dir.path());
        config.projects.insert(
            "Gone".to_string(),
            Project::new("Gone", &temp_dir.path().join("Gone")),
        );

        let names = sync_with_root(&mut config).unwrap();
        assert_eq!(names, vec!["Alpha".to_string(), "Beta".to_string()]);
        assert!(config.projects.contains_key("Alpha"));
        assert!(!config.projects.contains_key("Gone"));
        assert_eq!(
            config.projects["Beta"].standard_paths.other,
            temp_dir.path().join("Beta").join("Other")
        );
    }

    #[test]
    fn test_sync_keeps_existing_overrides() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Alpha")).unwrap();

        let mut config = config_with_root(temp_dir.path());
        let mut project = Project::new("Alpha", &temp_dir.path().join("Alpha"));
        project
            .custom_paths
            .set(Category::Vmdk, Some(PathBuf::from("/disks")));
        config.projects.insert("Alpha".to_string(), project);

        sync_with_root(&mut config).unwrap();
        assert!(config.projects["Alpha"].custom_paths.has_any());
    }

    #[test]
    fn test_sync_without_root_changes_nothing() {
        let mut config = AppConfig::default();
        config
            .projects
            .insert("Kept".to_string(), Project::new("Kept", Path::new("/x/Kept")));

        assert!(sync_with_root(&mut config).unwrap().is_empty());
        assert!(config.projects.contains_key("Kept"));

        config.global_project_path = "/definitely/not/here".to_string();
        assert!(sync_with_root(&mut config).unwrap().is_empty());
        assert!(config.projects.contains_key("Kept"));
    }

    #[test]
    fn test_set_active_requires_known_project() {
        let mut config = AppConfig::default();
        assert!(set_active(&mut config, "Nope").is_err());

        config
            .projects
            .insert("Trip".to_string(), Project::new("Trip", Path::new("/r/Trip")));
        set_active(&mut config, "Trip").unwrap();
        assert_eq!(config.active_project, "Trip");
    }

    #[test]
    fn test_set_and_clear_custom_path() {
        let mut config = AppConfig::default();
        config
            .projects
            .insert("Trip".to_string(), Project::new("Trip", Path::new("/r/Trip")));

        set_custom_path(
            &mut config,
            "Trip",
            Category::Documents,
            Some(PathBuf::from("/docs")),
        )
        .unwrap();
        assert!(config.projects["Trip"].custom_paths.has_any());

        set_custom_path(&mut config, "Trip", Category::Documents, None).unwrap();
        assert!(!config.projects["Trip"].custom_paths.has_any());

        assert!(set_custom_path(&mut config, "Nope", Category::Other, None).is_err());
    }

    #[test]
    fn test_relative_paths_are_stored_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let mut config = AppConfig::default();

        set_root(&mut config, Path::new("projects")).unwrap();
        assert_eq!(Path::new(&config.global_project_path), cwd.join("projects"));

        config
            .projects
            .insert("Trip".to_string(), Project::new("Trip", Path::new("/r/Trip")));
        let photos = Some(PathBuf::from("photos"));
        set_custom_path(&mut config, "Trip", Category::Images, photos).unwrap();
        assert_eq!(
            config.projects["Trip"].custom_paths.get(Category::Images),
            Some(cwd.join("photos").as_path())
        );
    }

    #[test]
    fn test_create_project_stores_absolute_overrides() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = config_with_root(temp_dir.path());

        let mut custom = CustomPaths::default();
        custom.set(Category::Vmdk, Some(PathBuf::from("disks")));
        create_project(&mut config, "Trip", custom).unwrap();

        let stored = config.projects["Trip"].custom_paths.get(Category::Vmdk).unwrap();
        assert!(stored.is_absolute());
        assert!(stored.ends_with("disks"));
    }
}
