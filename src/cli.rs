//! Command-line interface module for projorg.
//!
//! This module stands in for the drag-and-drop window: it turns arguments
//! and stdin into file paths for the placement engine and exposes the
//! project and configuration actions as subcommands.

use crate::category::{Category, classify, standard_mapper};
use crate::config::ConfigStore;
use crate::error::{OrganizerError, Result, ValidationError};
use crate::output::OutputFormatter;
use crate::paths::{CustomPaths, Mode, resolve_paths};
use crate::placement::{place_batch_with, plan};
use crate::projects;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Routes files into the category folders of the active project.
#[derive(Debug, Parser)]
#[command(name = "projorg", version, about)]
pub struct Cli {
    /// Config file to use instead of config.json beside the executable
    #[arg(long, env = "PROJORG_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy files into the active project
    Place {
        /// Files to place; wildcards are expanded
        #[arg(required = true)]
        paths: Vec<String>,
        /// Show where files would go without copying
        #[arg(long)]
        dry_run: bool,
    },
    /// Read file paths from stdin, one per line, and place them
    Paste {
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the category for extensions, or the whole table
    Classify { extensions: Vec<String> },
    /// Show the effective directories of a project
    Paths {
        /// Project name, defaults to the active project
        #[arg(long)]
        project: Option<String>,
    },
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Inspect or change global settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project under the global root and make it active
    Add {
        name: String,
        #[command(flatten)]
        overrides: PathOverrides,
    },
    /// List known projects
    List,
    /// Select the active project
    Use { name: String },
    /// Override the directory of one category
    SetPath {
        name: String,
        #[arg(value_enum)]
        category: Category,
        path: PathBuf,
    },
    /// Remove the override of one category
    ClearPath {
        name: String,
        #[arg(value_enum)]
        category: Category,
    },
    /// Reconcile projects with the directories under the global root
    Sync,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration
    Show,
    /// Set the global project root
    SetRoot { path: PathBuf },
    /// Switch between standard and custom paths
    SetMode {
        #[arg(value_enum)]
        mode: Mode,
    },
}

/// Custom directories given when creating a project. Only kept in custom mode.
#[derive(Debug, Clone, Default, Args)]
pub struct PathOverrides {
    #[arg(long, value_name = "PATH")]
    pub documents: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub images: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub vmdk: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub adobe_projects: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub custom_folders: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub other: Option<PathBuf>,
}

impl From<PathOverrides> for CustomPaths {
    fn from(overrides: PathOverrides) -> Self {
        let mut custom = CustomPaths::default();
        custom.set(Category::Documents, overrides.documents);
        custom.set(Category::Images, overrides.images);
        custom.set(Category::Vmdk, overrides.vmdk);
        custom.set(Category::AdobeProjects, overrides.adobe_projects);
        custom.set(Category::CustomFolders, overrides.custom_folders);
        custom.set(Category::Other, overrides.other);
        custom
    }
}

/// Runs the CLI: opens the config store and executes the command.
///
/// A config file that fails to load is reported as a warning and replaced by
/// the defaults.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigStore::default_path()?,
    };
    let mut store = ConfigStore::open(config_path);
    if let Some(e) = store.take_load_error() {
        OutputFormatter::warning(&e.to_string());
    }
    run_command(cli.command, &mut store)
}

/// Executes one command against an open store.
pub fn run_command(command: Command, store: &mut ConfigStore) -> Result<()> {
    match command {
        Command::Place { paths, dry_run } => {
            place_paths(store, &expand_inputs(&paths), dry_run)
        }
        Command::Paste { dry_run } => paste_from(store, io::stdin().lock(), dry_run),
        Command::Classify { extensions } => {
            show_classification(&extensions);
            Ok(())
        }
        Command::Paths { project } => show_paths(store, project.as_deref()),
        Command::Project(command) => run_project_command(command, store),
        Command::Config(command) => run_config_command(command, store),
    }
}

fn run_project_command(command: ProjectCommand, store: &mut ConfigStore) -> Result<()> {
    match command {
        ProjectCommand::Add { name, overrides } => {
            let custom: CustomPaths = overrides.into();
            store.update(|config| {
                projects::create_project(config, &name, custom)?;
                projects::sync_with_root(config).map(|_| ())
            })?;
            OutputFormatter::success(&format!(
                "Project '{}' created and set active",
                store.config().active_project
            ));
        }
        ProjectCommand::List => {
            store.update(projects::sync_with_root)?;
            list_projects(store);
        }
        ProjectCommand::Use { name } => {
            store.update(|config| projects::set_active(config, &name))?;
            OutputFormatter::success(&format!("Active project: {}", name));
        }
        ProjectCommand::SetPath {
            name,
            category,
            path,
        } => {
            store.update(|config| {
                projects::set_custom_path(config, &name, category, Some(path))
            })?;
            let shown = store
                .config()
                .projects
                .get(&name)
                .and_then(|project| project.custom_paths.get(category))
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            OutputFormatter::success(&format!(
                "{} of '{}' now goes to {}",
                category, name, shown
            ));
            if store.config().mode == Mode::Standard {
                OutputFormatter::warning("Standard mode is active; overrides are ignored");
            }
        }
        ProjectCommand::ClearPath { name, category } => {
            store.update(|config| projects::set_custom_path(config, &name, category, None))?;
            OutputFormatter::success(&format!("Cleared {} override of '{}'", category, name));
        }
        ProjectCommand::Sync => {
            let names = store.update(projects::sync_with_root)?;
            OutputFormatter::success(&format!(
                "{} project director{} under the global root",
                names.len(),
                if names.len() == 1 { "y" } else { "ies" }
            ));
        }
    }
    Ok(())
}

fn run_config_command(command: ConfigCommand, store: &mut ConfigStore) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = store.config();
            let root = config
                .root()
                .map(|r| r.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string());
            let active = if config.active_project.is_empty() {
                "(none)"
            } else {
                config.active_project.as_str()
            };

            OutputFormatter::header("CONFIGURATION");
            OutputFormatter::plain(&format!("File:           {}", store.path().display()));
            OutputFormatter::plain(&format!("Global root:    {}", root));
            OutputFormatter::plain(&format!("Mode:           {}", config.mode));
            OutputFormatter::plain(&format!("Active project: {}", active));
            OutputFormatter::plain(&format!("Projects:       {}", config.projects.len()));
        }
        ConfigCommand::SetRoot { path } => {
            if !path.is_dir() {
                OutputFormatter::warning(&format!("{} does not exist yet", path.display()));
            }
            let names = store.update(|config| {
                projects::set_root(config, &path)?;
                projects::sync_with_root(config)
            })?;
            OutputFormatter::success(&format!(
                "Global root set to {} ({} projects found)",
                store.config().global_project_path,
                names.len()
            ));
        }
        ConfigCommand::SetMode { mode } => {
            store.update(|config| {
                projects::set_mode(config, mode);
                Ok(())
            })?;
            OutputFormatter::success(&format!("Mode set to {}", mode));
        }
    }
    Ok(())
}

/// Reads a pasted path list from `reader` and places it like `place`.
pub fn paste_from<R: BufRead>(store: &ConfigStore, reader: R, dry_run: bool) -> Result<()> {
    let paths = read_path_list(reader)?;
    place_paths(store, &paths, dry_run)
}

/// Places `paths` into the active project and prints the log.
///
/// # Errors
///
/// `NoActiveProject`/`ActiveProjectNotFound` before anything is copied, and
/// `BatchIncomplete` after the whole batch ran if any file failed.
fn place_paths(store: &ConfigStore, paths: &[PathBuf], dry_run: bool) -> Result<()> {
    let config = store.config();
    let project = config.active()?;

    if paths.is_empty() {
        OutputFormatter::info("No files to place.");
        return Ok(());
    }

    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Files would be placed into '{}' ({} mode):",
            project.name, config.mode
        ));
        for path in paths {
            let planned = plan(path, project, config.mode);
            OutputFormatter::plain(&format!(
                " - {} → {} ({})",
                path.display(),
                planned.category,
                planned.destination.display()
            ));
        }
        OutputFormatter::dry_run_notice("No files were copied.");
        return Ok(());
    }

    OutputFormatter::info(&format!(
        "Placing {} file(s) into '{}' ({} mode)",
        paths.len(),
        project.name,
        config.mode
    ));

    let pb = (paths.len() > 1)
        .then(|| OutputFormatter::create_progress_bar(paths.len() as u64));
    let log = place_batch_with(config, paths, |entry| {
        let line = OutputFormatter::entry_line(entry);
        match &pb {
            Some(pb) => {
                pb.suspend(|| println!("{}", line));
                pb.inc(1);
            }
            None => println!("{}", line),
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if log.len() > 1 {
        OutputFormatter::summary_table(&log);
    }

    match log.failed_count() {
        0 => Ok(()),
        failed => Err(OrganizerError::BatchIncomplete {
            failed,
            total: log.len(),
        }),
    }
}

fn show_classification(extensions: &[String]) {
    if extensions.is_empty() {
        let mapper = standard_mapper();
        for category in Category::ALL {
            let known = mapper.extensions_for(category);
            let listed = if known.is_empty() {
                match category {
                    Category::Other => "(everything else)".to_string(),
                    _ => "(path configuration only)".to_string(),
                }
            } else {
                known.join(", ")
            };
            OutputFormatter::plain(&format!("{:<15} {}", category.dir_name(), listed));
        }
        return;
    }

    for ext in extensions {
        OutputFormatter::plain(&format!("{} → {}", ext, classify(ext)));
    }
}

fn show_paths(store: &ConfigStore, name: Option<&str>) -> Result<()> {
    let config = store.config();
    let project = match name {
        Some(name) => config
            .projects
            .get(name)
            .ok_or_else(|| ValidationError::UnknownProject(name.to_string()))?,
        None => config.active()?,
    };

    let effective = resolve_paths(
        &project.standard_paths,
        Some(&project.custom_paths),
        config.mode,
    );
    OutputFormatter::header(&format!("{} ({} mode)", project.name, config.mode));
    for category in Category::ALL {
        let path = effective.get(category);
        let marker = if path != project.standard_paths.get(category) {
            " (custom)"
        } else {
            ""
        };
        OutputFormatter::plain(&format!(
            "{:<15} {}{}",
            category.dir_name(),
            path.display(),
            marker
        ));
    }
    Ok(())
}

fn list_projects(store: &ConfigStore) {
    let config = store.config();
    if config.projects.is_empty() {
        OutputFormatter::info("No projects yet. Create one with 'projorg project add <NAME>'.");
        return;
    }
    for name in config.projects.keys() {
        if *name == config.active_project {
            OutputFormatter::success(&format!("{} (active)", name));
        } else {
            OutputFormatter::plain(&format!("  {}", name));
        }
    }
}

/// Expands arguments containing glob wildcards.
///
/// Shells without wildcard expansion pass patterns through verbatim. An
/// argument naming an existing file is taken literally even if it contains
/// wildcard characters. A pattern that matches nothing, or does not parse, is
/// kept as a literal path so it shows up as a failed placement.
pub fn expand_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.contains(['*', '?', '[']) || Path::new(input).exists() {
            paths.push(PathBuf::from(input));
            continue;
        }
        match glob::glob(input) {
            Ok(matches) => {
                let before = paths.len();
                paths.extend(matches.flatten());
                if paths.len() == before {
                    log::warn!("Pattern {} matched nothing", input);
                    paths.push(PathBuf::from(input));
                }
            }
            Err(e) => {
                log::warn!("Invalid pattern {}: {}", input, e);
                paths.push(PathBuf::from(input));
            }
        }
    }
    paths
}

/// Reads one path per line, the way a pasted file list arrives.
///
/// Blank lines are skipped; surrounding whitespace and double quotes are
/// stripped. Lines are taken as raw bytes, so names that are not valid UTF-8
/// survive on Unix. Elsewhere such a line is skipped with a warning.
pub fn read_path_list<R: BufRead>(reader: R) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let trimmed = trim_line(&line);
        if trimmed.is_empty() {
            continue;
        }
        match path_from_bytes(trimmed) {
            Some(path) => paths.push(path),
            None => log::warn!(
                "Skipping pasted line that is not a valid path: {}",
                String::from_utf8_lossy(trimmed)
            ),
        }
    }
    Ok(paths)
}

fn trim_line(line: &[u8]) -> &[u8] {
    let line = line.trim_ascii();
    let start = line.iter().position(|&b| b != b'"').unwrap_or(line.len());
    let end = line.iter().rposition(|&b| b != b'"').map_or(start, |i| i + 1);
    &line[start..end]
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_place() {
        let cli =
            Cli::try_parse_from(["projorg", "place", "a.png", "b.pdf", "--dry-run"]).unwrap();
        match cli.command {
            Command::Place { paths, dry_run } => {
                assert_eq!(paths, vec!["a.png".to_string(), "b.pdf".to_string()]);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_place_requires_paths() {
        assert!(Cli::try_parse_from(["projorg", "place"]).is_err());
    }

    #[test]
    fn test_cli_parses_project_add_overrides() {
        let cli = Cli::try_parse_from([
            "projorg",
            "project",
            "add",
            "Trip",
            "--images",
            "/photos",
            "--adobe-projects",
            "/adobe",
        ])
        .unwrap();
        let Command::Project(ProjectCommand::Add { name, overrides }) = cli.command else {
            panic!("expected project add");
        };
        assert_eq!(name, "Trip");
        let custom: CustomPaths = overrides.into();
        assert_eq!(custom.get(Category::Images), Some(std::path::Path::new("/photos")));
        assert_eq!(
            custom.get(Category::AdobeProjects),
            Some(std::path::Path::new("/adobe"))
        );
        assert_eq!(custom.get(Category::Documents), None);
    }

    #[test]
    fn test_cli_parses_category_and_mode() {
        let cli = Cli::try_parse_from([
            "projorg",
            "project",
            "set-path",
            "Trip",
            "custom-folders",
            "/x",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Project(ProjectCommand::SetPath {
                category: Category::CustomFolders,
                ..
            })
        ));

        let cli = Cli::try_parse_from(["projorg", "config", "set-mode", "standard"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::SetMode {
                mode: Mode::Standard
            })
        ));
    }

    #[test]
    fn test_read_path_list() {
        let input = "/a/photo.png\n\n  \"/b/My Report.pdf\"  \r\n/c/notes.xyz";
        let paths = read_path_list(Cursor::new(input)).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/photo.png"),
                PathBuf::from("/b/My Report.pdf"),
                PathBuf::from("/c/notes.xyz"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_path_list_keeps_non_utf8_lines() {
        use std::os::unix::ffi::OsStrExt;

        let input: &[u8] = b"/a/photo.png\n/b/caf\xe9.png\n\"\"\n";
        let paths = read_path_list(Cursor::new(input)).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], PathBuf::from("/a/photo.png"));
        assert_eq!(paths[1].as_os_str().as_bytes(), b"/b/caf\xe9.png");
    }

    #[test]
    fn test_expand_inputs_prefers_existing_literal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("shot[1].png"), "bracketed").unwrap();
        fs::write(temp_dir.path().join("shot1.png"), "plain").unwrap();

        let literal = temp_dir.path().join("shot[1].png").to_string_lossy().to_string();
        let paths = expand_inputs(&[literal]);
        assert_eq!(paths, vec![temp_dir.path().join("shot[1].png")]);

        let pattern = temp_dir.path().join("shot[0-9].png").to_string_lossy().to_string();
        assert_eq!(expand_inputs(&[pattern]), vec![temp_dir.path().join("shot1.png")]);
    }

    #[test]
    fn test_expand_inputs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.png"), "a").unwrap();
        fs::write(temp_dir.path().join("b.png"), "b").unwrap();
        fs::write(temp_dir.path().join("c.pdf"), "c").unwrap();

        let pattern = temp_dir.path().join("*.png").to_string_lossy().to_string();
        let literal = temp_dir.path().join("c.pdf").to_string_lossy().to_string();
        let missing = temp_dir.path().join("*.gif").to_string_lossy().to_string();

        let paths = expand_inputs(&[pattern, literal.clone(), missing.clone()]);
        assert_eq!(
            paths,
            vec![
                temp_dir.path().join("a.png"),
                temp_dir.path().join("b.png"),
                PathBuf::from(literal),
                PathBuf::from(missing),
            ]
        );
    }
}
