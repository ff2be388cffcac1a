//! projorg - route dropped files into project category folders
//!
//! This library classifies files by extension, resolves the effective target
//! directory of a project (standard layout or custom overrides), copies files
//! there without ever overwriting, and persists the project configuration as
//! JSON.

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod paths;
pub mod placement;
pub mod projects;

pub use category::{Category, classify};
pub use config::{AppConfig, ConfigStore, Project};
pub use error::{OrganizerError, PlacementError, Result, ValidationError};
pub use paths::{CustomPaths, Mode, PathSet, resolve_paths};
pub use placement::{FileCopyEntry, PlacementLog, PlacementStatus, place, place_batch};

pub use cli::{Cli, run_cli};

/// Initializes `env_logger`.
///
/// `verbosity` 0 logs warnings, 1 info, 2 and up debug. `RUST_LOG` overrides.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
