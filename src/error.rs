//! Error types shared by the configuration, project and placement layers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name is required")]
    MissingProjectName,

    #[error("A project named '{0}' already exists")]
    DuplicateProject(String),

    #[error("Global project path is not set")]
    GlobalPathNotSet,

    #[error("No project named '{0}'")]
    UnknownProject(String),
}

/// Failure of a single file placement.
///
/// These never abort a batch: the message ends up in the file's log entry.
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("{path} is not a readable file: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    #[error("could not create directory {path}: {source}")]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("could not copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Top-level error type for projorg.
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error loading config {path}: {reason}, using defaults")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("Error saving config {path}: {source}")]
    ConfigSave { path: PathBuf, source: io::Error },

    #[error("No active project. Select one with 'projorg project use <NAME>'")]
    NoActiveProject,

    #[error("Active project '{0}' not found")]
    ActiveProjectNotFound(String),

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("{failed} of {total} files could not be placed")]
    BatchIncomplete { failed: usize, total: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for projorg operations.
pub type Result<T> = std::result::Result<T, OrganizerError>;

impl OrganizerError {
    /// True for errors that reject user input without touching state.
    pub fn is_validation(&self) -> bool {
        matches!(self, OrganizerError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: OrganizerError = ValidationError::DuplicateProject("Trip".to_string()).into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "A project named 'Trip' already exists");
    }

    #[test]
    fn test_copy_error_message_names_both_paths() {
        let err = PlacementError::Copy {
            from: PathBuf::from("/in/a.txt"),
            to: PathBuf::from("/out/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/in/a.txt"));
        assert!(message.contains("/out/a.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_batch_incomplete_message() {
        let err = OrganizerError::BatchIncomplete {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 files could not be placed");
    }
}
