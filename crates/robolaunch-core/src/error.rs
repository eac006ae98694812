//! Error types for robolaunch-core
//!
//! - **Usage errors**: malformed CLI input, or nothing registered to run
//! - **Plugin errors**: a subcommand constructor failed during discovery
//! - **Load errors**: the user's robot module is missing, unreadable, or
//!   does not contain exactly one robot class
//! - **Config errors**: unreadable or invalid configuration files and variables
//! - **Internal errors**: a subcommand declared parameters the launcher cannot
//!   satisfy. These are defects in the subcommand, never user input.

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::loader::RobotClass;

/// Failures while loading the user's robot module.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),

    #[error("{} could not be loaded as a python module", .0.display())]
    NotAModule(PathBuf),

    #[error("importing {} failed!\n{reason}", .path.display())]
    ImportFailed { path: PathBuf, reason: String },

    #[error(
        "{} does not contain any robot classes\n\
         - At least one class must inherit from wpilib.RobotBase or its descendents",
        .0.display()
    )]
    NoRobotClass(PathBuf),

    #[error(
        "{} contains multiple robot classes! Must only contain one. Classes found:{}",
        .path.display(),
        class_listing(.classes)
    )]
    MultipleRobotClasses {
        path: PathBuf,
        classes: Vec<RobotClass>,
    },
}

fn class_listing(classes: &[RobotClass]) -> String {
    classes
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|class| format!("\n- {}: {class}", class.name))
        .collect()
}

/// Top-level error type for the launcher.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("{cause}\nPlugin error detected in '{name}' (use --ignore-plugin-errors to ignore this)")]
    Plugin { name: String, cause: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Exit code for a launcher failure.
    ///
    /// Every failure the launcher itself detects exits with 1. Other codes
    /// only ever come from a subcommand's own return value.
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type alias for robolaunch-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn class(name: &str) -> RobotClass {
        RobotClass {
            name: name.to_string(),
            module: "robot".to_string(),
            path: PathBuf::from("/proj/robot.py"),
            line: 1,
            bases: vec!["wpilib.TimedRobot".to_string()],
            search_path: PathBuf::from("/proj"),
        }
    }

    #[test]
    fn test_not_found_names_path() {
        let err = LoadError::NotFound(PathBuf::from("/tmp/missing.py"));
        assert_eq!(err.to_string(), "/tmp/missing.py does not exist");
    }

    #[test]
    fn test_multiple_classes_lists_every_class_sorted() {
        let err = LoadError::MultipleRobotClasses {
            path: Path::new("/proj/robot.py").to_path_buf(),
            classes: vec![class("Zeta"), class("Alpha")],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("/proj/robot.py contains multiple robot classes!"));
        let alpha = msg.find("- Alpha: robot.Alpha");
        let zeta = msg.find("- Zeta: robot.Zeta");
        assert!(alpha.is_some() && zeta.is_some());
        assert!(alpha < zeta);
    }

    #[test]
    fn test_plugin_error_mentions_escape_hatch() {
        let err = Error::Plugin {
            name: "deploy".to_string(),
            cause: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Plugin error detected in 'deploy'"));
        assert!(msg.contains("--ignore-plugin-errors"));
        assert!(msg.starts_with("boom"));
    }

    #[test]
    fn test_load_error_is_transparent() {
        let err = Error::from(LoadError::IsDirectory(PathBuf::from("/proj")));
        assert_eq!(err.to_string(), "/proj is a directory");
        assert_eq!(err.exit_code(), 1);
    }
}
