//! Loading the user's robot class
//!
//! The launcher never executes user code itself. A [`RobotLoader`] takes the
//! path of the main file and returns the single class in it that implements
//! the robot base capability, or a [`LoadError`].

pub mod outline;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::LoadError;

/// Base classes that make a user class a robot.
pub const DEFAULT_ROBOT_BASES: &[&str] = &[
    "RobotBase",
    "IterativeRobotBase",
    "TimedRobot",
    "TimesliceRobot",
    "TimedCommandRobot",
    "MagicRobot",
];

/// The robot class found in the user's main file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotClass {
    pub name: String,
    /// Module name, i.e. the main file's stem
    pub module: String,
    pub path: PathBuf,
    /// Line of the `class` statement
    pub line: usize,
    pub bases: Vec<String>,
    /// Directory the module's own imports are resolved against; goes first
    /// on the interpreter's search path
    pub search_path: PathBuf,
}

impl fmt::Display for RobotClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

pub trait RobotLoader {
    fn load(&self, path: &Path) -> Result<RobotClass, LoadError>;
}

/// Finds the robot class by reading the main file's source.
#[derive(Debug, Clone)]
pub struct SourceRobotLoader {
    robot_bases: BTreeSet<String>,
}

impl Default for SourceRobotLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ROBOT_BASES.iter().copied())
    }
}

impl SourceRobotLoader {
    pub fn new<S: Into<String>>(robot_bases: impl IntoIterator<Item = S>) -> Self {
        Self {
            robot_bases: robot_bases.into_iter().map(Into::into).collect(),
        }
    }

    fn check_path(path: &Path) -> Result<(), LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(LoadError::IsDirectory(path.to_path_buf()));
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("py") {
            return Err(LoadError::NotAModule(path.to_path_buf()));
        }
        Ok(())
    }

    fn read_source(path: &Path) -> Result<String, LoadError> {
        let import_failed = |reason: String| LoadError::ImportFailed {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| import_failed(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| import_failed(format!("source is not valid UTF-8: {e}")))
    }
}

impl RobotLoader for SourceRobotLoader {
    fn load(&self, path: &Path) -> Result<RobotClass, LoadError> {
        Self::check_path(path)?;
        let source = Self::read_source(path)?;
        let parsed = outline::outline(source.trim_start_matches('\u{feff}')).map_err(|e| {
            LoadError::ImportFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        // Later definitions rebind the name, as at module level
        let defs: BTreeMap<&str, &outline::ClassDef> = parsed
            .classes
            .iter()
            .map(|class| (class.name.as_str(), class))
            .collect();

        let mut robots: BTreeSet<&str> = BTreeSet::new();
        loop {
            let found: Vec<&str> = defs
                .iter()
                .filter(|(name, _)| !robots.contains(*name))
                .filter(|(_, def)| {
                    def.bases.iter().any(|base| {
                        let target = parsed.resolve(base);
                        self.robot_bases.contains(target)
                            || (!base.contains('.') && robots.contains(target))
                    })
                })
                .map(|(name, _)| *name)
                .collect();
            if found.is_empty() {
                break;
            }
            robots.extend(found);
        }

        let module = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let search_path = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut classes: Vec<RobotClass> = robots
            .iter()
            .filter_map(|name| defs.get(name))
            .map(|def| RobotClass {
                name: def.name.clone(),
                module: module.clone(),
                path: path.to_path_buf(),
                line: def.line,
                bases: def.bases.clone(),
                search_path: search_path.clone(),
            })
            .collect();

        tracing::debug!(
            path = %path.display(),
            count = classes.len(),
            "outlined main file for robot classes"
        );

        match classes.len() {
            0 => Err(LoadError::NoRobotClass(path.to_path_buf())),
            1 => classes
                .pop()
                .ok_or_else(|| LoadError::NoRobotClass(path.to_path_buf())),
            _ => Err(LoadError::MultipleRobotClasses {
                path: path.to_path_buf(),
                classes,
            }),
        }
    }
}
