//! The user's main file and directories derived from it
//!
//! The main file path is process-global: set once at startup, read-only
//! afterwards.

use std::{
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

pub const DEFAULT_MAIN_FILE: &str = "robot.py";
pub const DEPLOY_DIRECTORY: &str = "deploy";

static MAIN_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Make `path` absolute; a directory gets the default main file name appended.
pub fn resolve_main_file(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    if absolute.is_dir() {
        Ok(absolute.join(DEFAULT_MAIN_FILE))
    } else {
        Ok(absolute)
    }
}

/// Record the main file for this process. Returns false if one was already set.
pub fn set_main_file(path: PathBuf) -> bool {
    MAIN_FILE.set(path).is_ok()
}

pub fn main_file() -> Option<&'static Path> {
    MAIN_FILE.get().map(PathBuf::as_path)
}

/// Directory the robot program operates from
pub fn operating_directory() -> Option<&'static Path> {
    main_file().and_then(Path::parent)
}

/// Directory for files deployed alongside the robot program in `project`
pub fn deploy_directory_for(project: &Path) -> PathBuf {
    project.join(DEPLOY_DIRECTORY)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_directory_gets_default_file_name() -> io::Result<()> {
        let dir = TempDir::new()?;
        let resolved = resolve_main_file(dir.path())?;
        assert_eq!(resolved, dir.path().join(DEFAULT_MAIN_FILE));
        Ok(())
    }

    #[test]
    fn test_relative_file_becomes_absolute() -> io::Result<()> {
        let resolved = resolve_main_file(Path::new("does-not-exist/robot.py"))?;
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("does-not-exist/robot.py"));
        Ok(())
    }

    #[test]
    fn test_global_main_file_is_set_once() {
        let first = set_main_file(PathBuf::from("/proj/robot.py"));
        let second = set_main_file(PathBuf::from("/other/robot.py"));

        assert!(!second);
        if first {
            assert_eq!(main_file(), Some(Path::new("/proj/robot.py")));
            assert_eq!(operating_directory(), Some(Path::new("/proj")));
            assert_eq!(
                operating_directory().map(deploy_directory_for),
                Some(PathBuf::from("/proj/deploy"))
            );
        }
    }
}
