//! Configuration loading
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: ~/.config/robolaunch/config.toml
//! 3. Project config: .robolaunch.toml in the current directory
//! 4. Environment variables: ROBOLAUNCH_*
//! 5. CLI flags
//!
//! # Example Config
//!
//! ```toml
//! main_file = "src/robot.py"
//! robot_bases = ["TimedRobot", "MagicRobot", "MyTeamRobotBase"]
//! ignore_plugin_errors = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{loader::DEFAULT_ROBOT_BASES, paths::DEFAULT_MAIN_FILE, Error, Result};

pub const PROJECT_CONFIG_FILE: &str = ".robolaunch.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Main file used when `--main` is not given, relative to the current directory
    pub main_file: String,
    /// Base class names that make a user class a robot
    pub robot_bases: Vec<String>,
    pub ignore_plugin_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_file: DEFAULT_MAIN_FILE.to_string(),
            robot_bases: DEFAULT_ROBOT_BASES.iter().map(|s| (*s).to_string()).collect(),
            ignore_plugin_errors: false,
        }
    }
}

/// One config file; unset keys leave the lower layer alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    main_file: Option<String>,
    robot_bases: Option<Vec<String>>,
    ignore_plugin_errors: Option<bool>,
}

impl Config {
    /// Load defaults, global and project files, then environment overrides.
    pub fn load() -> Result<Self> {
        let files: Vec<PathBuf> = [global_config_path(), project_config_path()]
            .into_iter()
            .flatten()
            .collect();
        Self::load_from(&files, |key| std::env::var(key).ok())
    }

    /// Load from explicit files (missing ones are skipped) and an environment lookup.
    pub fn load_from(files: &[PathBuf], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        for path in files.iter().filter(|path| path.exists()) {
            tracing::debug!(path = %path.display(), "loading config layer");
            config.merge(load_toml_file(path)?);
        }

        config.apply_env_vars(env)?;
        config.validate()?;
        Ok(config)
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(main_file) = layer.main_file {
            self.main_file = main_file;
        }
        if let Some(robot_bases) = layer.robot_bases {
            self.robot_bases = robot_bases;
        }
        if let Some(ignore) = layer.ignore_plugin_errors {
            self.ignore_plugin_errors = ignore;
        }
    }

    fn apply_env_vars(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        // ROBOLAUNCH_MAIN
        if let Some(value) = env("ROBOLAUNCH_MAIN") {
            self.main_file = value;
        }

        // ROBOLAUNCH_ROBOT_BASES
        if let Some(value) = env("ROBOLAUNCH_ROBOT_BASES") {
            self.robot_bases = value
                .split(',')
                .map(str::trim)
                .filter(|base| !base.is_empty())
                .map(String::from)
                .collect();
        }

        // ROBOLAUNCH_IGNORE_PLUGIN_ERRORS
        if let Some(value) = env("ROBOLAUNCH_IGNORE_PLUGIN_ERRORS") {
            self.ignore_plugin_errors = parse_bool(&value).ok_or_else(|| {
                Error::config(format!("Invalid ROBOLAUNCH_IGNORE_PLUGIN_ERRORS value: {value}"))
            })?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.main_file.trim().is_empty() {
            return Err(Error::config("main_file must not be empty"));
        }
        if self.robot_bases.is_empty() {
            return Err(Error::config("robot_bases must name at least one base class"));
        }
        if let Some(bad) = self
            .robot_bases
            .iter()
            .find(|base| base.is_empty() || base.contains(|c: char| !(c == '_' || c.is_alphanumeric())))
        {
            return Err(Error::config(format!(
                "robot_bases entry '{bad}' is not a class name"
            )));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn load_toml_file(path: &Path) -> Result<ConfigLayer> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse config: {}: {e}", path.display())))
}

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "robolaunch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
}
