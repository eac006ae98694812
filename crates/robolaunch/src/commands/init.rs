//! Init command implementation
//!
//! Scaffolds a new robot project next to the main file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use robolaunch_core::{paths, BoundArgs, ContextKey, Outcome, Signature, Subcommand, SubcommandParser};

pub const DOC: &str = "Create a new robot project

Writes a minimal robot program to the main file and creates the deploy
directory beside it. An existing main file is left alone unless --force is
given.";

const TEMPLATE: &str = r#"#!/usr/bin/env python3

import wpilib


class MyRobot(wpilib.TimedRobot):
    def robotInit(self):
        """Robot initialization function"""

    def autonomousInit(self):
        """This function is run once each time the robot enters autonomous mode."""

    def autonomousPeriodic(self):
        """This function is called periodically during autonomous."""

    def teleopInit(self):
        """This function is called once each time the robot enters teleoperated mode."""

    def teleopPeriodic(self):
        """This function is called periodically during teleoperated mode."""
"#;

pub fn register(parser: &mut SubcommandParser) -> Result<Box<dyn Subcommand>> {
    parser.flag("force", "Overwrite an existing main file");
    Ok(Box::new(Init))
}

#[derive(Debug)]
pub struct Init;

impl Subcommand for Init {
    fn signature(&self) -> Signature {
        Signature::new()
            .context(ContextKey::MainFile)
            .context(ContextKey::ProjectPath)
            .option("force")
    }

    fn run(&self, args: &BoundArgs<'_>) -> Result<Outcome> {
        let main_file = args.main_file()?;
        let project = args.project_path()?;
        let force = args.flag("force")?;

        if main_file.exists() && !force {
            eprintln!(
                "ERROR: {} already exists (use --force to overwrite)",
                main_file.display()
            );
            return Ok(Outcome::Bool(false));
        }

        scaffold(main_file, project)?;
        println!("Created {}", main_file.display());
        Ok(Outcome::Bool(true))
    }
}

fn scaffold(main_file: &Path, project: &Path) -> Result<()> {
    fs::create_dir_all(project)
        .with_context(|| format!("Failed to create {}", project.display()))?;
    fs::write(main_file, TEMPLATE)
        .with_context(|| format!("Failed to write {}", main_file.display()))?;

    let deploy = paths::deploy_directory_for(project);
    fs::create_dir_all(&deploy)
        .with_context(|| format!("Failed to create {}", deploy.display()))?;

    tracing::debug!(main = %main_file.display(), "scaffolded robot project");
    Ok(())
}

#[cfg(test)]
mod tests {
    use robolaunch_core::{RobotLoader, SourceRobotLoader};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_scaffold_creates_loadable_project() -> Result<()> {
        let dir = TempDir::new()?;
        let main_file = dir.path().join("robot.py");

        scaffold(&main_file, dir.path())?;

        assert!(dir.path().join("deploy").is_dir());
        let class = SourceRobotLoader::default().load(&main_file)?;
        assert_eq!(class.name, "MyRobot");
        Ok(())
    }

    #[test]
    fn test_signature_uses_context_and_force() {
        let sig = Init.signature();
        assert!(sig.needs(ContextKey::MainFile));
        assert!(sig.needs(ContextKey::ProjectPath));
        assert!(!sig.needs(ContextKey::RobotClass));
    }
}
