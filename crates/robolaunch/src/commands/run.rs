//! Run command implementation
//!
//! Starts the robot program with a Python interpreter. The launcher has
//! already checked that the main file holds exactly one robot class; the
//! child's exit status becomes the launcher's.

use std::{
    env,
    ffi::OsString,
    path::PathBuf,
    process::Command,
};

use anyhow::{Context, Result};
use robolaunch_core::{BoundArgs, ContextKey, Outcome, RobotClass, Signature, Subcommand, SubcommandParser};

pub const DOC: &str = "Run the robot program

Executes the main file with a Python interpreter from the project
directory. Arguments after the subcommand's own flags are passed to the
robot program unchanged.";

const INTERPRETERS: &[&str] = &["python3", "python"];

pub fn register(parser: &mut SubcommandParser) -> Result<Box<dyn Subcommand>> {
    parser
        .value("interpreter", "Python interpreter to use (default: python3 on PATH)")
        .trailing("args", "Arguments passed to the robot program");
    Ok(Box::new(Run))
}

#[derive(Debug)]
pub struct Run;

impl Subcommand for Run {
    fn signature(&self) -> Signature {
        Signature::new()
            .context(ContextKey::RobotClass)
            .context(ContextKey::MainFile)
            .context(ContextKey::ProjectPath)
            .keyword_only("interpreter")
            .option("args")
    }

    fn run(&self, args: &BoundArgs<'_>) -> Result<Outcome> {
        let class = args.robot_class()?;
        let main_file = args.main_file()?;
        let project = args.project_path()?;
        let interpreter = find_interpreter(args.text("interpreter")?)?;
        let python_path = search_path(class, env::var_os("PYTHONPATH"))?;

        tracing::info!(
            robot = %class,
            interpreter = %interpreter.display(),
            "starting robot program"
        );

        let status = Command::new(&interpreter)
            .arg(main_file)
            .args(args.list("args")?)
            .current_dir(project)
            .env("PYTHONPATH", python_path)
            .status()
            .with_context(|| format!("Failed to execute {}", interpreter.display()))?;

        tracing::debug!(%status, "robot program exited");
        // Killed by a signal: no code to forward
        Ok(Outcome::Code(status.code().unwrap_or(1)))
    }
}

fn find_interpreter(requested: Option<&str>) -> Result<PathBuf> {
    if let Some(requested) = requested {
        return Ok(PathBuf::from(requested));
    }
    INTERPRETERS
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No Python interpreter found on PATH (tried {}); use --interpreter",
                INTERPRETERS.join(", ")
            )
        })
}

/// `PYTHONPATH` with the robot module's own directory first.
fn search_path(class: &RobotClass, existing: Option<OsString>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = vec![class.search_path.clone()];
    if let Some(existing) = existing {
        entries.extend(
            env::split_paths(&existing)
                .filter(|entry| *entry != class.search_path && !entry.as_os_str().is_empty()),
        );
    }
    env::join_paths(entries).context("Invalid PYTHONPATH entry")
}
