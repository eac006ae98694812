//! Info command implementation
//!
//! Reports the robot class the launcher would run.

use std::path::Path;

use anyhow::{Context, Result};
use robolaunch_core::{BoundArgs, ContextKey, Outcome, RobotClass, Signature, Subcommand, SubcommandParser};
use serde::Serialize;

pub const DOC: &str = "Show the robot class found in the main file

Loads the main file the same way `run` does and prints where the robot
class is defined. Use --json for machine readable output.";

pub fn register(parser: &mut SubcommandParser) -> Result<Box<dyn Subcommand>> {
    parser.flag("json", "Output as JSON");
    Ok(Box::new(Info))
}

#[derive(Debug)]
pub struct Info;

/// JSON output for `info --json`
#[derive(Debug, Serialize)]
struct InfoOutput<'a> {
    main_file: &'a Path,
    robot_class: &'a RobotClass,
    qualified_name: String,
}

impl Subcommand for Info {
    fn signature(&self) -> Signature {
        Signature::new()
            .context(ContextKey::RobotClass)
            .context(ContextKey::MainFile)
            .keyword_only("json")
    }

    fn run(&self, args: &BoundArgs<'_>) -> Result<Outcome> {
        let class = args.robot_class()?;
        let main_file = args.main_file()?;

        if args.flag("json")? {
            let output = InfoOutput {
                main_file,
                robot_class: class,
                qualified_name: class.to_string(),
            };
            let json = serde_json::to_string_pretty(&output)
                .context("Failed to serialize robot class")?;
            println!("{json}");
        } else {
            print!("{}", render(main_file, class));
        }

        Ok(Outcome::Unit)
    }
}

fn render(main_file: &Path, class: &RobotClass) -> String {
    format!(
        "Main file:   {}\nRobot class: {} (line {})\nModule:      {}\nBases:       {}\n",
        main_file.display(),
        class.name,
        class.line,
        class.module,
        class.bases.join(", ")
    )
}
