//! Paths command implementation

use std::path::Path;

use anyhow::Result;
use robolaunch_core::{paths, BoundArgs, ContextKey, Outcome, ParsedOptions, Signature, Subcommand, SubcommandParser};

pub const DOC: &str = "Print the directories the launcher uses for this project";

pub fn register(_parser: &mut SubcommandParser) -> Result<Box<dyn Subcommand>> {
    Ok(Box::new(Paths))
}

#[derive(Debug)]
pub struct Paths;

impl Subcommand for Paths {
    fn signature(&self) -> Signature {
        Signature::new()
            .context(ContextKey::Options)
            .context(ContextKey::ProjectPath)
    }

    fn run(&self, args: &BoundArgs<'_>) -> Result<Outcome> {
        print!("{}", render(args.options()?, args.project_path()?));
        Ok(Outcome::Unit)
    }
}

fn render(options: &ParsedOptions, project: &Path) -> String {
    let operating = paths::operating_directory().unwrap_or(project);
    let deploy = paths::deploy_directory_for(operating);
    format!(
        "main:      {}\nproject:   {}\noperating: {}\ndeploy:    {}\n",
        options.global().main_file.display(),
        project.display(),
        operating.display(),
        deploy.display()
    )
}
