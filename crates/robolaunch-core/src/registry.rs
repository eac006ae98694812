//! Subcommand registry
//!
//! Subcommands are plugins listed in a static table of [`PluginEntry`]
//! values. At startup each constructor gets its own [`SubcommandParser`] to
//! register flags on, and hands back the handler that will run if the user
//! selects it.

use std::collections::BTreeSet;

use clap::{Arg, ArgAction, Command};

use crate::{
    dispatch::BoundArgs,
    options::{OptionKind, RegisteredOption},
    signature::Signature,
    Error, Outcome, Result,
};

const NO_SUBCOMMANDS: &str = "No subcommands available -- robot code can't do anything. \
                              Install or enable packages that provide subcommands";

/// A unit of launcher functionality selected by name on the command line.
pub trait Subcommand {
    /// Parameters `run` expects to receive.
    fn signature(&self) -> Signature;

    fn run(&self, args: &BoundArgs<'_>) -> anyhow::Result<Outcome>;
}

pub type Constructor = fn(&mut SubcommandParser) -> anyhow::Result<Box<dyn Subcommand>>;

/// One row of the plugin table.
#[derive(Clone, Copy)]
pub struct PluginEntry {
    pub name: &'static str,
    /// First line is the summary in the command listing; the whole text is
    /// the subcommand's own help
    pub doc: &'static str,
    pub construct: Constructor,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Parser builder handed to a plugin constructor.
#[derive(Debug)]
pub struct SubcommandParser {
    name: &'static str,
    command: Command,
    options: Vec<RegisteredOption>,
}

impl SubcommandParser {
    fn new(name: &'static str, doc: &str) -> Self {
        let mut command = Command::new(name);
        if let Some(summary) = summary(doc) {
            command = command.about(summary.to_string());
        }
        let description = doc.trim();
        if !description.is_empty() {
            command = command.long_about(description.to_string());
        }
        Self {
            name,
            command,
            options: Vec::new(),
        }
    }

    /// Register an argument. Its id is the name the value is bound under.
    pub fn arg(&mut self, arg: Arg, kind: OptionKind) -> &mut Self {
        self.options.push(RegisteredOption {
            name: arg.get_id().as_str().to_string(),
            kind,
        });
        let command = std::mem::replace(&mut self.command, Command::new(self.name));
        self.command = command.arg(arg);
        self
    }

    /// `--<id>` boolean switch, underscores spelled as dashes
    pub fn flag(&mut self, id: &'static str, help: &'static str) -> &mut Self {
        self.arg(
            Arg::new(id).long(long_name(id)).action(ArgAction::SetTrue).help(help),
            OptionKind::Flag,
        )
    }

    /// `--<id> <VALUE>`, underscores spelled as dashes
    pub fn value(&mut self, id: &'static str, help: &'static str) -> &mut Self {
        self.arg(
            Arg::new(id).long(long_name(id)).action(ArgAction::Set).help(help),
            OptionKind::Value,
        )
    }

    /// Everything after the subcommand's own flags, verbatim
    pub fn trailing(&mut self, id: &'static str, help: &'static str) -> &mut Self {
        self.arg(
            Arg::new(id)
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help(help),
            OptionKind::Multiple,
        )
    }
}

fn long_name(id: &str) -> String {
    id.replace('_', "-")
}

fn summary(doc: &str) -> Option<&str> {
    doc.trim().lines().next().map(str::trim).filter(|line| !line.is_empty())
}

pub struct SubcommandDescriptor {
    name: &'static str,
    summary: Option<String>,
    parser: Command,
    options: Vec<RegisteredOption>,
    handler: Box<dyn Subcommand>,
}

impl SubcommandDescriptor {
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn options(&self) -> &[RegisteredOption] {
        &self.options
    }

    pub fn handler(&self) -> &dyn Subcommand {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for SubcommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubcommandDescriptor")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A plugin that was skipped because its constructor failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginWarning {
    pub name: String,
    pub cause: String,
}

impl std::fmt::Display for PluginWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WARNING: Ignoring error in '{}': {}", self.name, self.cause)
    }
}

#[derive(Debug)]
pub struct Discovery {
    pub registry: Registry,
    pub warnings: Vec<PluginWarning>,
}

/// Successfully constructed subcommands, sorted by name.
#[derive(Debug)]
pub struct Registry {
    commands: Vec<SubcommandDescriptor>,
}

impl Registry {
    /// Construct every plugin in `entries`.
    ///
    /// A failing constructor is fatal unless `lenient`, in which case it is
    /// skipped and reported in [`Discovery::warnings`]. Ending up with no
    /// subcommands at all is a usage error.
    pub fn discover(entries: &[PluginEntry], lenient: bool) -> Result<Discovery> {
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|entry| entry.name);

        let mut seen = BTreeSet::new();
        let mut commands = Vec::with_capacity(sorted.len());
        let mut warnings = Vec::new();

        for entry in sorted {
            let constructed = if seen.insert(entry.name) {
                construct(entry)
            } else {
                Err(anyhow::anyhow!("subcommand '{}' is registered more than once", entry.name))
            };

            match constructed {
                Ok(descriptor) => {
                    tracing::debug!(name = entry.name, "registered subcommand");
                    commands.push(descriptor);
                }
                Err(err) if lenient => {
                    let warning = PluginWarning {
                        name: entry.name.to_string(),
                        cause: format!("{err:#}"),
                    };
                    tracing::debug!(plugin = entry.name, "{warning}");
                    warnings.push(warning);
                }
                Err(err) => {
                    return Err(Error::Plugin {
                        name: entry.name.to_string(),
                        cause: format!("{err:#}"),
                    })
                }
            }
        }

        if commands.is_empty() {
            return Err(Error::usage(NO_SUBCOMMANDS));
        }

        Ok(Discovery {
            registry: Self { commands },
            warnings,
        })
    }

    pub fn get(&self, name: &str) -> Option<&SubcommandDescriptor> {
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(SubcommandDescriptor::name)
    }

    /// Add every subcommand parser to `parent`, in name order.
    pub fn attach(&self, parent: Command) -> Command {
        self.commands
            .iter()
            .fold(parent, |cmd, desc| cmd.subcommand(desc.parser.clone()))
    }
}

fn construct(entry: PluginEntry) -> anyhow::Result<SubcommandDescriptor> {
    let mut parser = SubcommandParser::new(entry.name, entry.doc);
    let handler = (entry.construct)(&mut parser)?;

    Ok(SubcommandDescriptor {
        name: entry.name,
        summary: summary(entry.doc).map(str::to_string),
        parser: parser.command,
        options: parser.options,
        handler,
    })
}
