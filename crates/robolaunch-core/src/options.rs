//! Parsed command-line options
//!
//! `ParsedOptions` is produced once per invocation from the clap matches of
//! the selected subcommand. Values are stored by option id; the kind of each
//! value is whatever the subcommand declared when it registered the option.

use std::{collections::BTreeMap, path::PathBuf};

use clap::ArgMatches;

use crate::{Error, Result};

/// How a registered option is extracted from the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `--name`, stored as a boolean
    Flag,
    /// `--name <VALUE>` or a single positional, stored as an optional string
    Value,
    /// Repeated or trailing values, stored as a list of strings
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Text(Option<String>),
    List(Vec<String>),
}

/// An option a subcommand registered on its parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredOption {
    pub name: String,
    pub kind: OptionKind,
}

/// Launcher-wide options, shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Absolute path to the user's main robot file
    pub main_file: PathBuf,
    pub verbose: bool,
    pub ignore_plugin_errors: bool,
}

#[derive(Debug, Clone)]
pub struct ParsedOptions {
    command: String,
    global: GlobalOptions,
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn new(
        command: impl Into<String>,
        global: GlobalOptions,
        values: BTreeMap<String, OptionValue>,
    ) -> Self {
        Self {
            command: command.into(),
            global,
            values,
        }
    }

    /// Extract the values of every registered option from `matches`.
    ///
    /// A value stored under a different type than its declared kind is a
    /// defect in the subcommand and is reported as an internal error.
    pub fn from_matches(
        command: &str,
        global: GlobalOptions,
        registered: &[RegisteredOption],
        matches: &ArgMatches,
    ) -> Result<Self> {
        let values = registered
            .iter()
            .map(|option| {
                extract(matches, option).map(|value| (option.name.clone(), value))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self::new(command, global, values))
    }

    /// Name of the selected subcommand
    pub fn command(&self) -> &str {
        &self.command
    }

    pub const fn global(&self) -> &GlobalOptions {
        &self.global
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }
}

fn extract(matches: &ArgMatches, option: &RegisteredOption) -> Result<OptionValue> {
    let id = option.name.as_str();
    let mismatch =
        |e: clap::parser::MatchesError| Error::internal(format!("option '{id}' has an unexpected type: {e}"));

    match option.kind {
        OptionKind::Flag => matches
            .try_get_one::<bool>(id)
            .map(|v| OptionValue::Flag(v.copied().unwrap_or(false)))
            .map_err(mismatch),
        OptionKind::Value => matches
            .try_get_one::<String>(id)
            .map(|v| OptionValue::Text(v.cloned()))
            .map_err(mismatch),
        OptionKind::Multiple => matches
            .try_get_many::<String>(id)
            .map(|v| OptionValue::List(v.map(|vals| vals.cloned().collect()).unwrap_or_default()))
            .map_err(mismatch),
    }
}
