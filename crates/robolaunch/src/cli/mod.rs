//! Command-line entry point
//!
//! Plugin discovery has to happen before argument parsing (the registry
//! supplies the subcommand parsers), so `--ignore-plugin-errors` and
//! `--verbose` are read from the raw arguments first.

pub mod diagnostics;
pub mod error;
pub mod setup;

use std::{ffi::OsString, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Arg, ArgAction, Command};
use robolaunch_core::{
    dispatch, paths, Config, Error as CoreError, GlobalOptions, InvocationContext,
    ParsedOptions, PluginEntry, Registry, SourceRobotLoader,
};

use self::diagnostics::Phase;

/// Top-level parser with the launcher's global flags and no subcommands.
pub fn build_cli() -> Command {
    Command::new("robolaunch")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Robot project launcher. See below for subcommands to accomplish \
             various tasks for your robot project.",
        )
        .disable_help_subcommand(true)
        .arg(
            Arg::new("main")
                .long("main")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("The file that contains your main robot class (default: robot.py)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("ignore_plugin_errors")
                .long("ignore-plugin-errors")
                .action(ArgAction::SetTrue)
                .help("Ignore errors caused by plugins (probably should fix or replace instead!)"),
        )
}

/// Run the launcher with `plugins` and return the process exit code.
///
/// Installs logging, loads the layered configuration and reports to stderr.
pub fn run<I, T>(args: I, plugins: &[PluginEntry]) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let early = setup::parse_early_flags(&args);
    let mut stderr = std::io::stderr();

    if setup::init_tracing(early.verbose).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    match Config::load() {
        Ok(config) => run_with_config(args, plugins, &config, &mut stderr),
        Err(err) => {
            let err = anyhow::Error::from(err);
            error::report(&err, &mut stderr);
            error::exit_code(&err)
        }
    }
}

/// Run with an already loaded `config`, writing launcher diagnostics
/// (plugin warnings, errors) to `diag`.
pub fn run_with_config<I, T>(
    args: I,
    plugins: &[PluginEntry],
    config: &Config,
    diag: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    match try_run(&args, plugins, config, diag) {
        Ok(code) => code,
        Err(err) => {
            error::report(&err, diag);
            error::exit_code(&err)
        }
    }
}

fn try_run(
    args: &[OsString],
    plugins: &[PluginEntry],
    config: &Config,
    diag: &mut dyn Write,
) -> Result<i32> {
    diagnostics::enter(Phase::Discovery);

    let lenient =
        config.ignore_plugin_errors || setup::parse_early_flags(args).ignore_plugin_errors;

    let discovery = match Registry::discover(plugins, lenient) {
        Ok(discovery) => discovery,
        Err(CoreError::Usage(msg)) => {
            let usage = build_cli().render_usage();
            let _ = writeln!(diag, "{usage}\n\nrobolaunch: error: {msg}");
            return Ok(1);
        }
        Err(err) => return Err(err.into()),
    };
    for warning in &discovery.warnings {
        let _ = writeln!(diag, "{warning}");
    }
    let registry = discovery.registry;

    diagnostics::enter(Phase::Parsing);
    let mut cli = registry.attach(build_cli());
    let matches = match cli.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(err) => return Ok(report_parse_error(&err)),
    };

    let Some((name, sub_matches)) = matches.subcommand() else {
        cli.print_help().context("Failed to print help")?;
        return Ok(1);
    };
    let descriptor = registry
        .get(name)
        .ok_or_else(|| CoreError::internal(format!("subcommand '{name}' has no handler")))?;

    let main_arg = matches
        .get_one::<PathBuf>("main")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&config.main_file));
    let main_file = paths::resolve_main_file(&main_arg)
        .with_context(|| format!("Failed to resolve main file {}", main_arg.display()))?;
    if !paths::set_main_file(main_file.clone()) {
        tracing::debug!("main file already recorded for this process");
    }

    let global = GlobalOptions {
        main_file,
        verbose: matches.get_flag("verbose"),
        ignore_plugin_errors: lenient,
    };

    diagnostics::install(name);

    diagnostics::enter(Phase::Dispatch);
    let options = ParsedOptions::from_matches(name, global, descriptor.options(), sub_matches)?;
    let loader = SourceRobotLoader::new(config.robot_bases.iter().cloned());
    let ctx = InvocationContext::new(options, Box::new(loader));

    let code = dispatch(descriptor.handler(), &ctx)?;

    diagnostics::enter(Phase::Finished);
    tracing::debug!(command = name, code, "subcommand finished");
    Ok(code)
}

/// Print a clap error or help/version request and pick the exit code.
///
/// A help request did not run anything, so it exits with 1 like any other
/// usage error; only `--version` counts as success.
fn report_parse_error(err: &clap::Error) -> i32 {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cli_has_global_flags() {
        let cmd = build_cli();
        let ids: Vec<&str> = cmd.get_arguments().map(|a| a.get_id().as_str()).collect();
        assert!(ids.contains(&"main"));
        assert!(ids.contains(&"verbose"));
        assert!(ids.contains(&"ignore_plugin_errors"));
    }

    #[test]
    fn test_build_cli_is_valid() {
        build_cli().debug_assert();
    }
}
