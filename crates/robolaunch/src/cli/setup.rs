//! Early setup that runs before full argument parsing
//!
//! - Early flag parsing (`--verbose`, `--ignore-plugin-errors`)
//! - Logging initialization with tracing

use std::ffi::OsString;

use anyhow::Result;

/// Launcher flags needed before the parser exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EarlyFlags {
    pub verbose: bool,
    pub ignore_plugin_errors: bool,
}

/// Scan the launcher's own flags, i.e. those before the subcommand name.
///
/// Arguments after the subcommand belong to it (or to the robot program),
/// so a `-v` there does not count.
pub fn parse_early_flags(args: &[OsString]) -> EarlyFlags {
    let mut flags = EarlyFlags::default();
    let mut rest = args.iter().skip(1).map(|arg| arg.to_str());

    while let Some(arg) = rest.next() {
        match arg {
            Some("-v" | "--verbose") => flags.verbose = true,
            Some("--ignore-plugin-errors") => flags.ignore_plugin_errors = true,
            Some("--main") => {
                rest.next();
            }
            Some(flag) if flag.starts_with('-') && flag != "--" => {}
            _ => break,
        }
    }

    flags
}

/// Initialize the tracing subscriber
///
/// Logs go to stderr so they never mix with subcommand output. `RUST_LOG`
/// is honored; `--verbose` raises the floor to DEBUG.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<OsString> {
        raw.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_early_flags_before_subcommand() {
        let flags = parse_early_flags(&args(&[
            "robolaunch",
            "--main",
            "src",
            "-v",
            "--ignore-plugin-errors",
            "info",
        ]));
        assert_eq!(
            flags,
            EarlyFlags {
                verbose: true,
                ignore_plugin_errors: true,
            }
        );
    }

    #[test]
    fn test_flags_after_subcommand_are_not_launcher_flags() {
        let flags = parse_early_flags(&args(&["robolaunch", "run", "-v", "--ignore-plugin-errors"]));
        assert_eq!(flags, EarlyFlags::default());
    }

    #[test]
    fn test_main_value_is_not_mistaken_for_subcommand() {
        let flags = parse_early_flags(&args(&["robolaunch", "--main", "-v", "info"]));
        assert!(!flags.verbose);
    }

    #[test]
    fn test_double_dash_ends_scan() {
        let flags = parse_early_flags(&args(&["robolaunch", "--", "--verbose"]));
        assert!(!flags.verbose);
    }

    #[test]
    fn test_init_tracing_twice_fails_second_time() {
        let _ = init_tracing(false);
        assert!(init_tracing(true).is_err());
    }
}
