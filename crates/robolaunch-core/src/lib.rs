//! # robolaunch-core
//!
//! Subcommand registry, argument binding and robot loading for the
//! `robolaunch` launcher.
//!
//! ## Flow
//!
//! 1. [`Registry::discover`] constructs every plugin from a static table and
//!    lets each register its own flags.
//! 2. The CLI parses arguments into [`ParsedOptions`].
//! 3. [`dispatch`] binds the selected subcommand's declared [`Signature`]
//!    against an [`InvocationContext`] and runs it once, normalizing the
//!    returned [`Outcome`] to an exit code.
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, Error>`; nothing in this crate
//! exits the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::panic))]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod dispatch;
mod error;
pub mod loader;
pub mod options;
pub mod outcome;
pub mod paths;
pub mod registry;
pub mod signature;

pub use config::Config;
pub use context::InvocationContext;
pub use dispatch::{bind, dispatch, BoundArgs};
pub use error::{Error, LoadError, Result};
pub use loader::{RobotClass, RobotLoader, SourceRobotLoader};
pub use options::{GlobalOptions, OptionKind, OptionValue, ParsedOptions};
pub use outcome::Outcome;
pub use registry::{Discovery, PluginEntry, PluginWarning, Registry, Subcommand, SubcommandParser};
pub use signature::{ContextKey, ParamKind, Parameter, Signature};
