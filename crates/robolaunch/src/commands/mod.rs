//! Built-in subcommands
//!
//! Each module exposes `DOC` (first line is the listing summary) and a
//! `register` constructor for the plugin table.

pub mod info;
pub mod init;
pub mod paths;
pub mod run;

use robolaunch_core::PluginEntry;

/// Subcommands shipped with the launcher, in name order.
pub const BUILTIN: &[PluginEntry] = &[
    PluginEntry {
        name: "info",
        doc: info::DOC,
        construct: info::register,
    },
    PluginEntry {
        name: "init",
        doc: init::DOC,
        construct: init::register,
    },
    PluginEntry {
        name: "paths",
        doc: paths::DOC,
        construct: paths::register,
    },
    PluginEntry {
        name: "run",
        doc: run::DOC,
        construct: run::register,
    },
];
