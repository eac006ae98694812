//! robolaunch library interface
//!
//! Exposes the CLI entry point and the built-in subcommand table so
//! integration tests can drive the launcher with their own plugins.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::panic))]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
