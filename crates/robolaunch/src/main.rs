//! robolaunch CLI - launcher for robot projects
//!
//! Binary name: `robolaunch`

use robolaunch::{cli, commands};

fn main() {
    let code = cli::run(std::env::args_os(), commands::BUILTIN);

    #[allow(clippy::exit)]
    std::process::exit(code);
}
