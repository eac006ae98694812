//! End-to-end tests for the robolaunch binary
//!
//! Each test runs in its own temporary project directory with the user's
//! configuration and ROBOLAUNCH_* overrides stripped from the environment.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ROBOT: &str = "\
import wpilib


class MyRobot(wpilib.TimedRobot):
    def robotInit(self):
        pass
";

const TWO_ROBOTS: &str = "\
from wpilib import TimedRobot as Base


class First(Base):
    pass


class Second(First):
    pass
";

fn robolaunch(project: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_robolaunch"));
    cmd.current_dir(project.path())
        .env("XDG_CONFIG_HOME", project.path().join(".config"))
        .env_remove("ROBOLAUNCH_MAIN")
        .env_remove("ROBOLAUNCH_ROBOT_BASES")
        .env_remove("ROBOLAUNCH_IGNORE_PLUGIN_ERRORS")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> std::io::Result<()> {
    std::fs::write(dir.join(name), contents)
}

#[test]
fn help_exits_nonzero_and_lists_subcommands_sorted() {
    let project = TempDir::new().unwrap();
    let output = robolaunch(&project).arg("--help").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let positions: Vec<usize> = ["info", "init", "paths", "run"]
        .iter()
        .map(|name| stdout.find(&format!("  {name} ")).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn no_subcommand_prints_help_and_fails() {
    let project = TempDir::new().unwrap();
    robolaunch(&project)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_exits_zero() {
    let project = TempDir::new().unwrap();
    robolaunch(&project)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let project = TempDir::new().unwrap();
    robolaunch(&project)
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("deploy"));
}

#[test]
fn missing_main_file_names_the_path() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("missing.py");

    robolaunch(&project)
        .arg("--main")
        .arg(&missing)
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.py"))
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn init_then_info_finds_the_new_robot() {
    let project = TempDir::new().unwrap();

    robolaunch(&project)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("robot.py"));
    assert!(project.path().join("robot.py").is_file());
    assert!(project.path().join("deploy").is_dir());

    robolaunch(&project)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Robot class: MyRobot"));

    robolaunch(&project)
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));

    robolaunch(&project).args(["init", "--force"]).assert().success();
}

#[test]
fn main_directory_gets_robot_py_appended() {
    let project = TempDir::new().unwrap();
    let src = project.path().join("src");
    std::fs::create_dir(&src).unwrap();
    write(&src, "robot.py", ROBOT).unwrap();

    robolaunch(&project)
        .arg("--main")
        .arg(&src)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("MyRobot"));
}

#[test]
fn multiple_robot_classes_are_listed() {
    let project = TempDir::new().unwrap();
    write(project.path(), "robot.py", TWO_ROBOTS).unwrap();

    robolaunch(&project)
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("multiple robot classes"))
        .stderr(predicate::str::contains("- First: robot.First"))
        .stderr(predicate::str::contains("- Second: robot.Second"));
}

#[test]
fn no_robot_class_is_reported() {
    let project = TempDir::new().unwrap();
    write(project.path(), "robot.py", "class Helper:\n    pass\n").unwrap();

    robolaunch(&project)
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not contain any robot classes"));
}

#[test]
fn info_json_is_parseable() {
    let project = TempDir::new().unwrap();
    write(project.path(), "robot.py", ROBOT).unwrap();

    let output = robolaunch(&project).args(["info", "--json"]).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["qualified_name"], "robot.MyRobot");
    assert_eq!(value["robot_class"]["name"], "MyRobot");
}

#[test]
fn project_config_selects_main_file() {
    let project = TempDir::new().unwrap();
    write(project.path(), "bot.py", ROBOT).unwrap();
    write(project.path(), ".robolaunch.toml", "main_file = \"bot.py\"\n").unwrap();

    robolaunch(&project)
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("bot.py"));
}

#[test]
fn verbose_logging_covers_config_loading() {
    let project = TempDir::new().unwrap();
    write(project.path(), "robot.py", ROBOT).unwrap();
    write(project.path(), ".robolaunch.toml", "main_file = \"robot.py\"\n").unwrap();

    robolaunch(&project)
        .args(["-v", "paths"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loading config layer"));

    robolaunch(&project)
        .arg("paths")
        .assert()
        .success()
        .stderr(predicate::str::contains("loading config layer").not());
}

#[test]
fn invalid_config_is_reported() {
    let project = TempDir::new().unwrap();
    write(project.path(), ".robolaunch.toml", "main_file = 3\n").unwrap();

    robolaunch(&project)
        .arg("paths")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[cfg(unix)]
#[test]
fn run_forwards_interpreter_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let project = TempDir::new().unwrap();
    write(project.path(), "robot.py", ROBOT).unwrap();
    let interpreter = project.path().join("fake-python");
    std::fs::write(
        &interpreter,
        "#!/bin/sh\necho \"PYTHONPATH=$PYTHONPATH\"\necho \"ARGS=$*\"\nexit 3\n",
    )
    .unwrap();
    std::fs::set_permissions(&interpreter, std::fs::Permissions::from_mode(0o755)).unwrap();

    robolaunch(&project)
        .arg("run")
        .arg("--interpreter")
        .arg(&interpreter)
        .args(["alpha", "--beta"])
        .env_remove("PYTHONPATH")
        .assert()
        .code(3)
        .stdout(predicate::str::contains(format!(
            "PYTHONPATH={}",
            project.path().display()
        )))
        .stdout(predicate::str::contains("robot.py alpha --beta"));
}
