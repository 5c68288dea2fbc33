// tests/command_spec.rs

use std::path::PathBuf;
use std::time::Duration;

use gowatch::cli::Mode;
use gowatch::config::Config;
use gowatch::exec::CommandSpec;

fn config(mode: Mode, entry: Option<&str>) -> Config {
    Config {
        project: PathBuf::from("/tmp/demo"),
        mode,
        entry: entry.map(PathBuf::from),
        window: Duration::from_secs(5),
        hold_after_interrupt: false,
        excludes: Vec::new(),
    }
}

#[test]
fn run_mode_targets_the_entry_file() {
    let spec = CommandSpec::from_config(&config(Mode::Run, Some("/tmp/demo/main.go"))).unwrap();
    assert_eq!(spec.program, "go");
    assert_eq!(spec.args, ["run", "/tmp/demo/main.go"]);
    assert_eq!(spec.cwd, PathBuf::from("/tmp/demo"));
    assert_eq!(spec.to_string(), "go run /tmp/demo/main.go");
}

#[test]
fn test_mode_runs_in_the_project_directory() {
    let spec = CommandSpec::from_config(&config(Mode::Test, None)).unwrap();
    assert_eq!(spec.args, ["test"]);
    assert_eq!(spec.cwd, PathBuf::from("/tmp/demo"));
}

#[test]
fn build_mode_runs_in_the_project_directory() {
    let spec = CommandSpec::from_config(&config(Mode::Build, None)).unwrap();
    assert_eq!(spec.args, ["build"]);
    assert_eq!(spec.cwd, PathBuf::from("/tmp/demo"));
}

#[test]
fn run_mode_without_an_entry_file_is_a_configuration_error() {
    assert!(CommandSpec::from_config(&config(Mode::Run, None)).is_err());
}
