// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gowatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gowatch",
    version,
    about = "Watch a Go project and rerun a go command when changes settle.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directory to watch for changes.
    #[arg(long, value_name = "DIR")]
    pub project: PathBuf,

    /// Entry file passed to `go run`.
    ///
    /// If omitted, the project tree is searched for a `main.go`.
    #[arg(long, value_name = "PATH")]
    pub main: Option<PathBuf>,

    /// Rerun `go run <main>` on every settled change (the default mode).
    #[arg(long, conflicts_with_all = ["gotest", "gobuild"])]
    pub gorun: bool,

    /// Rerun `go test` on every settled change.
    #[arg(long, conflicts_with = "gobuild")]
    pub gotest: bool,

    /// Rerun `go build` on every settled change.
    #[arg(long)]
    pub gobuild: bool,

    /// Quiet window in seconds: a burst of changes triggers one restart once
    /// no further change arrives for this long.
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub wait: u64,

    /// After an interrupt, only record further changes instead of
    /// restarting the command.
    #[arg(long)]
    pub hold_after_interrupt: bool,

    /// Glob pattern (relative to the project root) whose changes are
    /// ignored. May be given multiple times. `.git/**` is always ignored.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GOWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Which `go` command the supervisor reruns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    Test,
    Build,
}

impl CliArgs {
    /// Resolve the three mode flags into one [`Mode`].
    ///
    /// `clap` already enforces mutual exclusion; with no flag set the mode
    /// is `Run`, matching `--gorun`.
    pub fn mode(&self) -> Mode {
        if self.gotest {
            Mode::Test
        } else if self.gobuild {
            Mode::Build
        } else {
            Mode::Run
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
