// src/config.rs

//! Immutable runtime configuration, resolved once at startup.
//!
//! Everything downstream of `main` reads configuration from this struct;
//! nothing mutates it after construction.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{CliArgs, Mode};
use crate::errors::{GowatchError, Result};
use crate::lookup;

/// Patterns that never trigger a restart, regardless of `--exclude`.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git/**"];

#[derive(Debug, Clone)]
pub struct Config {
    pub project: PathBuf,
    pub mode: Mode,
    /// Entry file for `go run`; `None` for the test and build modes.
    pub entry: Option<PathBuf>,
    /// Quiet window for change aggregation.
    pub window: Duration,
    /// When set, a change arriving after an interrupt is only recorded
    /// instead of restarting the command.
    pub hold_after_interrupt: bool,
    pub excludes: Vec<String>,
}

impl Config {
    /// Validate the parsed flags and resolve them into a [`Config`].
    ///
    /// The entry file is looked up (when needed) and canonicalized here, so
    /// a broken `--main` fails at startup rather than at the first spawn.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        if !args.project.is_dir() {
            return Err(GowatchError::Config(format!(
                "project directory {} does not exist or is not a directory",
                args.project.display()
            )));
        }

        let mode = args.mode();
        let entry = match (&args.main, mode) {
            (Some(path), _) => Some(path.clone()),
            (None, Mode::Run) => Some(
                lookup::find_entry_file(&args.project)?
                    .ok_or_else(|| GowatchError::EntryNotFound(args.project.clone()))?,
            ),
            // test and build run against the project directory itself
            (None, Mode::Test | Mode::Build) => None,
        };

        // Canonicalized so the child can use the project directory as cwd.
        let entry = match entry {
            Some(path) => Some(path.canonicalize().map_err(|err| {
                GowatchError::Config(format!(
                    "entry file {} is not accessible: {err}",
                    path.display()
                ))
            })?),
            None => None,
        };

        let mut excludes: Vec<String> =
            DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(args.exclude.iter().cloned());

        Ok(Self {
            project: args.project.clone(),
            mode,
            entry,
            window: Duration::from_secs(args.wait),
            hold_after_interrupt: args.hold_after_interrupt,
            excludes,
        })
    }
}
