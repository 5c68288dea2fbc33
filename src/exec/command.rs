// src/exec/command.rs

//! Composition of the `go` command line for the selected mode.

use std::fmt;
use std::path::PathBuf;

use crate::cli::Mode;
use crate::config::Config;
use crate::errors::{GowatchError, Result};

/// One fully-resolved command invocation, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let args = match cfg.mode {
            Mode::Run => {
                let entry = cfg.entry.as_ref().ok_or_else(|| {
                    GowatchError::Config("run mode requires an entry file".to_string())
                })?;
                vec!["run".to_string(), entry.display().to_string()]
            }
            Mode::Test => vec!["test".to_string()],
            Mode::Build => vec!["build".to_string()],
        };

        Ok(Self {
            program: "go".to_string(),
            args,
            cwd: cfg.project.clone(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
