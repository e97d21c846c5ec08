//! Running xrandr. The rest of the crate only sees the [`CommandExecutor`] trait.

use std::path::PathBuf;
use thiserror::Error;

use super::log::CommandLogger;
use crate::ui;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("{0} not found in PATH")]
    NotFound(String),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {status:?}: {output}")]
    Failed {
        program: String,
        status: Option<i32>,
        output: String,
    },
}

/// Runs the display configuration tool with the given arguments and hands
/// back its decoded output, one entry per line.
pub trait CommandExecutor {
    fn execute(&self, args: &[String]) -> Result<Vec<String>, ExecError>;

    /// Program name used when showing commands to the user
    fn program(&self) -> &str {
        "xrandr"
    }
}

/// Executes the real `xrandr` binary (or whatever the config names)
#[derive(Debug, Clone)]
pub struct XrandrExecutor {
    program: String,
    logger: Option<CommandLogger>,
}

impl Default for XrandrExecutor {
    fn default() -> Self {
        Self::new("xrandr")
    }
}

impl XrandrExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: CommandLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Resolve the program through PATH
    pub fn ensure_available(&self) -> Result<PathBuf, ExecError> {
        which::which(&self.program).map_err(|_| ExecError::NotFound(self.program.clone()))
    }
}

impl CommandExecutor for XrandrExecutor {
    fn execute(&self, args: &[String]) -> Result<Vec<String>, ExecError> {
        ui::debug(
            "display.exec.run",
            &format!("{} {}", self.program, args.join(" ")),
        );

        let output = duct::cmd(self.program.as_str(), args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|source| ExecError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log_command(&self.program, args, &output.status, &text) {
                ui::debug("display.exec.log", &format!("Failed to log command: {e}"));
            }
        }

        if !output.status.success() {
            return Err(ExecError::Failed {
                program: self.program.clone(),
                status: output.status.code(),
                output: text.trim().to_string(),
            });
        }

        Ok(text.lines().map(str::to_string).collect())
    }

    fn program(&self) -> &str {
        &self.program
    }
}
