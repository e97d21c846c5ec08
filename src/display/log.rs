//! JSON-lines log of executed xrandr commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::common::paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLog {
    pub timestamp: DateTime<Utc>,
    pub program: String,
    pub args: Vec<String>,
    pub output: String,
    pub exit_code: Option<i32>,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLogger {
    log_dir: PathBuf,
}

impl CommandLogger {
    pub fn new(log_dir: PathBuf) -> Self {
        Self { log_dir }
    }

    pub fn from_default_dir() -> Result<Self> {
        Ok(Self::new(paths::command_logs_dir()?))
    }

    fn log_file_path(&self) -> PathBuf {
        self.log_dir.join("xrandr_commands.jsonl")
    }

    pub fn log_command(
        &self,
        program: &str,
        args: &[String],
        status: &ExitStatus,
        output: &str,
    ) -> Result<()> {
        create_dir_all(&self.log_dir).context("Failed to create command log directory")?;

        let entry = CommandLog {
            timestamp: Utc::now(),
            program: program.to_string(),
            args: args.to_vec(),
            output: output.to_string(),
            exit_code: status.code(),
            success: status.success(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file_path())
            .context("Failed to open command log file")?;

        let json_line = serde_json::to_string(&entry).context("Failed to serialize command log")?;
        writeln!(file, "{json_line}").context("Failed to write to command log file")?;

        Ok(())
    }

    /// Logged commands, newest first
    pub fn get_logs(&self) -> Result<Vec<CommandLog>> {
        let log_file = self.log_file_path();
        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&log_file).context("Failed to read command log file")?;

        let mut logs = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).context("Failed to parse command log entry"))
            .collect::<Result<Vec<CommandLog>>>()?;
        logs.reverse();
        Ok(logs)
    }

    pub fn clear_logs(&self) -> Result<()> {
        let log_file = self.log_file_path();
        if log_file.exists() {
            std::fs::remove_file(&log_file).context("Failed to remove command log file")?;
        }
        Ok(())
    }
}
