//! User configuration stored in `<config dir>/xscreens/config.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::paths;
use crate::display::DetailMerge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensConfig {
    /// Program used to query and configure outputs
    pub xrandr_command: String,
    /// Also run the verbose query (brightness, gamma, ...) when listing
    pub query_details: bool,
    /// Keep details already stored on a screen when a new verbose pass disagrees
    pub keep_old_details: bool,
    /// Append every executed command to the command log
    pub log_commands: bool,
}

impl Default for ScreensConfig {
    fn default() -> Self {
        Self {
            xrandr_command: "xrandr".to_string(),
            query_details: false,
            keep_old_details: false,
            log_commands: false,
        }
    }
}

impl ScreensConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(paths::config_file()?)
    }

    /// Missing files are created with the defaults
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            config.save_to_path(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let config: Self = toml::from_str(&content).context("parsing xscreens config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.xrandr_command.trim().is_empty() {
            anyhow::bail!("xrandr_command must not be empty");
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serializing xscreens config")?;
        fs::write(path, content).with_context(|| format!("writing config to {}", path.display()))?;
        Ok(())
    }

    pub fn detail_merge(&self) -> DetailMerge {
        if self.keep_old_details {
            DetailMerge::KeepOld
        } else {
            DetailMerge::Overwrite
        }
    }
}
