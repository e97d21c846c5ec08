use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application directory name under the XDG config/data roots
const APP_DIR: &str = "xscreens";

/// Get the xscreens config directory
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join(APP_DIR);

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Get the xscreens data directory
pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
            home.join(".local/share")
        })
        .join(APP_DIR);

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory at {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Default location of config.toml
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding the xrandr command log
pub fn command_logs_dir() -> Result<PathBuf> {
    let logs_dir = data_dir()?.join("command_logs");
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("creating command logs directory at {}", logs_dir.display()))?;
    Ok(logs_dir)
}
