//! Bulk operations: querying screens and applying pending settings

use thiserror::Error;

use super::command::build_command;
use super::details::parse_details;
use super::error::ScreenError;
use super::executor::{CommandExecutor, ExecError};
use super::parser::parse_screens;
use super::screen::{DetailMerge, Screen};
use crate::ui::{self, Level};

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Query all outputs. With `details` the verbose pass runs as well; if only
/// that second call fails the screens are returned without details.
pub fn screens(
    executor: &dyn CommandExecutor,
    details: bool,
    merge: DetailMerge,
) -> Result<Vec<Screen>, ExecError> {
    let lines = executor.execute(&[])?;
    let mut screens = parse_screens(lines.iter().map(String::as_str));

    if details {
        match executor.execute(&["--verbose".to_string()]) {
            Ok(verbose) => parse_details(&mut screens, verbose.iter().map(String::as_str), merge),
            Err(e) => ui::emit(
                Level::Warn,
                "display.exec.failed",
                &format!("Could not read output details: {}", e),
                None,
            ),
        }
    }

    Ok(screens)
}

pub fn connected_screens(
    executor: &dyn CommandExecutor,
    details: bool,
    merge: DetailMerge,
) -> Result<Vec<Screen>, ExecError> {
    Ok(screens(executor, details, merge)?
        .into_iter()
        .filter(Screen::is_connected)
        .collect())
}

pub fn enabled_screens(
    executor: &dyn CommandExecutor,
    details: bool,
    merge: DetailMerge,
) -> Result<Vec<Screen>, ExecError> {
    Ok(connected_screens(executor, details, merge)?
        .into_iter()
        .filter(Screen::is_enabled)
        .collect())
}

pub fn set_all_brightness(screens: &mut [Screen], brightness: f64) {
    for screen in screens {
        screen.set_brightness(brightness);
    }
}

pub fn set_all_gamma(screens: &mut [Screen], red: f64, green: f64, blue: f64) {
    for screen in screens {
        screen.set_gamma(red, green, blue);
    }
}

/// Apply every screen in order, stopping at the first failure.
pub fn apply_all_settings(
    screens: &mut [Screen],
    executor: &dyn CommandExecutor,
) -> Result<(), ApplyError> {
    for screen in screens {
        screen.apply(executor)?;
    }
    Ok(())
}

impl Screen {
    /// Run the command for the pending settings. The overlay is reset only
    /// when the command succeeded, so a failed apply can be retried.
    pub fn apply(&mut self, executor: &dyn CommandExecutor) -> Result<(), ApplyError> {
        let command = build_command(self)?;
        executor.execute(&command.args())?;
        self.reset_pending();
        Ok(())
    }
}
