//! Display output model and xrandr translation
//!
//! `xrandr` query text is parsed into [`Screen`]s ([`parse_screens`], then
//! optionally [`parse_details`] over `xrandr --verbose`). Callers record
//! changes through the screen setters, [`build_command`] turns them into
//! xrandr arguments and a [`CommandExecutor`] runs them.

pub mod command;
pub mod details;
pub mod error;
pub mod executor;
pub mod log;
pub mod mode;
pub mod parser;
pub mod query;
pub mod screen;

pub use command::{Flag, XrandrCommand, build_command};
pub use details::{VerboseLine, parse_details};
pub use error::ScreenError;
pub use executor::{CommandExecutor, ExecError, XrandrExecutor};
pub use log::{CommandLog, CommandLogger};
pub use mode::{Mode, Relation, Rotation, parse_resolution};
pub use parser::{QueryLine, create_screen, parse_screens};
pub use query::{
    ApplyError, apply_all_settings, connected_screens, enabled_screens, screens, set_all_brightness,
    set_all_gamma,
};
pub use screen::{
    BRIGHTNESS_KEY, DetailMerge, GAMMA_KEY, Screen, SettingsOverlay, parse_decimal, parse_gamma,
};
