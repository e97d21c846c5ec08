//! Query and configure X11 outputs through `xrandr`.

pub mod common;
pub mod display;
pub mod ui;
