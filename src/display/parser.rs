//! Parsing of the plain `xrandr` query output into [`Screen`]s
//!
//! The query prints one header line per output followed by its mode lines:
//!
//! ```text
//! HDMI1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 509mm x 286mm
//!    1920x1080     60.00*+
//!    1280x1024     60.02
//! VGA1 disconnected (normal left inverted right x axis y axis)
//! ```
//!
//! Lines are classified on their own first ([`QueryLine`]); the parser then
//! only tracks whether it is waiting for a header or collecting modes.

use lazy_static::lazy_static;
use regex::Regex;

use super::mode::{Mode, Rotation};
use super::screen::Screen;
use crate::ui;

lazy_static! {
    static ref HEADER_RE: Regex = Regex::new(r"\b(?:dis)?connected\b").unwrap();
    static ref MODE_RE: Regex =
        Regex::new(r"^\s+(\d+)x(\d+)\s+((?:\d+\.)?\d+)([* ]?)([+ ]?)").unwrap();
}

/// One line of the non-verbose query output
#[derive(Debug, Clone, PartialEq)]
pub enum QueryLine<'a> {
    Header(&'a str),
    Mode(Mode),
    Unrecognized,
}

impl<'a> QueryLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if HEADER_RE.is_match(line) {
            return QueryLine::Header(line);
        }
        parse_mode_line(line)
            .map(QueryLine::Mode)
            .unwrap_or(QueryLine::Unrecognized)
    }
}

fn parse_mode_line(line: &str) -> Option<Mode> {
    let caps = MODE_RE.captures(line)?;
    let width = caps[1].parse().ok()?;
    let height = caps[2].parse().ok()?;
    let refresh_hz = caps[3].parse().ok()?;
    let is_current = caps[4].trim() == "*";
    let is_preferred = caps[5].trim() == "+";
    Some(Mode::new(width, height, refresh_hz, is_current, is_preferred))
}

enum ParseState<'a> {
    AwaitingHeader,
    CollectingModes { header: &'a str, modes: Vec<Mode> },
}

/// Turn query output into screens, in the order their headers appear.
///
/// Mode lines seen before the first header have no output to belong to and
/// are skipped.
pub fn parse_screens<'a, I>(lines: I) -> Vec<Screen>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut screens = Vec::new();
    let mut state = ParseState::AwaitingHeader;

    for line in lines {
        match QueryLine::classify(line) {
            QueryLine::Header(header) => {
                let previous = std::mem::replace(
                    &mut state,
                    ParseState::CollectingModes {
                        header,
                        modes: Vec::new(),
                    },
                );
                if let ParseState::CollectingModes { header, modes } = previous {
                    screens.push(create_screen(header, modes));
                }
            }
            QueryLine::Mode(mode) => {
                if let ParseState::CollectingModes { modes, .. } = &mut state {
                    modes.push(mode);
                }
            }
            QueryLine::Unrecognized => {}
        }
    }

    if let ParseState::CollectingModes { header, modes } = state {
        screens.push(create_screen(header, modes));
    }

    screens
}

/// Build a screen from its header line and the modes listed under it.
///
/// The fourth header token is read as the rotation for connected outputs;
/// anything that is not a rotation name counts as normal.
pub fn create_screen(header: &str, modes: Vec<Mode>) -> Screen {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let name = tokens.first().copied().unwrap_or_default();
    let is_primary = tokens.contains(&"primary");

    let rotation = if modes.is_empty() {
        None
    } else {
        Some(Rotation::lookup(tokens.get(3).copied().unwrap_or_default()))
    };

    ui::debug(
        "display.parse.screen",
        &format!("{}: {} modes, primary: {}", name, modes.len(), is_primary),
    );

    Screen::new(name, is_primary, rotation, modes)
}
