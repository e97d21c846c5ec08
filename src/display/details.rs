//! Second pass over `xrandr --verbose` output attaching key/value details
//! (Brightness, Gamma, CRTC, ...) to already parsed screens.
//!
//! Screens are matched by position: the n-th header of the verbose output
//! belongs to the n-th screen of the plain query. A header whose name does
//! not match is reported but not corrected.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use super::screen::{DetailMerge, Screen};
use crate::ui::{self, Level};

lazy_static! {
    static ref VERBOSE_HEADER_RE: Regex = Regex::new(r"^(\S+)\s+[dis]*connected\b").unwrap();
    static ref DETAIL_RE: Regex = Regex::new(r"^\t(\w+):\s*(.*)").unwrap();
}

/// One line of the verbose query output
#[derive(Debug, Clone, PartialEq)]
pub enum VerboseLine<'a> {
    Header { name: &'a str },
    Detail { key: &'a str, value: &'a str },
    Unrecognized,
}

impl<'a> VerboseLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if let Some(caps) = VERBOSE_HEADER_RE.captures(line) {
            if let Some(name) = caps.get(1) {
                return VerboseLine::Header {
                    name: name.as_str(),
                };
            }
        }
        if let Some(caps) = DETAIL_RE.captures(line) {
            if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
                return VerboseLine::Detail {
                    key: key.as_str(),
                    value: value.as_str().trim_end(),
                };
            }
        }
        VerboseLine::Unrecognized
    }
}

/// Attach verbose details to `screens` in place.
pub fn parse_details<'a, I>(screens: &mut [Screen], lines: I, merge: DetailMerge)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: Option<usize> = None;
    let mut buffer: BTreeMap<String, String> = BTreeMap::new();

    for line in lines {
        match VerboseLine::classify(line) {
            VerboseLine::Header { name } => {
                if !buffer.is_empty() {
                    attach(screens, index, std::mem::take(&mut buffer), merge);
                }
                let next = index.map_or(0, |i| i + 1);
                index = Some(next);
                check_header(screens, next, name);
            }
            VerboseLine::Detail { key, value } => {
                buffer.insert(key.to_string(), value.to_string());
            }
            VerboseLine::Unrecognized => {}
        }
    }

    if !buffer.is_empty() {
        attach(screens, index, buffer, merge);
    }
}

fn check_header(screens: &[Screen], index: usize, name: &str) {
    match screens.get(index) {
        Some(screen) if screen.name() != name => ui::emit(
            Level::Warn,
            "display.details.mismatch",
            &format!(
                "Inconsistent xrandr output: expected {} at position {}, got {}",
                screen.name(),
                index,
                name
            ),
            None,
        ),
        Some(_) => {}
        None => ui::emit(
            Level::Warn,
            "display.details.mismatch",
            &format!(
                "Inconsistent xrandr output: {} has no matching screen (only {} parsed)",
                name,
                screens.len()
            ),
            None,
        ),
    }
}

fn attach(
    screens: &mut [Screen],
    index: Option<usize>,
    details: BTreeMap<String, String>,
    merge: DetailMerge,
) {
    match index.and_then(|i| screens.get_mut(i)) {
        Some(screen) => {
            ui::debug(
                "display.details.attach",
                &format!("{}: {} details", screen.name(), details.len()),
            );
            screen.add_details(details, merge);
        }
        None => ui::debug(
            "display.details.dropped",
            &format!("dropping {} details without a screen", details.len()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mode::Mode;
    use crate::display::screen::{BRIGHTNESS_KEY, GAMMA_KEY};

    fn screens() -> Vec<Screen> {
        vec![
            Screen::new(
                "eDP1",
                true,
                None,
                vec![Mode::new(1920, 1080, 60.0, true, true)],
            ),
            Screen::new("HDMI1", false, None, Vec::new()),
        ]
    }

    const VERBOSE: &[&str] = &[
        "Screen 0: minimum 8 x 8, current 1920 x 1080, maximum 32767 x 32767",
        "eDP1 connected primary 1920x1080+0+0 (0x48) normal (normal left inverted right x axis y axis) 344mm x 194mm",
        "\tIdentifier: 0x42",
        "\tTimestamp:  21350",
        "\tGamma:      1.0:1.0:1.0",
        "\tBrightness: 1.00",
        "\tEDID: ",
        "\t\t00ffffffffffff0006af3d2700000000",
        "  1920x1080 (0x48) 141.000MHz -HSync -VSync *current +preferred",
        "        h: width  1920 start 1936 end 1952 total 2104 skew    0 clock  67.02KHz",
        "HDMI1 disconnected (normal left inverted right x axis y axis)",
        "\tIdentifier: 0x43",
        "\tBrightness: 0.80",
    ];

    #[test]
    fn classify_verbose_lines() {
        assert_eq!(
            VerboseLine::classify(VERBOSE[1]),
            VerboseLine::Header { name: "eDP1" }
        );
        assert_eq!(
            VerboseLine::classify("\tGamma:      1.0:1.0:1.0"),
            VerboseLine::Detail {
                key: "Gamma",
                value: "1.0:1.0:1.0"
            }
        );
        assert_eq!(
            VerboseLine::classify("\tEDID: "),
            VerboseLine::Detail { key: "EDID", value: "" }
        );
        assert_eq!(
            VerboseLine::classify("\t\t00ffffffffffff0006af3d2700000000"),
            VerboseLine::Unrecognized
        );
        // headers are anchored to the start of the line
        assert_eq!(
            VerboseLine::classify("  eDP1 connected"),
            VerboseLine::Unrecognized
        );
    }

    #[test]
    fn details_go_to_matching_screens() {
        let mut screens = screens();
        parse_details(&mut screens, VERBOSE.iter().copied(), DetailMerge::Overwrite);

        let edp = screens[0].details();
        assert_eq!(edp[GAMMA_KEY], "1.0:1.0:1.0");
        assert_eq!(edp[BRIGHTNESS_KEY], "1.00");
        assert_eq!(edp["Identifier"], "0x42");
        assert_eq!(edp["EDID"], "");
        assert_eq!(screens[0].gamma().unwrap(), (1.0, 1.0, 1.0));

        let hdmi = screens[1].details();
        assert_eq!(hdmi[BRIGHTNESS_KEY], "0.80");
        assert_eq!(hdmi["Identifier"], "0x43");
        assert!(!hdmi.contains_key(GAMMA_KEY));
    }

    #[test]
    fn keep_old_preserves_existing_values() {
        let mut screens = screens();
        screens[0].add_details(
            BTreeMap::from([(BRIGHTNESS_KEY.to_string(), "0.5".to_string())]),
            DetailMerge::Overwrite,
        );
        parse_details(&mut screens, VERBOSE.iter().copied(), DetailMerge::KeepOld);
        assert_eq!(screens[0].details()[BRIGHTNESS_KEY], "0.5");
        assert_eq!(screens[0].details()[GAMMA_KEY], "1.0:1.0:1.0");
    }

    #[test]
    fn name_mismatch_keeps_positional_assignment() {
        let mut screens = vec![
            Screen::new("DP1", false, None, Vec::new()),
            Screen::new("DP2", false, None, Vec::new()),
        ];
        let lines = [
            "DP2 disconnected",
            "\tBrightness: 0.30",
            "DP1 disconnected",
            "\tBrightness: 0.60",
        ];
        parse_details(&mut screens, lines, DetailMerge::Overwrite);
        assert_eq!(screens[0].details()[BRIGHTNESS_KEY], "0.30");
        assert_eq!(screens[1].details()[BRIGHTNESS_KEY], "0.60");
    }

    #[test]
    fn extra_verbose_headers_do_not_panic() {
        let mut screens = vec![Screen::new("DP1", false, None, Vec::new())];
        let lines = [
            "DP1 disconnected",
            "\tBrightness: 0.30",
            "DP9 disconnected",
            "\tBrightness: 0.60",
        ];
        parse_details(&mut screens, lines, DetailMerge::Overwrite);
        assert_eq!(screens[0].details()[BRIGHTNESS_KEY], "0.30");
    }

    #[test]
    fn details_before_any_header_are_dropped() {
        let mut screens = vec![Screen::new("DP1", false, None, Vec::new())];
        parse_details(
            &mut screens,
            ["\tBrightness: 0.30", "DP1 disconnected"],
            DetailMerge::Overwrite,
        );
        assert!(screens[0].details().is_empty());
    }
}
