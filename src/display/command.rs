//! Translation of a screen's pending settings into xrandr arguments

use super::error::ScreenError;
use super::mode::{Relation, format_resolution};
use super::screen::{BRIGHTNESS_KEY, GAMMA_KEY, Screen};
use crate::common::shell::shell_quote;

/// A single xrandr option together with its value(s)
#[derive(Debug, Clone, PartialEq)]
pub enum Flag {
    /// `--output <name>`
    Output(String),
    /// `--auto`
    Auto,
    /// `--mode <w>x<h>`
    Mode { width: u32, height: u32 },
    /// `--primary`
    Primary,
    /// `--rotate <name>`
    Rotate(&'static str),
    /// `--left-of <name>` and friends
    Position(Relation, String),
    /// `--off`
    Off,
    /// `--brightness <value>`
    Brightness(String),
    /// `--gamma <r:g:b>`
    Gamma(String),
}

impl Flag {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Flag::Output(name) => args.extend(["--output".to_string(), name.clone()]),
            Flag::Auto => args.push("--auto".to_string()),
            Flag::Mode { width, height } => {
                args.extend(["--mode".to_string(), format_resolution(*width, *height)])
            }
            Flag::Primary => args.push("--primary".to_string()),
            Flag::Rotate(name) => args.extend(["--rotate".to_string(), name.to_string()]),
            Flag::Position(relation, target) => {
                args.extend([relation.flag().to_string(), target.clone()])
            }
            Flag::Off => args.push("--off".to_string()),
            Flag::Brightness(value) => args.extend(["--brightness".to_string(), value.clone()]),
            Flag::Gamma(value) => args.extend(["--gamma".to_string(), value.clone()]),
        }
    }
}

/// Ordered flags for one `xrandr` invocation targeting one output
#[derive(Debug, Clone, PartialEq)]
pub struct XrandrCommand {
    flags: Vec<Flag>,
}

impl XrandrCommand {
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Arguments to pass after the program name
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for flag in &self.flags {
            flag.push_args(&mut args);
        }
        args
    }

    /// Shell-style rendering, e.g. for dry runs
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(program.to_string())
            .chain(self.args())
            .map(|arg| shell_quote(&arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the smallest set of flags that turns the screen's reported state
/// into its pending one.
///
/// `--off` must be the only change: combining it with a new mode, primary
/// flag, rotation or position fails with [`ScreenError::ConflictingOptions`].
/// Any pending detail drops `--auto`, even an unchanged or unknown one, so
/// a brightness or gamma request never switches the output to its
/// preferred mode.
pub fn build_command(screen: &Screen) -> Result<XrandrCommand, ScreenError> {
    if screen.name().is_empty() {
        return Err(ScreenError::MissingName);
    }
    let pending = screen.pending();
    if let Some((width, height)) = pending.resolution {
        screen.check_resolution(width, height)?;
    }

    let mut flags = vec![Flag::Output(screen.name().to_string())];
    let mut has_changed = false;

    let keeps_current_mode = screen.is_enabled()
        && screen.current_mode().map(|m| m.resolution()) == pending.resolution;
    match pending.resolution {
        Some((width, height)) if !keeps_current_mode => {
            flags.push(Flag::Mode { width, height });
            has_changed = true;
        }
        _ => flags.push(Flag::Auto),
    }

    if !screen.is_primary() && pending.is_primary == Some(true) {
        flags.push(Flag::Primary);
        has_changed = true;
    }

    if let Some(rotation) = pending.rotation {
        if Some(rotation) != screen.rotation() {
            flags.push(Flag::Rotate(rotation.name()));
            has_changed = true;
        }
    }

    if let Some((relation, target)) = &pending.position {
        flags.push(Flag::Position(*relation, target.clone()));
        has_changed = true;
    }

    if screen.is_enabled() && !pending.is_enabled {
        if has_changed {
            return Err(ScreenError::ConflictingOptions(screen.name().to_string()));
        }
        flags.push(Flag::Off);
    }

    if !pending.details.is_empty() {
        flags.retain(|f| *f != Flag::Auto);
    }

    for (key, value) in &pending.details {
        let unchanged = screen
            .details()
            .get(key)
            .is_some_and(|current| same_detail_value(current, value));
        if unchanged {
            continue;
        }
        let flag = match key.as_str() {
            BRIGHTNESS_KEY => Flag::Brightness(value.clone()),
            GAMMA_KEY => Flag::Gamma(value.clone()),
            _ => continue,
        };
        flags.push(flag);
    }

    Ok(XrandrCommand { flags })
}

/// xrandr reports "1.00" where we write "1.0"; compare numerically when possible
fn same_detail_value(current: &str, requested: &str) -> bool {
    let parse = |s: &str| {
        s.trim()
            .split(':')
            .map(|f| f.trim().parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()
    };
    match (parse(current), parse(requested)) {
        (Some(a), Some(b)) if a.len() == b.len() => {
            a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-6)
        }
        _ => current.trim() == requested.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mode::{Mode, Rotation};
    use crate::display::screen::DetailMerge;
    use std::collections::BTreeMap;

    fn hdmi(primary: bool) -> Screen {
        Screen::new(
            "HDMI1",
            primary,
            Some(Rotation::Normal),
            vec![
                Mode::new(1920, 1080, 60.0, true, true),
                Mode::new(1280, 1024, 60.02, false, false),
            ],
        )
    }

    fn args(screen: &Screen) -> Vec<String> {
        build_command(screen).unwrap().args()
    }

    #[test]
    fn empty_overlay_is_output_and_auto() {
        let screen = hdmi(true);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);
        // building has no side effects
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);

        let vga = Screen::new("VGA1", false, None, Vec::new());
        assert_eq!(args(&vga), vec!["--output", "VGA1", "--auto"]);
    }

    #[test]
    fn new_resolution_uses_explicit_mode() {
        let mut screen = hdmi(true);
        screen.set_resolution(1280, 1024).unwrap();
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--mode", "1280x1024"]);
    }

    #[test]
    fn current_resolution_stays_auto() {
        let mut screen = hdmi(true);
        screen.set_resolution(1920, 1080).unwrap();
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);
    }

    #[test]
    fn missing_name_fails() {
        let screen = Screen::new("", false, None, Vec::new());
        assert_eq!(build_command(&screen), Err(ScreenError::MissingName));
    }

    #[test]
    fn primary_only_when_not_already_primary() {
        let mut screen = hdmi(true);
        screen.set_primary(true);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);

        let mut screen = hdmi(false);
        screen.set_primary(true);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto", "--primary"]);

        let mut screen = hdmi(false);
        screen.set_primary(false);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);
    }

    #[test]
    fn rotation_only_when_different() {
        let mut screen = hdmi(false);
        screen.set_rotation(Rotation::Normal);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto"]);

        screen.set_rotation(Rotation::Inverted);
        assert_eq!(
            args(&screen),
            vec!["--output", "HDMI1", "--auto", "--rotate", "inverted"]
        );
    }

    #[test]
    fn flags_follow_fixed_order() {
        let mut screen = hdmi(false);
        screen.set_position(Relation::LeftOf, "eDP1");
        screen.set_rotation(Rotation::Left);
        screen.set_primary(true);
        screen.set_resolution(1280, 1024).unwrap();
        assert_eq!(
            args(&screen),
            vec![
                "--output", "HDMI1", "--mode", "1280x1024", "--primary", "--rotate", "left",
                "--left-of", "eDP1"
            ]
        );
    }

    #[test]
    fn off_alone() {
        let mut screen = hdmi(true);
        screen.set_enabled(false);
        assert_eq!(args(&screen), vec!["--output", "HDMI1", "--auto", "--off"]);
    }

    #[test]
    fn off_conflicts_with_other_changes() {
        let conflicting: Vec<Box<dyn Fn(&mut Screen)>> = vec![
            Box::new(|s| s.set_resolution(1280, 1024).unwrap()),
            Box::new(|s| s.set_primary(true)),
            Box::new(|s| s.set_rotation(Rotation::Right)),
            Box::new(|s| s.set_position(Relation::SameAs, "eDP1")),
        ];
        for change in conflicting {
            let mut screen = hdmi(false);
            screen.set_enabled(false);
            change(&mut screen);
            assert_eq!(
                build_command(&screen),
                Err(ScreenError::ConflictingOptions("HDMI1".to_string()))
            );
        }
    }

    #[test]
    fn enabling_a_disabled_output_uses_auto() {
        let mut screen = Screen::new(
            "DP1",
            false,
            None,
            vec![Mode::new(2560, 1440, 59.95, false, true)],
        );
        screen.set_enabled(true);
        screen.set_position(Relation::RightOf, "HDMI1");
        assert_eq!(
            args(&screen),
            vec!["--output", "DP1", "--auto", "--right-of", "HDMI1"]
        );
    }

    #[test]
    fn details_replace_auto() {
        let mut screen = hdmi(true);
        screen.set_brightness(0.7);
        screen.set_gamma(1.0, 0.9, 0.8);
        assert_eq!(
            args(&screen),
            vec![
                "--output", "HDMI1", "--brightness", "0.7", "--gamma", "1.0:0.9:0.8"
            ]
        );
    }

    #[test]
    fn unchanged_details_are_skipped() {
        let mut screen = hdmi(true);
        screen.add_details(
            BTreeMap::from([
                (BRIGHTNESS_KEY.to_string(), "1.00".to_string()),
                (GAMMA_KEY.to_string(), "1.0:1.0:1.0".to_string()),
            ]),
            DetailMerge::Overwrite,
        );
        screen.set_brightness(1.0);
        screen.set_gamma(1.0, 1.0, 0.5);
        assert_eq!(
            args(&screen),
            vec!["--output", "HDMI1", "--gamma", "1.0:1.0:0.5"]
        );

        screen.set_gamma(1.0, 1.0, 1.0);
        assert_eq!(args(&screen), vec!["--output", "HDMI1"]);
    }

    #[test]
    fn unchanged_brightness_keeps_current_mode() {
        let mut screen = Screen::new(
            "HDMI1",
            false,
            Some(Rotation::Normal),
            vec![
                Mode::new(1920, 1080, 60.0, false, true),
                Mode::new(1280, 1024, 60.02, true, false),
            ],
        );
        screen.add_details(
            BTreeMap::from([(BRIGHTNESS_KEY.to_string(), "0.70".to_string())]),
            DetailMerge::Overwrite,
        );
        screen.set_brightness(0.7);
        assert_eq!(args(&screen), vec!["--output", "HDMI1"]);
    }

    #[test]
    fn unknown_detail_drops_auto_without_a_flag() {
        let mut screen = hdmi(true);
        screen.set_detail("CRTC", "1");
        assert_eq!(args(&screen), vec!["--output", "HDMI1"]);
    }

    #[test]
    fn details_keep_explicit_mode() {
        let mut screen = hdmi(true);
        screen.set_resolution(1280, 1024).unwrap();
        screen.set_brightness(0.5);
        assert_eq!(
            args(&screen),
            vec!["--output", "HDMI1", "--mode", "1280x1024", "--brightness", "0.5"]
        );
    }

    #[test]
    fn command_line_rendering() {
        let mut screen = hdmi(false);
        screen.set_position(Relation::Above, "DP 2");
        let command = build_command(&screen).unwrap();
        assert_eq!(
            command.command_line("xrandr"),
            "xrandr --output HDMI1 --auto --above 'DP 2'"
        );
        assert_eq!(command.flags()[0], Flag::Output("HDMI1".to_string()));
    }

    #[test]
    fn detail_comparison() {
        assert!(same_detail_value("1.00", "1.0"));
        assert!(same_detail_value("1.0:1.0:1.0", "1.0:1.0:1.0"));
        assert!(!same_detail_value("1.0:1.0:1.0", "1.0:1.0"));
        assert!(!same_detail_value("0.80", "0.81"));
        assert!(same_detail_value("abc", " abc"));
    }
}
