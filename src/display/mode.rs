//! Value types for xrandr modes, rotations and relative positions

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::ScreenError;

/// A single mode line reported for an output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
    /// Refresh rate in Hz as printed by xrandr (e.g. 60.00)
    pub refresh_hz: f64,
    /// Marked with `*` in the query output
    pub is_current: bool,
    /// Marked with `+` in the query output
    pub is_preferred: bool,
}

impl Mode {
    pub fn new(width: u32, height: u32, refresh_hz: f64, is_current: bool, is_preferred: bool) -> Self {
        Self {
            width,
            height,
            refresh_hz,
            is_current,
            is_preferred,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Argument for `--mode` (e.g. "1920x1080")
    pub fn mode_arg(&self) -> String {
        format_resolution(self.width, self.height)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ {:.2}Hz", self.width, self.height, self.refresh_hz)?;
        if self.is_current {
            write!(f, " (current)")?;
        }
        if self.is_preferred {
            write!(f, " (preferred)")?;
        }
        Ok(())
    }
}

pub(crate) fn format_resolution(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// Parse a "WxH" string such as "1280x1024"
pub fn parse_resolution(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Output rotation as understood by `xrandr --rotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Normal,
    Left,
    Inverted,
    Right,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Normal,
        Rotation::Left,
        Rotation::Inverted,
        Rotation::Right,
    ];

    /// Wire name used by xrandr
    pub fn name(self) -> &'static str {
        match self {
            Rotation::Normal => "normal",
            Rotation::Left => "left",
            Rotation::Inverted => "inverted",
            Rotation::Right => "right",
        }
    }

    /// Strict lookup of a rotation name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rotation| rotation.name() == name)
    }

    /// Lenient lookup used on query headers; unknown names mean `Normal`
    pub fn lookup(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Rotation::Normal)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rotation {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.trim().to_lowercase())
            .ok_or_else(|| ScreenError::InvalidRotation(s.to_string()))
    }
}

/// Placement of an output relative to another one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    LeftOf,
    RightOf,
    Above,
    Below,
    SameAs,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::LeftOf,
        Relation::RightOf,
        Relation::Above,
        Relation::Below,
        Relation::SameAs,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            Relation::LeftOf => "--left-of",
            Relation::RightOf => "--right-of",
            Relation::Above => "--above",
            Relation::Below => "--below",
            Relation::SameAs => "--same-as",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|relation| relation.flag() == flag)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag().trim_start_matches("--"))
    }
}

impl FromStr for Relation {
    type Err = ScreenError;

    /// Accepts both the flag ("--left-of") and the bare name ("left-of")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let flag = if trimmed.starts_with("--") {
            trimmed.to_string()
        } else {
            format!("--{}", trimmed)
        };
        Self::from_flag(&flag).ok_or_else(|| ScreenError::InvalidRelation(s.to_string()))
    }
}
