//! Screen entity: the state reported by xrandr plus a pending settings overlay

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::error::ScreenError;
use super::mode::{Mode, Relation, Rotation};

/// Detail key xrandr --verbose uses for brightness
pub const BRIGHTNESS_KEY: &str = "Brightness";
/// Detail key xrandr --verbose uses for gamma
pub const GAMMA_KEY: &str = "Gamma";

/// How details from a new verbose pass combine with the ones already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailMerge {
    /// New values replace stored ones
    #[default]
    Overwrite,
    /// Stored values win on conflict
    KeepOld,
}

/// Changes requested for a screen that have not been applied yet.
///
/// Created together with the screen, filled by the setters on [`Screen`] and
/// consumed by [`Screen::reset_pending`] once the command ran.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsOverlay {
    pub resolution: Option<(u32, u32)>,
    pub is_primary: Option<bool>,
    pub is_enabled: bool,
    pub rotation: Option<Rotation>,
    pub position: Option<(Relation, String)>,
    pub details: BTreeMap<String, String>,
}

impl SettingsOverlay {
    pub fn new(is_enabled: bool) -> Self {
        Self {
            resolution: None,
            is_primary: None,
            is_enabled,
            rotation: None,
            position: None,
            details: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Screen {
    name: String,
    is_primary: bool,
    modes: Vec<Mode>,
    /// Index into `modes`
    #[serde(skip)]
    current_mode: Option<usize>,
    rotation: Option<Rotation>,
    details: BTreeMap<String, String>,
    #[serde(skip)]
    pending: SettingsOverlay,
}

impl Screen {
    /// Rotation is only kept for outputs that have a current mode.
    pub fn new(
        name: impl Into<String>,
        is_primary: bool,
        rotation: Option<Rotation>,
        modes: Vec<Mode>,
    ) -> Self {
        let current_mode = modes.iter().position(|m| m.is_current);
        let rotation = current_mode.and(rotation);

        Self {
            name: name.into(),
            is_primary,
            modes,
            current_mode,
            rotation,
            details: BTreeMap::new(),
            pending: SettingsOverlay::new(current_mode.is_some()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary flag as reported by the query, not the pending request
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn current_mode(&self) -> Option<&Mode> {
        self.current_mode.and_then(|idx| self.modes.get(idx))
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }

    pub fn pending(&self) -> &SettingsOverlay {
        &self.pending
    }

    pub fn is_connected(&self) -> bool {
        !self.modes.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.current_mode.is_some()
    }

    pub fn available_resolutions(&self) -> Vec<(u32, u32)> {
        self.modes.iter().map(Mode::resolution).collect()
    }

    pub fn check_resolution(&self, width: u32, height: u32) -> Result<(), ScreenError> {
        if self.modes.iter().any(|m| m.resolution() == (width, height)) {
            Ok(())
        } else {
            Err(ScreenError::UnsupportedResolution {
                output: self.name.clone(),
                width,
                height,
            })
        }
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), ScreenError> {
        if !self.is_enabled() {
            return Err(ScreenError::InvalidState(self.name.clone()));
        }
        self.check_resolution(width, height)?;
        self.pending.resolution = Some((width, height));
        Ok(())
    }

    pub fn set_primary(&mut self, is_primary: bool) {
        self.pending.is_primary = Some(is_primary);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.pending.is_enabled = enabled;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.pending.rotation = Some(rotation);
    }

    pub fn set_position(&mut self, relation: Relation, relative_to: impl Into<String>) {
        self.pending.position = Some((relation, relative_to.into()));
    }

    /// Raw pending detail. Keys other than Brightness and Gamma emit no flag.
    pub fn set_detail(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pending.details.insert(key.into(), value.into());
    }

    /// Brightness multiplier; 0..1 is the sane range, larger values wash the picture out
    pub fn set_brightness(&mut self, brightness: f64) {
        self.set_detail(BRIGHTNESS_KEY, format_decimal(brightness));
    }

    /// Per channel gamma correction, each in 0..1
    pub fn set_gamma(&mut self, red: f64, green: f64, blue: f64) {
        self.set_detail(GAMMA_KEY, encode_gamma(red, green, blue));
    }

    /// Gamma currently reported by the verbose pass
    pub fn gamma(&self) -> Result<(f64, f64, f64), ScreenError> {
        let raw = self.detail(GAMMA_KEY)?;
        parse_gamma(raw).ok_or_else(|| ScreenError::FormatError {
            key: GAMMA_KEY.to_string(),
            value: raw.to_string(),
        })
    }

    /// Brightness currently reported by the verbose pass
    pub fn brightness(&self) -> Result<f64, ScreenError> {
        let raw = self.detail(BRIGHTNESS_KEY)?;
        parse_decimal(raw).ok_or_else(|| ScreenError::FormatError {
            key: BRIGHTNESS_KEY.to_string(),
            value: raw.to_string(),
        })
    }

    fn detail(&self, key: &str) -> Result<&str, ScreenError> {
        self.details
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ScreenError::MissingDetail {
                output: self.name.clone(),
                key: key.to_string(),
            })
    }

    pub fn add_details(&mut self, details: BTreeMap<String, String>, merge: DetailMerge) {
        for (key, value) in details {
            match merge {
                DetailMerge::Overwrite => {
                    self.details.insert(key, value);
                }
                DetailMerge::KeepOld => {
                    self.details.entry(key).or_insert(value);
                }
            }
        }
    }

    /// Drop every pending change; the overlay goes back to the reported state
    pub fn reset_pending(&mut self) {
        self.pending = SettingsOverlay::new(self.is_enabled());
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rotation = self
            .rotation
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} primary: {}, modes: {}, connected: {}, rotation: {}, enabled: {}",
            self.name,
            self.is_primary,
            self.modes.len(),
            self.is_connected(),
            rotation,
            self.is_enabled()
        )
    }
}

/// Decimal text for xrandr arguments; whole numbers keep one fractional digit ("1.0")
pub(crate) fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub(crate) fn encode_gamma(red: f64, green: f64, blue: f64) -> String {
    [red, green, blue]
        .iter()
        .map(|v| format_decimal(*v))
        .collect::<Vec<_>>()
        .join(":")
}

/// Finite decimal number; `f64::from_str` alone also takes "nan" and "inf"
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse "r:g:b"; exactly three colon separated finite numbers
pub fn parse_gamma(raw: &str) -> Option<(f64, f64, f64)> {
    let fields = raw
        .split(':')
        .map(parse_decimal)
        .collect::<Option<Vec<_>>>()?;
    match fields.as_slice() {
        [r, g, b] => Some((*r, *g, *b)),
        _ => None,
    }
}
