//! Snapping configuration: partial user options resolved over defaults.

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default snap tolerance in pixels.
pub const DEFAULT_SNAP_RANGE: f64 = 3.0;
/// Default guideline stroke thickness.
pub const DEFAULT_GUIDELINE_THICKNESS: f64 = 1.0;

/// Errors from parsing a host-supplied options document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid options document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported color value: {0}")]
    Color(String),
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The default guideline blue, rgb(0, 161, 255).
    pub fn guideline_blue() -> Self {
        Self::new(0, 161, 255, 255)
    }

    /// Parse a CSS-style color string: `#rgb`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb(r, g, b)` or `rgba(r, g, b, a)` with alpha in 0.0..=1.0.
    pub fn parse_css(value: &str) -> Result<Self, ConfigError> {
        let bad = || ConfigError::Color(value.to_string());
        let s = value.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad());
            }
            let channel = |chunk: &str| u8::from_str_radix(chunk, 16).map_err(|_| bad());
            return match hex.len() {
                3 => Ok(Self::new(
                    channel(&hex[0..1])? * 17,
                    channel(&hex[1..2])? * 17,
                    channel(&hex[2..3])? * 17,
                    255,
                )),
                6 => Ok(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Ok(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => Err(bad()),
            };
        }

        // rgba( must be tried before rgb( since the prefixes overlap.
        if let Some(body) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return Err(bad());
            }
            let alpha: f64 = parts[3].parse().map_err(|_| bad())?;
            return Ok(Self::new(
                parts[0].parse().map_err(|_| bad())?,
                parts[1].parse().map_err(|_| bad())?,
                parts[2].parse().map_err(|_| bad())?,
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ));
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(bad());
            }
            return Ok(Self::new(
                parts[0].parse().map_err(|_| bad())?,
                parts[1].parse().map_err(|_| bad())?,
                parts[2].parse().map_err(|_| bad())?,
                255,
            ));
        }

        Err(bad())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Partial, user-supplied snapping options.
///
/// Every field is optional; unspecified fields fall back to the defaults
/// documented on [`SnapConfig`]. Field names follow the camelCase
/// convention of the host application's configuration documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapOptions {
    /// Snap tolerance in pixels.
    pub snap_range: Option<f64>,
    /// Guideline color as a CSS-style string.
    pub guideline_color: Option<String>,
    /// Dashed (true) or solid (false) guidelines.
    pub guideline_dash: Option<bool>,
    /// Whether guideline markers are created at all.
    pub show_guidelines: Option<bool>,
    /// Guideline stroke thickness.
    pub guideline_thickness: Option<f64>,
    /// Snap to the stage center lines.
    pub snap_to_stage_center: Option<bool>,
    /// Snap to the stage borders.
    pub snap_to_stage_borders: Option<bool>,
    /// Snap to sibling shape edges and centers.
    pub snap_to_shapes: Option<bool>,
}

impl SnapOptions {
    /// Parse an options document from JSON.
    ///
    /// A present-but-malformed color string is rejected here so the host
    /// learns about it at load time; [`SnapConfig::resolve`] itself never
    /// fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        if let Some(color) = &options.guideline_color {
            SerializableColor::parse_css(color)?;
        }
        Ok(options)
    }
}

/// Fully resolved snapping configuration.
///
/// Constructed once per [`crate::interaction::Snapper`] and never mutated
/// afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Snap tolerance in pixels (default 3).
    pub snap_range: f64,
    /// Guideline color (default rgb(0, 161, 255)).
    pub guideline_color: SerializableColor,
    /// Dashed guidelines (default true).
    pub guideline_dash: bool,
    /// Whether guideline markers are created (default true).
    pub show_guidelines: bool,
    /// Guideline stroke thickness (default 1).
    pub guideline_thickness: f64,
    /// Snap to the stage center lines (default true).
    pub snap_to_stage_center: bool,
    /// Snap to the stage borders (default true).
    pub snap_to_stage_borders: bool,
    /// Snap to sibling shape edges and centers (default true).
    pub snap_to_shapes: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::resolve(SnapOptions::default())
    }
}

impl SnapConfig {
    /// Resolve partial options over the defaults.
    ///
    /// Pure and infallible: absent fields take their defaults, and
    /// non-finite or non-positive numeric values clamp to the defaults
    /// rather than failing mid-gesture.
    pub fn resolve(options: SnapOptions) -> Self {
        Self {
            snap_range: sanitize(options.snap_range, DEFAULT_SNAP_RANGE),
            guideline_color: options
                .guideline_color
                .as_deref()
                .and_then(|s| SerializableColor::parse_css(s).ok())
                .unwrap_or_else(SerializableColor::guideline_blue),
            guideline_dash: options.guideline_dash.unwrap_or(true),
            show_guidelines: options.show_guidelines.unwrap_or(true),
            guideline_thickness: sanitize(
                options.guideline_thickness,
                DEFAULT_GUIDELINE_THICKNESS,
            ),
            snap_to_stage_center: options.snap_to_stage_center.unwrap_or(true),
            snap_to_stage_borders: options.snap_to_stage_borders.unwrap_or(true),
            snap_to_shapes: options.snap_to_shapes.unwrap_or(true),
        }
    }
}

fn sanitize(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}
