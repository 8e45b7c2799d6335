//! Transient alignment guideline markers.

use crate::config::{SerializableColor, SnapConfig};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Half-length of a guideline along its axis, in stage units. Long enough
/// to cross the visible stage at any zoom or pan.
pub const GUIDELINE_EXTENT: f64 = 6000.0;

/// Dash pattern applied when dashed guidelines are configured.
pub const GUIDELINE_DASH_PATTERN: [f64; 2] = [4.0, 6.0];

/// Orientation of a guideline marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// A vertical line marking an x-axis alignment.
    Vertical,
    /// A horizontal line marking a y-axis alignment.
    Horizontal,
}

/// A transient visual marker for an active alignment.
///
/// Markers are owned by the layer of the interaction target and exist
/// only while the alignment holds: they are dropped before every
/// recompute and unconditionally at interaction end. See
/// [`crate::interaction::Snapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    /// Orientation of the line.
    pub axis: Axis,
    /// The aligned coordinate: x for vertical lines, y for horizontal.
    pub offset: f64,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke thickness.
    pub thickness: f64,
    /// Dash pattern; `None` renders solid.
    pub dash: Option<[f64; 2]>,
}

impl Guideline {
    /// Create a marker styled from the resolved configuration.
    pub fn new(axis: Axis, offset: f64, config: &SnapConfig) -> Self {
        Self {
            axis,
            offset,
            color: config.guideline_color,
            thickness: config.guideline_thickness,
            dash: config.guideline_dash.then_some(GUIDELINE_DASH_PATTERN),
        }
    }

    /// Endpoints of the marker's line segment in stage coordinates.
    pub fn endpoints(&self) -> (Point, Point) {
        match self.axis {
            Axis::Vertical => (
                Point::new(self.offset, -GUIDELINE_EXTENT),
                Point::new(self.offset, GUIDELINE_EXTENT),
            ),
            Axis::Horizontal => (
                Point::new(-GUIDELINE_EXTENT, self.offset),
                Point::new(GUIDELINE_EXTENT, self.offset),
            ),
        }
    }
}
