//! Resize-handle identifiers for transform gestures.

use serde::{Deserialize, Serialize};

/// The anchor of a transform widget being dragged during a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    // Corner handles
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    // Edge midpoint handles
    Top,
    Bottom,
    Left,
    Right,
    // Rotation handle
    Rotate,
}

impl HandleKind {
    /// Rotation gestures are never snapped.
    pub fn is_rotation(self) -> bool {
        matches!(self, HandleKind::Rotate)
    }
}
