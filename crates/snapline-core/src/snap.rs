//! Pure snapping math: candidate collection and per-axis correction.
//!
//! The drag path and the resize path deliberately disagree on tie-breaks:
//! drag scans every candidate and lets the last match overwrite the
//! correction, resize stops at the first match. Both behaviors are part
//! of the observable contract and are kept as-is.

use crate::config::SnapConfig;
use crate::stage::{NodeId, NodeKind, Stage};
use kurbo::Rect;

/// Candidate alignment values for one move event.
///
/// Rebuilt fresh on every drag tick (and once per resize gesture).
/// Insertion order is the order the engines scan in; duplicates are
/// harmless and never removed.
#[derive(Debug, Clone, Default)]
pub struct SnapTargets {
    /// X-axis breakpoints.
    pub vertical: Vec<f64>,
    /// Y-axis breakpoints.
    pub horizontal: Vec<f64>,
}

/// Collect the candidate alignment values for an interaction on `target`.
///
/// Stage-center candidates come first, then stage borders, then sibling
/// shapes in layer/child order. Group nodes and the target itself are
/// skipped, as is any node with a non-finite box. Guideline markers are
/// owned by their layer and never appear here.
pub fn collect_snap_targets(stage: &Stage, target: NodeId, config: &SnapConfig) -> SnapTargets {
    let mut targets = SnapTargets::default();
    if config.snap_to_stage_center {
        targets.vertical.push(stage.width / 2.0);
        targets.horizontal.push(stage.height / 2.0);
    }
    if config.snap_to_stage_borders {
        targets.vertical.extend([0.0, stage.width]);
        targets.horizontal.extend([0.0, stage.height]);
    }
    if config.snap_to_shapes {
        for layer in stage.layers() {
            for node in layer.nodes() {
                if node.id == target || node.kind != NodeKind::Shape {
                    continue;
                }
                let rect = node.client_rect();
                if !rect_is_finite(rect) {
                    continue;
                }
                targets
                    .vertical
                    .extend([rect.x0, rect.x1, rect.x0 + rect.width() / 2.0]);
                targets
                    .horizontal
                    .extend([rect.y0, rect.y1, rect.y0 + rect.height() / 2.0]);
            }
        }
    }
    targets
}

fn rect_is_finite(rect: Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}

/// One axis's drag correction.
#[derive(Debug, Clone)]
pub struct AxisCorrection {
    /// Corrected anchor coordinate for this axis.
    pub anchor: f64,
    /// Candidates that matched during the scan, in scan order. These are
    /// provisional until re-validated against the post-move box with
    /// [`breakpoint_still_aligned`].
    pub breakpoints: Vec<f64>,
}

/// Drag correction for one axis.
///
/// `edge` is the leading edge of the current client rect (x0 or y0),
/// `span` the box extent on this axis, `anchor` the node's settable
/// position on this axis. Each of the three alignments (leading edge,
/// center, trailing edge) within `range` of a candidate overwrites the
/// proposed anchor so that alignment lands exactly on the candidate; the
/// last matching candidate in scan order wins.
pub fn correct_axis_drag(
    edge: f64,
    span: f64,
    anchor: f64,
    candidates: &[f64],
    range: f64,
) -> AxisCorrection {
    let mut corrected = anchor;
    let mut breakpoints = Vec::new();
    for &breakpoint in candidates {
        if (edge - breakpoint).abs() <= range {
            corrected = breakpoint + anchor - edge;
            breakpoints.push(breakpoint);
        }
        if (edge - breakpoint + span / 2.0).abs() <= range {
            corrected = breakpoint + anchor - edge - span / 2.0;
            breakpoints.push(breakpoint);
        }
        if (edge - breakpoint + span).abs() <= range {
            corrected = breakpoint + anchor - edge - span;
            breakpoints.push(breakpoint);
        }
    }
    AxisCorrection {
        anchor: corrected,
        breakpoints,
    }
}

/// Whether `breakpoint` still aligns with the post-move box on one axis,
/// to the nearest integer pixel.
///
/// Because the drag scan overwrites instead of accumulating, the final
/// position reflects only the last match per axis; breakpoints recorded
/// earlier may no longer hold and must not draw a guideline.
pub fn breakpoint_still_aligned(edge: f64, span: f64, breakpoint: f64) -> bool {
    rounds_to_zero(edge - breakpoint)
        || rounds_to_zero(edge - breakpoint + span / 2.0)
        || rounds_to_zero(edge - breakpoint + span)
}

fn rounds_to_zero(value: f64) -> bool {
    value.round() == 0.0
}

/// Resize clamp for one axis: the first candidate within `range` of the
/// proposed anchor coordinate wins and scanning stops.
pub fn clamp_axis_resize(proposed: f64, candidates: &[f64], range: f64) -> Option<f64> {
    candidates
        .iter()
        .copied()
        .find(|breakpoint| (proposed - breakpoint).abs() <= range)
}
