//! Interaction handlers: the glue between host engine events and the
//! snapping math.
//!
//! The host calls [`Snapper::on_drag_move`] on every drag tick,
//! [`Snapper::on_resize_start`] once per resize gesture followed by
//! [`Snapper::constrain_resize`] on every tick, and the two end handlers
//! when a gesture finishes. All handlers run synchronously inside the
//! host's event dispatch; none of them blocks or spawns work. The host
//! must deliver the end event even for interrupted gestures, so the
//! marker-cleanup invariant holds.

use crate::config::{SnapConfig, SnapOptions};
use crate::guideline::{Axis, Guideline};
use crate::snap::{self, SnapTargets};
use crate::stage::{Layer, LayerId, NodeId, Stage};
use kurbo::{Point, Rect};

/// A drag-move or drag-end event reported by the host engine.
#[derive(Debug, Clone, Copy)]
pub struct DragEvent {
    /// Layer owning the dragged node.
    pub layer: LayerId,
    /// The node being dragged.
    pub target: NodeId,
}

/// A resize-start or resize-end event reported by the host engine.
#[derive(Debug, Clone, Copy)]
pub struct ResizeEvent {
    /// Layer owning the resized node.
    pub layer: LayerId,
    /// The node being resized.
    pub target: NodeId,
    /// The transform-widget anchor being dragged.
    pub active_handle: crate::handles::HandleKind,
}

/// Per-gesture resize state.
///
/// Candidates are collected once at gesture start and reused on every
/// tick, so the constrained-bounds computation stays pure. The host
/// keeps the gesture alive for the duration of the resize and drops it
/// at resize-end.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    layer: LayerId,
    targets: SnapTargets,
}

/// Drag/resize snapping behavior over a [`Stage`].
///
/// Construct one per editing session; the configuration is resolved once
/// and never mutated afterward.
#[derive(Debug, Clone)]
pub struct Snapper {
    config: SnapConfig,
}

impl Snapper {
    /// Resolve `options` over the defaults and build the snapper.
    pub fn new(options: SnapOptions) -> Self {
        Self {
            config: SnapConfig::resolve(options),
        }
    }

    /// Build a snapper from an already-resolved configuration.
    pub fn with_config(config: SnapConfig) -> Self {
        Self { config }
    }

    /// The resolved configuration.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Drag-move tick: snap the target's position to nearby candidates
    /// and refresh the guideline markers on its layer.
    ///
    /// The two axes resolve sequentially: x is corrected and applied
    /// first, then y is corrected against the x-corrected box. Unknown
    /// layer or node ids make this a no-op.
    pub fn on_drag_move(&self, stage: &mut Stage, event: &DragEvent) {
        // Clear before recomputing so at most one pass of markers exists
        // per tick.
        let Some(layer) = stage.layer_mut(event.layer) else {
            return;
        };
        layer.clear_guidelines();
        if layer.node(event.target).is_none() {
            return;
        }

        let targets = snap::collect_snap_targets(stage, event.target, &self.config);
        let range = self.config.snap_range;

        // X axis: correct, apply, then validate breakpoints against the
        // moved box.
        let Some((rect, position)) = node_snapshot(stage, event) else {
            return;
        };
        let x_pass = snap::correct_axis_drag(rect.x0, rect.width(), position.x, &targets.vertical, range);
        if !x_pass.breakpoints.is_empty() {
            log::debug!("drag snap x: {} -> {}", position.x, x_pass.anchor);
        }
        move_target(stage, event, Point::new(x_pass.anchor, position.y));

        let Some((rect, position)) = node_snapshot(stage, event) else {
            return;
        };
        if let Some(layer) = stage.layer_mut(event.layer) {
            for &breakpoint in &x_pass.breakpoints {
                if snap::breakpoint_still_aligned(rect.x0, rect.width(), breakpoint) {
                    self.draw_guideline(layer, Axis::Vertical, breakpoint);
                }
            }
        }

        // Y axis, against the x-corrected box.
        let y_pass =
            snap::correct_axis_drag(rect.y0, rect.height(), position.y, &targets.horizontal, range);
        if !y_pass.breakpoints.is_empty() {
            log::debug!("drag snap y: {} -> {}", position.y, y_pass.anchor);
        }
        move_target(stage, event, Point::new(position.x, y_pass.anchor));

        let Some((rect, _)) = node_snapshot(stage, event) else {
            return;
        };
        if let Some(layer) = stage.layer_mut(event.layer) {
            for &breakpoint in &y_pass.breakpoints {
                if snap::breakpoint_still_aligned(rect.y0, rect.height(), breakpoint) {
                    self.draw_guideline(layer, Axis::Horizontal, breakpoint);
                }
            }
        }
    }

    /// Drag-end: unconditionally drop every marker on the target's layer.
    pub fn on_drag_end(&self, stage: &mut Stage, event: &DragEvent) {
        if let Some(layer) = stage.layer_mut(event.layer) {
            layer.clear_guidelines();
        }
    }

    /// Resize-start: capture the per-gesture state, or `None` when the
    /// rotation handle is active (rotation is never snapped).
    pub fn on_resize_start(&self, stage: &Stage, event: &ResizeEvent) -> Option<ResizeGesture> {
        if event.active_handle.is_rotation() {
            log::debug!("rotation handle active, resize snapping skipped");
            return None;
        }
        stage.layer(event.layer)?;
        let targets = snap::collect_snap_targets(stage, event.target, &self.config);
        Some(ResizeGesture {
            layer: event.layer,
            targets,
        })
    }

    /// Resize-move tick: clamp the anchor's proposed position to the
    /// first matching candidate per axis and refresh markers. Returns
    /// the bounds the host engine should apply.
    ///
    /// The previous anchor position is part of the engine's callback
    /// contract but does not influence the clamp.
    pub fn constrain_resize(
        &self,
        stage: &mut Stage,
        gesture: &ResizeGesture,
        _old_pos: Point,
        new_pos: Point,
    ) -> Point {
        let Some(layer) = stage.layer_mut(gesture.layer) else {
            return new_pos;
        };
        layer.clear_guidelines();

        let mut bounds = new_pos;
        if let Some(breakpoint) =
            snap::clamp_axis_resize(new_pos.x, &gesture.targets.vertical, self.config.snap_range)
        {
            bounds.x = breakpoint;
            self.draw_guideline(layer, Axis::Vertical, breakpoint);
        }
        if let Some(breakpoint) =
            snap::clamp_axis_resize(new_pos.y, &gesture.targets.horizontal, self.config.snap_range)
        {
            bounds.y = breakpoint;
            self.draw_guideline(layer, Axis::Horizontal, breakpoint);
        }
        bounds
    }

    /// Resize-end: unconditional cleanup, same as drag-end.
    pub fn on_resize_end(&self, stage: &mut Stage, event: &ResizeEvent) {
        if let Some(layer) = stage.layer_mut(event.layer) {
            layer.clear_guidelines();
        }
    }

    fn draw_guideline(&self, layer: &mut Layer, axis: Axis, offset: f64) {
        if !self.config.show_guidelines {
            return;
        }
        log::trace!("guideline {:?} at {}", axis, offset);
        layer.add_guideline(Guideline::new(axis, offset, &self.config));
    }
}

fn node_snapshot(stage: &Stage, event: &DragEvent) -> Option<(Rect, Point)> {
    let node = stage.layer(event.layer)?.node(event.target)?;
    Some((node.client_rect(), node.position))
}

fn move_target(stage: &mut Stage, event: &DragEvent, position: Point) {
    if let Some(node) = stage
        .layer_mut(event.layer)
        .and_then(|l| l.node_mut(event.target))
    {
        node.set_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::HandleKind;
    use crate::stage::{NodeKind, SceneNode};
    use kurbo::Vec2;

    fn stage_with_layer() -> (Stage, LayerId) {
        let mut stage = Stage::new(800.0, 600.0);
        let layer = stage.add_layer();
        (stage, layer)
    }

    fn add_shape(stage: &mut Stage, layer: LayerId, x: f64, y: f64, w: f64, h: f64) -> NodeId {
        stage
            .layer_mut(layer)
            .unwrap()
            .add_node(SceneNode::new(NodeKind::Shape, Point::new(x, y), w, h))
    }

    fn center_only() -> Snapper {
        Snapper::new(SnapOptions {
            snap_to_stage_borders: Some(false),
            snap_to_shapes: Some(false),
            ..Default::default()
        })
    }

    fn shapes_only() -> Snapper {
        Snapper::new(SnapOptions {
            snap_to_stage_center: Some(false),
            snap_to_stage_borders: Some(false),
            ..Default::default()
        })
    }

    #[test]
    fn test_drag_snaps_to_stage_center() {
        // 800x600 stage, center snapping only: a 100x50 shape whose left
        // edge sits at 398 lands exactly on the x=400 center line.
        let (mut stage, layer) = stage_with_layer();
        let target = add_shape(&mut stage, layer, 398.0, 100.0, 100.0, 50.0);
        let snapper = center_only();

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        let node = stage.find_node(target).unwrap();
        assert_eq!(node.position, Point::new(400.0, 100.0));
        let guidelines = stage.layer(layer).unwrap().guidelines();
        assert_eq!(guidelines.len(), 1);
        assert_eq!(guidelines[0].axis, Axis::Vertical);
        assert_eq!(guidelines[0].offset, 400.0);
    }

    #[test]
    fn test_drag_snaps_to_sibling_edge() {
        // Sibling at x=0 (50 wide); dragging a shape whose left edge is
        // at x=2 pulls it onto x=0 with one vertical guideline.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 0.0, 100.0, 50.0, 50.0);
        let target = add_shape(&mut stage, layer, 2.0, 200.0, 30.0, 30.0);
        let snapper = shapes_only();

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        let node = stage.find_node(target).unwrap();
        assert_eq!(node.position, Point::new(0.0, 200.0));
        let guidelines = stage.layer(layer).unwrap().guidelines();
        assert_eq!(guidelines.len(), 1);
        assert_eq!(guidelines[0].offset, 0.0);
    }

    #[test]
    fn test_drag_last_match_wins_over_stage_center() {
        // Stage center (400) is collected before the sibling edge (402);
        // with both in tolerance the sibling wins.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 402.0, 500.0, 60.0, 20.0);
        let target = add_shape(&mut stage, layer, 399.0, 100.0, 100.0, 50.0);
        let snapper = Snapper::new(SnapOptions {
            snap_to_stage_borders: Some(false),
            ..Default::default()
        });

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        assert_eq!(stage.find_node(target).unwrap().position.x, 402.0);
        // The stale 400 breakpoint fails re-validation: only the sibling
        // edge draws a guideline.
        let guidelines = stage.layer(layer).unwrap().guidelines();
        let vertical: Vec<f64> = guidelines
            .iter()
            .filter(|g| g.axis == Axis::Vertical)
            .map(|g| g.offset)
            .collect();
        assert_eq!(vertical, vec![402.0]);
    }

    #[test]
    fn test_drag_respects_anchor_offset() {
        // Center-anchored 30x30 shape: anchor (17, 215), box origin
        // (2, 200). Snapping the box's left edge to x=0 moves the anchor
        // to 15.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 0.0, 100.0, 50.0, 50.0);
        let target = stage.layer_mut(layer).unwrap().add_node(
            SceneNode::new(NodeKind::Shape, Point::new(17.0, 215.0), 30.0, 30.0)
                .with_offset(Vec2::new(-15.0, -15.0)),
        );
        let snapper = shapes_only();

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        let node = stage.find_node(target).unwrap();
        assert_eq!(node.position.x, 15.0);
        assert_eq!(node.client_rect().x0, 0.0);
    }

    #[test]
    fn test_drag_axes_resolve_sequentially() {
        // Both axes in tolerance: x resolves first, then y against the
        // x-corrected box; both guidelines draw.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 100.0, 100.0, 50.0, 50.0);
        let target = add_shape(&mut stage, layer, 148.0, 152.0, 40.0, 40.0);
        let snapper = shapes_only();

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        let node = stage.find_node(target).unwrap();
        // Left edge to sibling right edge (150), top edge to sibling
        // bottom edge (150).
        assert_eq!(node.position, Point::new(150.0, 150.0));
        let guidelines = stage.layer(layer).unwrap().guidelines();
        assert!(guidelines.iter().any(|g| g.axis == Axis::Vertical && g.offset == 150.0));
        assert!(guidelines.iter().any(|g| g.axis == Axis::Horizontal && g.offset == 150.0));
    }

    #[test]
    fn test_drag_outside_tolerance_is_untouched() {
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 0.0, 100.0, 50.0, 50.0);
        let target = add_shape(&mut stage, layer, 4.0, 300.0, 30.0, 30.0);
        let snapper = shapes_only();

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        assert_eq!(stage.find_node(target).unwrap().position, Point::new(4.0, 300.0));
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_drag_disabled_sources_never_snap() {
        // Sibling edge exactly coincides with the target's edge, but
        // shape snapping is off and no other source is enabled.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 100.0, 100.0, 50.0, 50.0);
        let target = add_shape(&mut stage, layer, 100.0, 300.0, 30.0, 30.0);
        let snapper = Snapper::new(SnapOptions {
            snap_to_stage_center: Some(false),
            snap_to_stage_borders: Some(false),
            snap_to_shapes: Some(false),
            ..Default::default()
        });

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        assert_eq!(stage.find_node(target).unwrap().position, Point::new(100.0, 300.0));
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_drag_snaps_without_guidelines_when_hidden() {
        let (mut stage, layer) = stage_with_layer();
        let target = add_shape(&mut stage, layer, 398.0, 100.0, 100.0, 50.0);
        let snapper = Snapper::new(SnapOptions {
            show_guidelines: Some(false),
            snap_to_stage_borders: Some(false),
            snap_to_shapes: Some(false),
            ..Default::default()
        });

        snapper.on_drag_move(&mut stage, &DragEvent { layer, target });

        // Position still snaps; no markers are created.
        assert_eq!(stage.find_node(target).unwrap().position.x, 400.0);
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_drag_end_clears_markers() {
        let (mut stage, layer) = stage_with_layer();
        let target = add_shape(&mut stage, layer, 398.0, 298.0, 100.0, 50.0);
        let snapper = center_only();
        let event = DragEvent { layer, target };

        snapper.on_drag_move(&mut stage, &event);
        assert!(stage.guideline_count() > 0);

        snapper.on_drag_end(&mut stage, &event);
        assert_eq!(stage.guideline_count(), 0);
        // Cleanup is idempotent.
        snapper.on_drag_end(&mut stage, &event);
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_drag_unknown_target_is_noop() {
        let (mut stage, layer) = stage_with_layer();
        let snapper = center_only();
        snapper.on_drag_move(
            &mut stage,
            &DragEvent {
                layer,
                target: NodeId::new_v4(),
            },
        );
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_resize_clamps_to_first_candidate() {
        // Proposed anchor (203, 150) with a sibling left edge at 200:
        // x clamps to 200, y passes through, one vertical guideline.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 200.0, 400.0, 80.0, 40.0);
        let target = add_shape(&mut stage, layer, 150.0, 100.0, 60.0, 60.0);
        let snapper = shapes_only();

        let gesture = snapper
            .on_resize_start(
                &stage,
                &ResizeEvent {
                    layer,
                    target,
                    active_handle: HandleKind::BottomRight,
                },
            )
            .unwrap();
        let bounds = snapper.constrain_resize(
            &mut stage,
            &gesture,
            Point::new(210.0, 160.0),
            Point::new(203.0, 150.0),
        );

        assert_eq!(bounds, Point::new(200.0, 150.0));
        let guidelines = stage.layer(layer).unwrap().guidelines();
        assert_eq!(guidelines.len(), 1);
        assert_eq!(guidelines[0].axis, Axis::Vertical);
        assert_eq!(guidelines[0].offset, 200.0);
    }

    #[test]
    fn test_resize_first_match_beats_closer_candidate() {
        // Stage center (400) is scanned before the sibling edge (398);
        // the scan stops at the center even though 398 is closer.
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 398.0, 400.0, 50.0, 40.0);
        let target = add_shape(&mut stage, layer, 300.0, 100.0, 60.0, 60.0);
        let snapper = Snapper::new(SnapOptions {
            snap_to_stage_borders: Some(false),
            ..Default::default()
        });

        let gesture = snapper
            .on_resize_start(
                &stage,
                &ResizeEvent {
                    layer,
                    target,
                    active_handle: HandleKind::Right,
                },
            )
            .unwrap();
        let bounds = snapper.constrain_resize(
            &mut stage,
            &gesture,
            Point::new(360.0, 130.0),
            Point::new(399.0, 130.0),
        );

        assert_eq!(bounds.x, 400.0);
    }

    #[test]
    fn test_resize_markers_refresh_each_tick() {
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 200.0, 400.0, 80.0, 40.0);
        let target = add_shape(&mut stage, layer, 150.0, 100.0, 60.0, 60.0);
        let snapper = shapes_only();
        let event = ResizeEvent {
            layer,
            target,
            active_handle: HandleKind::BottomRight,
        };

        let gesture = snapper.on_resize_start(&stage, &event).unwrap();
        snapper.constrain_resize(&mut stage, &gesture, Point::ZERO, Point::new(202.0, 150.0));
        assert_eq!(stage.guideline_count(), 1);

        // A tick with no match clears the previous markers.
        snapper.constrain_resize(&mut stage, &gesture, Point::ZERO, Point::new(150.0, 150.0));
        assert_eq!(stage.guideline_count(), 0);

        snapper.constrain_resize(&mut stage, &gesture, Point::ZERO, Point::new(199.0, 150.0));
        assert_eq!(stage.guideline_count(), 1);
        snapper.on_resize_end(&mut stage, &event);
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_resize_rotation_handle_is_exempt() {
        let (mut stage, layer) = stage_with_layer();
        add_shape(&mut stage, layer, 200.0, 400.0, 80.0, 40.0);
        let target = add_shape(&mut stage, layer, 150.0, 100.0, 60.0, 60.0);
        let snapper = shapes_only();

        let gesture = snapper.on_resize_start(
            &stage,
            &ResizeEvent {
                layer,
                target,
                active_handle: HandleKind::Rotate,
            },
        );

        assert!(gesture.is_none());
        assert_eq!(stage.guideline_count(), 0);
    }

    #[test]
    fn test_resize_candidates_fixed_at_gesture_start() {
        // Shapes added after the gesture started do not contribute.
        let (mut stage, layer) = stage_with_layer();
        let target = add_shape(&mut stage, layer, 150.0, 100.0, 60.0, 60.0);
        let snapper = shapes_only();

        let gesture = snapper
            .on_resize_start(
                &stage,
                &ResizeEvent {
                    layer,
                    target,
                    active_handle: HandleKind::TopLeft,
                },
            )
            .unwrap();
        add_shape(&mut stage, layer, 300.0, 400.0, 80.0, 40.0);

        let bounds = snapper.constrain_resize(
            &mut stage,
            &gesture,
            Point::ZERO,
            Point::new(301.0, 200.0),
        );
        assert_eq!(bounds, Point::new(301.0, 200.0));
    }
}
