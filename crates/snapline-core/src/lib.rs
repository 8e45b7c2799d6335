//! Snapline Core Library
//!
//! Platform-agnostic drag/resize snapping with alignment guidelines for
//! shapes on a 2D canvas stage. The host rendering engine owns painting,
//! hit-testing and event dispatch; this crate nudges positions/bounds
//! toward nearby alignment candidates and manages the transient
//! guideline markers that visualize the active alignment.

pub mod config;
pub mod guideline;
pub mod handles;
pub mod interaction;
pub mod snap;
pub mod stage;

pub use config::{ConfigError, SerializableColor, SnapConfig, SnapOptions};
pub use guideline::{Axis, Guideline, GUIDELINE_DASH_PATTERN, GUIDELINE_EXTENT};
pub use handles::HandleKind;
pub use interaction::{DragEvent, ResizeEvent, ResizeGesture, Snapper};
pub use snap::{collect_snap_targets, SnapTargets};
pub use stage::{Layer, LayerId, NodeId, NodeKind, SceneNode, Stage};
