// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Votemap Camera: turns pointer, wheel and key input into camera motion.
//!
//! The camera is a [`Transform`](votemap_transform::Transform) with a single
//! writer: [`ViewerState::tick`], called once per frame. Event callbacks only
//! record input into an [`InputState`]. Each tick then:
//!
//! 1. resolves pointer locks into a pan or pinch ([`GestureResolver`]); taking a
//!    lock cancels any running animation;
//! 2. turns wheel movement into a short zoom toward the cursor ([`ScrollZoom`]);
//! 3. turns preset keys into one- or two-leg jumps ([`PresetTable`], [`plan_jump`]);
//! 4. advances the [`AnimationQueue`], which overwrites the transform while an
//!    animation is active and lands exactly on its end.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use votemap_camera::{CameraConfig, PresetTable, ViewerState};
//! use votemap_transform::Transform;
//!
//! let config = CameraConfig { min_scale: 0.01, max_scale: 100.0, ..CameraConfig::default() };
//! let mut viewer = ViewerState::with_transform(
//!     Size::new(800.0, 600.0),
//!     config,
//!     PresetTable::default(),
//!     Transform::IDENTITY,
//! );
//!
//! // Drag the map 100px to the right.
//! viewer.input_mut().on_pointer_down(1, Point::new(400.0, 300.0));
//! viewer.tick(0.0);
//! viewer.input_mut().on_pointer_move(1, Point::new(500.0, 300.0));
//! viewer.tick(16.0);
//! assert_eq!(viewer.transform().translate_x, 100.0);
//!
//! // Release and zoom in at the cursor.
//! viewer.input_mut().on_pointer_up(1, Point::new(500.0, 300.0));
//! viewer.input_mut().on_wheel(-120.0);
//! viewer.tick(32.0);
//! viewer.tick(32.0 + viewer.config().scroll_duration);
//! assert!(viewer.transform().scale > 1.0);
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`CameraConfig`].

mod animation;
mod config;
mod gesture;
mod input;
mod presets;
mod scroll;
mod viewer;

pub use animation::{Animation, AnimationKind, AnimationQueue, Phase, interpolate};
pub use config::CameraConfig;
pub use gesture::{Gesture, GestureResolver, PointerLock};
pub use input::{InputState, Key, Pointer, PointerFlags, PointerId};
pub use presets::{PresetTable, SavedViews, plan_jump};
pub use scroll::ScrollZoom;
pub use viewer::ViewerState;
