// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Votemap Transform: the map-to-screen similarity transform and viewport geometry.
//!
//! This crate is the leaf of the Votemap viewer stack. It has no notion of input,
//! time, or text; it only answers "where is this map point on screen" and the
//! box questions built on top of that.
//!
//! - [`Transform`]: uniform scale, rotation and translation, with [`Transform::apply`]
//!   and its exact inverse [`Transform::inverse`].
//! - Box geometry: [`map_corners`], [`envelope`], [`visible_region`], [`fit_box`],
//!   [`combine_boxes`] and [`boxes_overlap`]. Boxes are [`kurbo::Rect`]s; rotated
//!   boxes are [`Quad`]s.
//! - Renderer inputs: [`projection_matrix`] and [`Transform::view_matrix`].
//! - Tile requests: [`TileQuery`] and the single-flight [`FetchGuard`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use votemap_transform::{Transform, fit_box, visible_region};
//!
//! // Fit a 100×50 map region into an 800×600 screen.
//! let screen = Size::new(800.0, 600.0);
//! let t = fit_box(Rect::new(0.0, 0.0, 100.0, 50.0), screen.to_rect());
//! assert_eq!(t.scale, 8.0);
//!
//! // The screen shows at least that region.
//! let visible = visible_region(screen, &t).unwrap();
//! assert!(visible.x0 <= 0.0 && visible.x1 >= 100.0);
//!
//! // Screen and map coordinates round-trip.
//! let p = Point::new(12.0, 34.0);
//! let back = t.inverse(t.apply(p)).unwrap();
//! assert!((back - p).hypot() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`Transform`], [`TileQuery`] and
//!   [`Resolution`].

mod error;
mod geometry;
mod matrix;
mod tiles;
mod transform;

pub use error::DegenerateTransformError;
pub use geometry::{
    Combined, Quad, boxes_overlap, combine_boxes, contains_box, envelope, fit_box, map_corners,
    visible_region,
};
pub use matrix::projection_matrix;
pub use tiles::{FetchGuard, Resolution, TileQuery, power_of_two_at_least};
pub use transform::{Transform, lerp, normalize_angle, shortest_arc};
