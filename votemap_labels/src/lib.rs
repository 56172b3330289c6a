// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Votemap Labels: decide which map labels fit on screen this frame.
//!
//! [`LabelPlacer::place`] is a pure function of the transform, the screen size,
//! the label list and the font metrics. It reserves space on an
//! [`OcclusionGrid`] aligned with the map axes, so the same label lands in the
//! same cells from frame to frame while the user pans. The grid is rebuilt
//! from scratch on every call.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use votemap_labels::{Label, LabelPlacer, PlacementConfig};
//! use votemap_transform::Transform;
//!
//! let labels = [
//!     Label::new("Melbourne", Point::new(100.0, 100.0)),
//!     Label::new("Wills", Point::new(104.0, 102.0)),
//!     Label::new("Sydney", Point::new(600.0, 400.0)),
//! ];
//! let measure = |text: &str| 7.0 * text.len() as f64;
//!
//! let placer = LabelPlacer::new(PlacementConfig::default());
//! let frame = placer
//!     .place(&Transform::IDENTITY, Size::new(800.0, 600.0), &labels, &measure)
//!     .unwrap();
//!
//! // "Wills" would sit on top of "Melbourne" and is dropped.
//! let shown: Vec<_> = frame.placed.iter().map(|p| labels[p.index].text.as_str()).collect();
//! assert_eq!(shown, ["Melbourne", "Sydney"]);
//! ```
//!
//! Under rotation the grid stays aligned with the map, and each label reserves
//! the map-aligned envelope of its rotated text box. That over-reserves a little
//! but keeps the grid stable.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`Label`], [`PlacementConfig`]
//!   and [`PlacementPolicy`].

mod grid;
mod placement;

pub use grid::{CellRange, OcclusionGrid};
pub use placement::{
    DRAW_PASSES, DrawPass, Label, LabelPlacer, PlacedLabel, Placement, PlacementConfig,
    PlacementPolicy, TextMeasure,
};
