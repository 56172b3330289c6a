// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy accept/reject label placement.
//!
//! Every frame starts from an empty [`OcclusionGrid`] over the visible region.
//! Labels are visited in input order. Each label's screen text box is taken
//! back to map space, its envelope is mapped to grid cells, and the label is
//! accepted only if all those cells are still free. Labels are never nudged or
//! resized, so one either shows in the same place or not at all.

use kurbo::{Point, Rect, Size, Vec2};
use votemap_transform::{DegenerateTransformError, Quad, Transform, boxes_overlap, visible_region};

use crate::grid::OcclusionGrid;

/// A text label pinned to a map point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    /// Text to draw.
    pub text: String,
    /// Map-space anchor; the text box is centered on it.
    pub anchor: Point,
}

impl Label {
    /// Create a label.
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: Point) -> Self {
        Self {
            text: text.into(),
            anchor,
        }
    }
}

/// Font metrics supplied by the host.
pub trait TextMeasure {
    /// Width of `text` in screen pixels.
    fn width(&self, text: &str) -> f64;
}

impl<F: Fn(&str) -> f64> TextMeasure for F {
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// What to do after a label is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementPolicy {
    /// Keep trying later labels.
    #[default]
    SkipAndContinue,
    /// Stop placing at the first rejection.
    StopAtFirstRejection,
}

/// Parameters of the placement pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Text box height in pixels.
    pub text_height: f64,
    /// Approximate number of grid cells over the screen.
    pub resolution: usize,
    /// Rejection policy.
    pub policy: PlacementPolicy,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            text_height: 16.0,
            resolution: 512,
            policy: PlacementPolicy::SkipAndContinue,
        }
    }
}

/// One rendering pass over an accepted label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawPass {
    /// The outline.
    Stroke,
    /// The glyphs.
    Fill,
}

/// Passes for every label, in drawing order.
pub const DRAW_PASSES: [DrawPass; 2] = [DrawPass::Stroke, DrawPass::Fill];

/// An accepted label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedLabel {
    /// Index into the input slice.
    pub index: usize,
    /// Screen position of the anchor.
    pub anchor: Point,
    /// Screen-space text box.
    pub text_box: Rect,
}

impl PlacedLabel {
    /// Where to draw the text from.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.text_box.origin()
    }

    /// Passes to draw this label with, in order.
    #[must_use]
    pub fn passes(&self) -> [DrawPass; 2] {
        DRAW_PASSES
    }
}

/// Result of one placement pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// Accepted labels, in input order.
    pub placed: Vec<PlacedLabel>,
    /// Labels that collided with an earlier one.
    pub rejected: usize,
    /// Labels entirely off the grid.
    pub skipped: usize,
    /// The grid as left by the pass; `None` for an empty screen.
    pub grid: Option<OcclusionGrid>,
}

impl Placement {
    /// Whether nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Stateless per-frame label placer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelPlacer {
    config: PlacementConfig,
}

impl LabelPlacer {
    /// Create a placer.
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// The placement parameters.
    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Choose which `labels` to draw for this view.
    ///
    /// The result depends only on the arguments.
    pub fn place(
        &self,
        transform: &Transform,
        screen: Size,
        labels: &[Label],
        measure: &impl TextMeasure,
    ) -> Result<Placement, DegenerateTransformError> {
        let region = visible_region(screen, transform)?;
        let Some(mut grid) = OcclusionGrid::for_region(region, self.config.resolution) else {
            return Ok(Placement::default());
        };
        let grid_bounds = grid.bounds();
        let height = self.config.text_height;

        let mut out = Placement::default();
        for (index, label) in labels.iter().enumerate() {
            let anchor = transform.apply(label.anchor);
            let width = measure.width(&label.text).max(0.0);
            let text_box = Rect::from_origin_size(
                anchor - Vec2::new(width / 2.0, height / 2.0),
                Size::new(width, height),
            );
            let footprint = Quad::from_rect(text_box).to_map(transform)?.envelope();

            let range = if boxes_overlap(&footprint, &grid_bounds) {
                grid.cell_range(&footprint)
            } else {
                None
            };
            let Some(range) = range else {
                out.skipped += 1;
                continue;
            };

            if grid.is_free(&range) {
                grid.mark(&range);
                out.placed.push(PlacedLabel {
                    index,
                    anchor,
                    text_box,
                });
            } else {
                out.rejected += 1;
                if self.config.policy == PlacementPolicy::StopAtFirstRejection {
                    break;
                }
            }
        }

        tracing::trace!(
            placed = out.placed.len(),
            rejected = out.rejected,
            skipped = out.skipped,
            "labels placed"
        );
        out.grid = Some(grid);
        Ok(out)
    }

    /// Like [`place`](Self::place), but logs a degenerate transform and places nothing.
    pub fn place_or_empty(
        &self,
        transform: &Transform,
        screen: Size,
        labels: &[Label],
        measure: &impl TextMeasure,
    ) -> Placement {
        self.place(transform, screen, labels, measure)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "label placement skipped for this frame");
                Placement::default()
            })
    }
}
