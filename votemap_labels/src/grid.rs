// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map-aligned occlusion grid.
//!
//! The grid covers a map-space region with square cells whose side is a power
//! of two, on an origin snapped to a multiple of the cell size. Panning keeps
//! the cell boundaries where they are, and zooming only changes the cell size
//! when the view crosses an octave, so a label that fits keeps fitting from
//! one frame to the next.

use core::ops::Range;

use kurbo::{Point, Rect};
use votemap_transform::power_of_two_at_least;

/// Column and row ranges of the cells a box touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// Columns, left to right.
    pub cols: Range<usize>,
    /// Rows, top to bottom.
    pub rows: Range<usize>,
}

impl CellRange {
    /// Number of cells in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cols.len() * self.rows.len()
    }

    /// Whether the range covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A used/free flag per cell, over a map-space region.
#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionGrid {
    origin: Point,
    cell_size: f64,
    cols: usize,
    rows: usize,
    used: Vec<bool>,
}

impl OcclusionGrid {
    /// A free grid over `region` with roughly `resolution` cells.
    ///
    /// Rows and columns follow the region's aspect ratio. The row height is
    /// rounded up to a power of two to get the cell size, so the grid usually
    /// has somewhat fewer cells than asked for. Returns `None` for an empty or
    /// non-finite region, or a zero resolution.
    #[must_use]
    pub fn for_region(region: Rect, resolution: usize) -> Option<Self> {
        let (w, h) = (region.width(), region.height());
        if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) || resolution == 0 {
            return None;
        }

        let budget = resolution as f64;
        let num_rows = (budget / (w / h)).sqrt();
        let cell_size = power_of_two_at_least(h / num_rows);
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return None;
        }

        let origin = Point::new(
            region.x0 - region.x0.rem_euclid(cell_size),
            region.y0 - region.y0.rem_euclid(cell_size),
        );
        let cols = cell_count(region.x1 - origin.x, cell_size);
        let rows = cell_count(region.y1 - origin.y, cell_size);
        Some(Self {
            origin,
            cell_size,
            cols,
            rows,
            used: vec![false; cols * rows],
        })
    }

    /// Side of one cell, in map units.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Map-space corner of cell (0, 0).
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Map-space box covered by the grid.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let (w, h) = (self.cols as f64, self.rows as f64);
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + w * self.cell_size,
            self.origin.y + h * self.cell_size,
        )
    }

    /// Cells touched by the map-space box `rect`, clipped to the grid.
    ///
    /// A box thinner than a cell still touches one. Returns `None` when the box
    /// lies entirely outside the grid.
    #[must_use]
    pub fn cell_range(&self, rect: &Rect) -> Option<CellRange> {
        Some(CellRange {
            cols: axis_range(rect.x0, rect.x1, self.origin.x, self.cell_size, self.cols)?,
            rows: axis_range(rect.y0, rect.y1, self.origin.y, self.cell_size, self.rows)?,
        })
    }

    /// Whether no cell in `range` is used.
    #[must_use]
    pub fn is_free(&self, range: &CellRange) -> bool {
        range
            .rows
            .clone()
            .all(|row| !self.used[self.row_span(row, &range.cols)].contains(&true))
    }

    /// Mark every cell in `range` used.
    pub fn mark(&mut self, range: &CellRange) {
        for row in range.rows.clone() {
            let span = self.row_span(row, &range.cols);
            self.used[span].fill(true);
        }
    }

    /// Number of used cells.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    fn row_span(&self, row: usize, cols: &Range<usize>) -> Range<usize> {
        let start = row * self.cols;
        start + cols.start..start + cols.end
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is finite, positive and bounded by the cell budget."
)]
fn cell_count(extent: f64, cell_size: f64) -> usize {
    ((extent / cell_size).ceil() as usize).max(1)
}

// Cells `[floor(lo), ceil(hi))` along one axis, at least one wide, clipped to `0..n`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Both ends are clamped into 0..=n before the cast."
)]
fn axis_range(lo: f64, hi: f64, origin: f64, cell_size: f64, n: usize) -> Option<Range<usize>> {
    let start = ((lo - origin) / cell_size).floor();
    let mut end = ((hi - origin) / cell_size).ceil();
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    if end <= start {
        end = start + 1.0;
    }
    let limit = n as f64;
    if end <= 0.0 || start >= limit {
        return None;
    }
    Some(start.max(0.0) as usize..end.min(limit) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_grid() -> OcclusionGrid {
        OcclusionGrid::for_region(Rect::new(0.0, 0.0, 800.0, 600.0), 512).unwrap()
    }

    #[test]
    fn cell_size_is_power_of_two_matching_aspect() {
        let grid = screen_grid();
        // 512 cells at 4:3 gives rows of about 30.6 units, rounded up to 32.
        assert_eq!(grid.cell_size(), 32.0);
        assert_eq!(grid.origin(), Point::ORIGIN);
        assert_eq!((grid.cols(), grid.rows()), (25, 19));
        assert!(grid.cols() * grid.rows() <= 512);
        assert_eq!(grid.bounds(), Rect::new(0.0, 0.0, 800.0, 608.0));
    }

    #[test]
    fn fractional_cells_for_tiny_regions() {
        let grid = OcclusionGrid::for_region(Rect::new(0.0, 0.0, 8.0, 6.0), 512).unwrap();
        assert_eq!(grid.cell_size(), 0.5);
    }

    #[test]
    fn origin_snaps_to_cell_multiple() {
        let grid = OcclusionGrid::for_region(Rect::new(-50.0, 70.0, 750.0, 670.0), 512).unwrap();
        assert_eq!(grid.cell_size(), 32.0);
        assert_eq!(grid.origin(), Point::new(-64.0, 64.0));
        assert!(grid.bounds().x1 >= 750.0 && grid.bounds().y1 >= 670.0);
    }

    #[test]
    fn small_zoom_changes_keep_cell_size() {
        let a = OcclusionGrid::for_region(Rect::new(0.0, 0.0, 800.0, 600.0), 512).unwrap();
        let b = OcclusionGrid::for_region(Rect::new(0.0, 0.0, 816.0, 612.0), 512).unwrap();
        assert_eq!(a.cell_size(), b.cell_size());
    }

    #[test]
    fn empty_region_has_no_grid() {
        assert!(OcclusionGrid::for_region(Rect::new(0.0, 0.0, 0.0, 10.0), 512).is_none());
        assert!(OcclusionGrid::for_region(Rect::new(0.0, 0.0, 10.0, 10.0), 0).is_none());
    }

    #[test]
    fn ranges_are_floor_to_ceil_and_clipped() {
        let grid = screen_grid();
        let r = grid.cell_range(&Rect::new(84.0, 92.0, 116.0, 108.0)).unwrap();
        assert_eq!(r, CellRange { cols: 2..4, rows: 2..4 });
        assert_eq!(r.len(), 4);

        // A point still claims one cell.
        let r = grid.cell_range(&Rect::new(32.0, 32.0, 32.0, 32.0)).unwrap();
        assert_eq!(r, CellRange { cols: 1..2, rows: 1..2 });

        // Boxes hanging off the edge are clipped.
        let r = grid.cell_range(&Rect::new(-100.0, 590.0, 10.0, 700.0)).unwrap();
        assert_eq!(r, CellRange { cols: 0..1, rows: 18..19 });

        assert!(grid.cell_range(&Rect::new(900.0, 0.0, 950.0, 10.0)).is_none());
        assert!(grid.cell_range(&Rect::new(0.0, -40.0, 10.0, -1.0)).is_none());
    }

    #[test]
    fn marking_occupies_cells() {
        let mut grid = screen_grid();
        let a = grid.cell_range(&Rect::new(84.0, 92.0, 116.0, 108.0)).unwrap();
        let b = grid.cell_range(&Rect::new(100.0, 100.0, 140.0, 110.0)).unwrap();
        let c = grid.cell_range(&Rect::new(300.0, 300.0, 340.0, 310.0)).unwrap();
        assert!(grid.is_free(&a));
        grid.mark(&a);
        assert_eq!(grid.used_count(), 4);
        assert!(!grid.is_free(&a));
        assert!(!grid.is_free(&b));
        assert!(grid.is_free(&c));
    }
}
