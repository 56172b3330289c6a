// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile fetch parameters derived from the current view.
//!
//! A fetch is keyed by a map-space bounding box and a map-units-per-pixel
//! resolution. Both are a pure function of the transform and the screen size.
//! [`FetchGuard`] keeps at most one request in flight; results land whenever the
//! host's I/O completes and are picked up by the next frame.

use kurbo::{Rect, Size};

use crate::error::DegenerateTransformError;
use crate::geometry::{contains_box, visible_region};
use crate::transform::Transform;

/// How the map-units-per-pixel scalar is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// Exactly `1 / scale`.
    #[default]
    Exact,
    /// `1 / scale` rounded up to a power of two, so continuous zooming only
    /// changes the request at octave boundaries.
    PowerOfTwo,
}

/// Parameters of one tile/vertex request.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileQuery {
    /// Map-space envelope of the screen.
    pub bounds: Rect,
    /// Map units per screen pixel.
    pub units_per_pixel: f64,
}

impl TileQuery {
    /// The query for what is currently on screen.
    pub fn for_view(
        screen: Size,
        transform: &Transform,
        resolution: Resolution,
    ) -> Result<Self, DegenerateTransformError> {
        let bounds = visible_region(screen, transform)?;
        let exact = transform.map_units_per_pixel();
        let units_per_pixel = match resolution {
            Resolution::Exact => exact,
            Resolution::PowerOfTwo => power_of_two_at_least(exact),
        };
        Ok(Self {
            bounds,
            units_per_pixel,
        })
    }

    /// Whether data fetched for `self` already serves `other`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.units_per_pixel == other.units_per_pixel && contains_box(&self.bounds, &other.bounds)
    }
}

/// The smallest power of two that is at least `value`.
///
/// Non-positive and non-finite inputs are returned unchanged.
#[must_use]
pub fn power_of_two_at_least(value: f64) -> f64 {
    if !(value > 0.0) || !value.is_finite() {
        return value;
    }
    value.log2().ceil().exp2()
}

/// The "request already pending" flag, plus what was last loaded.
#[derive(Clone, Debug, Default)]
pub struct FetchGuard {
    pending: Option<TileQuery>,
    loaded: Option<TileQuery>,
}

impl FetchGuard {
    /// Create an idle guard with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `wanted` should be fetched now.
    ///
    /// Returns the query to issue and marks it pending, or `None` when a
    /// request is already in flight or the loaded data already covers it.
    pub fn poll(&mut self, wanted: TileQuery) -> Option<TileQuery> {
        if let Some(pending) = &self.pending {
            tracing::trace!(?pending, "tile request already pending");
            return None;
        }
        if self.loaded.as_ref().is_some_and(|l| l.covers(&wanted)) {
            return None;
        }
        self.pending = Some(wanted);
        Some(wanted)
    }

    /// The pending request completed; its data is now what is loaded.
    pub fn complete(&mut self) {
        if let Some(done) = self.pending.take() {
            self.loaded = Some(done);
        }
    }

    /// The pending request failed. Loaded data is kept and the next poll may retry.
    pub fn fail(&mut self) {
        if let Some(failed) = self.pending.take() {
            tracing::debug!(?failed, "tile request failed");
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The query whose data was last loaded.
    #[must_use]
    pub fn loaded(&self) -> Option<&TileQuery> {
        self.loaded.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_rounding() {
        assert_eq!(power_of_two_at_least(1.0), 1.0);
        assert_eq!(power_of_two_at_least(3.0), 4.0);
        assert_eq!(power_of_two_at_least(4096.5), 8192.0);
        assert_eq!(power_of_two_at_least(0.3), 0.5);
        assert_eq!(power_of_two_at_least(0.0), 0.0);
    }

    #[test]
    fn query_is_a_function_of_view() {
        let screen = Size::new(800.0, 600.0);
        let t = Transform::new(0.001, 0.0, 0.0, 0.0);
        let exact = TileQuery::for_view(screen, &t, Resolution::Exact).unwrap();
        assert_eq!((exact.bounds.x0, exact.bounds.y0), (0.0, 0.0));
        assert!((exact.bounds.x1 - 800_000.0).abs() < 1e-6);
        assert!((exact.bounds.y1 - 600_000.0).abs() < 1e-6);
        assert!((exact.units_per_pixel - 1000.0).abs() < 1e-9);

        let bucketed = TileQuery::for_view(screen, &t, Resolution::PowerOfTwo).unwrap();
        assert_eq!(bucketed.units_per_pixel, 1024.0);
        assert_eq!(bucketed, TileQuery::for_view(screen, &t, Resolution::PowerOfTwo).unwrap());
    }

    #[test]
    fn guard_allows_one_request_at_a_time() {
        let q = TileQuery {
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            units_per_pixel: 2.0,
        };
        let mut guard = FetchGuard::new();
        assert_eq!(guard.poll(q), Some(q));
        assert!(guard.is_pending());
        assert_eq!(guard.poll(q), None);

        guard.complete();
        assert!(!guard.is_pending());
        assert_eq!(guard.loaded(), Some(&q));

        // Panning inside the loaded bounds needs nothing new.
        let inside = TileQuery {
            bounds: Rect::new(2.0, 2.0, 8.0, 8.0),
            ..q
        };
        assert_eq!(guard.poll(inside), None);

        // Zooming to another resolution does.
        let finer = TileQuery {
            units_per_pixel: 1.0,
            ..inside
        };
        assert_eq!(guard.poll(finer), Some(finer));
        guard.fail();
        assert!(!guard.is_pending());
        assert_eq!(guard.loaded(), Some(&q));
        assert_eq!(guard.poll(finer), Some(finer));
    }
}
