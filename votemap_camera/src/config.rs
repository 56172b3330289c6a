// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera limits and timings.

use kurbo::{Point, Rect};
use votemap_transform::{Transform, fit_box};

/// Limits and timings for the map camera.
///
/// The defaults suit a projected national map measured in metres: from a
/// whole-country view down to street level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraConfig {
    /// Smallest allowed scale (most zoomed out). Must be positive.
    pub min_scale: f64,
    /// Largest allowed scale (most zoomed in).
    pub max_scale: f64,
    /// Wheel distance, in scroll pixels, from `min_scale` to `max_scale`.
    pub max_scroll: f64,
    /// Duration of a wheel-zoom animation, in milliseconds.
    pub scroll_duration: f64,
    /// Duration of a single-leg jump, in milliseconds.
    pub jump_duration: f64,
    /// Duration of each leg of a two-leg jump, in milliseconds.
    pub leg_duration: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.0001,
            max_scale: 0.5,
            max_scroll: 8000.0,
            scroll_duration: 100.0,
            jump_duration: 1000.0,
            leg_duration: 750.0,
        }
    }
}

impl CameraConfig {
    /// Clamp `scale` into `[min_scale, max_scale]`.
    ///
    /// Unlike [`f64::clamp`] this does not panic on an inverted range; the
    /// upper limit wins.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// [`fit_box`] with the scale clamped, keeping `target` centred in `frame`.
    ///
    /// A box too small to fit at `max_scale` is shown with margin; one too big
    /// for `min_scale`, or an empty `frame`, is cropped.
    #[must_use]
    pub fn fit(&self, target: Rect, frame: Rect) -> Transform {
        let mut view = fit_box(target, frame);
        let scale = self.clamp_scale(view.scale);
        if scale != view.scale {
            view.scale = scale;
            view.pin(target.center(), frame.center());
        }
        view
    }

    /// `view` with its scale clamped, zooming about the screen point `center`.
    #[must_use]
    pub fn clamp_view(&self, view: Transform, center: Point) -> Transform {
        let scale = self.clamp_scale(view.scale);
        if scale == view.scale {
            return view;
        }
        let mut clamped = Transform { scale, ..view };
        if let Ok(anchor) = view.inverse(center) {
            clamped.pin(anchor, center);
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_scale_bounds() {
        let cfg = CameraConfig::default();
        assert_eq!(cfg.clamp_scale(1.0), 0.5);
        assert_eq!(cfg.clamp_scale(1e-9), 0.0001);
        assert_eq!(cfg.clamp_scale(0.25), 0.25);
    }

    #[test]
    fn fit_respects_limits_and_centres() {
        let cfg = CameraConfig::default();
        let frame = Rect::new(0.0, 0.0, 800.0, 600.0);

        // Within limits the plain fit is kept.
        let street = Rect::new(0.0, 0.0, 8000.0, 6000.0);
        assert_eq!(cfg.fit(street, frame), fit_box(street, frame));

        // A single building would need scale 6.
        let building = Rect::new(1000.0, 2000.0, 1100.0, 2100.0);
        let view = cfg.fit(building, frame);
        assert_eq!(view.scale, cfg.max_scale);
        assert!((view.apply(building.center()) - frame.center()).hypot() < 1e-9);

        // An empty frame would give scale 0.
        let view = cfg.fit(street, Rect::ZERO);
        assert_eq!(view.scale, cfg.min_scale);
        assert!(view.inverse(Point::ORIGIN).is_ok());
    }

    #[test]
    fn clamp_view_holds_the_centre() {
        let cfg = CameraConfig::default();
        let center = Point::new(400.0, 300.0);
        let ok = Transform::new(0.25, 0.5, 10.0, 20.0);
        assert_eq!(cfg.clamp_view(ok, center), ok);

        let close = Transform::new(5.0, 0.5, 10.0, 20.0);
        let anchor = close.inverse(center).unwrap();
        let clamped = cfg.clamp_view(close, center);
        assert_eq!((clamped.scale, clamped.rotate), (0.5, 0.5));
        assert!((clamped.apply(anchor) - center).hypot() < 1e-9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let cfg: CameraConfig = serde_json::from_str(r#"{ "max_scale": 4.0 }"#).unwrap();
        assert_eq!(cfg.max_scale, 4.0);
        assert_eq!(cfg.scroll_duration, CameraConfig::default().scroll_duration);
    }
}
