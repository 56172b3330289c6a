// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The map-to-screen similarity transform and the scalar helpers used to
//! interpolate it.

use core::f64::consts::{PI, TAU};

use kurbo::{Affine, Point, Vec2};

use crate::error::DegenerateTransformError;

/// A 2D similarity transform from map space to screen space.
///
/// The transform is `screen = scale · R(rotate) · map + translate`. Because
/// screen y grows downward, a positive `rotate` turns the map counter-clockwise
/// as seen on screen, which gives the sign pattern:
///
/// ```text
/// x' = scale · (x·cos θ + y·sin θ) + translate_x
/// y' = scale · (y·cos θ − x·sin θ) + translate_y
/// ```
///
/// `scale` must stay strictly positive for [`Transform::inverse`] to succeed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Screen pixels per map unit.
    pub scale: f64,
    /// Rotation in radians, kept in `[-π, π)` after direct manipulation.
    pub rotate: f64,
    /// Horizontal screen offset of the map origin.
    pub translate_x: f64,
    /// Vertical screen offset of the map origin.
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Unit scale, no rotation, no translation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a transform from its four components.
    pub const fn new(scale: f64, rotate: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            rotate,
            translate_x,
            translate_y,
        }
    }

    /// The translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Whether [`Transform::inverse`] can succeed.
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        self.scale != 0.0 && !self.scale.is_nan()
    }

    /// Map-space point to screen space.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let (sin, cos) = self.rotate.sin_cos();
        Point::new(
            self.scale * (p.x * cos + p.y * sin) + self.translate_x,
            self.scale * (p.y * cos - p.x * sin) + self.translate_y,
        )
    }

    /// Screen-space point back to map space.
    ///
    /// This is the exact algebraic inverse of [`Transform::apply`].
    pub fn inverse(&self, p: Point) -> Result<Point, DegenerateTransformError> {
        if !self.is_invertible() {
            return Err(DegenerateTransformError);
        }
        let (sin, cos) = self.rotate.sin_cos();
        let x = p.x - self.translate_x;
        let y = p.y - self.translate_y;
        Ok(Point::new(
            (x * cos - y * sin) / self.scale,
            (x * sin + y * cos) / self.scale,
        ))
    }

    /// Adjust the translation so that the map point `map` renders at `screen`.
    ///
    /// Scale and rotation are left untouched.
    pub fn pin(&mut self, map: Point, screen: Point) {
        let current = self.apply(map);
        self.translate_x += screen.x - current.x;
        self.translate_y += screen.y - current.y;
    }

    /// Map units covered by one screen pixel.
    #[must_use]
    pub fn map_units_per_pixel(&self) -> f64 {
        1.0 / self.scale
    }

    /// The same transform with `rotate` wrapped into `[-π, π)`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            rotate: normalize_angle(self.rotate),
            ..self
        }
    }

    /// The equivalent [`Affine`], mapping map space to screen space.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let (sin, cos) = self.rotate.sin_cos();
        let s = self.scale;
        Affine::new([
            s * cos,
            -s * sin,
            s * sin,
            s * cos,
            self.translate_x,
            self.translate_y,
        ])
    }
}

/// Wrap an angle in radians into `[-π, π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // `rem_euclid` can round up to exactly TAU.
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Signed rotation from `from` to `to` along the shorter arc.
///
/// Both inputs are expected in `[-π, π)`; a difference larger than π in
/// magnitude is wrapped by a full turn.
#[must_use]
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let delta = to - from;
    if delta > PI {
        delta - TAU
    } else if delta < -PI {
        delta + TAU
    } else {
        delta
    }
}

/// Linear interpolation. Returns `a` exactly at `t = 0` and `b` exactly at `t = 1`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn samples() -> [Transform; 4] {
        [
            Transform::IDENTITY,
            Transform::new(0.0003, 0.7, 512.0, -90.0),
            Transform::new(2.5, -3.0, -1.0e4, 3.0e3),
            Transform::new(0.125, PI - 1e-6, 0.0, 640.0),
        ]
    }

    #[test]
    fn apply_matches_formula() {
        let t = Transform::new(2.0, PI / 2.0, 10.0, 20.0);
        // Rotating by +90° maps +x to -y on screen (counter-clockwise, y down).
        let p = t.apply(Point::new(1.0, 0.0));
        assert!(close(p.x, 10.0));
        assert!(close(p.y, 18.0));
    }

    #[test]
    fn inverse_law_both_ways() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1_140_377.0, 4_187_714.0),
            Point::new(-37.5, 12.25),
        ];
        for t in samples() {
            for p in points {
                let there = t.apply(p);
                let back = t.inverse(there).unwrap();
                assert!(close(back.x, p.x) && close(back.y, p.y), "{t:?} {p:?} {back:?}");

                let map = t.inverse(p).unwrap();
                let screen = t.apply(map);
                assert!(close(screen.x, p.x) && close(screen.y, p.y), "{t:?} {p:?}");
            }
        }
    }

    #[test]
    fn zero_scale_is_degenerate() {
        let t = Transform::new(0.0, 0.3, 1.0, 1.0);
        assert_eq!(t.inverse(Point::ORIGIN), Err(DegenerateTransformError));
        assert!(!Transform::new(f64::NAN, 0.0, 0.0, 0.0).is_invertible());
    }

    #[test]
    fn pin_keeps_map_point_under_screen_point() {
        let mut t = Transform::new(0.5, 1.1, 3.0, 4.0);
        let map = Point::new(100.0, -40.0);
        let screen = Point::new(400.0, 300.0);
        t.pin(map, screen);
        let p = t.apply(map);
        assert!(close(p.x, screen.x) && close(p.y, screen.y));
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.rotate, 1.1);
    }

    #[test]
    fn affine_agrees_with_apply() {
        for t in samples() {
            let p = Point::new(17.0, -4.0);
            let a = t.to_affine() * p;
            let b = t.apply(p);
            assert!(close(a.x, b.x) && close(a.y, b.y));
        }
    }

    #[test]
    fn angles_wrap_into_half_open_range() {
        assert_eq!(normalize_angle(PI), -PI);
        assert!(close(normalize_angle(3.0 * PI / 2.0), -PI / 2.0));
        assert!(close(normalize_angle(-3.0 * PI / 2.0), PI / 2.0));
        assert_eq!(normalize_angle(0.25), 0.25);
        for a in [-10.0, -PI, -1e-12, 0.0, 7.0, 1e6] {
            let n = normalize_angle(a);
            assert!((-PI..PI).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn shortest_arc_wraps_long_way_round() {
        assert!(close(shortest_arc(3.0, -3.0), TAU - 6.0));
        assert!(close(shortest_arc(-3.0, 3.0), 6.0 - TAU));
        assert_eq!(shortest_arc(0.5, 1.0), 0.5);
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let (a, b) = (0.1, 0.7);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let t = Transform::new(0.25, -1.0, 5.0, 6.0);
        let json = serde_json::to_string(&t).unwrap();
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
