// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 3×3 matrices handed to the triangle renderer.
//!
//! The renderer multiplies `projection * view * [x, y, 1]` for every map-space
//! vertex, so the two matrices together reproduce [`Transform::apply`] followed
//! by a pixel-to-clip-space mapping.

use kurbo::Size;

use crate::transform::Transform;

/// Pixel space to clip space, flipping y so the origin is the top-left corner.
///
/// Only changes when the screen is resized.
#[allow(
    clippy::cast_possible_truncation,
    reason = "GPU uniforms are single precision."
)]
#[must_use]
pub fn projection_matrix(screen: Size) -> [f32; 9] {
    [
        (2.0 / screen.width) as f32,
        0.0,
        0.0,
        0.0,
        (-2.0 / screen.height) as f32,
        0.0,
        -1.0,
        1.0,
        1.0,
    ]
}

impl Transform {
    /// The map-to-pixel matrix for this transform.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "GPU uniforms are single precision."
    )]
    #[must_use]
    pub fn view_matrix(&self) -> [f32; 9] {
        let [a, b, c, d, e, f] = self.to_affine().as_coeffs();
        [
            a as f32, b as f32, 0.0, //
            c as f32, d as f32, 0.0, //
            e as f32, f as f32, 1.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    /// Column-major `m * [x, y, 1]`.
    fn mul(m: &[f32; 9], x: f64, y: f64) -> (f64, f64) {
        let m = m.map(f64::from);
        (m[0] * x + m[3] * y + m[6], m[1] * x + m[4] * y + m[7])
    }

    #[test]
    fn projection_maps_screen_corners_to_clip_corners() {
        let p = projection_matrix(Size::new(800.0, 600.0));
        assert_eq!(mul(&p, 0.0, 0.0), (-1.0, 1.0));
        let (x, y) = mul(&p, 800.0, 600.0);
        assert!((x - 1.0).abs() < 1e-6 && (y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_reproduces_apply() {
        let t = Transform::new(0.5, 0.3, 40.0, -8.0);
        let v = t.view_matrix();
        let (x, y) = mul(&v, 12.0, 34.0);
        let expected = t.apply(Point::new(12.0, 34.0));
        assert!((x - expected.x).abs() < 1e-4);
        assert!((y - expected.y).abs() < 1e-4);
    }
}
