// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel zoom toward the cursor.
//!
//! The wheel drives a virtual scroll offset in `[0, max_scroll]`. The offset
//! maps onto `[min_scale, max_scale]` through the base-2 exponent of the scale,
//! so equal wheel distances give equal zoom factors.
//!
//! Wheel ticks arriving while a wheel animation is still running keep building
//! on the stored offset; otherwise the offset is first rebuilt from the live
//! scale, since a gesture or jump may have changed it.

use kurbo::Point;
use votemap_transform::{DegenerateTransformError, Transform, lerp};

use crate::animation::{Animation, AnimationKind, AnimationQueue};
use crate::config::CameraConfig;

/// Scroll-offset state for wheel zooming.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollZoom {
    offset: f64,
}

impl ScrollZoom {
    /// Start at offset zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scroll offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The offset at which the wheel would produce `scale`, clamped to `[0, max_scroll]`.
    #[must_use]
    pub fn offset_for_scale(config: &CameraConfig, scale: f64) -> f64 {
        let (lo, hi) = exponents(config);
        if !(hi > lo) {
            return 0.0;
        }
        let t = ((scale.log2() - lo) / (hi - lo)).max(0.0).min(1.0);
        t * config.max_scroll
    }

    /// The scale reached at scroll `offset`.
    #[must_use]
    pub fn scale_for_offset(config: &CameraConfig, offset: f64) -> f64 {
        let (lo, hi) = exponents(config);
        let t = if config.max_scroll > 0.0 {
            (offset / config.max_scroll).max(0.0).min(1.0)
        } else {
            0.0
        };
        lerp(lo, hi, t).exp2()
    }

    /// Apply one frame's wheel `delta` with the cursor at `cursor`.
    ///
    /// A negative delta (wheel up) zooms in. The queue is replaced by a single
    /// [`AnimationKind::Scroll`] transition to a view in which the map point now
    /// under `cursor` is still under `cursor`.
    pub fn apply_wheel(
        &mut self,
        delta: f64,
        cursor: Point,
        transform: &Transform,
        animations: &mut AnimationQueue,
        config: &CameraConfig,
        now: f64,
    ) -> Result<(), DegenerateTransformError> {
        let anchor = transform.inverse(cursor)?;
        if !animations.is_scrolling() {
            self.offset = Self::offset_for_scale(config, transform.scale);
        }
        self.offset = (self.offset - delta).max(0.0).min(config.max_scroll);

        let mut target = Transform {
            scale: Self::scale_for_offset(config, self.offset),
            ..*transform
        };
        target.pin(anchor, cursor);
        animations.replace([Animation::new(
            AnimationKind::Scroll,
            now,
            config.scroll_duration,
            *transform,
            target,
        )]);
        Ok(())
    }
}

fn exponents(config: &CameraConfig) -> (f64, f64) {
    (config.min_scale.log2(), config.max_scale.log2())
}
