// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed transitions between transforms.
//!
//! An [`AnimationQueue`] holds a short FIFO of [`Animation`]s. Every frame,
//! [`AnimationQueue::advance`] looks at the head only:
//!
//! - **Pending** (`now < start_time`): nothing happens this frame.
//! - **Active** (`start_time <= now < end_time`): the live transform is
//!   overwritten with the interpolated one.
//! - **Done** (`now >= end_time`): the live transform is set to `end` exactly,
//!   the entry is popped and the next head is checked in the same frame.
//!
//! ## Interpolation
//!
//! When scale and rotation do not change, translation is interpolated linearly.
//! Otherwise scale is interpolated exponentially, rotation along the shorter arc,
//! and translation is derived so that one screen point stays fixed for the whole
//! transition: the fixed point of the screen-to-screen map taking the start view
//! to the end view. A wheel zoom keeps the cursor still; a jump spirals around a
//! single visual anchor instead of drifting.

use kurbo::Vec2;
use smallvec::SmallVec;
use votemap_transform::{Transform, lerp, normalize_angle, shortest_arc};

/// What started an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// A wheel zoom. While one is at the head of the queue, the scroll offset
    /// it was computed from is still valid.
    Scroll,
    /// A programmatic move: presets, saved views, fitted boxes.
    Jump,
}

/// Where an animation stands at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Not started yet.
    Pending,
    /// Running, with progress `t` in `[0, 1)`.
    Active(f64),
    /// Finished.
    Done,
}

/// A transition from `start` to `end` over `[start_time, end_time)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    /// What started the animation.
    pub kind: AnimationKind,
    /// Start time in milliseconds.
    pub start_time: f64,
    /// End time in milliseconds.
    pub end_time: f64,
    /// Transform at `start_time`.
    pub start: Transform,
    /// Transform at and after `end_time`.
    pub end: Transform,
}

impl Animation {
    /// Create an animation starting at `start_time` and lasting `duration` milliseconds.
    ///
    /// A non-positive duration completes on the first frame at or after `start_time`.
    #[must_use]
    pub fn new(
        kind: AnimationKind,
        start_time: f64,
        duration: f64,
        start: Transform,
        end: Transform,
    ) -> Self {
        Self {
            kind,
            start_time,
            end_time: start_time + duration.max(0.0),
            start,
            end,
        }
    }

    /// Length in milliseconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Phase at time `now`.
    #[must_use]
    pub fn phase(&self, now: f64) -> Phase {
        if now < self.start_time {
            Phase::Pending
        } else if now < self.end_time {
            Phase::Active((now - self.start_time) / self.duration())
        } else {
            Phase::Done
        }
    }

    /// The transform at time `now`, clamped to the endpoints outside the animation.
    #[must_use]
    pub fn sample(&self, now: f64) -> Transform {
        match self.phase(now) {
            Phase::Pending => self.start,
            Phase::Active(t) => interpolate(&self.start, &self.end, t),
            Phase::Done => self.end,
        }
    }
}

// Below this |1 - r|², the start and end views differ by a pure translation
// as far as f64 can tell.
const PIVOT_EPSILON: f64 = 1e-12;

/// Interpolate between two transforms at progress `t`.
///
/// Returns `start` exactly for `t <= 0` and `end` exactly for `t >= 1`.
#[must_use]
pub fn interpolate(start: &Transform, end: &Transform, t: f64) -> Transform {
    if t <= 0.0 {
        return *start;
    }
    if t >= 1.0 || start == end {
        return *end;
    }

    let turn = shortest_arc(start.rotate, end.rotate);
    if start.scale == end.scale && turn == 0.0 {
        return Transform::new(
            start.scale,
            start.rotate,
            lerp(start.translate_x, end.translate_x, t),
            lerp(start.translate_y, end.translate_y, t),
        );
    }

    pivot(start, end, turn, t).unwrap_or_else(|| componentwise(start, end, turn, t))
}

/// Exponential scale, shortest-arc rotation, and a translation that holds the
/// fixed point of the start→end screen map in place.
fn pivot(start: &Transform, end: &Transform, turn: f64, t: f64) -> Option<Transform> {
    if !start.is_invertible() || !end.is_invertible() {
        return None;
    }

    // Treat screen points as complex numbers. A transform is then
    // `z ↦ a·z + τ` with `a = scale·e^{-iθ}`, and the start→end map is
    // `z ↦ r·(z − τ0) + τ1` with `r = a1 / a0`. Its fixed point is
    // `F = (τ1 − r·τ0) / (1 − r)`.
    let ratio = end.scale / start.scale;
    let (sin, cos) = turn.sin_cos();
    let r = Vec2::new(ratio * cos, -ratio * sin);
    let one_minus_r = Vec2::new(1.0 - r.x, -r.y);
    if one_minus_r.hypot2() < PIVOT_EPSILON {
        return None;
    }

    let numerator = end.translation() - complex_mul(r, start.translation());
    let fixed = complex_div(numerator, one_minus_r).to_point();
    let anchor = start.inverse(fixed).ok()?;

    let mut out = Transform::new(
        log_lerp(start.scale, end.scale, t),
        normalize_angle(start.rotate + turn * t),
        0.0,
        0.0,
    );
    out.pin(anchor, fixed);
    Some(out)
}

/// Each component on its own: exponential scale, shortest-arc rotation, linear translation.
fn componentwise(start: &Transform, end: &Transform, turn: f64, t: f64) -> Transform {
    Transform::new(
        log_lerp(start.scale, end.scale, t),
        normalize_angle(start.rotate + turn * t),
        lerp(start.translate_x, end.translate_x, t),
        lerp(start.translate_y, end.translate_y, t),
    )
}

fn log_lerp(a: f64, b: f64, t: f64) -> f64 {
    lerp(a.log2(), b.log2(), t).exp2()
}

fn complex_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

fn complex_div(a: Vec2, b: Vec2) -> Vec2 {
    let d = b.hypot2();
    Vec2::new((a.x * b.x + a.y * b.y) / d, (a.y * b.x - a.x * b.y) / d)
}

/// FIFO of pending transitions. Usually holds zero to two entries.
#[derive(Clone, Debug, Default)]
pub struct AnimationQueue {
    entries: SmallVec<[Animation; 2]>,
}

impl AnimationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queued animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The animation that will be advanced next.
    #[must_use]
    pub fn head(&self) -> Option<&Animation> {
        self.entries.first()
    }

    /// Queued animations, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.entries.iter()
    }

    /// Whether the head is a wheel zoom.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.head().is_some_and(|a| a.kind == AnimationKind::Scroll)
    }

    /// Drop every queued animation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append an animation after the current ones.
    pub fn push(&mut self, animation: Animation) {
        tracing::debug!(
            kind = ?animation.kind,
            start = animation.start_time,
            duration = animation.duration(),
            "animation queued"
        );
        self.entries.push(animation);
    }

    /// Replace the whole queue with `animations`.
    pub fn replace(&mut self, animations: impl IntoIterator<Item = Animation>) {
        self.entries.clear();
        for animation in animations {
            self.push(animation);
        }
    }

    /// Advance to time `now`, writing into `transform`.
    ///
    /// Returns whether `transform` was changed.
    pub fn advance(&mut self, now: f64, transform: &mut Transform) -> bool {
        let mut changed = false;
        while let Some(&head) = self.entries.first() {
            match head.phase(now) {
                Phase::Pending => break,
                Phase::Active(t) => {
                    *transform = interpolate(&head.start, &head.end, t);
                    changed = true;
                    break;
                }
                Phase::Done => {
                    *transform = head.end;
                    changed = true;
                    self.entries.remove(0);
                    tracing::debug!(kind = ?head.kind, "animation finished");
                }
            }
        }
        changed
    }
}
