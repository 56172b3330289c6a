// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct manipulation: one-pointer pan and two-pointer pinch.
//!
//! When a pointer goes down, the map point under it is locked. From then on the
//! camera is solved every frame so that locked points stay under their pointers:
//!
//! - one lock: translate only, keeping the locked point under its pointer;
//! - two locks: scale from the ratio of screen to map distance, rotation from the
//!   difference of the two bearings, then translate so lock 0 sits under pointer 0.
//!
//! Taking a lock clears the animation queue, so a touch always stops an in-flight
//! jump or zoom.

use kurbo::{Point, Vec2};
use votemap_transform::{DegenerateTransformError, Transform, normalize_angle};

use crate::animation::AnimationQueue;
use crate::config::CameraConfig;
use crate::input::InputState;

// Below this many pixels (or map units) two pointers count as coincident.
const MIN_SPAN: f64 = 1e-9;

/// The map point pinned under one pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerLock {
    /// Whether the lock is held.
    pub locked: bool,
    /// Map-space point captured when the pointer went down.
    pub anchor: Point,
}

/// What the resolver did this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// No pointer is down.
    Idle,
    /// One pointer is dragging the map.
    Pan {
        /// Slot of the dragging pointer.
        slot: usize,
    },
    /// Two pointers are scaling and rotating the map.
    Pinch,
}

/// Per-frame resolver of pointer state into camera motion.
#[derive(Clone, Debug, Default)]
pub struct GestureResolver {
    locks: [PointerLock; 2],
}

impl GestureResolver {
    /// Create a resolver with no locks held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current locks, by pointer slot.
    #[must_use]
    pub fn locks(&self) -> &[PointerLock; 2] {
        &self.locks
    }

    /// Update locks from `input` and move `transform` accordingly.
    ///
    /// Fails only when a lock has to be taken through a degenerate transform;
    /// locks taken before the failure are kept.
    pub fn resolve(
        &mut self,
        input: &InputState,
        transform: &mut Transform,
        animations: &mut AnimationQueue,
        config: &CameraConfig,
    ) -> Result<Gesture, DegenerateTransformError> {
        for (slot, (lock, ptr)) in self.locks.iter_mut().zip(input.pointers()).enumerate() {
            // A release since the last frame ends the lock even if the slot is down again.
            if ptr.was_released() && lock.locked {
                lock.locked = false;
                tracing::trace!(slot, "pointer lock released");
            }
            if ptr.is_down() {
                if !lock.locked {
                    lock.anchor = transform.inverse(ptr.position)?;
                    lock.locked = true;
                    if !animations.is_empty() {
                        tracing::debug!(slot, dropped = animations.len(), "gesture preempts animations");
                        animations.clear();
                    }
                    tracing::trace!(slot, anchor = ?lock.anchor, "pointer lock acquired");
                }
            } else if lock.locked {
                lock.locked = false;
                tracing::trace!(slot, "pointer lock released");
            }
        }

        let [l0, l1] = self.locks;
        let [p0, p1] = input.pointers();
        let gesture = match (l0.locked, l1.locked) {
            (true, true) => {
                pinch(transform, [l0.anchor, l1.anchor], [p0.position, p1.position], config);
                Gesture::Pinch
            }
            (true, false) => {
                transform.pin(l0.anchor, p0.position);
                Gesture::Pan { slot: 0 }
            }
            (false, true) => {
                transform.pin(l1.anchor, p1.position);
                Gesture::Pan { slot: 1 }
            }
            (false, false) => Gesture::Idle,
        };
        Ok(gesture)
    }
}

fn pinch(transform: &mut Transform, anchors: [Point; 2], pointers: [Point; 2], config: &CameraConfig) {
    let map_delta: Vec2 = anchors[1] - anchors[0];
    let screen_delta: Vec2 = pointers[1] - pointers[0];
    let (map_span, screen_span) = (map_delta.hypot(), screen_delta.hypot());

    // Coincident pointers have no bearing; keep scale and rotation and only pan.
    if map_span > MIN_SPAN && screen_span > MIN_SPAN {
        transform.scale = config.clamp_scale(screen_span / map_span);
        // Screen y points down, so a map bearing turns by -rotate on screen.
        transform.rotate = normalize_angle(map_delta.atan2() - screen_delta.atan2());
    }
    transform.pin(anchors[0], pointers[0]);
}
