// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared input record written by event callbacks and read once per frame.
//!
//! Event handlers run between frames and only ever touch an [`InputState`];
//! they never move the camera themselves. The per-frame step reads the record,
//! resolves gestures and animations, then calls [`InputState::end_frame`] to
//! clear the edge-triggered parts.
//!
//! ## Pointer slots
//!
//! There are two slots. Slot 0 is the mouse or the first finger to touch the
//! screen; slot 1 is a second finger. A pointer-down claims the first free
//! slot, and later events find their slot by pointer id:
//!
//! ```
//! use kurbo::Point;
//! use votemap_camera::InputState;
//!
//! let mut input = InputState::new();
//! input.on_pointer_down(7, Point::new(10.0, 10.0));
//! input.on_pointer_down(9, Point::new(50.0, 10.0));
//! assert!(input.pointer(0).is_down() && input.pointer(1).is_down());
//!
//! input.on_pointer_move(9, Point::new(60.0, 10.0));
//! assert_eq!(input.pointer(1).position, Point::new(60.0, 10.0));
//!
//! input.on_pointer_up(7, Point::new(10.0, 10.0));
//! assert!(!input.pointer(0).is_down());
//! assert!(input.pointer(0).was_released());
//!
//! // Edge flags last for one frame.
//! input.end_frame();
//! assert!(!input.pointer(0).was_released());
//! ```
//!
//! While nothing is pressed, moves update slot 0 so the wheel knows where the
//! cursor is hovering.

use kurbo::Point;
use smallvec::SmallVec;

/// Host-assigned pointer identifier.
pub type PointerId = u64;

/// Keyboard key, as the character it produces.
pub type Key = char;

bitflags::bitflags! {
    /// Pointer button state for one slot.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerFlags: u8 {
        /// The pointer is currently down.
        const DOWN     = 0b0000_0001;
        /// The pointer went down since the last frame.
        const PRESSED  = 0b0000_0010;
        /// The pointer went up since the last frame.
        const RELEASED = 0b0000_0100;
    }
}

impl Default for PointerFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One pointer slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    /// Id of the pointer that last occupied this slot.
    pub id: Option<PointerId>,
    /// Last known position, in screen pixels.
    pub position: Point,
    /// Button state and this frame's transitions.
    pub flags: PointerFlags,
}

impl Pointer {
    /// Whether the pointer is down.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.flags.contains(PointerFlags::DOWN)
    }

    /// Whether the pointer went down this frame.
    #[must_use]
    pub fn was_pressed(&self) -> bool {
        self.flags.contains(PointerFlags::PRESSED)
    }

    /// Whether the pointer went up this frame.
    #[must_use]
    pub fn was_released(&self) -> bool {
        self.flags.contains(PointerFlags::RELEASED)
    }
}

/// Pointer, wheel and key state accumulated between frames.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pointers: [Pointer; 2],
    wheel: f64,
    // Insertion order is kept so the last key pressed wins.
    keys: SmallVec<[Key; 4]>,
}

impl InputState {
    /// Create an empty input record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer in `slot` (0 or 1).
    ///
    /// # Panics
    ///
    /// Panics if `slot > 1`.
    #[must_use]
    pub fn pointer(&self, slot: usize) -> &Pointer {
        &self.pointers[slot]
    }

    /// Both pointer slots.
    #[must_use]
    pub fn pointers(&self) -> &[Pointer; 2] {
        &self.pointers
    }

    /// A pointer (mouse button or finger) went down.
    ///
    /// The pointer takes the first free slot; a third simultaneous pointer is
    /// ignored.
    pub fn on_pointer_down(&mut self, id: PointerId, position: Point) {
        let Some(ptr) = self.pointers.iter_mut().find(|p| !p.is_down()) else {
            return;
        };
        ptr.id = Some(id);
        ptr.position = position;
        ptr.flags.insert(PointerFlags::DOWN | PointerFlags::PRESSED);
    }

    /// A pointer went up.
    pub fn on_pointer_up(&mut self, id: PointerId, position: Point) {
        if let Some(ptr) = self.slot_mut(id) {
            ptr.position = position;
            ptr.flags.remove(PointerFlags::DOWN);
            ptr.flags.insert(PointerFlags::RELEASED);
        }
    }

    /// A pointer left the surface or was cancelled; treated like a release in place.
    pub fn on_pointer_out(&mut self, id: PointerId) {
        if let Some(ptr) = self.slot_mut(id) {
            ptr.flags.remove(PointerFlags::DOWN);
            ptr.flags.insert(PointerFlags::RELEASED);
        }
    }

    /// A pointer moved.
    pub fn on_pointer_move(&mut self, id: PointerId, position: Point) {
        if self.pointers.iter().all(|p| !p.is_down()) {
            self.pointers[0].position = position;
        } else if let Some(ptr) = self.slot_mut(id) {
            ptr.position = position;
        }
    }

    /// The wheel scrolled by `delta_y` pixels; positive scrolls down (zooms out).
    ///
    /// Deltas received between two frames add up.
    pub fn on_wheel(&mut self, delta_y: f64) {
        self.wheel += delta_y;
    }

    /// A key was pressed.
    pub fn on_key(&mut self, key: Key) {
        if let Some(pos) = self.keys.iter().position(|&k| k == key) {
            self.keys.remove(pos);
        }
        self.keys.push(key);
    }

    /// Accumulated wheel delta for this frame.
    #[must_use]
    pub fn wheel_delta(&self) -> f64 {
        self.wheel
    }

    /// Keys pressed this frame, oldest first.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Whether `key` was pressed this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Clear edge flags, the wheel delta, and pressed keys.
    ///
    /// Call once at the end of every frame.
    pub fn end_frame(&mut self) {
        for ptr in &mut self.pointers {
            ptr.flags.remove(PointerFlags::PRESSED | PointerFlags::RELEASED);
        }
        self.wheel = 0.0;
        self.keys.clear();
    }

    fn slot_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.pointers
            .iter_mut()
            .find(|p| p.is_down() && p.id == Some(id))
    }
}
