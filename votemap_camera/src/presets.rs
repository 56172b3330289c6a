// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Jumping to preset places and saved views.
//!
//! A jump fits a target box to the screen. If the box and the current view are
//! nested, the camera flies there in one leg. If they are apart, it first pulls
//! back to a view of both and then closes in, so the user sees where the
//! destination is relative to where they were.

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::{SmallVec, smallvec};
use votemap_transform::{Combined, DegenerateTransformError, Transform, combine_boxes, visible_region};

use crate::animation::{Animation, AnimationKind};
use crate::config::CameraConfig;
use crate::input::Key;

/// Key → map-space box to jump to.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetTable {
    presets: HashMap<Key, Rect>,
}

impl PresetTable {
    /// Key of the home view, shown on start.
    pub const HOME: Key = '0';

    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Bind `key` to `target`, returning the previous binding.
    pub fn insert(&mut self, key: Key, target: Rect) -> Option<Rect> {
        self.presets.insert(key, target)
    }

    /// The box bound to `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<Rect> {
        self.presets.get(&key).copied()
    }

    /// The home box.
    #[must_use]
    pub fn home(&self) -> Option<Rect> {
        self.get(Self::HOME)
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetTable {
    /// Australia (home), Melbourne and Sydney in the national map projection.
    fn default() -> Self {
        let mut table = Self::new();
        table.insert('0', extent(-1_863_361.0, 1_168_642.0, 3_951_342.0, 3_671_953.0));
        table.insert('1', extent(1_140_377.0, 4_187_714.0, 8_624.0, 8_663.0));
        table.insert('2', extent(1_757_198.0, 3_827_047.0, 5_905.0, 7_899.0));
        table
    }
}

fn extent(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

/// Animations that take the view from `current` to `target` fitted to `screen`.
///
/// Returns one [`AnimationKind::Jump`] of `jump_duration` when `target` and the
/// visible region are nested, or two back-to-back legs of `leg_duration`
/// through their union otherwise. Both the overview and the final view keep
/// their scale within the configured limits.
pub fn plan_jump(
    current: &Transform,
    screen: Size,
    target: Rect,
    now: f64,
    config: &CameraConfig,
) -> Result<SmallVec<[Animation; 2]>, DegenerateTransformError> {
    let visible = visible_region(screen, current)?;
    let frame = screen.to_rect();
    let end = config.fit(target, frame);

    let plan = match combine_boxes(&target, &visible) {
        Combined::Contained(_) => smallvec![Animation::new(
            AnimationKind::Jump,
            now,
            config.jump_duration,
            *current,
            end,
        )],
        Combined::Enclosing(union) => {
            let overview = config.fit(union, frame);
            smallvec![
                Animation::new(AnimationKind::Jump, now, config.leg_duration, *current, overview),
                Animation::new(
                    AnimationKind::Jump,
                    now + config.leg_duration,
                    config.leg_duration,
                    overview,
                    end,
                ),
            ]
        }
    };
    Ok(plan)
}

/// In-memory slots holding remembered transforms.
#[derive(Clone, Debug, Default)]
pub struct SavedViews {
    slots: HashMap<u8, Transform>,
}

impl SavedViews {
    /// No saved views.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `transform` in `slot`, replacing what was there.
    pub fn save(&mut self, slot: u8, transform: Transform) -> Option<Transform> {
        self.slots.insert(slot, transform)
    }

    /// The transform saved in `slot`.
    #[must_use]
    pub fn get(&self, slot: u8) -> Option<&Transform> {
        self.slots.get(&slot)
    }

    /// Forget `slot`.
    pub fn remove(&mut self, slot: u8) -> Option<Transform> {
        self.slots.remove(&slot)
    }

    /// Number of saved views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
