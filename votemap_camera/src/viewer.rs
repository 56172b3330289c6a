// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame camera driver.

use kurbo::{Rect, Size};
use votemap_transform::{DegenerateTransformError, Resolution, TileQuery, Transform, visible_region};

use crate::animation::{Animation, AnimationKind, AnimationQueue};
use crate::config::CameraConfig;
use crate::gesture::{Gesture, GestureResolver};
use crate::input::InputState;
use crate::presets::{PresetTable, SavedViews, plan_jump};
use crate::scroll::ScrollZoom;

/// Everything the camera needs between frames.
///
/// Event callbacks write into [`ViewerState::input_mut`]; the host calls
/// [`ViewerState::tick`] once per displayed frame and reads
/// [`ViewerState::transform`] afterwards. Nothing else moves the camera.
#[derive(Clone, Debug)]
pub struct ViewerState {
    transform: Transform,
    screen: Size,
    config: CameraConfig,
    input: InputState,
    gestures: GestureResolver,
    scroll: ScrollZoom,
    animations: AnimationQueue,
    presets: PresetTable,
    saved: SavedViews,
    gesture: Gesture,
}

impl ViewerState {
    /// Start with the home preset fitted to `screen`, or the identity if there is none.
    #[must_use]
    pub fn new(screen: Size, config: CameraConfig, presets: PresetTable) -> Self {
        let transform = presets
            .home()
            .map_or(Transform::IDENTITY, |home| config.fit(home, screen.to_rect()));
        Self::with_transform(screen, config, presets, transform)
    }

    /// Start from an explicit transform.
    #[must_use]
    pub fn with_transform(
        screen: Size,
        config: CameraConfig,
        presets: PresetTable,
        transform: Transform,
    ) -> Self {
        Self {
            transform,
            screen,
            config,
            input: InputState::new(),
            gestures: GestureResolver::new(),
            scroll: ScrollZoom::new(),
            animations: AnimationQueue::new(),
            presets,
            saved: SavedViews::new(),
            gesture: Gesture::Idle,
        }
    }

    /// The live transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Screen size in pixels.
    #[must_use]
    pub fn screen(&self) -> Size {
        self.screen
    }

    /// The screen was resized.
    pub fn set_screen(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Camera limits and timings.
    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Pending input, for reading.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Pending input, for event callbacks to write into.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Queued animations.
    #[must_use]
    pub fn animations(&self) -> &AnimationQueue {
        &self.animations
    }

    /// What the pointers did on the last tick.
    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Preset table used for key jumps.
    #[must_use]
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Saved views.
    #[must_use]
    pub fn saved_views(&self) -> &SavedViews {
        &self.saved
    }

    /// Map-space envelope of the screen.
    pub fn visible_region(&self) -> Result<Rect, DegenerateTransformError> {
        visible_region(self.screen, &self.transform)
    }

    /// Tile request parameters for the current view.
    pub fn tile_query(&self, resolution: Resolution) -> Result<TileQuery, DegenerateTransformError> {
        TileQuery::for_view(self.screen, &self.transform, resolution)
    }

    /// Advance one frame at time `now` (milliseconds).
    ///
    /// Order: pointer gestures, then the wheel, then preset keys, then
    /// animations. Input edges are cleared at the end. A degenerate transform
    /// skips the step that hit it and is logged; the frame still completes.
    pub fn tick(&mut self, now: f64) {
        match self.gestures.resolve(
            &self.input,
            &mut self.transform,
            &mut self.animations,
            &self.config,
        ) {
            Ok(gesture) => self.gesture = gesture,
            Err(err) => tracing::warn!(%err, "gesture skipped"),
        }

        let delta = self.input.wheel_delta();
        if delta != 0.0 {
            let cursor = self.input.pointer(0).position;
            if let Err(err) = self.scroll.apply_wheel(
                delta,
                cursor,
                &self.transform,
                &mut self.animations,
                &self.config,
                now,
            ) {
                tracing::warn!(%err, "wheel zoom skipped");
            }
        }

        let target = self
            .input
            .keys()
            .iter()
            .rev()
            .find_map(|&key| self.presets.get(key));
        if let Some(target) = target {
            if let Err(err) = self.jump_to(target, now) {
                tracing::warn!(%err, "jump skipped");
            }
        }

        self.animations.advance(now, &mut self.transform);
        self.input.end_frame();
    }

    /// Replace queued animations with a jump to `target`, starting at `now`.
    pub fn jump_to(&mut self, target: Rect, now: f64) -> Result<(), DegenerateTransformError> {
        let plan = plan_jump(&self.transform, self.screen, target, now, &self.config)?;
        tracing::debug!(?target, legs = plan.len(), "jump planned");
        self.animations.replace(plan);
        Ok(())
    }

    /// Remember the live transform in `slot`.
    pub fn save_view(&mut self, slot: u8) {
        self.saved.save(slot, self.transform);
    }

    /// Animate back to the view saved in `slot`.
    ///
    /// Returns `false` if the slot is empty. A view saved outside the scale
    /// limits is brought back inside them about the screen centre.
    pub fn restore_view(&mut self, slot: u8, now: f64) -> bool {
        let Some(&saved) = self.saved.get(slot) else {
            return false;
        };
        let saved = self.config.clamp_view(saved, self.screen.to_rect().center());
        self.animations.replace([Animation::new(
            AnimationKind::Jump,
            now,
            self.config.jump_duration,
            self.transform,
            saved,
        )]);
        true
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use votemap_transform::fit_box;

    use super::*;

    const SCREEN: Size = Size::new(800.0, 600.0);

    fn roomy() -> CameraConfig {
        CameraConfig {
            min_scale: 1e-3,
            max_scale: 1e3,
            ..CameraConfig::default()
        }
    }

    #[test]
    fn starts_fitted_to_home() {
        let viewer = ViewerState::new(SCREEN, CameraConfig::default(), PresetTable::default());
        let home = PresetTable::default().home().unwrap();
        assert_eq!(*viewer.transform(), fit_box(home, SCREEN.to_rect()));
        let visible = viewer.visible_region().unwrap();
        assert!(visible.contains(home.center()));

        let empty = ViewerState::new(SCREEN, CameraConfig::default(), PresetTable::new());
        assert_eq!(*empty.transform(), Transform::IDENTITY);
    }

    #[test]
    fn drag_then_wheel_zoom() {
        let mut viewer =
            ViewerState::with_transform(SCREEN, roomy(), PresetTable::default(), Transform::IDENTITY);

        viewer.input_mut().on_pointer_down(1, Point::new(400.0, 300.0));
        viewer.tick(0.0);
        viewer.input_mut().on_pointer_move(1, Point::new(500.0, 300.0));
        viewer.tick(16.0);
        assert_eq!(viewer.gesture(), Gesture::Pan { slot: 0 });
        assert_eq!(*viewer.transform(), Transform::new(1.0, 0.0, 100.0, 0.0));

        viewer.input_mut().on_pointer_up(1, Point::new(500.0, 300.0));
        viewer.tick(32.0);
        assert_eq!(viewer.gesture(), Gesture::Idle);

        let cursor = Point::new(500.0, 300.0);
        let old = *viewer.transform();
        viewer.input_mut().on_pointer_move(1, cursor);
        viewer.input_mut().on_wheel(-100.0);
        viewer.tick(48.0);
        let head = *viewer.animations().head().unwrap();
        assert_eq!(head.kind, AnimationKind::Scroll);
        assert_eq!(head.duration(), 100.0);

        viewer.tick(148.0);
        assert!(viewer.animations().is_empty());
        let new = *viewer.transform();
        assert!(new.scale > old.scale);
        let held = new.apply(old.inverse(cursor).unwrap());
        assert!((held - cursor).hypot() < 1e-6);
    }

    #[test]
    fn preset_keys_jump_and_last_key_wins() {
        let mut viewer = ViewerState::new(SCREEN, CameraConfig::default(), PresetTable::default());
        let melbourne = viewer.presets().get('1').unwrap();
        let sydney = viewer.presets().get('2').unwrap();

        viewer.input_mut().on_key('2');
        viewer.input_mut().on_key('x');
        viewer.input_mut().on_key('1');
        viewer.tick(0.0);
        assert_eq!(viewer.animations().len(), 1);
        viewer.tick(1000.0);
        assert_eq!(*viewer.transform(), fit_box(melbourne, SCREEN.to_rect()));

        // Melbourne to Sydney pulls back first.
        viewer.input_mut().on_key('2');
        viewer.tick(2000.0);
        assert_eq!(viewer.animations().len(), 2);
        viewer.tick(2750.0);
        assert_eq!(viewer.animations().len(), 1);
        viewer.tick(3500.0);
        assert!(viewer.animations().is_empty());
        assert_eq!(*viewer.transform(), fit_box(sydney, SCREEN.to_rect()));
    }

    #[test]
    fn touch_interrupts_jump() {
        let mut viewer = ViewerState::new(SCREEN, CameraConfig::default(), PresetTable::default());
        viewer.input_mut().on_key('1');
        viewer.tick(0.0);
        viewer.tick(300.0);
        let mid = *viewer.transform();

        viewer.input_mut().on_pointer_down(4, Point::new(10.0, 10.0));
        viewer.tick(316.0);
        assert!(viewer.animations().is_empty());
        viewer.tick(2000.0);
        let now = *viewer.transform();
        assert_eq!((now.scale, now.rotate), (mid.scale, mid.rotate));
        assert!((now.translation() - mid.translation()).hypot() < 1e-6);
    }

    #[test]
    fn saved_view_round_trip() {
        let mut viewer =
            ViewerState::with_transform(SCREEN, roomy(), PresetTable::new(), Transform::IDENTITY);
        viewer.save_view(1);
        assert!(!viewer.restore_view(2, 0.0));

        viewer.input_mut().on_pointer_down(1, Point::new(0.0, 0.0));
        viewer.tick(0.0);
        viewer.input_mut().on_pointer_move(1, Point::new(30.0, 40.0));
        viewer.tick(16.0);
        viewer.input_mut().on_pointer_up(1, Point::new(30.0, 40.0));
        viewer.tick(32.0);
        assert_ne!(*viewer.transform(), Transform::IDENTITY);

        assert!(viewer.restore_view(1, 100.0));
        viewer.tick(100.0 + viewer.config().jump_duration);
        assert_eq!(*viewer.transform(), Transform::IDENTITY);
    }

    #[test]
    fn zooming_in_after_a_tiny_jump_never_zooms_out() {
        let mut presets = PresetTable::default();
        let block = Rect::new(1_145_000.0, 4_190_000.0, 1_145_100.0, 4_190_100.0);
        presets.insert('7', block);
        let mut viewer = ViewerState::new(SCREEN, CameraConfig::default(), presets);
        let max = viewer.config().max_scale;

        viewer.input_mut().on_key('7');
        viewer.tick(0.0);
        viewer.tick(1000.0);
        assert_eq!(viewer.transform().scale, max);

        viewer.input_mut().on_pointer_move(1, Point::new(400.0, 300.0));
        viewer.input_mut().on_wheel(-40.0);
        viewer.tick(1016.0);
        viewer.tick(1200.0);
        assert!(viewer.transform().scale >= max - 1e-12);
    }

    #[test]
    fn restored_view_is_clamped_about_the_centre() {
        let close = Transform::new(5.0, 0.0, -100.0, -50.0);
        let mut viewer =
            ViewerState::with_transform(SCREEN, CameraConfig::default(), PresetTable::new(), close);
        viewer.save_view(1);
        let center = Point::new(400.0, 300.0);
        let anchor = close.inverse(center).unwrap();

        assert!(viewer.restore_view(1, 0.0));
        viewer.tick(viewer.config().jump_duration);
        let restored = *viewer.transform();
        assert_eq!(restored.scale, viewer.config().max_scale);
        assert!((restored.apply(anchor) - center).hypot() < 1e-6);
    }

    #[test]
    fn empty_screen_starts_invertible() {
        let viewer = ViewerState::new(Size::ZERO, CameraConfig::default(), PresetTable::default());
        assert_eq!(viewer.transform().scale, viewer.config().min_scale);
        assert!(viewer.visible_region().is_ok());
    }

    #[test]
    fn degenerate_transform_does_not_stop_the_loop() {
        let broken = Transform::new(0.0, 0.0, 0.0, 0.0);
        let mut viewer =
            ViewerState::with_transform(SCREEN, roomy(), PresetTable::default(), broken);
        viewer.input_mut().on_pointer_down(1, Point::new(5.0, 5.0));
        viewer.input_mut().on_wheel(-10.0);
        viewer.input_mut().on_key('1');
        viewer.tick(0.0);

        assert_eq!(*viewer.transform(), broken);
        assert!(viewer.animations().is_empty());
        assert!(viewer.visible_region().is_err());
        // Input edges are still consumed.
        assert_eq!(viewer.input().wheel_delta(), 0.0);
        assert!(viewer.input().keys().is_empty());
    }
}
