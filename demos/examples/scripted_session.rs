// Copyright 2025 the Votemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless viewer session driven by a fixed script of input events.
//!
//! This example wires the three crates together the way a host would:
//! - `votemap_camera` owns the transform and turns input into motion,
//! - `votemap_transform` provides renderer matrices and tile request bounds,
//! - `votemap_labels` picks the labels to draw each frame.
//!
//! Run:
//! - `cargo run -p votemap_demos --example scripted_session`
//! - `RUST_LOG=debug cargo run -p votemap_demos --example scripted_session`

use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;
use votemap_camera::{CameraConfig, PresetTable, ViewerState};
use votemap_labels::{Label, LabelPlacer, PlacementConfig};
use votemap_transform::{FetchGuard, Resolution, projection_matrix};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// One input event, delivered just before the frame it is scheduled for.
#[derive(Clone, Copy, Debug)]
enum Event {
    Down(u64, Point),
    Move(u64, Point),
    Up(u64, Point),
    Wheel(f64),
    Key(char),
    Save(u8),
    Restore(u8),
}

fn script() -> Vec<(u32, Event)> {
    vec![
        (5, Event::Key('1')),
        (80, Event::Save(1)),
        (90, Event::Key('2')),
        (200, Event::Down(1, Point::new(400.0, 300.0))),
        (201, Event::Move(1, Point::new(440.0, 320.0))),
        (202, Event::Move(1, Point::new(480.0, 340.0))),
        (203, Event::Up(1, Point::new(480.0, 340.0))),
        (210, Event::Move(1, Point::new(300.0, 200.0))),
        (211, Event::Wheel(-120.0)),
        (212, Event::Wheel(-120.0)),
        (240, Event::Down(1, Point::new(300.0, 300.0))),
        (240, Event::Down(2, Point::new(500.0, 300.0))),
        (241, Event::Move(2, Point::new(500.0, 400.0))),
        (242, Event::Up(2, Point::new(500.0, 400.0))),
        (242, Event::Up(1, Point::new(300.0, 300.0))),
        (250, Event::Restore(1)),
        (330, Event::Key('0')),
    ]
}

fn labels() -> Vec<Label> {
    [
        ("Melbourne", 1_144_700.0, 4_192_000.0),
        ("Wills", 1_144_100.0, 4_189_300.0),
        ("Batman", 1_145_600.0, 4_188_900.0),
        ("Sydney", 1_760_100.0, 3_831_000.0),
        ("Grayndler", 1_758_900.0, 3_829_400.0),
        ("Kingsford Smith", 1_761_400.0, 3_833_500.0),
        ("Canberra", 1_549_000.0, 3_954_000.0),
    ]
    .into_iter()
    .map(|(name, x, y)| Label::new(name, Point::new(x, y)))
    .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let screen = Size::new(800.0, 600.0);
    let mut viewer = ViewerState::new(screen, CameraConfig::default(), PresetTable::default());
    let placer = LabelPlacer::new(PlacementConfig::default());
    let labels = labels();
    let measure = |text: &str| 7.5 * text.chars().count() as f64;
    let mut tiles = FetchGuard::new();
    let projection = projection_matrix(screen);

    let script = script();
    let mut next = 0;
    for frame in 0..400_u32 {
        let now = f64::from(frame) * FRAME_MS;
        while let Some(&(at, event)) = script.get(next) {
            if at > frame {
                break;
            }
            next += 1;
            match event {
                Event::Down(id, p) => viewer.input_mut().on_pointer_down(id, p),
                Event::Move(id, p) => viewer.input_mut().on_pointer_move(id, p),
                Event::Up(id, p) => viewer.input_mut().on_pointer_up(id, p),
                Event::Wheel(dy) => viewer.input_mut().on_wheel(dy),
                Event::Key(k) => viewer.input_mut().on_key(k),
                Event::Save(slot) => viewer.save_view(slot),
                Event::Restore(slot) => {
                    viewer.restore_view(slot, now);
                }
            }
        }

        viewer.tick(now);

        // Tiles: issue a request when the guard allows it; pretend it lands at once.
        if let Ok(query) = viewer.tile_query(Resolution::PowerOfTwo) {
            if let Some(issued) = tiles.poll(query) {
                tracing::info!(frame, bounds = ?issued.bounds, upp = issued.units_per_pixel, "fetch tiles");
                tiles.complete();
            }
        }

        let placement = placer.place_or_empty(viewer.transform(), screen, &labels, &measure);
        if frame % 20 == 0 {
            let t = viewer.transform();
            let view = t.view_matrix();
            let shown: Vec<_> = placement
                .placed
                .iter()
                .map(|p| labels[p.index].text.as_str())
                .collect();
            println!(
                "frame {frame:3}  scale {:.6}  rotate {:+.3}  gesture {:?}  labels {:?}",
                t.scale,
                t.rotate,
                viewer.gesture(),
                shown
            );
            tracing::debug!(?projection, ?view, "matrices");
        }
    }
}
