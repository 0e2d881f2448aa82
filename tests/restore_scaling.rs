//! Resize lifecycle: the committed signature survives canvas replacement,
//! scaled to the new dimensions, and the most recent resize always wins.

use std::io::Cursor;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use sigpad::raster::codec;
use sigpad::{SurfaceConfig, SurfaceController};

fn quick_config() -> SurfaceConfig {
    SurfaceConfig {
        settle_delay: Duration::ZERO,
        ..Default::default()
    }
}

fn idle(surface: &mut SurfaceController) {
    assert!(
        surface.run_until_idle(Duration::from_secs(5)),
        "restore work never settled"
    );
}

/// A solid red bitmap as a serialized signature.
fn red_value(w: u32, h: u32) -> String {
    let img = RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    codec::encode_data_url(&buf.into_inner())
}

const BG: (u8, u8, u8, u8) = (255, 255, 255, 255);

#[test]
fn resize_preserves_signature_scaled_to_fit() {
    let mut surface = SurfaceController::new("", 200.0, 150.0, quick_config());
    // A full-width horizontal line through the drawable area (160x110)
    surface.pointer_down(0.0, 55.0);
    surface.pointer_move(159.0, 55.0);
    surface.pointer_up();
    surface.commit();

    surface.resize(400.0, 150.0);
    idle(&mut surface);

    assert_eq!(surface.canvas().width(), 360);
    assert_eq!(surface.canvas().height(), 110);
    assert!(!surface.canvas().is_blank(), "restore must repaint, not stay blank");
    // The line spanned the full source width, so the stretched copy spans
    // the full new width: ink near both edges of the original row
    assert_ne!(surface.canvas().pixel(5, 55), BG);
    assert_ne!(surface.canvas().pixel(354, 55), BG);
}

#[test]
fn resize_without_commit_loses_uncommitted_ink() {
    let mut surface = SurfaceController::new("", 200.0, 150.0, quick_config());
    surface.pointer_down(10.0, 10.0);
    surface.pointer_move(100.0, 80.0);
    surface.pointer_up();

    surface.resize(240.0, 180.0);
    idle(&mut surface);

    // Nothing was committed, so nothing could be restored
    assert!(surface.canvas().is_blank());
    assert!(surface.ink().is_empty());
}

#[test]
fn idempotent_resize_converges_to_identical_pixels() {
    let mut surface = SurfaceController::new(&red_value(60, 40), 200.0, 150.0, quick_config());
    idle(&mut surface);

    surface.resize(300.0, 240.0);
    idle(&mut surface);
    let first = surface.canvas().raw_pixels().to_vec();

    surface.resize(300.0, 240.0);
    idle(&mut surface);

    assert_eq!(surface.canvas().width(), 260);
    assert_eq!(surface.canvas().height(), 200);
    assert_eq!(surface.canvas().raw_pixels(), first.as_slice());
}

#[test]
fn back_to_back_resizes_land_on_the_final_surface() {
    // Two resizes before any restore decode settles: the redraw must
    // target the surface from the second resize, scaled to its size
    let config = SurfaceConfig {
        settle_delay: Duration::from_millis(25),
        ..Default::default()
    };
    let mut surface = SurfaceController::new(&red_value(60, 40), 100.0, 100.0, config);

    surface.resize(240.0, 140.0);
    surface.resize(320.0, 200.0);
    idle(&mut surface);

    assert_eq!(surface.canvas().width(), 280);
    assert_eq!(surface.canvas().height(), 160);
    assert_eq!(surface.canvas().pixel(140, 80), (255, 0, 0, 255));
}

#[test]
fn in_flight_decode_draws_onto_the_current_surface() {
    // The decode is issued before the resize, but its completion must read
    // the canvas dimensions at draw time: last resize wins
    let mut surface = SurfaceController::new(&red_value(60, 40), 100.0, 100.0, quick_config());
    surface.pump();
    surface.resize(320.0, 200.0);
    idle(&mut surface);

    assert_eq!(surface.canvas().width(), 280);
    assert_eq!(surface.canvas().height(), 160);
    assert_eq!(surface.canvas().pixel(140, 80), (255, 0, 0, 255));
    assert_eq!(surface.canvas().pixel(0, 0), (255, 0, 0, 255));
    assert_eq!(surface.canvas().pixel(279, 159), (255, 0, 0, 255));
}
