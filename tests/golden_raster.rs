use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};
use sigpad::{SurfaceConfig, SurfaceController};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

#[test]
fn golden_signature_raster_matches_fixture() {
    let config = SurfaceConfig {
        settle_delay: Duration::ZERO,
        ..Default::default()
    };
    let mut surface = SurfaceController::new("", 220.0, 160.0, config);

    // Fixed zigzag signature; stamping is pure arithmetic so the raster
    // is deterministic across runs and platforms
    surface.pointer_down(10.0, 100.0);
    for i in 0..16 {
        let x = 10.0 + i as f32 * 10.0;
        let y = if i % 2 == 0 { 20.0 } else { 100.0 };
        surface.pointer_move(x, y);
    }
    surface.pointer_up();

    // Hash raw pixels, not PNG bytes: the digest must not churn when the
    // encoder's compression details change
    let digest = hex::encode(Sha256::digest(surface.canvas().raw_pixels()));

    let expected_path = golden_path("zigzag.digest");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}
