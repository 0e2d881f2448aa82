use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use sigpad::{SurfaceConfig, SurfaceController};

/// Replay a stroke script onto a signature surface and emit the
/// serialized signature. Useful for scripting and golden fixtures.
#[derive(Parser)]
#[command(name = "sigpad", version, about)]
struct Cli {
    /// Stroke script JSON file ("-" reads stdin)
    #[arg(short, long)]
    script: String,

    /// Also write the committed surface as a PNG file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Suppress the data URL on stdout
    #[arg(long)]
    quiet: bool,
}

#[derive(Deserialize)]
struct StrokeScript {
    width: f64,
    height: f64,
    /// Previously serialized signature to restore before replaying
    #[serde(default)]
    initial_value: String,
    /// Each stroke is a polyline of [x, y] canvas coordinates
    strokes: Vec<Vec<(f32, f32)>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let raw = if cli.script == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.script)
            .with_context(|| format!("reading script {}", cli.script))?
    };

    let script: StrokeScript = serde_json::from_str(&raw).context("parsing stroke script")?;

    let mut surface = SurfaceController::new(
        &script.initial_value,
        script.width,
        script.height,
        SurfaceConfig::default(),
    );

    // Let any initial restore land before ink goes on top of it
    if !surface.run_until_idle(std::time::Duration::from_secs(5)) {
        anyhow::bail!("initial restore did not settle");
    }

    for stroke in &script.strokes {
        let mut points = stroke.iter();
        let Some(&(x, y)) = points.next() else {
            continue;
        };
        surface.pointer_down(x, y);
        for &(x, y) in points {
            surface.pointer_move(x, y);
        }
        surface.pointer_up();
    }

    let value = surface.commit();

    if let Some(out) = &cli.out {
        let png = surface
            .canvas()
            .to_png()
            .map_err(|e| anyhow::anyhow!("PNG export failed: {}", e))?;
        std::fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;
    }

    if !cli.quiet {
        println!("{}", value);
    }

    Ok(())
}
