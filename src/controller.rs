//! Surface controller: owns the drawing canvas, turns pointer input into
//! ink, and runs the scale-preserving restore protocol.
//!
//! The controller is single-threaded and cooperative: every operation runs
//! on the caller's thread, and the only asynchronous work (signature
//! decode) is delivered back through `pump`. The discipline throughout is
//! "don't act on stale async results": each decode carries the restore
//! generation it was issued under, and the canvas dimensions used for the
//! redraw are read when the decode completes, not when it was scheduled,
//! so the most recent resize always wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::decode::Decoder;
use crate::raster::{codec, Canvas, Stroke};
use crate::raster::stroke::Point;
use crate::{Dimensions, SurfaceConfig};

type ValueChangedHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A restore waiting out the settle delay before its decode is issued.
struct ScheduledRestore {
    due: Instant,
    generation: u64,
}

/// The core of the signature surface.
///
/// Owns exactly one [`Canvas`] at a time and at most one pending restore
/// target (the last serialized signature seen). The canvas is replaced,
/// never resized in place; the pending target is what makes the drawn
/// image survive that replacement.
pub struct SurfaceController {
    config: SurfaceConfig,
    canvas: Canvas,

    // Ink drawn since the last clear/init; rasterized incrementally and
    // destroyed by resize. Never serialized.
    ink: Vec<Stroke>,
    active: Option<Stroke>,

    // Last serialized signature ("" = none) and its generation. The
    // generation bumps whenever the target changes, invalidating every
    // decode issued under an older one.
    pending_restore: String,
    restore_generation: u64,

    scheduled: Option<ScheduledRestore>,
    in_flight: usize,
    decoder: Decoder,

    on_value_changed: Option<ValueChangedHandler>,
}

impl SurfaceController {
    /// Create a surface sized from externally supplied dimensions.
    ///
    /// Degenerate dimensions (non-finite or <= 0, per axis) fall back to
    /// the configured defaults; construction never fails. `initial_value`
    /// becomes the pending restore target and, when non-empty, is redrawn
    /// after the settle delay.
    pub fn new(initial_value: &str, width: f64, height: f64, config: SurfaceConfig) -> Self {
        let outer = Dimensions::from_requested(width, height, config.fallback);
        let inner = outer.padded(config.inset);
        debug!(
            "surface created: outer {}x{}, drawable {}x{}",
            outer.width, outer.height, inner.width, inner.height
        );

        let mut controller = Self {
            canvas: Canvas::new(inner.width, inner.height, config.background),
            config,
            ink: Vec::new(),
            active: None,
            pending_restore: initial_value.to_string(),
            restore_generation: 0,
            scheduled: None,
            in_flight: 0,
            decoder: Decoder::spawn(),
            on_value_changed: None,
        };
        controller.schedule_restore();
        controller
    }

    /// Register a callback for outward value-changed notifications.
    ///
    /// Fired exactly once per `commit` or `clear`, never on resize or
    /// restore.
    pub fn on_value_changed<F>(&mut self, cb: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_value_changed = Some(Arc::new(cb));
    }

    /// Remove a previously registered value-changed callback if any
    pub fn clear_on_value_changed(&mut self) {
        self.on_value_changed = None;
    }

    /// Replace the canvas at newly supplied outer dimensions.
    ///
    /// Raster contents do not survive the replacement: uncommitted ink is
    /// dropped, and the pending restore target (if any) is redrawn onto
    /// the new canvas after the settle delay. Calling this twice with the
    /// same dimensions converges to the same visible content.
    pub fn resize(&mut self, width: f64, height: f64) {
        let outer = Dimensions::from_requested(width, height, self.config.fallback);
        let inner = outer.padded(self.config.inset);
        debug!("surface resized to drawable {}x{}", inner.width, inner.height);

        self.canvas = Canvas::new(inner.width, inner.height, self.config.background);
        self.ink.clear();
        self.active = None;
        self.schedule_restore();
    }

    /// Erase all ink, blank the canvas, and notify the host that the
    /// value is now empty.
    pub fn clear(&mut self) {
        self.ink.clear();
        self.active = None;
        self.canvas.clear();
        self.pending_restore.clear();
        self.restore_generation += 1;
        self.scheduled = None;
        self.notify("");
    }

    /// Export the current raster contents as a serialized signature,
    /// remember it as the restore target, and notify the host.
    ///
    /// Export is unconditional: a blank surface yields a valid blank
    /// image. Ink is kept; the surface stays drawable after commit.
    pub fn commit(&mut self) -> String {
        let value = match self.canvas.to_png() {
            Ok(png) => codec::encode_data_url(&png),
            Err(e) => {
                // Unreachable for an in-memory raster in practice; the
                // contract is that commit never surfaces a failure.
                warn!("commit export failed, value unchanged: {}", e);
                return self.pending_restore.clone();
            }
        };
        self.pending_restore = value.clone();
        self.restore_generation += 1;
        // The canvas already shows what was committed
        self.scheduled = None;
        self.notify(&value);
        value
    }

    /// Take note of an externally supplied value that differs from the
    /// one currently held.
    ///
    /// An empty value blanks the surface immediately; a non-empty one is
    /// decoded and stretch-drawn through the same deferred path as a
    /// resize redraw. No outward notification is sent.
    pub fn ingest_external_value(&mut self, value: &str) {
        if value == self.pending_restore {
            return;
        }
        self.pending_restore = value.to_string();
        self.restore_generation += 1;
        if value.is_empty() {
            self.ink.clear();
            self.active = None;
            self.canvas.clear();
            self.scheduled = None;
        } else {
            self.schedule_restore();
        }
    }

    /// Begin a stroke at the given canvas position.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        // A down while a stroke is active finishes the old stroke first
        if let Some(s) = self.active.take() {
            self.ink.push(s);
        }
        let start = Point::new(x, y);
        let pen = self.config.pen;
        self.canvas.stamp_dot(start, &pen);
        self.active = Some(Stroke::begin(start, pen));
    }

    /// Extend the active stroke; no-op when no stroke is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let prev = active.last();
        let next = Point::new(x, y);
        let pen = active.pen;
        active.push(next);
        self.canvas.stroke_segment(prev, next, &pen);
    }

    /// Finish the active stroke; no-op when no stroke is active.
    pub fn pointer_up(&mut self) {
        if let Some(s) = self.active.take() {
            self.ink.push(s);
        }
    }

    /// Cooperative tick: issue due restores and apply finished decodes.
    ///
    /// Hosts call this from their event loop. Stale completions (issued
    /// under an older restore generation) are discarded; live ones are
    /// stretch-drawn to the dimensions the canvas has *now*.
    pub fn pump(&mut self) {
        let due = self
            .scheduled
            .as_ref()
            .map_or(false, |s| Instant::now() >= s.due);
        if due {
            if let Some(s) = self.scheduled.take() {
                if s.generation == self.restore_generation
                    && self.decoder.request(s.generation, self.pending_restore.clone())
                {
                    self.in_flight += 1;
                }
            }
        }

        while let Some(outcome) = self.decoder.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if outcome.generation != self.restore_generation {
                debug!("dropping stale restore decode");
                continue;
            }
            match outcome.result {
                Ok(bitmap) => self.canvas.draw_stretched(&bitmap),
                Err(e) => {
                    // Recoverable: the user can redraw. The surface stays
                    // blank instead of surfacing an error.
                    warn!("restore skipped: {}", e);
                }
            }
        }
    }

    /// Whether a restore is still scheduled or decoding.
    pub fn has_pending_work(&self) -> bool {
        self.scheduled.is_some() || self.in_flight > 0
    }

    /// Drive `pump` until no restore work is pending or `timeout` passes.
    /// Returns `true` when the surface went idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if !self.has_pending_work() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    /// The serialized signature currently held ("" when none).
    pub fn current_value(&self) -> &str {
        &self.pending_restore
    }

    /// Read access to the live canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Strokes completed since the last clear/init.
    pub fn ink(&self) -> &[Stroke] {
        &self.ink
    }

    fn schedule_restore(&mut self) {
        if self.pending_restore.is_empty() {
            self.scheduled = None;
            return;
        }
        // Deferred so the surface's own reflow settles before we draw;
        // redrawing mid-layout would target stale geometry.
        self.scheduled = Some(ScheduledRestore {
            due: Instant::now() + self.config.settle_delay,
            generation: self.restore_generation,
        });
    }

    fn notify(&self, value: &str) {
        if let Some(cb) = &self.on_value_changed {
            cb(value);
        }
    }
}
