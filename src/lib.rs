//! Signature Surface
//!
//! An embeddable drawing surface that captures a freehand signature as a
//! sequence of pointer strokes, rasterizes it to a bitmap, and
//! serializes/restores that bitmap across re-renders and size changes.
//!
//! # Features
//!
//! - **Scale-preserving restore**: a committed signature survives surface
//!   resizes by being decoded and stretch-drawn onto the replacement canvas
//! - **Narrow host boundary**: a single string value crosses it, either
//!   `""` or a PNG data URL; hosts plug in via the [`Host`] trait
//! - **Safe degradation**: bad dimensions fall back to defaults, corrupt
//!   restore values leave the surface blank, nothing is fatal
//!
//! # Example
//!
//! ```
//! use sigpad::{SurfaceConfig, SurfaceController};
//!
//! let mut surface = SurfaceController::new("", 500.0, 300.0, SurfaceConfig::default());
//! surface.pointer_down(40.0, 60.0);
//! surface.pointer_move(120.0, 90.0);
//! surface.pointer_up();
//!
//! let value = surface.commit();
//! assert!(value.starts_with("data:image/png;base64,"));
//! ```

use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod controller;
pub mod host;
pub mod raster;

// Background decode worker (internal)
mod decode;

// Async-friendly surface API (worker-backed abstraction)
#[cfg(feature = "async-api")]
pub mod async_api;

#[cfg(feature = "async-api")]
pub use async_api::AsyncSurface;

pub use controller::SurfaceController;
pub use host::{Host, HostAdapter, MemoryHost};
pub use raster::{Canvas, Pen, Point, Snapshot, Stroke};

/// Configuration for the signature surface
///
/// The defaults reproduce the classic signature pad: black round pen on an
/// opaque white canvas, a 40-unit inset reserved for chrome around the
/// drawable area, and a short settle delay before deferred restores.
///
/// # Examples
///
/// ```
/// let cfg = sigpad::SurfaceConfig::default();
/// assert_eq!(cfg.fallback.width, 500);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Pen used to stamp ink
    pub pen: Pen,
    /// Canvas background as straight RGBA
    pub background: (u8, u8, u8, u8),
    /// Units subtracted from each outer axis for chrome/padding
    pub inset: u32,
    /// Delay between a dimension change and the restore redraw, letting
    /// the surface's own reflow settle first
    pub settle_delay: Duration,
    /// Dimensions substituted when the host supplies degenerate ones
    pub fallback: Dimensions,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            pen: Pen::default(),
            background: (255, 255, 255, 255),
            inset: 40,
            settle_delay: Duration::from_millis(100),
            fallback: Dimensions::default(),
        }
    }
}

/// Outer surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
        }
    }
}

impl Dimensions {
    /// Sanitize externally supplied dimensions, per axis: non-finite or
    /// non-positive values are replaced by the fallback.
    pub fn from_requested(width: f64, height: f64, fallback: Dimensions) -> Self {
        Self {
            width: sanitize_axis(width, fallback.width),
            height: sanitize_axis(height, fallback.height),
        }
    }

    /// The drawable size after reserving `inset` units on each axis,
    /// never smaller than 1x1.
    pub fn padded(self, inset: u32) -> Self {
        Self {
            width: self.width.saturating_sub(inset).max(1),
            height: self.height.saturating_sub(inset).max(1),
        }
    }
}

fn sanitize_axis(requested: f64, fallback: u32) -> u32 {
    if !requested.is_finite() || requested <= 0.0 {
        fallback
    } else {
        requested.round().min(u32::MAX as f64) as u32
    }
}

/// Create a surface with the default configuration
pub fn new_surface(initial_value: &str, width: f64, height: f64) -> SurfaceController {
    SurfaceController::new(initial_value, width, height, SurfaceConfig::default())
}
