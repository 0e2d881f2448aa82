//! The drawing surface: a fixed-size RGBA raster with clear, stamp,
//! stretch-draw and PNG export operations.
//!
//! A `Canvas` is never resized in place. Raster contents do not survive a
//! dimension change, so the controller replaces the whole canvas and
//! redraws from the serialized signature instead.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::raster::stroke::{interpolate, Pen, Point};
use crate::raster::Snapshot;

/// Fixed-size raster surface owned by the controller.
pub struct Canvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl Canvas {
    /// Allocate a surface filled with the background color.
    ///
    /// Dimensions must already be sanitized and padded by the caller;
    /// zero is clamped to 1 so the raster is never degenerate.
    pub fn new(width: u32, height: u32, background: (u8, u8, u8, u8)) -> Self {
        let background = Rgba([background.0, background.1, background.2, background.3]);
        let image = RgbaImage::from_pixel(width.max(1), height.max(1), background);
        Self { image, background }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reset every pixel to the background color.
    pub fn clear(&mut self) {
        let bg = self.background;
        for px in self.image.pixels_mut() {
            *px = bg;
        }
    }

    /// Whether the surface shows nothing but background.
    pub fn is_blank(&self) -> bool {
        let bg = self.background;
        self.image.pixels().all(|px| *px == bg)
    }

    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = self.image.get_pixel(x, y).0;
        (p[0], p[1], p[2], p[3])
    }

    /// Stamp one round pen dot centered at `c`.
    pub fn stamp_dot(&mut self, c: Point, pen: &Pen) {
        let r = (pen.width / 2.0).max(0.5);
        let r2 = r * r;
        let min_x = (c.x - r).floor().max(0.0) as u32;
        let min_y = (c.y - r).floor().max(0.0) as u32;
        let max_x = ((c.x + r).ceil() as i64).min(self.width() as i64 - 1);
        let max_y = ((c.y + r).ceil() as i64).min(self.height() as i64 - 1);
        if max_x < min_x as i64 || max_y < min_y as i64 {
            return;
        }
        for y in min_y..=max_y as u32 {
            for x in min_x..=max_x as u32 {
                let dx = x as f32 + 0.5 - c.x;
                let dy = y as f32 + 0.5 - c.y;
                if dx * dx + dy * dy <= r2 {
                    blend_pixel(self.image.get_pixel_mut(x, y), pen.rgba);
                }
            }
        }
    }

    /// Stamp a solid line of ink from `a` to `b`.
    ///
    /// Dot centers are interpolated at sub-pixel spacing so fast pointer
    /// movement still produces contiguous ink.
    pub fn stroke_segment(&mut self, a: Point, b: Point, pen: &Pen) {
        let spacing = (pen.width / 3.0).max(0.5);
        for c in interpolate(a, b, spacing) {
            self.stamp_dot(c, pen);
        }
    }

    /// Stretch-draw `bitmap` to exactly fill this surface.
    ///
    /// No aspect-ratio preservation: the restore protocol scales the
    /// signature to fit, matching the surface's own scaling contract. The
    /// surface is cleared first so repeated restores never stack.
    pub fn draw_stretched(&mut self, bitmap: &RgbaImage) {
        self.clear();
        let resized = if bitmap.width() == self.width() && bitmap.height() == self.height() {
            bitmap.clone()
        } else {
            imageops::resize(bitmap, self.width(), self.height(), FilterType::Triangle)
        };
        imageops::overlay(&mut self.image, &resized, 0, 0);
    }

    /// Export the current raster contents as PNG bytes.
    ///
    /// Always succeeds for a live surface: a blank canvas encodes to a
    /// valid blank image rather than failing.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| Error::EncodeError(format!("PNG export failed: {}", e)))?;
        Ok(buf.into_inner())
    }

    /// Export as a `Snapshot` (dimensions + PNG bytes).
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            width: self.width(),
            height: self.height(),
            png_data: self.to_png()?,
        })
    }

    /// Raw pixel view, used by digest-based tests.
    pub fn raw_pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

// Straight src-over blend; the common opaque-ink case short-circuits.
fn blend_pixel(dst: &mut Rgba<u8>, src: (u8, u8, u8, u8)) {
    let (sr, sg, sb, sa) = src;
    if sa == 255 {
        *dst = Rgba([sr, sg, sb, 255]);
        return;
    }
    if sa == 0 {
        return;
    }
    let a = sa as u32;
    let inv = 255 - a;
    let d = dst.0;
    *dst = Rgba([
        ((sr as u32 * a + d[0] as u32 * inv) / 255) as u8,
        ((sg as u32 * a + d[1] as u32 * inv) / 255) as u8,
        ((sb as u32 * a + d[2] as u32 * inv) / 255) as u8,
        ((a + d[3] as u32 * inv / 255).min(255)) as u8,
    ]);
}
