//! Raster layer: canvas surface, stroke stamping, signature codec

pub mod canvas;
pub mod codec;
pub mod stroke;

pub use canvas::Canvas;
pub use stroke::{Pen, Point, Stroke};

/// An exported view of the surface: dimensions plus encoded PNG bytes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Snapshot {
    /// The snapshot as the serialized signature string handed to hosts.
    pub fn to_data_url(&self) -> String {
        codec::encode_data_url(&self.png_data)
    }
}
