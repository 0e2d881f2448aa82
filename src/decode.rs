//! Background decode worker for serialized signatures.
//!
//! Image decoding is the one asynchronous operation in the surface
//! lifecycle. A dedicated worker thread owns the decode loop; requests go
//! in over an mpsc channel and completions come back over another, drained
//! cooperatively by the controller's `pump`. Nothing blocks the caller.
//!
//! Each request carries the restore generation it was issued under. The
//! controller compares that tag against the live generation when the
//! completion is applied; a completion whose generation no longer matches
//! is stale (the target was cleared or replaced meanwhile) and is dropped.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use image::RgbaImage;
use log::debug;

use crate::error::Result;
use crate::raster::codec;

pub(crate) struct DecodeRequest {
    pub generation: u64,
    pub value: String,
}

pub(crate) struct DecodeOutcome {
    pub generation: u64,
    pub result: Result<RgbaImage>,
}

/// Handle to the decode worker thread.
pub(crate) struct Decoder {
    req_tx: Sender<DecodeRequest>,
    out_rx: Receiver<DecodeOutcome>,
}

impl Decoder {
    /// Spawn the worker. The thread exits when the handle is dropped and
    /// its request channel hangs up.
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = mpsc::channel::<DecodeRequest>();
        let (out_tx, out_rx) = mpsc::channel::<DecodeOutcome>();

        thread::spawn(move || {
            while let Ok(req) = req_rx.recv() {
                let result = codec::decode_data_url(&req.value);
                // Receiver gone means the controller was dropped; just stop.
                if out_tx
                    .send(DecodeOutcome {
                        generation: req.generation,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self { req_tx, out_rx }
    }

    /// Queue a decode. Failure to enqueue (worker gone) is treated like a
    /// decode failure downstream: the restore is simply skipped.
    pub fn request(&self, generation: u64, value: String) -> bool {
        let ok = self.req_tx.send(DecodeRequest { generation, value }).is_ok();
        if !ok {
            debug!("decode worker unavailable; restore skipped");
        }
        ok
    }

    /// Non-blocking drain of one completed decode, if any.
    pub fn try_recv(&self) -> Option<DecodeOutcome> {
        match self.out_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_outcome(d: &Decoder) -> DecodeOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(o) = d.try_recv() {
                return o;
            }
            assert!(Instant::now() < deadline, "decode worker never answered");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn worker_decodes_valid_value() {
        let img = RgbaImage::from_pixel(3, 3, image::Rgba([9, 9, 9, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let value = codec::encode_data_url(&buf.into_inner());

        let d = Decoder::spawn();
        assert!(d.request(7, value));
        let out = wait_for_outcome(&d);
        assert_eq!(out.generation, 7);
        assert_eq!(out.result.unwrap().width(), 3);
    }

    #[test]
    fn worker_reports_decode_failure() {
        let d = Decoder::spawn();
        assert!(d.request(1, "data:image/png;base64,@@@".to_string()));
        let out = wait_for_outcome(&d);
        assert!(out.result.is_err());
    }
}
