use crate::controller::SurfaceController;
use crate::{Error, Result, SurfaceConfig};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

enum Command {
    Resize(f64, f64, oneshot::Sender<()>),
    PointerDown(f32, f32),
    PointerMove(f32, f32),
    PointerUp,
    Commit(oneshot::Sender<String>),
    Clear(oneshot::Sender<()>),
    Ingest(String, oneshot::Sender<()>),
    Snapshot(oneshot::Sender<Result<Vec<u8>>>),
    Value(oneshot::Sender<String>),
    Settle(Duration, oneshot::Sender<bool>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly signature surface backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous [`SurfaceController`] and executes
/// commands sent from async tasks, so callers get an async interface
/// without the controller having to be `Send` across await points. Between
/// commands the worker pumps the controller, so deferred restores make
/// progress even while the caller is idle.
#[derive(Clone)]
pub struct AsyncSurface {
    cmd_tx: Sender<Command>,
}

impl AsyncSurface {
    /// Create a new surface (spawns the worker thread that owns it).
    pub fn new(initial_value: &str, width: f64, height: f64, config: Option<SurfaceConfig>) -> Self {
        let config = config.unwrap_or_default();
        let initial_value = initial_value.to_string();
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut controller = SurfaceController::new(&initial_value, width, height, config);

            // Command loop; the timeout arm keeps restore work ticking
            loop {
                match cmd_rx.recv_timeout(Duration::from_millis(5)) {
                    Ok(cmd) => match cmd {
                        Command::Resize(w, h, resp) => {
                            controller.resize(w, h);
                            let _ = resp.send(());
                        }
                        Command::PointerDown(x, y) => controller.pointer_down(x, y),
                        Command::PointerMove(x, y) => controller.pointer_move(x, y),
                        Command::PointerUp => controller.pointer_up(),
                        Command::Commit(resp) => {
                            let _ = resp.send(controller.commit());
                        }
                        Command::Clear(resp) => {
                            controller.clear();
                            let _ = resp.send(());
                        }
                        Command::Ingest(value, resp) => {
                            controller.ingest_external_value(&value);
                            let _ = resp.send(());
                        }
                        Command::Snapshot(resp) => {
                            let _ = resp.send(controller.canvas().to_png());
                        }
                        Command::Value(resp) => {
                            let _ = resp.send(controller.current_value().to_string());
                        }
                        Command::Settle(timeout, resp) => {
                            let _ = resp.send(controller.run_until_idle(timeout));
                        }
                        Command::Close(resp) => {
                            let _ = resp.send(());
                            break;
                        }
                    },
                    Err(RecvTimeoutError::Timeout) => controller.pump(),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self { cmd_tx }
    }

    /// Replace the canvas at new outer dimensions.
    pub async fn resize(&self, width: f64, height: f64) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Resize(width, height, tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Resize canceled: {}", e)))
    }

    /// Begin a stroke. Pointer events are fire-and-forget; they are
    /// ordered by the channel and too frequent to round-trip each one.
    pub fn pointer_down(&self, x: f32, y: f32) {
        let _ = self.cmd_tx.send(Command::PointerDown(x, y));
    }

    pub fn pointer_move(&self, x: f32, y: f32) {
        let _ = self.cmd_tx.send(Command::PointerMove(x, y));
    }

    pub fn pointer_up(&self) {
        let _ = self.cmd_tx.send(Command::PointerUp);
    }

    /// Export the surface and receive the serialized signature.
    pub async fn commit(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Commit(tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Commit canceled: {}", e)))
    }

    /// Erase the surface and drop the restore target.
    pub async fn clear(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Clear(tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Clear canceled: {}", e)))
    }

    /// Hand the surface an externally persisted value.
    pub async fn ingest_external_value(&self, value: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Ingest(value.to_string(), tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Ingest canceled: {}", e)))
    }

    /// Current raster contents as PNG bytes.
    pub async fn snapshot_png(&self) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Snapshot(tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Snapshot canceled: {}", e)))?
    }

    /// The serialized signature currently held.
    pub async fn value(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Value(tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Value canceled: {}", e)))
    }

    /// Wait until deferred restore work settles; `Ok(true)` on idle.
    pub async fn settle(&self, timeout: Duration) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Settle(timeout, tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Settle canceled: {}", e)))
    }

    /// Shut down the worker thread.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::WorkerError(format!("Close canceled: {}", e)))
    }
}
