//! Host adapter: bridges an external size/value-providing environment to
//! the surface controller.
//!
//! The host side of the boundary is a narrow trait; the adapter owns zero
//! or one controller for its lifetime, feeds it dimensions and the
//! externally persisted value on every update tick, and forwards committed
//! values outward. No ambient registry is involved; adapters are plain
//! values, constructible and testable in isolation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::controller::SurfaceController;
use crate::SurfaceConfig;

/// The external collaborator the surface talks to.
///
/// Implementations supply target dimensions and the persisted signature,
/// and receive value-changed notifications on every commit/clear. They do
/// not reach into raster internals.
pub trait Host: Send + Sync {
    /// Current target dimensions, re-read on every update tick.
    fn dimensions(&self) -> (f64, f64);

    /// The externally persisted signature ("" when none).
    fn value(&self) -> String;

    /// Invoked by the surface on every commit or clear.
    fn value_changed(&self, value: &str);
}

/// Drives a [`SurfaceController`] from a [`Host`].
///
/// The controller is created lazily on the first `update_tick`, mirroring
/// hosts that announce dimensions only once mounted. Until then the user
/// affordances (`save`, `clear`) are no-ops.
pub struct HostAdapter<H: Host + 'static> {
    host: Arc<H>,
    config: SurfaceConfig,
    controller: Option<SurfaceController>,
    // Bit patterns, not floats: dimension changes are detected by value,
    // and a host stuck on NaN must not re-trigger a resize every tick.
    last_dims: Option<(u64, u64)>,
    last_value: String,
}

impl<H: Host + 'static> HostAdapter<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, SurfaceConfig::default())
    }

    pub fn with_config(host: Arc<H>, config: SurfaceConfig) -> Self {
        Self {
            host,
            config,
            controller: None,
            last_dims: None,
            last_value: String::new(),
        }
    }

    /// Re-read dimensions and value from the host and reconcile.
    ///
    /// Dimension changes (by value) replace the canvas; value changes are
    /// ingested as the new restore target. Also pumps the controller so
    /// deferred restores make progress on hosts without a separate tick.
    pub fn update_tick(&mut self) {
        let (w, h) = self.host.dimensions();
        let dims_key = (w.to_bits(), h.to_bits());
        let value = self.host.value();

        match self.controller.as_mut() {
            None => {
                let mut controller = SurfaceController::new(&value, w, h, self.config.clone());
                let host = self.host.clone();
                controller.on_value_changed(move |v| host.value_changed(v));
                self.controller = Some(controller);
            }
            Some(controller) => {
                if self.last_dims != Some(dims_key) {
                    controller.resize(w, h);
                }
                if value != self.last_value {
                    controller.ingest_external_value(&value);
                }
                controller.pump();
            }
        }

        self.last_dims = Some(dims_key);
        self.last_value = value;
    }

    /// User affordance: commit the current drawing. No-op before the
    /// surface exists.
    pub fn save(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            let value = controller.commit();
            self.last_value = value;
        }
    }

    /// User affordance: clear the current drawing. No-op before the
    /// surface exists.
    pub fn clear(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.clear();
            self.last_value.clear();
        }
    }

    /// Pump deferred restore work without re-reading host state.
    pub fn pump(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.pump();
        }
    }

    /// Drive the controller until restore work settles; `true` on idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        match self.controller.as_mut() {
            Some(controller) => controller.run_until_idle(timeout),
            None => true,
        }
    }

    pub fn controller(&self) -> Option<&SurfaceController> {
        self.controller.as_ref()
    }
}

/// An in-memory [`Host`] holding its state behind mutexes.
///
/// Behaves like a bound host property: values pushed through
/// `value_changed` are stored and echoed back by `value()`. Used by the
/// crate's own tests and handy as a starting point for embedders.
pub struct MemoryHost {
    dims: Mutex<(f64, f64)>,
    value: Mutex<String>,
    notifications: Mutex<Vec<String>>,
}

impl MemoryHost {
    pub fn new(width: f64, height: f64, value: &str) -> Self {
        Self {
            dims: Mutex::new((width, height)),
            value: Mutex::new(value.to_string()),
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn set_dimensions(&self, width: f64, height: f64) {
        *self.dims.lock().unwrap() = (width, height);
    }

    pub fn set_value(&self, value: &str) {
        *self.value.lock().unwrap() = value.to_string();
    }

    /// Every value the surface has pushed outward, in order.
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Host for MemoryHost {
    fn dimensions(&self) -> (f64, f64) {
        *self.dims.lock().unwrap()
    }

    fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    fn value_changed(&self, value: &str) {
        self.notifications.lock().unwrap().push(value.to_string());
        *self.value.lock().unwrap() = value.to_string();
    }
}
