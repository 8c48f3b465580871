//! Simulated camera sensor
//!
//! Stands in for the host's camera pipeline during development and in
//! tests. A render burns the configured duration (with a little jitter,
//! like a real capture stall) and announces the completed frame on an
//! optional frame-record channel. Begin/end timestamps of every capture
//! are kept for ordering assertions.

use crate::config::CameraConfig;
use crate::core::sensor::{CameraSensor, FrameRecord, SensorRef};
use crossbeam_channel::Sender;
use log::{debug, trace};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CameraInner {
    name: String,
    active: AtomicBool,
    render_duration: Duration,
    /// Completed captures, also the frame sequence counter
    sequence: AtomicU64,
    /// Captures begun but not yet finished
    in_flight: AtomicU64,
    spans: Mutex<Vec<(Instant, Instant)>>,
    sink: Option<Sender<FrameRecord>>,
}

impl CameraInner {
    /// Perform one capture. The caller has already bumped `in_flight`.
    fn capture(&self, duration: Duration) {
        let begin = Instant::now();
        if !duration.is_zero() {
            let jitter = rand::thread_rng().gen_range(0.85..1.15f32);
            thread::sleep(duration.mul_f32(jitter));
        }
        let end = Instant::now();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.spans.lock().push((begin, end));
        if let Some(sink) = &self.sink {
            let record = FrameRecord {
                camera: self.name.clone(),
                sequence,
                captured_at: end,
            };
            if sink.try_send(record).is_err() {
                trace!(
                    "Frame sink full, dropped frame {} from camera {}",
                    sequence, self.name
                );
            }
        }
        self.in_flight.fetch_sub(1, Ordering::Release);
    }
}

/// Simulated camera sensor handle
///
/// Cheap to clone; clones share the underlying camera state.
#[derive(Debug, Clone)]
pub struct SimCamera {
    inner: Arc<CameraInner>,
}

impl SimCamera {
    pub fn new(name: &str, render_duration: Duration) -> Self {
        Self {
            inner: Arc::new(CameraInner {
                name: name.to_string(),
                active: AtomicBool::new(true),
                render_duration,
                sequence: AtomicU64::new(0),
                in_flight: AtomicU64::new(0),
                spans: Mutex::new(Vec::new()),
                sink: None,
            }),
        }
    }

    /// Build a camera from a configuration entry, optionally attaching a
    /// frame-record sink.
    pub fn from_config(config: &CameraConfig, sink: Option<Sender<FrameRecord>>) -> Self {
        Self {
            inner: Arc::new(CameraInner {
                name: config.name.clone(),
                active: AtomicBool::new(config.active),
                render_duration: Duration::from_secs_f32(config.render_ms.max(0.0) / 1000.0),
                sequence: AtomicU64::new(0),
                in_flight: AtomicU64::new(0),
                spans: Mutex::new(Vec::new()),
                sink,
            }),
        }
    }

    /// Shared handle for the coordinator's sensor list
    pub fn handle(&self) -> SensorRef {
        Arc::new(self.clone())
    }

    pub fn set_active(&self, active: bool) {
        self.inner.active.store(active, Ordering::Relaxed);
        debug!(
            "Camera {} {}",
            self.inner.name,
            if active { "activated" } else { "deactivated" }
        );
    }

    /// Completed capture count
    pub fn frames_captured(&self) -> u64 {
        self.inner.sequence.load(Ordering::Relaxed)
    }

    /// Begin/end timestamps of every completed capture
    pub fn spans(&self) -> Vec<(Instant, Instant)> {
        self.inner.spans.lock().clone()
    }

    /// Block until no capture is in flight. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.inner.in_flight.load(Ordering::Acquire) > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

impl CameraSensor for SimCamera {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Relaxed)
    }

    fn render(&self) {
        self.inner.in_flight.fetch_add(1, Ordering::Acquire);
        self.inner.capture(self.inner.render_duration);
    }

    fn render_batched(&self, use_command_buffer: bool) {
        // command-buffer submission shortens the capture stall
        let duration = if use_command_buffer {
            self.inner.render_duration / 2
        } else {
            self.inner.render_duration
        };
        self.inner.in_flight.fetch_add(1, Ordering::Acquire);
        self.inner.capture(duration);
    }

    fn render_deferred(&self) {
        let inner = Arc::clone(&self.inner);
        inner.in_flight.fetch_add(1, Ordering::Acquire);
        rayon::spawn(move || inner.capture(inner.render_duration));
    }
}
