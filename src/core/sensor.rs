//! CameraSensor trait definition

use std::sync::Arc;
use std::time::Instant;

/// Camera sensor handle consumed by the render coordinator
///
/// Implementations live in the host simulation. The coordinator decides
/// when each entry point is called but never owns the rendering pipeline
/// behind it. Render failures are the sensor's concern; panics unwind to
/// the host untouched.
pub trait CameraSensor: Send + Sync {
    /// Name used in logs and frame records
    fn name(&self) -> &str;

    /// Whether the sensor's host object participates in render cycles
    ///
    /// Inactive sensors are skipped without error.
    fn is_active(&self) -> bool;

    /// Blocking render entry point, returns when the capture completes
    fn render(&self);

    /// Optimized render entry point
    ///
    /// `use_command_buffer` selects the command-buffer submission route.
    /// Defaults to the blocking entry point.
    fn render_batched(&self, use_command_buffer: bool) {
        let _ = use_command_buffer;
        self.render();
    }

    /// Begin a render the sensor completes on its own schedule
    ///
    /// Defaults to the blocking entry point.
    fn render_deferred(&self) {
        self.render();
    }
}

/// Shared sensor handle
pub type SensorRef = Arc<dyn CameraSensor>;

/// One completed frame capture announced by a sensor
#[derive(Debug, Clone)]
pub struct FrameRecord {
    /// Producing camera name
    pub camera: String,
    /// Per-camera frame sequence number, starting at 1
    pub sequence: u64,
    /// Completion timestamp
    pub captured_at: Instant,
}
