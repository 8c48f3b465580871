//! Fixed-step tick thread
//!
//! Drives a [`RenderCoordinator`] at the configured step rate from a
//! named background thread. The simulated clock advances by exactly
//! one nominal step per iteration; wall-clock sleep absorbs whatever
//! time the step left over, so simulated time tracks wall time as
//! long as a step finishes within its slot.

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::rig::coordinator::RenderCoordinator;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Owns the tick thread and its shutdown flag
pub struct RigDriver {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl RigDriver {
    /// Spawn the tick thread over a shared coordinator.
    pub fn spawn(
        coordinator: Arc<Mutex<RenderCoordinator>>,
        config: &DriverConfig,
    ) -> Result<Self> {
        if !config.step_rate_hz.is_finite() || config.step_rate_hz <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "step_rate_hz must be a positive number, got {}",
                config.step_rate_hz
            )));
        }
        let step = Duration::from_secs_f64(1.0 / config.step_rate_hz as f64);
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("rig-driver".to_string())
            .spawn(move || {
                debug!("Rig driver thread started, step {:?}", step);
                run_tick_loop(&coordinator, &thread_shutdown, step);
                debug!("Rig driver thread exiting");
            })?;
        info!("✓ Rig driver started at {} Hz", config.step_rate_hz);
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signal the tick thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Rig driver thread panicked during shutdown");
        }
    }
}

impl Drop for RigDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_tick_loop(
    coordinator: &Arc<Mutex<RenderCoordinator>>,
    shutdown: &Arc<AtomicBool>,
    step: Duration,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let loop_start = Instant::now();
        coordinator.lock().step(step);
        let elapsed = loop_start.elapsed();
        if elapsed < step {
            thread::sleep(step - elapsed);
        }
    }
}
