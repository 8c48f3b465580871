//! Application orchestration for the NetraRig daemon
//!
//! Wires the simulated rig to the render coordinator and tick thread,
//! tracks the ego vehicle, and runs the main loop until a shutdown
//! signal arrives. SIGHUP schedules an ego respawn without stopping
//! the daemon.

use crate::config::AppConfig;
use crate::core::body::TrackedBody;
use crate::core::sensor::FrameRecord;
use crate::error::Result;
use crate::rig::{RenderCoordinator, RigDriver};
use crate::sim::build_rig;
use crate::vehicle::{RespawnController, VehicleBody};
use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{debug, info, trace, warn};
use nalgebra::Vector3;
use parking_lot::Mutex;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Frames buffered between render threads and the main loop
const FRAME_QUEUE_DEPTH: usize = 256;

/// Cruise speed applied to the ego so respawn has motion to undo
const EGO_CRUISE_MPS: f32 = 0.5;

/// Main application structure that manages all components
pub struct RigApp {
    config: AppConfig,
    coordinator: Arc<Mutex<RenderCoordinator>>,
    driver: Option<RigDriver>,
    frame_rx: Receiver<FrameRecord>,
    frames_received: u64,
    respawn: RespawnController,
    ego: Option<Arc<Mutex<VehicleBody>>>,
    shutdown: Arc<AtomicBool>,
    respawn_requested: Arc<AtomicBool>,
}

impl RigApp {
    /// Create a new RigApp instance
    ///
    /// Builds the simulated cameras, the coordinator and the ego body.
    /// The tick thread is not started until [`RigApp::run`].
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing NetraRig application");

        let (frame_tx, frame_rx) = bounded(FRAME_QUEUE_DEPTH);
        let sensors = build_rig(&config.cameras, Some(&frame_tx));
        let coordinator = Arc::new(Mutex::new(RenderCoordinator::new(sensors, &config.rig)?));

        let mut respawn = RespawnController::new();
        let ego = if config.vehicle.enabled {
            let spawn = Vector3::from(config.vehicle.spawn_position);
            let mut body = VehicleBody::new(spawn, config.vehicle.spawn_yaw_deg.to_radians());
            let forward = body.forward();
            body.set_velocity(forward * EGO_CRUISE_MPS, Vector3::zeros());
            info!(
                "Ego vehicle spawned at [{:.2}, {:.2}, {:.2}], yaw {:.1}°",
                spawn.x, spawn.y, spawn.z, config.vehicle.spawn_yaw_deg
            );
            let body = Arc::new(Mutex::new(body));
            respawn.initialize(body.clone());
            Some(body)
        } else {
            warn!("Ego vehicle disabled, respawn requests will be ignored");
            None
        };

        info!("✓ Rig and ego initialized successfully");

        Ok(Self {
            config,
            coordinator,
            driver: None,
            frame_rx,
            frames_received: 0,
            respawn,
            ego,
            shutdown: Arc::new(AtomicBool::new(false)),
            respawn_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start the tick thread and run the main loop
    pub fn run(&mut self) -> Result<()> {
        info!("Starting application threads");

        let driver = RigDriver::spawn(Arc::clone(&self.coordinator), &self.config.driver)?;
        self.driver = Some(driver);

        self.setup_signal_handler();

        info!("✓ All threads started successfully");
        info!("");
        info!("Press Ctrl+C to stop, SIGHUP to respawn the ego");

        // Main loop - keep alive while the tick thread publishes
        let mut last_stats = Instant::now();
        let mut last_motion = Instant::now();

        while !self.shutdown.load(Ordering::Relaxed) {
            std::thread::sleep(Duration::from_millis(100));

            self.drain_frames();

            if self.respawn_requested.swap(false, Ordering::Relaxed) {
                self.respawn.reset();
            }

            let dt = last_motion.elapsed();
            last_motion = Instant::now();
            if let Some(ref ego) = self.ego {
                ego.lock().integrate(dt.as_secs_f32());
            }

            // Print statistics every 10 seconds
            if last_stats.elapsed().as_secs() >= 10 {
                self.log_statistics();
                last_stats = Instant::now();
            }
        }

        info!("Shutdown signal received, stopping threads...");
        self.stop_threads();

        Ok(())
    }

    /// Setup signal handler for shutdown and ego respawn
    fn setup_signal_handler(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        let respawn_requested = Arc::clone(&self.respawn_requested);

        std::thread::Builder::new()
            .name("signal-handler".to_string())
            .spawn(move || {
                let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])
                    .expect("Failed to register signal handlers");

                for sig in signals.forever() {
                    if sig == SIGHUP {
                        info!("Received SIGHUP, scheduling ego respawn");
                        respawn_requested.store(true, Ordering::Relaxed);
                        continue;
                    }
                    info!("Received signal {:?}, initiating shutdown...", sig);
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
            })
            .expect("Failed to spawn signal handler thread");
    }

    /// Pull buffered frame records off the channel without blocking
    fn drain_frames(&mut self) {
        loop {
            match self.frame_rx.try_recv() {
                Ok(frame) => {
                    self.frames_received += 1;
                    trace!("Frame {} from {}", frame.sequence, frame.camera);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Frame channel disconnected");
                    break;
                }
            }
        }
    }

    /// Log application statistics
    fn log_statistics(&self) {
        let snapshot = self.coordinator.lock().counters();
        info!("Rig running... {}", snapshot);
        info!("Frames received: {}", self.frames_received);
        if let Some(ref ego) = self.ego {
            let position = ego.lock().position();
            info!(
                "Ego at [{:.2}, {:.2}, {:.2}]",
                position.x, position.y, position.z
            );
        }
    }

    /// Stop the tick thread and drain what it left behind
    fn stop_threads(&mut self) {
        info!("Stopping all threads...");
        self.shutdown.store(true, Ordering::Relaxed);

        if let Some(ref mut driver) = self.driver {
            driver.stop();
        }
        self.drain_frames();

        info!("Final counters: {}", self.coordinator.lock().counters());
        info!("✓ All threads stopped");
    }
}

impl Drop for RigApp {
    fn drop(&mut self) {
        debug!("RigApp cleaning up...");
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(ref mut driver) = self.driver {
            driver.stop();
        }
    }
}
