//! NetraRig - Camera render coordination for simulated vehicle platforms
//!
//! This library provides the render scheduling core for a simulated
//! multi-camera vehicle: a fixed-step coordinator driving pluggable
//! dispatch strategies, simulated camera sensors, and ego vehicle
//! pose capture with respawn.
//!
//! ## Layers
//!
//! - [`core`]: sensor and body traits, dispatch counters
//! - [`rig`]: dispatch strategies, the render coordinator, the tick thread
//! - [`sim`]: simulated cameras backing the sensor trait
//! - [`vehicle`]: ego body, pose snapshot, respawn controller

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod rig;
pub mod sim;
pub mod vehicle;

// Re-export commonly used types
pub use app::RigApp;
pub use config::{AppConfig, CameraConfig, DriverConfig, RigConfig, VehicleConfig};
pub use self::core::{
    BodyRef, CameraSensor, CounterSnapshot, DispatchCounters, FrameRecord, SensorRef, TrackedBody,
};
pub use error::{Error, Result};
pub use rig::{
    Boundary, ConcurrentKind, DispatchMode, DispatchStrategy, PendingSet, RenderCoordinator,
    RigDriver, SequentialKind, WARMUP,
};
pub use sim::{SimCamera, build_rig};
pub use vehicle::{PoseSnapshot, RespawnController, VehicleBody};
