//! Core abstractions shared by the rig and vehicle components.
//!
//! - [`sensor::CameraSensor`]: Trait the host's camera sensors implement
//! - [`body::TrackedBody`]: Trait the host's ego vehicle body implements
//! - [`counters`]: Dispatch diagnostics

pub mod body;
pub mod counters;
pub mod sensor;

pub use body::{BodyRef, TrackedBody};
pub use counters::{CounterSnapshot, DispatchCounters};
pub use sensor::{CameraSensor, FrameRecord, SensorRef};
