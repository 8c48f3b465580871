//! Render rig scheduling
//!
//! The rig stack has three layers. [`strategy`] turns a publish
//! request into camera render calls and decides where the dispatcher
//! waits. [`coordinator`] owns the publish timer and runs one
//! strategy cycle at a time against the simulation step boundaries.
//! [`driver`] is the tick thread that steps the coordinator at a
//! fixed rate.

pub mod coordinator;
pub mod driver;
pub mod strategy;

pub use coordinator::{RenderCoordinator, WARMUP};
pub use driver::RigDriver;
pub use strategy::{
    Boundary, ConcurrentDispatch, ConcurrentKind, DispatchMode, DispatchStrategy, PendingSet,
    SequentialDispatch, SequentialKind,
};
