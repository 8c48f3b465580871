//! Ego vehicle pose tracking and respawn

pub mod body;
pub mod respawn;

pub use body::VehicleBody;
pub use respawn::{PoseSnapshot, RespawnController};
