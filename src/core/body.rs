//! TrackedBody trait definition

use nalgebra::{UnitQuaternion, Vector3};
use parking_lot::Mutex;
use std::sync::Arc;

/// Movable ego entity the respawn controller captures and restores
///
/// The body belongs to the host simulation; the controller only reads
/// and writes its pose through this seam.
pub trait TrackedBody: Send {
    /// Current position in world coordinates, meters
    fn position(&self) -> Vector3<f32>;

    /// Current orientation
    fn rotation(&self) -> UnitQuaternion<f32>;

    /// Teleport the body to the given pose
    fn set_pose(&mut self, position: Vector3<f32>, rotation: UnitQuaternion<f32>);

    /// Zero linear and angular velocity so the body comes to rest
    fn stop_motion(&mut self);
}

/// Shared handle to a tracked body
pub type BodyRef = Arc<Mutex<dyn TrackedBody>>;
