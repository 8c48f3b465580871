//! Simulated ego vehicle body
//!
//! A minimal rigid body that the daemon advances between stats
//! intervals. It exists so pose capture and respawn have something
//! real to act on; there is no collision or dynamics model.

use crate::core::body::TrackedBody;
use nalgebra::{UnitQuaternion, Vector3};

pub struct VehicleBody {
    position: Vector3<f32>,
    rotation: UnitQuaternion<f32>,
    linear_velocity: Vector3<f32>,
    angular_velocity: Vector3<f32>,
}

impl VehicleBody {
    /// Place the body at a position with a yaw around the vertical axis.
    pub fn new(position: Vector3<f32>, yaw_rad: f32) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_rad),
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }

    pub fn set_velocity(&mut self, linear: Vector3<f32>, angular: Vector3<f32>) {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
    }

    /// Advance the body by `dt` seconds of constant-velocity motion.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.linear_velocity * dt;
        self.rotation =
            UnitQuaternion::from_scaled_axis(self.angular_velocity * dt) * self.rotation;
    }

    /// Unit vector the body is facing, in world coordinates
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::x()
    }

    pub fn linear_velocity(&self) -> Vector3<f32> {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }
}

impl TrackedBody for VehicleBody {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    fn set_pose(&mut self, position: Vector3<f32>, rotation: UnitQuaternion<f32>) {
        self.position = position;
        self.rotation = rotation;
    }

    fn stop_motion(&mut self) {
        self.linear_velocity = Vector3::zeros();
        self.angular_velocity = Vector3::zeros();
    }
}
