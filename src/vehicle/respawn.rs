//! Ego pose capture and respawn
//!
//! The controller is created unconditionally; binding it to a body is
//! a separate step so a rig without a vehicle section still has a
//! controller that answers reset requests with a warning instead of
//! touching anything.

use crate::core::body::BodyRef;
use log::{info, warn};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Pose captured when the ego body is bound, restored on every reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl PoseSnapshot {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }
}

/// Restores the ego vehicle to its bound-time pose on demand
pub struct RespawnController {
    body: Option<BodyRef>,
    snapshot: Option<PoseSnapshot>,
}

impl RespawnController {
    pub fn new() -> Self {
        Self {
            body: None,
            snapshot: None,
        }
    }

    /// Bind the ego body and capture its current pose.
    ///
    /// Binding again replaces both the body and the snapshot, so a
    /// repositioned ego respawns at its new pose from then on.
    pub fn initialize(&mut self, body: BodyRef) {
        let snapshot = {
            let guard = body.lock();
            PoseSnapshot::new(guard.position(), guard.rotation())
        };
        info!("Ego spawn pose captured at {:?}", snapshot.position);
        self.body = Some(body);
        self.snapshot = Some(snapshot);
    }

    /// Teleport the ego back to the captured pose and cancel its motion.
    pub fn reset(&self) {
        let (Some(body), Some(snapshot)) = (&self.body, &self.snapshot) else {
            warn!("Ego body reference is missing, nothing to reset");
            return;
        };
        let mut guard = body.lock();
        guard.set_pose(snapshot.position, snapshot.rotation);
        guard.stop_motion();
        info!("Ego respawned at {:?}", snapshot.position);
    }

    pub fn snapshot(&self) -> Option<PoseSnapshot> {
        self.snapshot
    }

    pub fn is_bound(&self) -> bool {
        self.body.is_some()
    }
}

impl Default for RespawnController {
    fn default() -> Self {
        Self::new()
    }
}
