//! Ego vehicle respawn integration tests.
//!
//! Covers the [vehicle] config section end to end: file round-trips,
//! spawn pose construction, capture on bind, teleport-and-stop on
//! reset, and snapshot serialization.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use netra_rig::config::AppConfig;
use netra_rig::core::{BodyRef, TrackedBody};
use netra_rig::vehicle::{PoseSnapshot, RespawnController, VehicleBody};
use parking_lot::Mutex;
use std::sync::Arc;

fn body_from_config(config: &AppConfig) -> VehicleBody {
    VehicleBody::new(
        Vector3::from(config.vehicle.spawn_position),
        config.vehicle.spawn_yaw_deg.to_radians(),
    )
}

#[test]
fn test_vehicle_section_survives_a_file_round_trip() {
    let mut config = AppConfig::sim_defaults();
    config.vehicle.spawn_position = [3.0, 0.0, -1.5];
    config.vehicle.spawn_yaw_deg = 90.0;
    config.rig.strategy = 4;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("netra-rig.toml");
    config.to_file(&path).unwrap();

    let loaded = AppConfig::from_file(&path).unwrap();
    assert_eq!(loaded.vehicle.spawn_position, [3.0, 0.0, -1.5]);
    assert_eq!(loaded.vehicle.spawn_yaw_deg, 90.0);
    assert!(loaded.vehicle.enabled);
    assert_eq!(loaded.rig.strategy, 4);
    assert_eq!(loaded.cameras.len(), config.cameras.len());
}

#[test]
fn test_spawn_pose_follows_the_config() {
    let mut config = AppConfig::sim_defaults();
    config.vehicle.spawn_position = [2.0, 0.0, 4.0];
    config.vehicle.spawn_yaw_deg = 90.0;

    let body = body_from_config(&config);
    assert_eq!(body.position(), Vector3::new(2.0, 0.0, 4.0));

    // a quarter turn around +Y points the nose down -Z
    let forward = body.forward();
    assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);
}

#[test]
fn test_capture_and_reset_through_the_trait_object() {
    let mut config = AppConfig::sim_defaults();
    config.vehicle.spawn_position = [1.0, 0.0, 1.0];
    config.vehicle.spawn_yaw_deg = 45.0;

    let body = Arc::new(Mutex::new(body_from_config(&config)));
    let handle: BodyRef = body.clone();

    let mut controller = RespawnController::new();
    controller.initialize(handle);
    let captured = controller.snapshot().unwrap();

    // drive away from the spawn pose
    {
        let mut guard = body.lock();
        let forward = guard.forward();
        guard.set_velocity(forward * 2.0, Vector3::new(0.0, 0.4, 0.0));
        guard.integrate(3.0);
    }
    assert!(body.lock().position() != captured.position);

    controller.reset();

    let guard = body.lock();
    assert_relative_eq!(guard.position().x, 1.0, epsilon = 1e-6);
    assert_relative_eq!(guard.position().z, 1.0, epsilon = 1e-6);
    assert_eq!(guard.rotation(), captured.rotation);
    assert_eq!(guard.linear_velocity(), Vector3::zeros());
    assert_eq!(guard.angular_velocity(), Vector3::zeros());
}

#[test]
fn test_snapshot_serializes_to_toml_and_back() {
    let body = VehicleBody::new(Vector3::new(-4.5, 0.0, 2.25), 0.75);
    let snapshot = PoseSnapshot::new(body.position(), body.rotation());

    let serialized = toml::to_string(&snapshot).unwrap();
    let restored: PoseSnapshot = toml::from_str(&serialized).unwrap();
    assert_eq!(restored, snapshot);
}
