//! Simulated devices for development and tests

pub mod camera;

pub use camera::SimCamera;

use crate::config::CameraConfig;
use crate::core::sensor::{FrameRecord, SensorRef};
use crossbeam_channel::Sender;

/// Build rig sensor handles from camera configuration entries
pub fn build_rig(configs: &[CameraConfig], sink: Option<&Sender<FrameRecord>>) -> Vec<SensorRef> {
    configs
        .iter()
        .map(|config| SimCamera::from_config(config, sink.cloned()).handle())
        .collect()
}
