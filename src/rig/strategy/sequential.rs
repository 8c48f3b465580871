//! Sequential dispatch: strict list order, one render per boundary

use super::{Boundary, DispatchStrategy, PendingSet, RenderEntry, SequentialKind, dispatch_render};
use crate::core::counters::DispatchCounters;
use crate::core::sensor::SensorRef;
use std::collections::VecDeque;
use std::sync::Arc;

/// Renders cameras one at a time in list order.
///
/// The camera after an issued render is not touched until the installed
/// boundary wait completes, so renders never overlap. Fixed-step
/// variants 2 and 3 skip the final camera's wait, letting the next
/// publish cycle start in the step of the final render.
pub struct SequentialDispatch {
    kind: SequentialKind,
    use_command_buffer: bool,
}

impl SequentialDispatch {
    pub fn new(kind: SequentialKind, use_command_buffer: bool) -> Self {
        Self {
            kind,
            use_command_buffer,
        }
    }

    fn entry(&self) -> RenderEntry {
        match self.kind {
            SequentialKind::BlockingFrameEnd | SequentialKind::BlockingFixedStep => {
                RenderEntry::Blocking
            }
            SequentialKind::BatchedFrameEnd | SequentialKind::BatchedFixedStep => {
                RenderEntry::Batched(self.use_command_buffer)
            }
            SequentialKind::DeferredFixedStep => RenderEntry::Deferred,
        }
    }

    fn boundary(&self) -> Boundary {
        match self.kind {
            SequentialKind::BlockingFrameEnd | SequentialKind::BatchedFrameEnd => {
                Boundary::FrameEnd
            }
            _ => Boundary::FixedStep,
        }
    }

    fn waits_after_final(&self) -> bool {
        !matches!(
            self.kind,
            SequentialKind::BlockingFixedStep | SequentialKind::BatchedFixedStep
        )
    }
}

impl DispatchStrategy for SequentialDispatch {
    fn submit(&mut self, sensors: &[SensorRef], counters: &Arc<DispatchCounters>) -> PendingSet {
        let mut queue: VecDeque<usize> = (0..sensors.len()).collect();
        let Some(first) = queue.pop_front() else {
            return PendingSet::settled();
        };
        dispatch_render(sensors[first].as_ref(), self.entry(), counters);
        if queue.is_empty() && !self.waits_after_final() {
            return PendingSet::settled();
        }
        PendingSet::sequential(queue, self.boundary())
    }

    fn join(
        &mut self,
        pending: &mut PendingSet,
        boundary: Boundary,
        sensors: &[SensorRef],
        counters: &Arc<DispatchCounters>,
    ) -> bool {
        if pending.wait != Some(boundary) {
            return pending.is_settled();
        }
        pending.wait = None;
        let Some(next) = pending.queue.pop_front() else {
            // the final camera's wait just completed
            return true;
        };
        dispatch_render(sensors[next].as_ref(), self.entry(), counters);
        if pending.queue.is_empty() && !self.waits_after_final() {
            return true;
        }
        pending.wait = Some(self.boundary());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCamera;
    use std::time::Duration;

    fn rig(count: usize) -> (Vec<SensorRef>, Vec<SimCamera>) {
        let cameras: Vec<SimCamera> = (0..count)
            .map(|i| SimCamera::new(&format!("cam{}", i), Duration::ZERO))
            .collect();
        let sensors = cameras.iter().map(SimCamera::handle).collect();
        (sensors, cameras)
    }

    #[test]
    fn test_frame_end_variant_paces_one_render_per_frame_end() {
        let (sensors, cameras) = rig(3);
        let counters = Arc::new(DispatchCounters::new());
        let mut strategy = SequentialDispatch::new(SequentialKind::BlockingFrameEnd, false);

        let mut pending = strategy.submit(&sensors, &counters);
        assert_eq!(cameras[0].frames_captured(), 1);
        assert_eq!(cameras[1].frames_captured(), 0);

        // fixed-step boundaries do not advance a frame-end wait
        assert!(!strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));
        assert_eq!(cameras[1].frames_captured(), 0);

        assert!(!strategy.join(&mut pending, Boundary::FrameEnd, &sensors, &counters));
        assert_eq!(cameras[1].frames_captured(), 1);

        assert!(!strategy.join(&mut pending, Boundary::FrameEnd, &sensors, &counters));
        assert_eq!(cameras[2].frames_captured(), 1);

        // final camera's wait is honored before the cycle settles
        assert!(strategy.join(&mut pending, Boundary::FrameEnd, &sensors, &counters));
        assert_eq!(counters.snapshot().rendered, 3);
    }

    #[test]
    fn test_fixed_step_variant_skips_final_wait() {
        let (sensors, cameras) = rig(2);
        let counters = Arc::new(DispatchCounters::new());
        let mut strategy = SequentialDispatch::new(SequentialKind::BlockingFixedStep, false);

        let mut pending = strategy.submit(&sensors, &counters);
        assert!(!pending.is_settled());
        assert_eq!(cameras[0].frames_captured(), 1);

        // the final render settles the cycle without a trailing wait
        assert!(strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));
        assert_eq!(cameras[1].frames_captured(), 1);
    }

    #[test]
    fn test_single_camera_fixed_step_settles_at_submit() {
        let (sensors, cameras) = rig(1);
        let counters = Arc::new(DispatchCounters::new());
        let mut strategy = SequentialDispatch::new(SequentialKind::BatchedFixedStep, true);

        let pending = strategy.submit(&sensors, &counters);
        assert!(pending.is_settled());
        assert_eq!(cameras[0].frames_captured(), 1);
        let snap = counters.snapshot();
        assert_eq!(snap.shade_requested, 1);
        assert_eq!(snap.shaded, 1);
    }

    #[test]
    fn test_inactive_camera_is_skipped_but_wait_elapses() {
        let (sensors, cameras) = rig(3);
        cameras[1].set_active(false);
        let counters = Arc::new(DispatchCounters::new());
        let mut strategy = SequentialDispatch::new(SequentialKind::BlockingFixedStep, false);

        let mut pending = strategy.submit(&sensors, &counters);
        // camera 1 consumes a boundary without rendering
        assert!(!strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));
        assert_eq!(cameras[1].frames_captured(), 0);
        assert!(strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));
        assert_eq!(cameras[2].frames_captured(), 1);
        assert_eq!(counters.snapshot().render_requested, 2);
    }

    #[test]
    fn test_deferred_variant_waits_after_final() {
        let (sensors, cameras) = rig(2);
        let counters = Arc::new(DispatchCounters::new());
        let mut strategy = SequentialDispatch::new(SequentialKind::DeferredFixedStep, false);

        let mut pending = strategy.submit(&sensors, &counters);
        assert!(!strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));
        assert!(strategy.join(&mut pending, Boundary::FixedStep, &sensors, &counters));

        // deferred completions happen on the cameras' own schedule
        for camera in &cameras {
            camera.wait_idle(Duration::from_secs(2));
            assert_eq!(camera.frames_captured(), 1);
        }
        let snap = counters.snapshot();
        assert_eq!(snap.render_requested, 2);
        assert_eq!(snap.rendered, 0);
    }
}
