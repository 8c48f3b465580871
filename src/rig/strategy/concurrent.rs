//! Concurrent dispatch: every camera's render issued in the due step

use super::{
    Boundary, ConcurrentKind, DispatchStrategy, JoinPolicy, PendingSet, RenderEntry, RenderUnit,
    UnitState, dispatch_render,
};
use crate::core::counters::DispatchCounters;
use crate::core::sensor::SensorRef;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::Arc;

/// Issues all render calls for the cycle within the due step.
///
/// Variants differ in whether the calls run on the dispatch thread or
/// the worker pool, and whether their completions are waited on.
/// [`ConcurrentKind::ParallelFanOut`] is the only variant whose renders
/// overlap each other in time; it joins before returning.
pub struct ConcurrentDispatch {
    kind: ConcurrentKind,
    use_command_buffer: bool,
}

impl ConcurrentDispatch {
    pub fn new(kind: ConcurrentKind, use_command_buffer: bool) -> Self {
        Self {
            kind,
            use_command_buffer,
        }
    }

    /// Render every camera on the dispatch thread, yielding one unit each
    fn issue_units(
        &self,
        sensors: &[SensorRef],
        counters: &Arc<DispatchCounters>,
    ) -> Vec<RenderUnit> {
        sensors
            .iter()
            .enumerate()
            .map(|(index, sensor)| {
                dispatch_render(sensor.as_ref(), RenderEntry::Blocking, counters);
                RenderUnit::yielded(index)
            })
            .collect()
    }
}

impl DispatchStrategy for ConcurrentDispatch {
    fn submit(&mut self, sensors: &[SensorRef], counters: &Arc<DispatchCounters>) -> PendingSet {
        match self.kind {
            ConcurrentKind::FireAndForget => {
                for sensor in sensors {
                    dispatch_render(sensor.as_ref(), RenderEntry::Blocking, counters);
                }
                PendingSet::settled()
            }
            ConcurrentKind::FireAndForgetBatched => {
                let entry = RenderEntry::Batched(self.use_command_buffer);
                for sensor in sensors {
                    dispatch_render(sensor.as_ref(), entry, counters);
                }
                PendingSet::settled()
            }
            ConcurrentKind::Collected => {
                // units exist but nothing ever waits on them
                let units = self.issue_units(sensors, counters);
                PendingSet::collected(units, JoinPolicy::Detached)
            }
            ConcurrentKind::JoinEach => {
                let units = self.issue_units(sensors, counters);
                PendingSet::collected(units, JoinPolicy::EachInOrder)
            }
            ConcurrentKind::JoinAll => {
                let units = self.issue_units(sensors, counters);
                PendingSet::collected(units, JoinPolicy::All)
            }
            ConcurrentKind::Reserved => {
                trace!("Reserved dispatch strategy, no renders issued");
                PendingSet::settled()
            }
            ConcurrentKind::WorkerOffload => {
                for sensor in sensors {
                    if !sensor.is_active() {
                        trace!("Camera {} inactive, skipping render", sensor.name());
                        continue;
                    }
                    let sensor = Arc::clone(sensor);
                    let counters = Arc::clone(counters);
                    rayon::spawn(move || {
                        counters.incr_render_requested();
                        sensor.render();
                        counters.incr_rendered();
                        debug!("Completed off-loaded render for camera {}", sensor.name());
                    });
                }
                PendingSet::settled()
            }
            ConcurrentKind::ParallelFanOut => {
                // one render per worker, joined before returning
                sensors.par_iter().for_each(|sensor| {
                    dispatch_render(sensor.as_ref(), RenderEntry::Blocking, counters);
                });
                PendingSet::settled()
            }
        }
    }

    fn join(
        &mut self,
        pending: &mut PendingSet,
        boundary: Boundary,
        sensors: &[SensorRef],
        counters: &Arc<DispatchCounters>,
    ) -> bool {
        let _ = counters;
        let total = pending.units.len();
        match pending.policy {
            JoinPolicy::Detached => true,
            JoinPolicy::EachInOrder => {
                let mut completed = pending.units.iter().filter(|u| u.is_complete()).count();
                for unit in pending.units.iter_mut() {
                    if unit.state == UnitState::AtBoundary(boundary) {
                        unit.state = UnitState::Complete;
                        completed += 1;
                        debug!(
                            "{} of {} render units completed (camera {})",
                            completed,
                            total,
                            sensors[unit.sensor].name()
                        );
                    } else if !unit.is_complete() {
                        break;
                    }
                }
                pending.units.iter().all(RenderUnit::is_complete)
            }
            JoinPolicy::All => {
                for unit in pending.units.iter_mut() {
                    if unit.state == UnitState::AtBoundary(boundary) {
                        unit.state = UnitState::Complete;
                    }
                }
                let done = pending.units.iter().all(RenderUnit::is_complete);
                if done {
                    debug!("All {} render units completed", total);
                }
                done
            }
        }
    }
}
